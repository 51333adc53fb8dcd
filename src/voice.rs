//! Voice input
//!
//! Speech capture is an external collaborator behind [`SpeechCapture`]. The
//! [`VoiceAnalysis`] workflow runs one capture, feeds the transcript to the
//! symptom matcher and reports its stage to an optional observer. A
//! [`CancelToken`] aborts an outstanding capture.

use crate::config::VoiceConfig;
use crate::models::AnalysisReport;
use crate::symptoms::SymptomMatcher;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Why a capture produced no transcript
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("No speech detected")]
    NoSpeech,

    #[error("Could not understand audio")]
    Unintelligible,

    #[error("Recording cancelled")]
    Cancelled,

    #[error("Error: {0}")]
    Other(String),
}

/// A single transcribed utterance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transcript {
    pub text: String,
    pub captured_at: DateTime<Utc>,
}

impl Transcript {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            captured_at: Utc::now(),
        }
    }
}

/// Workflow stages reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AdjustingForNoise,
    Listening,
    Transcribing,
    Analyzing,
    Finished,
}

impl Stage {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Stage::AdjustingForNoise => "Adjusting for ambient noise...",
            Stage::Listening => "Recording... Speak now",
            Stage::Transcribing => "Processing speech...",
            Stage::Analyzing => "Analyzing symptoms...",
            Stage::Finished => "Recording completed!",
        }
    }
}

/// Callback receiving stage changes
pub type ProgressObserver = Arc<dyn Fn(Stage) + Send + Sync>;

/// Cooperative cancellation shared between a caller and a running workflow
#[derive(Debug, Clone)]
pub struct CancelToken {
    sender: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called
    pub async fn cancelled(&self) {
        let mut receiver = self.sender.subscribe();
        // the sender lives as long as self, so this only returns once cancelled
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces one transcribed utterance
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Capture an utterance, reporting stages through `report`
    async fn capture(
        &self,
        report: &(dyn Fn(Stage) + Send + Sync),
    ) -> Result<Transcript, CaptureError>;
}

/// Capture that reads one typed line from stdin, for terminal front-ends
#[derive(Debug, Default)]
pub struct StdinCapture;

#[async_trait]
impl SpeechCapture for StdinCapture {
    async fn capture(
        &self,
        report: &(dyn Fn(Stage) + Send + Sync),
    ) -> Result<Transcript, CaptureError> {
        report(Stage::Listening);
        // the blocking read is not cancellable once started
        let (read, line) = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .map(|read| (read, line))
        })
        .await
        .map_err(|e| CaptureError::Other(e.to_string()))?
        .map_err(|e| CaptureError::Other(e.to_string()))?;

        report(Stage::Transcribing);
        if read == 0 || line.trim().is_empty() {
            return Err(CaptureError::NoSpeech);
        }
        Ok(Transcript::new(line.trim()))
    }
}

/// Capture replaying a fixed outcome, optionally after a delay
#[derive(Debug, Clone)]
pub struct ScriptedCapture {
    outcome: Result<String, CaptureError>,
    delay: Duration,
}

impl ScriptedCapture {
    pub fn speaking<S: Into<String>>(text: S) -> Self {
        Self {
            outcome: Ok(text.into()),
            delay: Duration::ZERO,
        }
    }

    pub fn failing(error: CaptureError) -> Self {
        Self {
            outcome: Err(error),
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl SpeechCapture for ScriptedCapture {
    async fn capture(
        &self,
        report: &(dyn Fn(Stage) + Send + Sync),
    ) -> Result<Transcript, CaptureError> {
        report(Stage::AdjustingForNoise);
        report(Stage::Listening);
        tokio::time::sleep(self.delay).await;
        report(Stage::Transcribing);
        self.outcome.clone().map(Transcript::new)
    }
}

/// Transcript together with its analysis
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceOutcome {
    pub transcript: Transcript,
    pub report: AnalysisReport,
}

/// Capture-then-analyze workflow
pub struct VoiceAnalysis {
    capture: Arc<dyn SpeechCapture>,
    matcher: Arc<SymptomMatcher>,
    listen_timeout: Duration,
    observer: Option<ProgressObserver>,
}

impl VoiceAnalysis {
    pub fn new(
        capture: Arc<dyn SpeechCapture>,
        matcher: Arc<SymptomMatcher>,
        config: &VoiceConfig,
    ) -> Self {
        Self {
            capture,
            matcher,
            listen_timeout: Duration::from_secs(config.listen_timeout_seconds.into()),
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: ProgressObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    fn notify(&self, stage: Stage) {
        debug!("Voice stage: {:?}", stage);
        if let Some(observer) = &self.observer {
            observer(stage);
        }
    }

    /// Capture one utterance and analyze it.
    ///
    /// A listen that outlasts the configured timeout counts as no speech.
    pub async fn run(&self, cancel: &CancelToken) -> Result<VoiceOutcome, CaptureError> {
        if cancel.is_cancelled() {
            return Err(CaptureError::Cancelled);
        }

        let report = |stage: Stage| self.notify(stage);
        let captured = tokio::select! {
            _ = cancel.cancelled() => Err(CaptureError::Cancelled),
            result = tokio::time::timeout(self.listen_timeout, self.capture.capture(&report)) => {
                match result {
                    Ok(captured) => captured,
                    Err(_) => {
                        warn!("No speech within {}s", self.listen_timeout.as_secs());
                        Err(CaptureError::NoSpeech)
                    }
                }
            }
        };

        let transcript = match captured {
            Ok(transcript) => transcript,
            Err(e) => {
                info!("Voice capture ended without transcript: {}", e);
                return Err(e);
            }
        };

        self.notify(Stage::Analyzing);
        let report = self.matcher.analyze(&transcript.text);
        self.notify(Stage::Finished);

        Ok(VoiceOutcome { transcript, report })
    }

    /// Run the workflow on the tokio runtime, leaving the caller free
    pub fn spawn(
        self: Arc<Self>,
        cancel: CancelToken,
    ) -> JoinHandle<Result<VoiceOutcome, CaptureError>> {
        tokio::spawn(async move { self.run(&cancel).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn workflow(capture: ScriptedCapture, timeout_seconds: u32) -> VoiceAnalysis {
        VoiceAnalysis::new(
            Arc::new(capture),
            Arc::new(SymptomMatcher::with_default_table().unwrap()),
            &VoiceConfig {
                listen_timeout_seconds: timeout_seconds,
            },
        )
    }

    #[tokio::test]
    async fn test_transcript_is_analyzed() {
        let outcome = workflow(ScriptedCapture::speaking("I have a fever and vomiting"), 5)
            .run(&CancelToken::new())
            .await
            .unwrap();
        assert_eq!(outcome.transcript.text, "I have a fever and vomiting");
        assert_eq!(outcome.report.top().unwrap().condition, "Gastroenteritis");
    }

    #[tokio::test]
    async fn test_observer_sees_stages_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let workflow = workflow(ScriptedCapture::speaking("cough"), 5)
            .with_observer(Arc::new(move |stage| sink.lock().unwrap().push(stage)));

        workflow.run(&CancelToken::new()).await.unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Stage::AdjustingForNoise,
                Stage::Listening,
                Stage::Transcribing,
                Stage::Analyzing,
                Stage::Finished,
            ]
        );
    }

    #[tokio::test]
    async fn test_capture_errors_pass_through() {
        for error in [
            CaptureError::NoSpeech,
            CaptureError::Unintelligible,
            CaptureError::Other("microphone unplugged".to_string()),
        ] {
            let result = workflow(ScriptedCapture::failing(error.clone()), 5)
                .run(&CancelToken::new())
                .await;
            assert_eq!(result.unwrap_err(), error);
        }
    }

    #[test]
    fn test_capture_error_messages() {
        assert_eq!(CaptureError::NoSpeech.to_string(), "No speech detected");
        assert_eq!(CaptureError::Unintelligible.to_string(), "Could not understand audio");
        assert_eq!(CaptureError::Other("boom".to_string()).to_string(), "Error: boom");
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_timeout_is_no_speech() {
        let result = workflow(
            ScriptedCapture::speaking("cough").after(Duration::from_secs(30)),
            5,
        )
        .run(&CancelToken::new())
        .await;
        assert_eq!(result.unwrap_err(), CaptureError::NoSpeech);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_running_capture() {
        let workflow = Arc::new(workflow(
            ScriptedCapture::speaking("cough").after(Duration::from_secs(3)),
            10,
        ));
        let cancel = CancelToken::new();
        let handle = Arc::clone(&workflow).spawn(cancel.clone());

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();

        assert_eq!(handle.await.unwrap().unwrap_err(), CaptureError::Cancelled);
    }

    #[tokio::test]
    async fn test_already_cancelled_token() {
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(cancel.is_cancelled());
        let result = workflow(ScriptedCapture::speaking("cough"), 5).run(&cancel).await;
        assert_eq!(result.unwrap_err(), CaptureError::Cancelled);
    }
}
