//! `Telemed` - symptom analysis and nearby doctor search
//!
//! This library provides the core of a telemedicine assistant: matching
//! free-text symptom descriptions against a reference table of conditions,
//! and locating nearby medical providers by specialization and radius.

pub mod config;
pub mod directory;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod http;
pub mod locator;
pub mod logging;
pub mod models;
pub mod symptoms;
pub mod voice;

// Re-export core types for public API
pub use config::TelemedConfig;
pub use directory::{FixtureDirectory, HttpDirectory, ProviderDirectory};
pub use error::TelemedError;
pub use geocoding::{Geocoder, LocationInput, LocationParser, OpenMeteoGeocoder, StaticGeocoder};
pub use locator::ProviderLocator;
pub use models::{
    AnalysisReport, AnalysisSuggestion, ConditionRecord, ConditionTable, Coordinates, Location,
    Provider, Specialization,
};
pub use symptoms::SymptomMatcher;
pub use voice::{
    CancelToken, CaptureError, ScriptedCapture, SpeechCapture, Stage, StdinCapture, Transcript,
    VoiceAnalysis, VoiceOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TelemedError>;
