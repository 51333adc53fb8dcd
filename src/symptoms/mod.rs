//! Symptom analysis
//!
//! Matches a free-text symptom description against a [`ConditionTable`] by
//! substring containment. A condition's probability is the share of its
//! symptom phrases found anywhere in the lowercased input, so "ache" also
//! matches inside "headache". Conditions without any match are left out.

pub mod reference;

use crate::config::AnalysisConfig;
use crate::models::{AnalysisReport, AnalysisSuggestion, ConditionTable};
use crate::TelemedError;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

pub use reference::{FALLBACK_REMEDIES, default_table};

/// Most suggestions a single analysis ever returns
pub const MAX_SUGGESTIONS: usize = 3;

/// Scores symptom descriptions against an injected condition table
#[derive(Debug, Clone)]
pub struct SymptomMatcher {
    table: Arc<ConditionTable>,
    max_suggestions: usize,
}

impl SymptomMatcher {
    pub fn new(table: Arc<ConditionTable>) -> Self {
        Self {
            table,
            max_suggestions: MAX_SUGGESTIONS,
        }
    }

    /// Matcher over the built-in five-condition table
    pub fn with_default_table() -> crate::Result<Self> {
        Ok(Self::new(Arc::new(default_table()?)))
    }

    /// Build from configuration, loading the condition file if one is set
    pub fn from_config(config: &AnalysisConfig) -> crate::Result<Self> {
        let table = match &config.conditions_file {
            Some(path) => {
                debug!("Loading condition table from {}", path);
                ConditionTable::from_path(path)?
            }
            None => default_table()?,
        };
        Self::new(Arc::new(table)).with_max_suggestions(config.max_suggestions)
    }

    /// Limit the number of suggestions (1..=3)
    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> crate::Result<Self> {
        if !(1..=MAX_SUGGESTIONS).contains(&max_suggestions) {
            return Err(TelemedError::validation(format!(
                "max_suggestions must be between 1 and {MAX_SUGGESTIONS}, got: {max_suggestions}"
            )));
        }
        self.max_suggestions = max_suggestions;
        Ok(self)
    }

    pub fn conditions(&self) -> &ConditionTable {
        &self.table
    }

    /// Rank conditions for a symptom description.
    ///
    /// Equal probabilities keep the table's order.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub fn analyze(&self, text: &str) -> AnalysisReport {
        let normalized = text.to_lowercase();

        let mut suggestions: Vec<AnalysisSuggestion> = self
            .table
            .iter()
            .filter_map(|record| {
                let matched = record
                    .symptoms
                    .iter()
                    .filter(|symptom| normalized.contains(symptom.as_str()))
                    .count();
                if matched == 0 {
                    return None;
                }
                let total = record.symptoms.len();
                Some(AnalysisSuggestion {
                    condition: record.name.clone(),
                    probability: matched as f64 / total as f64,
                    matched_symptoms: matched,
                    total_symptoms: total,
                    home_remedies: record.remedies.clone(),
                })
            })
            .collect();

        // sort_by is stable
        suggestions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        suggestions.truncate(self.max_suggestions);

        debug!(
            "Analysis produced {} suggestions: {:?}",
            suggestions.len(),
            suggestions
                .iter()
                .map(|s| format!("{} ({:.2})", s.condition, s.probability))
                .collect::<Vec<_>>()
        );

        AnalysisReport { suggestions }
    }

    /// Analyze an untyped value handed over by a front-end. Anything other
    /// than a JSON string is an invalid argument.
    pub fn analyze_value(&self, input: &Value) -> crate::Result<AnalysisReport> {
        match input {
            Value::String(text) => Ok(self.analyze(text)),
            other => Err(TelemedError::validation(format!(
                "Symptoms must be text, got {}",
                json_type_name(other)
            ))),
        }
    }

    /// Analyze raw bytes, which must be valid UTF-8
    pub fn analyze_bytes(&self, input: &[u8]) -> crate::Result<AnalysisReport> {
        let text = std::str::from_utf8(input).map_err(|e| {
            TelemedError::validation(format!("Symptoms must be UTF-8 text: {e}"))
        })?;
        Ok(self.analyze(text))
    }

    /// Home remedies for a condition, or the generic fallback list when the
    /// name is not in the table. The lookup is case-sensitive.
    pub fn remedies_for(&self, condition: &str) -> Vec<String> {
        match self.table.get(condition) {
            Some(record) => record.remedies.clone(),
            None => {
                debug!("No remedies for '{}', using fallback list", condition);
                FALLBACK_REMEDIES.iter().map(|r| (*r).to_string()).collect()
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
