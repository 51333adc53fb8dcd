//! Analysis results

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A condition suggested for a symptom description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSuggestion {
    pub condition: String,
    /// Share of the condition's symptoms found in the input, in [0, 1]
    pub probability: f64,
    pub matched_symptoms: usize,
    pub total_symptoms: usize,
    pub home_remedies: Vec<String>,
}

impl AnalysisSuggestion {
    /// Probability as a percentage string, e.g. "40.00%"
    #[must_use]
    pub fn format_probability(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }
}

impl Display for AnalysisSuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.condition)?;
        writeln!(
            f,
            "   Probability: {} ({}/{} symptoms)",
            self.format_probability(),
            self.matched_symptoms,
            self.total_symptoms
        )?;
        writeln!(f, "   Home Remedies:")?;
        for remedy in &self.home_remedies {
            writeln!(f, "     - {remedy}")?;
        }
        Ok(())
    }
}

/// Result of one analysis call, ordered by descending probability
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub suggestions: Vec<AnalysisSuggestion>,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    pub fn top(&self) -> Option<&AnalysisSuggestion> {
        self.suggestions.first()
    }
}
