//! Data models for the `Telemed` core
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and geocoded places
//! - Condition: Reference table of conditions, symptoms and remedies
//! - Suggestion: Results of a symptom analysis
//! - Provider: Doctors returned by a provider directory

pub mod condition;
pub mod location;
pub mod provider;
pub mod suggestion;

// Re-export all public types for convenient access
pub use condition::{ConditionRecord, ConditionTable};
pub use location::{Coordinates, Location};
pub use provider::{Provider, RADIUS_PRESETS_KM, Specialization};
pub use suggestion::{AnalysisReport, AnalysisSuggestion};
