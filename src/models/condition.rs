//! Condition reference data
//!
//! A [`ConditionTable`] is built once at startup and shared read-only. Its
//! iteration order is the order records were supplied in, and that order is
//! what breaks probability ties during analysis.

use crate::TelemedError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A named condition with its symptom phrases and home remedies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionRecord {
    pub name: String,
    pub symptoms: Vec<String>,
    pub remedies: Vec<String>,
}

impl ConditionRecord {
    /// Build a record, lowercasing symptom phrases so they compare against
    /// lowercased input.
    pub fn new<N, S, R>(name: N, symptoms: S, remedies: R) -> crate::Result<Self>
    where
        N: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let name = name.into();
        let symptoms: Vec<String> = symptoms
            .into_iter()
            .map(|s| s.into().to_lowercase())
            .collect();
        let remedies: Vec<String> = remedies.into_iter().map(Into::into).collect();

        let record = Self {
            name,
            symptoms,
            remedies,
        };
        record.validate()?;
        Ok(record)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.name.trim().is_empty() {
            return Err(TelemedError::reference_data("Condition name cannot be empty"));
        }
        if self.symptoms.is_empty() {
            return Err(TelemedError::reference_data(format!(
                "Condition '{}' has no symptoms",
                self.name
            )));
        }
        if self.symptoms.iter().any(|s| s.trim().is_empty()) {
            return Err(TelemedError::reference_data(format!(
                "Condition '{}' has a blank symptom phrase",
                self.name
            )));
        }
        if self.remedies.is_empty() {
            return Err(TelemedError::reference_data(format!(
                "Condition '{}' has no remedies",
                self.name
            )));
        }
        Ok(())
    }
}

/// Ordered, immutable set of conditions keyed by name
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ConditionTable {
    records: Vec<ConditionRecord>,
}

impl ConditionTable {
    /// Build a table, rejecting empty tables and duplicate names
    pub fn new(records: Vec<ConditionRecord>) -> crate::Result<Self> {
        if records.is_empty() {
            return Err(TelemedError::reference_data("Condition table is empty"));
        }

        let mut seen = HashSet::new();
        for record in &records {
            record.validate()?;
            if !seen.insert(record.name.as_str()) {
                return Err(TelemedError::reference_data(format!(
                    "Duplicate condition '{}'",
                    record.name
                )));
            }
        }

        Ok(Self { records })
    }

    /// Parse a JSON array of `{name, symptoms, remedies}` objects
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let raw: Vec<ConditionRecord> = serde_json::from_str(json)?;
        let records = raw
            .into_iter()
            .map(|r| ConditionRecord::new(r.name, r.symptoms, r.remedies))
            .collect::<crate::Result<Vec<_>>>()?;
        Self::new(records)
    }

    /// Load a table from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, name: &str) -> Option<&ConditionRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
