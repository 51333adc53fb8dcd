//! Fixture-backed provider directory

use super::ProviderDirectory;
use crate::models::{Coordinates, Provider};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A provider placed relative to the searcher by a fractional-degree offset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderTemplate {
    pub name: String,
    pub specialization: String,
    pub address: String,
    pub phone: String,
    pub rating: f64,
    pub lat_offset: f64,
    pub lon_offset: f64,
}

impl ProviderTemplate {
    fn place(&self, index: usize, near: &Coordinates) -> Provider {
        Provider {
            id: format!("fixture-{}", index + 1),
            name: self.name.clone(),
            specialization: self.specialization.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            rating: self.rating.clamp(0.0, 5.0),
            distance_km: None,
            coordinates: Some(near.offset(self.lat_offset, self.lon_offset)),
        }
    }
}

/// Directory that answers every query with the same templates
#[derive(Debug, Clone)]
pub struct FixtureDirectory {
    templates: Vec<ProviderTemplate>,
}

impl FixtureDirectory {
    pub fn new(templates: Vec<ProviderTemplate>) -> Self {
        Self { templates }
    }
}

impl Default for FixtureDirectory {
    /// The three demo doctors shipped with the assistant
    fn default() -> Self {
        Self::new(vec![
            ProviderTemplate {
                name: "Dr. John Smith".to_string(),
                specialization: "General Medicine".to_string(),
                address: "123 Medical Center Dr".to_string(),
                phone: "(555) 123-4567".to_string(),
                rating: 4.5,
                lat_offset: 0.01,
                lon_offset: 0.01,
            },
            ProviderTemplate {
                name: "Dr. Sarah Johnson".to_string(),
                specialization: "Pediatrics".to_string(),
                address: "456 Health Plaza".to_string(),
                phone: "(555) 234-5678".to_string(),
                rating: 4.8,
                lat_offset: -0.01,
                lon_offset: -0.01,
            },
            ProviderTemplate {
                name: "Dr. Michael Brown".to_string(),
                specialization: "Cardiology".to_string(),
                address: "789 Heart Center".to_string(),
                phone: "(555) 345-6789".to_string(),
                rating: 4.2,
                lat_offset: 0.02,
                lon_offset: -0.02,
            },
        ])
    }
}

#[async_trait]
impl ProviderDirectory for FixtureDirectory {
    async fn list_candidates(&self, near: &Coordinates) -> Result<Vec<Provider>> {
        debug!(
            "Placing {} fixture providers around ({})",
            self.templates.len(),
            near.format()
        );
        Ok(self
            .templates
            .iter()
            .enumerate()
            .map(|(index, template)| template.place(index, near))
            .collect())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
