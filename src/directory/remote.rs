//! HTTP provider directory client
//!
//! Expects a search endpoint of the form
//! `GET {base_url}/providers/search?lat=..&lng=..` answering
//! `{"providers": [...]}`.

use super::ProviderDirectory;
use crate::TelemedError;
use crate::config::DirectoryConfig;
use crate::http::build_client;
use crate::models::{Coordinates, Provider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Remote directory API client
pub struct HttpDirectory {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
}

/// Provider as returned by the directory API
#[derive(Debug, Deserialize)]
pub struct DirectoryProvider {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub address: String,
    pub phone: Option<String>,
    pub rating: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Search response from the directory API
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub providers: Vec<DirectoryProvider>,
}

impl DirectoryProvider {
    fn into_provider(self) -> Provider {
        let coordinates = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).ok(),
            _ => None,
        };
        if coordinates.is_none() {
            warn!("Provider '{}' has no usable coordinates", self.id);
        }

        Provider {
            id: self.id,
            name: self.name,
            specialization: self.specialization,
            address: self.address,
            phone: self.phone.unwrap_or_default(),
            rating: self.rating.unwrap_or(0.0).clamp(0.0, 5.0),
            distance_km: None,
            coordinates,
        }
    }
}

impl HttpDirectory {
    pub fn new(config: &DirectoryConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| TelemedError::config("HTTP directory requires a base_url"))?;

        Ok(Self {
            client: build_client(config.timeout_seconds, config.max_retries)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn search_url(&self, near: &Coordinates) -> String {
        format!(
            "{}/providers/search?lat={}&lng={}",
            self.base_url, near.latitude, near.longitude
        )
    }

    /// Convert a raw response body into providers
    pub fn parse_response(body: SearchResponse) -> Vec<Provider> {
        body.providers
            .into_iter()
            .map(DirectoryProvider::into_provider)
            .collect()
    }
}

#[async_trait]
impl ProviderDirectory for HttpDirectory {
    #[instrument(skip(self), fields(lat = near.latitude, lon = near.longitude))]
    async fn list_candidates(&self, near: &Coordinates) -> Result<Vec<Provider>> {
        info!("Searching provider directory near ({})", near.format());

        let mut request = self.client.get(self.search_url(near));
        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = request
            .send()
            .await
            .with_context(|| "Provider directory request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => TelemedError::directory("Invalid or missing directory API key"),
                429 => TelemedError::directory("Directory API rate limit exceeded"),
                _ => TelemedError::directory(format!(
                    "Directory API error {status}: {error_text}"
                )),
            }
            .into());
        }

        let body: SearchResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse provider directory response")?;

        let providers = Self::parse_response(body);
        info!("Found {} providers in directory", providers.len());
        Ok(providers)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
