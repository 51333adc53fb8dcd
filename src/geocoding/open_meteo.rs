//! OpenMeteo geocoding client
//!
//! Uses the key-free `geocoding-api.open-meteo.com` search endpoint and keeps
//! only the best-ranked result.

use super::Geocoder;
use crate::config::GeocodingConfig;
use crate::http::build_client;
use crate::models::{Coordinates, Location};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Geocoder backed by the OpenMeteo geocoding API
pub struct OpenMeteoGeocoder {
    client: ClientWithMiddleware,
    base_url: String,
    language: String,
}

impl OpenMeteoGeocoder {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_seconds, config.max_retries)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?name={}&count=1&language={}&format=json",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.language)
        )
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self), fields(location = query))]
    async fn geocode(&self, query: &str) -> Result<Option<Location>> {
        info!("Geocoding location: '{}'", query);
        let start_time = Instant::now();

        let url = self.search_url(query);
        debug!("OpenMeteo geocoding request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Geocoding request for '{query}' failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(crate::TelemedError::geocoding(format!(
                "Geocoding API returned {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            ))
            .into());
        }

        let body: openmeteo::GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenMeteo geocoding response")?;

        let location = body.best_match()?;
        match &location {
            Some(found) => info!(
                "Geocoded '{}' to {} ({}) in {:.3}s",
                query,
                found.name,
                found.coordinates.format(),
                start_time.elapsed().as_secs_f64()
            ),
            None => warn!("No results found for location '{}'", query),
        }

        Ok(location)
    }
}

/// `OpenMeteo` geocoding response structures
mod openmeteo {
    use super::{Coordinates, Location};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
        pub admin1: Option<String>,
    }

    impl GeocodingResponse {
        pub fn best_match(self) -> crate::Result<Option<Location>> {
            let Some(first) = self.results.unwrap_or_default().into_iter().next() else {
                return Ok(None);
            };

            let coordinates = Coordinates::new(first.latitude, first.longitude)?;
            let name = match first.admin1 {
                Some(region) => format!("{}, {}", first.name, region),
                None => first.name,
            };
            Ok(Some(match first.country {
                Some(country) => Location::with_country(coordinates, name, country),
                None => Location::new(coordinates, name),
            }))
        }
    }
}
