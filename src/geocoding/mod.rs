//! Forward geocoding of free-text locations
//!
//! A [`Geocoder`] turns a place description into a [`Location`]. Errors are
//! allowed to surface from implementations; the provider locator is the
//! point where they are logged and turned into an empty search result.

pub mod open_meteo;

use crate::TelemedError;
use crate::models::{Coordinates, Location};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

pub use open_meteo::OpenMeteoGeocoder;

/// Resolves a free-text place description to a location
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `query`, or `None` when nothing matches
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Location>>;
}

/// In-memory geocoder keyed by lowercased place name, for tests and demos
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: HashMap<String, Location>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_place(mut self, name: &str, coordinates: Coordinates) -> Self {
        self.places.insert(
            name.trim().to_lowercase(),
            Location::new(coordinates, name.to_string()),
        );
        self
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, query: &str) -> anyhow::Result<Option<Location>> {
        let found = self.places.get(&query.trim().to_lowercase()).cloned();
        debug!("Static geocoder lookup '{}': {}", query, found.is_some());
        Ok(found)
    }
}

/// Location parsing utilities
pub struct LocationParser;

impl LocationParser {
    /// Parse location input: literal coordinates or a place name
    pub fn parse(input: &str) -> crate::Result<LocationInput> {
        let input = input.trim();

        if input.is_empty() {
            return Err(TelemedError::validation("Location cannot be empty"));
        }

        // Try to parse as coordinates (lat,lon)
        if let Ok(coords) = Self::parse_coordinates(input) {
            return Ok(LocationInput::Coordinates(coords));
        }

        Ok(LocationInput::Name(input.to_string()))
    }

    /// Parse coordinates from string like "46.8182,8.2275" or "46.8182 8.2275"
    fn parse_coordinates(input: &str) -> crate::Result<Coordinates> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        if parts.len() != 2 {
            return Err(TelemedError::validation(
                "Coordinates must be in format 'lat,lon'",
            ));
        }

        let lat = parts[0]
            .parse::<f64>()
            .map_err(|_| TelemedError::validation(format!("Invalid latitude: {}", parts[0])))?;
        let lon = parts[1]
            .parse::<f64>()
            .map_err(|_| TelemedError::validation(format!("Invalid longitude: {}", parts[1])))?;

        Coordinates::new(lat, lon)
    }
}

/// Types of location input
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    /// Literal coordinates
    Coordinates(Coordinates),
    /// Location name (city, address, postal code, ...)
    Name(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("46.8182,8.2275", 46.8182, 8.2275)]
    #[case("46.8182 8.2275", 46.8182, 8.2275)]
    #[case("-46.8182, -8.2275", -46.8182, -8.2275)]
    fn test_location_parser_coordinates(#[case] input: &str, #[case] lat: f64, #[case] lon: f64) {
        match LocationParser::parse(input).unwrap() {
            LocationInput::Coordinates(c) => {
                assert_eq!(c.latitude, lat);
                assert_eq!(c.longitude, lon);
            }
            other => panic!("expected coordinates, got {other:?}"),
        }
    }

    #[rstest]
    #[case("91.0,8.0")]
    #[case("46.0,-181.0")]
    #[case("46.0")]
    #[case("46.0,8.0,0.0")]
    #[case("Springfield")]
    #[case("New York City")]
    #[case("10115 Berlin")]
    fn test_location_parser_names(#[case] input: &str) {
        assert!(matches!(
            LocationParser::parse(input).unwrap(),
            LocationInput::Name(_)
        ));
    }

    #[test]
    fn test_location_parser_rejects_blank() {
        assert!(LocationParser::parse("").is_err());
        assert!(LocationParser::parse("   ").is_err());
    }

    #[tokio::test]
    async fn test_static_geocoder_is_case_insensitive() {
        let geocoder = StaticGeocoder::new()
            .with_place("Springfield", Coordinates::new(39.7817, -89.6501).unwrap());
        let found = geocoder.geocode("  SPRINGFIELD ").await.unwrap().unwrap();
        assert_eq!(found.name, "Springfield");
        assert!(geocoder.geocode("Shelbyville").await.unwrap().is_none());
    }
}
