//! Geographic coordinates and resolved locations

use crate::TelemedError;
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Create coordinates, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(TelemedError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(TelemedError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Shift by a fractional-degree delta, clamping latitude and wrapping longitude
    #[must_use]
    pub fn offset(&self, lat_delta: f64, lon_delta: f64) -> Self {
        let latitude = (self.latitude + lat_delta).clamp(-90.0, 90.0);
        let mut longitude = self.longitude + lon_delta;
        if longitude > 180.0 {
            longitude -= 360.0;
        } else if longitude < -180.0 {
            longitude += 360.0;
        }
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a coordinates string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A geocoded place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    pub coordinates: Coordinates,
    /// Location name (city, region, etc.)
    pub name: String,
    /// Country name or code
    pub country: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(coordinates: Coordinates, name: String) -> Self {
        Self {
            coordinates,
            name,
            country: None,
        }
    }

    #[must_use]
    pub fn with_country(coordinates: Coordinates, name: String, country: String) -> Self {
        Self {
            coordinates,
            name,
            country: Some(country),
        }
    }
}
