//! Medical provider records and the specialization catalogue

use super::Coordinates;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// A doctor or practice returned by a provider directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub address: String,
    pub phone: String,
    /// Rating from 0.0 to 5.0
    pub rating: f64,
    /// Distance from the searcher in kilometers, set by the locator
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

impl Provider {
    /// Case-insensitive specialization comparison
    #[must_use]
    pub fn has_specialization(&self, specialization: &str) -> bool {
        self.specialization.to_lowercase() == specialization.to_lowercase()
    }

    #[must_use]
    pub fn format_rating(&self) -> String {
        format!("★ {:.1}", self.rating)
    }

    #[must_use]
    pub fn format_distance(&self) -> Option<String> {
        self.distance_km.map(|d| format!("{d:.1} km away"))
    }
}

impl Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}  {}", self.name, self.format_rating())?;
        writeln!(f, "   {}", self.specialization)?;
        match self.format_distance() {
            Some(distance) => writeln!(f, "   📍 {} ({distance})", self.address)?,
            None => writeln!(f, "   📍 {}", self.address)?,
        }
        writeln!(f, "   📞 {}", self.phone)
    }
}

/// Specializations offered by the search front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    GeneralMedicine,
    Pediatrics,
    Cardiology,
    Dermatology,
    Orthopedics,
    Neurology,
    Gynecology,
}

impl Specialization {
    pub const ALL: [Specialization; 7] = [
        Specialization::GeneralMedicine,
        Specialization::Pediatrics,
        Specialization::Cardiology,
        Specialization::Dermatology,
        Specialization::Orthopedics,
        Specialization::Neurology,
        Specialization::Gynecology,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Specialization::GeneralMedicine => "General Medicine",
            Specialization::Pediatrics => "Pediatrics",
            Specialization::Cardiology => "Cardiology",
            Specialization::Dermatology => "Dermatology",
            Specialization::Orthopedics => "Orthopedics",
            Specialization::Neurology => "Neurology",
            Specialization::Gynecology => "Gynecology",
        }
    }
}

impl Display for Specialization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialization {
    type Err = crate::TelemedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Specialization::ALL
            .into_iter()
            .find(|spec| spec.as_str().to_lowercase() == wanted)
            .ok_or_else(|| crate::TelemedError::validation(format!("Unknown specialization '{s}'")))
    }
}

/// Search radius choices offered by the front-end, in kilometers
pub const RADIUS_PRESETS_KM: [f64; 4] = [5.0, 10.0, 20.0, 50.0];
