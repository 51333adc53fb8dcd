//! Error types and handling for the `Telemed` core

use thiserror::Error;

/// Main error type for the `Telemed` core
#[derive(Error, Debug)]
pub enum TelemedError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid arguments handed to the core by a caller
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Malformed reference data (condition tables, provider fixtures)
    #[error("Reference data error: {message}")]
    ReferenceData { message: String },

    /// Geocoding service errors
    #[error("Geocoding error: {message}")]
    Geocoding { message: String },

    /// Provider directory errors
    #[error("Provider directory error: {message}")]
    Directory { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON decoding errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl TelemedError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn reference_data<S: Into<String>>(message: S) -> Self {
        Self::ReferenceData {
            message: message.into(),
        }
    }

    /// Create a new geocoding error
    pub fn geocoding<S: Into<String>>(message: S) -> Self {
        Self::Geocoding {
            message: message.into(),
        }
    }

    /// Create a new provider directory error
    pub fn directory<S: Into<String>>(message: S) -> Self {
        Self::Directory {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TelemedError::Config { message } => {
                format!(
                    "Configuration error: {}. Please check your config file.",
                    message.trim_end_matches('.')
                )
            }
            TelemedError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TelemedError::ReferenceData { .. } => {
                "The condition or provider reference data could not be loaded.".to_string()
            }
            TelemedError::Geocoding { .. } => {
                "Unable to resolve that location. Please check your internet connection."
                    .to_string()
            }
            TelemedError::Directory { .. } => {
                "Unable to reach the doctor directory. Please try again later.".to_string()
            }
            TelemedError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TelemedError::Json { .. } => "Received malformed data.".to_string(),
        }
    }
}
