//! Configuration management for the `Telemed` core
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TelemedError;
use crate::directory::ProviderTemplate;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemedConfig {
    /// Symptom analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Geocoding service settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Provider directory settings
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Voice capture settings
    #[serde(default)]
    pub voice: VoiceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default search settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Symptom analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Optional JSON file replacing the built-in condition table
    pub conditions_file: Option<String>,
    /// Number of suggestions returned per analysis (1..=3)
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the OpenMeteo geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Language for place names
    #[serde(default = "default_geocoding_language")]
    pub language: String,
}

/// Provider directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Directory backend: "fixture" or "http"
    #[serde(default = "default_directory_kind")]
    pub kind: String,
    /// Base URL of the HTTP provider directory
    pub base_url: Option<String>,
    /// API key for the HTTP provider directory
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_directory_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixture templates; empty means the built-in set
    #[serde(default)]
    pub fixtures: Vec<ProviderTemplate>,
}

/// Voice capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Upper bound for a single listen operation
    #[serde(default = "default_listen_timeout")]
    pub listen_timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Search radius in kilometers
    #[serde(default = "default_search_radius")]
    pub search_radius_km: u32,
    /// Specialization preselected by front-ends
    #[serde(default = "default_specialization")]
    pub specialization: String,
}

// Default value functions
fn default_max_suggestions() -> usize {
    3
}

fn default_geocoding_base_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_geocoding_timeout() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    2
}

fn default_geocoding_language() -> String {
    "en".to_string()
}

fn default_directory_kind() -> String {
    "fixture".to_string()
}

fn default_directory_timeout() -> u32 {
    15
}

fn default_listen_timeout() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_search_radius() -> u32 {
    10
}

fn default_specialization() -> String {
    "General Medicine".to_string()
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            conditions_file: None,
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_seconds: default_geocoding_timeout(),
            max_retries: default_max_retries(),
            language: default_geocoding_language(),
        }
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            kind: default_directory_kind(),
            base_url: None,
            api_key: None,
            timeout_seconds: default_directory_timeout(),
            max_retries: default_max_retries(),
            fixtures: Vec::new(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            listen_timeout_seconds: default_listen_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            search_radius_km: default_search_radius(),
            specialization: default_specialization(),
        }
    }
}

impl Default for TelemedConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            geocoding: GeocodingConfig::default(),
            directory: DirectoryConfig::default(),
            voice: VoiceConfig::default(),
            logging: LoggingConfig::default(),
            defaults: DefaultsConfig::default(),
        }
    }
}

impl TelemedConfig {
    /// Load configuration from `config_path`, or the default file location,
    /// then apply `TELEMED_` environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. TELEMED_DIRECTORY__KIND=http
        builder = builder.add_source(
            Environment::with_prefix("TELEMED")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TelemedConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("telemed").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.analysis.max_suggestions == 0 {
            self.analysis.max_suggestions = default_max_suggestions();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.geocoding.language.is_empty() {
            self.geocoding.language = default_geocoding_language();
        }
        if self.directory.kind.is_empty() {
            self.directory.kind = default_directory_kind();
        }
        if self.directory.timeout_seconds == 0 {
            self.directory.timeout_seconds = default_directory_timeout();
        }
        if self.voice.listen_timeout_seconds == 0 {
            self.voice.listen_timeout_seconds = default_listen_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.search_radius_km == 0 {
            self.defaults.search_radius_km = default_search_radius();
        }
        if self.defaults.specialization.is_empty() {
            self.defaults.specialization = default_specialization();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the provider directory API key, if one is configured
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.directory.api_key {
            if api_key.is_empty() {
                return Err(TelemedError::config(
                    "Directory API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(TelemedError::config(
                    "Directory API key appears to be invalid (too short). Please check your API key."
                ).into());
            }

            if api_key.len() > 100 {
                return Err(TelemedError::config(
                    "Directory API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if !(1..=3).contains(&self.analysis.max_suggestions) {
            return Err(TelemedError::config(
                "Analysis max suggestions must be between 1 and 3"
            ).into());
        }

        if self.geocoding.timeout_seconds > 300 || self.directory.timeout_seconds > 300 {
            return Err(TelemedError::config(
                "Request timeout cannot exceed 300 seconds"
            ).into());
        }

        if self.geocoding.max_retries > 10 || self.directory.max_retries > 10 {
            return Err(TelemedError::config(
                "Max retries cannot exceed 10"
            ).into());
        }

        if self.voice.listen_timeout_seconds > 60 {
            return Err(TelemedError::config(
                "Listen timeout cannot exceed 60 seconds"
            ).into());
        }

        if self.defaults.search_radius_km > 500 {
            return Err(TelemedError::config(
                "Search radius cannot exceed 500 km"
            ).into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TelemedError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TelemedError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        if !is_http_url(&self.geocoding.base_url) {
            return Err(TelemedError::config(
                "Geocoding base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        match self.directory.kind.as_str() {
            "fixture" => {}
            "http" => match &self.directory.base_url {
                Some(url) if is_http_url(url) => {}
                Some(_) => {
                    return Err(TelemedError::config(
                        "Directory base URL must be a valid HTTP or HTTPS URL"
                    ).into());
                }
                None => {
                    return Err(TelemedError::config(
                        "Directory kind 'http' requires directory.base_url"
                    ).into());
                }
            },
            other => {
                return Err(TelemedError::config(
                    format!("Invalid directory kind '{other}'. Must be one of: fixture, http")
                ).into());
            }
        }

        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
