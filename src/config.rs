//! Configuration management for the `CityGuide` data services
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::Result;
use crate::error::GuideError;
use crate::models::Coordinate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `CityGuide` library
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GuideConfig {
    /// Guide content API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Local storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Guide content API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the guide content API
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_api_user_agent")]
    pub user_agent: String,
    /// When set, city guides load from bundled data instead of the network
    #[serde(default)]
    pub offline: bool,
}

/// Local storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Store directory location
    #[serde(default = "default_storage_location")]
    pub location: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Map center used when a city has no locatable POI
    #[serde(default)]
    pub fallback_latitude: f64,
    #[serde(default)]
    pub fallback_longitude: f64,
    /// City guides available without purchase
    #[serde(default)]
    pub free_cities: Vec<String>,
}

// Default value functions
fn default_api_base_url() -> String {
    "https://guides.cityguide.app/api".to_string()
}

fn default_api_timeout() -> u32 {
    30
}

fn default_api_user_agent() -> String {
    format!("CityGuide/{}", env!("CARGO_PKG_VERSION"))
}

fn default_storage_location() -> String {
    "~/.cache/cityguide".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_api_timeout(),
            user_agent: default_api_user_agent(),
            offline: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            location: default_storage_location(),
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
            fallback_latitude: 0.0,
            fallback_longitude: 0.0,
            free_cities: Vec::new(),
        }
    }
}

impl GuideConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from a specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // Add environment variable overrides with CITYGUIDE_ prefix
        builder = builder.add_source(
            Environment::with_prefix("CITYGUIDE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| GuideError::config(format!("Failed to build configuration: {e}")))?;

        let mut config: GuideConfig = settings
            .try_deserialize()
            .map_err(|e| GuideError::config(format!("Failed to deserialize configuration: {e}")))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cityguide").join("config.toml"))
    }

    /// The configured fallback map center
    #[must_use]
    pub fn fallback_center(&self) -> Coordinate {
        Coordinate::new(
            self.defaults.fallback_latitude,
            self.defaults.fallback_longitude,
        )
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.base_url.is_empty() {
            self.api.base_url = default_api_base_url();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_api_timeout();
        }
        if self.api.user_agent.is_empty() {
            self.api.user_agent = default_api_user_agent();
        }
        if self.storage.location.is_empty() {
            self.storage.location = default_storage_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds > 300 {
            return Err(GuideError::config(
                "API timeout cannot exceed 300 seconds",
            ));
        }

        if !(-90.0..=90.0).contains(&self.defaults.fallback_latitude)
            || !(-180.0..=180.0).contains(&self.defaults.fallback_longitude)
        {
            return Err(GuideError::config(
                "Fallback map center must be a valid WGS84 coordinate",
            ));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GuideError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GuideError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err(GuideError::config(
                "Guide API base URL must be a valid HTTP or HTTPS URL",
            ));
        }

        Ok(())
    }
}
