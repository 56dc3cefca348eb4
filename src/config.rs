//! Configuration management for the Travel Essence core
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TravelError;
use anyhow::{Context, Result};
use chrono::TimeDelta;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Booking form configuration
    #[serde(default)]
    pub booking: BookingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key; without one every lookup uses fallback data
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// How long a live reading is reused
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_minutes: u32,
}

/// Booking form settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Prefix of issued booking references
    #[serde(default = "default_reference_prefix")]
    pub reference_prefix: String,
    /// Simulated submission latency in milliseconds
    #[serde(default = "default_submit_latency")]
    pub submit_latency_ms: u64,
    /// Share of simulated submissions that fail (0.0 - 1.0)
    #[serde(default = "default_failure_rate")]
    pub failure_rate: f64,
    /// Directory of the on-disk form and booking store
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_cache_ttl() -> u32 {
    10
}

fn default_reference_prefix() -> String {
    crate::booking::reference::DEFAULT_PREFIX.to_string()
}

fn default_submit_latency() -> u64 {
    2000
}

fn default_failure_rate() -> f64 {
    0.05
}

fn default_storage_path() -> String {
    dirs::data_dir()
        .map(|dir| dir.join("travel-essence"))
        .unwrap_or_else(|| PathBuf::from(".travel-essence"))
        .to_string_lossy()
        .into_owned()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_weather_timeout(),
            cache_ttl_minutes: default_cache_ttl(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            reference_prefix: default_reference_prefix(),
            submit_latency_ms: default_submit_latency(),
            failure_rate: default_failure_rate(),
            storage_path: default_storage_path(),
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

impl WeatherConfig {
    #[must_use]
    pub fn cache_ttl(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.cache_ttl_minutes))
    }
}

impl BookingConfig {
    #[must_use]
    pub fn submit_latency(&self) -> Duration {
        Duration::from_millis(self.submit_latency_ms)
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    ///
    /// Environment variables use the `TRAVEL_ESSENCE` prefix with `__`
    /// between sections, e.g. `TRAVEL_ESSENCE__WEATHER__API_KEY`.
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

        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_ESSENCE")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-essence").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.cache_ttl_minutes == 0 {
            self.weather.cache_ttl_minutes = default_cache_ttl();
        }
        if self.booking.reference_prefix.is_empty() {
            self.booking.reference_prefix = default_reference_prefix();
        }
        if self.booking.storage_path.is_empty() {
            self.booking.storage_path = default_storage_path();
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
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // No key is fine: lookups degrade to fallback data
        if let Some(api_key) = &self.weather.api_key {
            if api_key.is_empty() {
                return Err(TravelError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() > 100 {
                return Err(TravelError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(TravelError::config(
                "Weather API timeout cannot exceed 300 seconds"
            ).into());
        }

        if self.weather.cache_ttl_minutes > 1440 {
            return Err(TravelError::config(
                "Weather cache TTL cannot exceed 1440 minutes (1 day)"
            ).into());
        }

        if !(0.0..=1.0).contains(&self.booking.failure_rate) {
            return Err(TravelError::config(
                "Booking failure rate must be between 0.0 and 1.0"
            ).into());
        }

        if self.booking.submit_latency_ms > 60_000 {
            return Err(TravelError::config(
                "Booking submit latency cannot exceed 60000 ms"
            ).into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        if !self.weather.base_url.starts_with("http://") && !self.weather.base_url.starts_with("https://") {
            return Err(TravelError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        if !self.booking.reference_prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TravelError::config(
                "Booking reference prefix may only contain letters and digits"
            ).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.weather.cache_ttl(), TimeDelta::minutes(10));
        assert_eq!(config.booking.reference_prefix, "TE");
        assert_eq!(config.booking.submit_latency(), Duration::from_secs(2));
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = AppConfig::default();
        config.weather.api_key = Some(String::new());
        assert!(config.validate_api_keys().is_err());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AppConfig::default();
        config.booking.failure_rate = 1.5;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("failure rate"));

        let mut config = AppConfig::default();
        config.weather.timeout_seconds = 500;
        assert!(config.validate().unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = AppConfig::default();
        config.weather.cache_ttl_minutes = 0;
        config.booking.reference_prefix.clear();
        config.apply_defaults();
        assert_eq!(config.weather.cache_ttl_minutes, 10);
        assert_eq!(config.booking.reference_prefix, "TE");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[weather]\ncache_ttl_minutes = 5\n\n[booking]\nreference_prefix = \"BK\"\nfailure_rate = 0.0\n\n[logging]\nformat = \"compact\""
        )
        .unwrap();

        let config = AppConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.weather.cache_ttl_minutes, 5);
        assert_eq!(config.booking.reference_prefix, "BK");
        assert_eq!(config.booking.failure_rate, 0.0);
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AppConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("travel-essence"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
