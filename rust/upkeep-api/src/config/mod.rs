//! Configuration management for the Upkeep API.
//!
//! This module provides configuration loading from environment variables
//! and config files, with validation of the combinations that matter at
//! startup.
//!
//! # Validation
//!
//! Use [`ConfigValidator`] to validate configuration combinations before startup:
//!
//! ```rust,ignore
//! use upkeep_api::config::{AppConfig, ConfigValidator};
//!
//! let config = AppConfig::load()?;
//! ConfigValidator::validate(&config)?;
//! ```

pub mod error;
pub mod validator;

pub use error::{ConfigResult, ConfigurationError};
pub use validator::ConfigValidator;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::scoring::ScoringWeights;

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Generation pass tuning.
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Background pass runner.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment and config files.
    ///
    /// This method loads configuration from multiple sources in order:
    /// 1. Default values
    /// 2. Config files (upkeep-api.toml, upkeep.toml under `config/`)
    /// 3. Environment variables prefixed with `UPKEEP`
    ///
    /// After loading, the configuration is validated. Use [`Self::load_unchecked`]
    /// to skip validation.
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::load_unchecked()?;

        ConfigValidator::validate(&config)
            .map_err(|e| anyhow::anyhow!("Configuration validation failed:\n\n{}", e))?;

        Ok(config)
    }

    /// Load configuration without validation.
    ///
    /// This is useful for testing or when you want to handle validation separately.
    pub fn load_unchecked() -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("generation.horizon_months", 1)?
            .set_default("generation.vacancy_window_days", 7)?
            .set_default("generation.vendor_pool_size", 5)?
            // Add config files if they exist
            .add_source(config::File::with_name("config/upkeep-api").required(false))
            .add_source(config::File::with_name("config/upkeep").required(false))
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("UPKEEP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to parse configuration: {e}"))?;

        // Shorthand override for the most common deployment knob
        if let Ok(path) = std::env::var("UPKEEP_DB_PATH") {
            app_config.database.path = Some(PathBuf::from(path));
        }

        Ok(app_config)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// API port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file. `None` selects the in-memory store.
    pub path: Option<PathBuf>,
}

/// Generation pass tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// How many months ahead the selection window reaches.
    #[serde(default = "default_horizon_months")]
    pub horizon_months: u32,
    /// Days probed on each side of an occupied due date.
    #[serde(default = "default_vacancy_window_days")]
    pub vacancy_window_days: u32,
    /// Vendors pulled from the directory for each selection.
    #[serde(default = "default_vendor_pool_size")]
    pub vendor_pool_size: usize,
    /// Extra attempts allowed for booking and vendor reads.
    #[serde(default = "default_lookup_retries")]
    pub lookup_retries: u32,
    /// Per-attempt timeout for booking and vendor reads.
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout_secs: u64,
    /// Vendor scoring weights.
    #[serde(default)]
    pub scoring: ScoringWeights,
}

fn default_horizon_months() -> u32 {
    1
}

fn default_vacancy_window_days() -> u32 {
    7
}

fn default_vendor_pool_size() -> usize {
    5
}

fn default_lookup_retries() -> u32 {
    2
}

fn default_lookup_timeout() -> u64 {
    10
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            horizon_months: default_horizon_months(),
            vacancy_window_days: default_vacancy_window_days(),
            vendor_pool_size: default_vendor_pool_size(),
            lookup_retries: default_lookup_retries(),
            lookup_timeout_secs: default_lookup_timeout(),
            scoring: ScoringWeights::default(),
        }
    }
}

/// Background pass runner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Whether the periodic runner starts with the server.
    #[serde(default)]
    pub enabled: bool,
    /// Seconds between passes.
    #[serde(default = "default_runner_interval")]
    pub interval_secs: u64,
}

fn default_runner_interval() -> u64 {
    86400 // daily
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_runner_interval(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to use JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.generation.horizon_months, 1);
        assert_eq!(config.generation.vacancy_window_days, 7);
        assert_eq!(config.generation.vendor_pool_size, 5);
        assert_eq!(config.generation.lookup_retries, 2);
        assert!(!config.runner.enabled);
        assert_eq!(config.runner.interval_secs, 86400);
        assert!(config.database.path.is_none());
    }

    #[test]
    fn partial_file_overrides_keep_remaining_defaults() {
        let raw = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 9090

                [generation]
                horizon_months = 3

                [runner]
                enabled = true
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let parsed: AppConfig = raw.try_deserialize().unwrap();
        assert_eq!(parsed.server.port, 9090);
        assert_eq!(parsed.generation.horizon_months, 3);
        assert!(parsed.runner.enabled);
        // Untouched settings fall back to their defaults.
        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.generation.vacancy_window_days, 7);
        assert_eq!(parsed.runner.interval_secs, 86400);
    }

    #[test]
    fn scoring_weights_deserialize_inside_generation() {
        let raw = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [generation.scoring]
                preferred_status_bonus = 25.0
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let parsed: AppConfig = raw.try_deserialize().unwrap();
        assert!((parsed.generation.scoring.preferred_status_bonus - 25.0).abs() < f64::EPSILON);
        // The untouched weights keep their defaults.
        assert!((parsed.generation.scoring.insurance_bonus - 10.0).abs() < f64::EPSILON);
    }
}
