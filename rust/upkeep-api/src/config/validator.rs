//! Configuration validation for the Upkeep API.
//!
//! This module validates configuration combinations at startup,
//! ensuring unusable settings are rejected with helpful error messages.

use super::error::{ConfigResult, ConfigurationError};
use super::{AppConfig, DatabaseConfig, GenerationConfig, RunnerConfig};

/// Configuration validator that checks settings before the server starts.
///
/// Generation parameters must describe a usable pass: a non-empty
/// selection window, a non-empty vacancy search window, a vendor pool
/// of at least one, and a positive lookup timeout. The runner interval
/// must be positive whenever the runner is enabled, and a database path
/// is only accepted in builds that carry the `sqlite` feature.
#[derive(Debug)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the entire application configuration.
    ///
    /// Returns `Ok(())` if valid, or a `ConfigurationError` with all issues.
    pub fn validate(config: &AppConfig) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_generation(&config.generation) {
            match e {
                ConfigurationError::Multiple(errs) => errors.extend(errs),
                e => errors.push(e),
            }
        }

        if let Err(e) = Self::validate_runner(&config.runner) {
            errors.push(e);
        }

        if let Err(e) = Self::validate_database(&config.database) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ConfigurationError::multiple(errors))
        }
    }

    /// Validate the generation pass parameters.
    pub fn validate_generation(config: &GenerationConfig) -> ConfigResult<()> {
        let mut errors = Vec::new();

        if config.horizon_months == 0 {
            errors.push(ConfigurationError::invalid(
                "generation.horizon_months is 0, so no schedule would ever be selected",
                "Set UPKEEP__GENERATION__HORIZON_MONTHS to 1 or more",
            ));
        }

        if config.vacancy_window_days == 0 {
            errors.push(ConfigurationError::invalid(
                "generation.vacancy_window_days is 0, so occupied dates could never move",
                "Set UPKEEP__GENERATION__VACANCY_WINDOW_DAYS to 1 or more (7 is the default)",
            ));
        }

        if config.vendor_pool_size == 0 {
            errors.push(ConfigurationError::invalid(
                "generation.vendor_pool_size is 0, so no vendor could ever be assigned",
                "Set UPKEEP__GENERATION__VENDOR_POOL_SIZE to 1 or more (5 is the default)",
            ));
        }

        if config.lookup_timeout_secs == 0 {
            errors.push(ConfigurationError::invalid(
                "generation.lookup_timeout_secs is 0, so every booking and vendor read would time out",
                "Set UPKEEP__GENERATION__LOOKUP_TIMEOUT_SECS to 1 or more",
            ));
        }

        if config.scoring.response_ceiling_hours <= 0.0 {
            errors.push(ConfigurationError::invalid(
                "generation.scoring.response_ceiling_hours must be positive",
                "Set UPKEEP__GENERATION__SCORING__RESPONSE_CEILING_HOURS above 0 (48 is the default)",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ConfigurationError::multiple(errors))
        }
    }

    /// Validate the background runner settings.
    pub fn validate_runner(config: &RunnerConfig) -> ConfigResult<()> {
        if config.enabled && config.interval_secs == 0 {
            return Err(ConfigurationError::invalid(
                "runner.enabled is true but runner.interval_secs is 0",
                "Set UPKEEP__RUNNER__INTERVAL_SECS to a positive interval (86400 runs daily), \
                or disable the runner",
            ));
        }
        Ok(())
    }

    /// Validate the storage settings against the compiled features.
    pub fn validate_database(config: &DatabaseConfig) -> ConfigResult<()> {
        if config.path.is_some() && cfg!(not(feature = "sqlite")) {
            return Err(ConfigurationError::feature_unavailable(
                "SQLite storage",
                "This build omits the 'sqlite' feature, so database.path cannot be honored",
                "Unset UPKEEP__DATABASE__PATH to run in-memory, or rebuild with default features",
            ));
        }
        Ok(())
    }
}
