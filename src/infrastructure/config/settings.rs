//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; every value has a default, so an
//! empty file is a valid single-lineup showdown run.
//!
//! # Example
//!
//! ```no_run
//! use lineupsmith::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::optimizer::OptimizerConfig;
use super::output::OutputConfig;
use crate::application::{validate_settings, BatchSettings};
use crate::domain::RosterShape;
use crate::error::{ConfigError, Result};
use crate::infrastructure::sport::Sport;

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Contest format preset. Defaults to [`Sport::Showdown`].
    #[serde(default)]
    pub sport: Sport,

    /// Batch options.
    #[serde(default)]
    pub optimizer: OptimizerConfig,

    /// Output files.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., `randomness` outside `[0, 1)`)
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// Checks everything that does not depend on the player pool; the rest
    /// is checked before the first solve.
    ///
    /// # Errors
    ///
    /// Returns the first invalid or missing value.
    pub fn validate(&self) -> Result<()> {
        let settings = self.batch_settings()?;
        validate_settings(&settings)?;

        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("'{}' is not one of: pretty, json", self.logging.format),
            }
            .into());
        }

        let shape = self.roster_shape()?;
        if shape.salary_cap() == 0 {
            return Err(ConfigError::InvalidValue {
                field: "salary_cap",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if let Some(stack) = &settings.stack {
            if stack.count > shape.max_from_one_team() {
                return Err(ConfigError::Conflict {
                    first: "stack_count",
                    second: "max_from_one_team",
                    reason: format!(
                        "stack of {} exceeds team limit of {}",
                        stack.count,
                        shape.max_from_one_team()
                    ),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Roster shape of the selected sport with `[optimizer]` overrides.
    ///
    /// # Errors
    ///
    /// Returns an error only if the preset's slot list is malformed.
    pub fn roster_shape(&self) -> Result<RosterShape> {
        let shape = self.sport.roster_shape()?;
        Ok(self.optimizer.apply_to_shape(shape))
    }

    /// Generator settings derived from `[optimizer]`.
    ///
    /// # Errors
    ///
    /// Returns an error for an incomplete stack or a bad time limit.
    pub fn batch_settings(&self) -> Result<BatchSettings> {
        Ok(self.optimizer.batch_settings()?)
    }
}
