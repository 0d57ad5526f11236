//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings.
//! Configuration is loaded from a TOML file; the `MARKETLINK_DATABASE`
//! environment variable overrides the database path.
//!
//! # Example
//!
//! ```no_run
//! use marketlink::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("marketlink.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::dedup::DedupConfig;
use super::logging::LoggingConfig;
use super::matching::MatchingConfig;
use super::venue::VenueConfig;
use crate::application::eligibility::mve::MveConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`Config::database`].
pub const DATABASE_ENV: &str = "MARKETLINK_DATABASE";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to SQLite database file.
    ///
    /// Defaults to "marketlink.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Run defaults.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Composite-market classifier settings.
    #[serde(default)]
    pub eligibility: MveConfig,

    /// Per-venue settings keyed by venue name.
    #[serde(default)]
    pub venues: BTreeMap<String, VenueConfig>,

    #[serde(default)]
    pub dedup: DedupConfig,
}

fn default_database_path() -> String {
    "marketlink.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            logging: LoggingConfig::default(),
            matching: MatchingConfig::default(),
            eligibility: MveConfig::default(),
            venues: BTreeMap::new(),
            dedup: DedupConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The TOML content is malformed
    /// - Validation fails (e.g., `min_score` outside [0, 1])
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env();
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
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Parse `content` when present, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is malformed or invalid.
    #[allow(clippy::result_large_err)]
    pub fn from_optional_toml(content: Option<&str>) -> Result<Self> {
        match content {
            Some(content) => Self::parse_toml(content),
            None => {
                let mut config = Self::default();
                config.apply_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    fn apply_env(&mut self) {
        if let Ok(database) = std::env::var(DATABASE_ENV) {
            if !database.trim().is_empty() {
                self.database = database;
            }
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        self.matching.validate()?;
        if self.eligibility.reserved_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "eligibility.reserved_prefix",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if let Some((name, _)) = self
            .venues
            .iter()
            .find(|(_, venue)| venue.refresh_interval_secs == 0)
        {
            return Err(ConfigError::InvalidValue {
                field: "venues.refresh_interval_secs",
                reason: format!("venue '{name}' must refresh at least every second"),
            }
            .into());
        }
        self.dedup.validate()?;
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.matching, MatchingConfig::default());
        assert_eq!(config.eligibility.reserved_prefix, "KXMVE");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.venues.is_empty());
    }

    #[test]
    fn sections_are_parsed() {
        let config = Config::parse_toml(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [matching]
            min_score = 0.75
            max_per_left = 1
            auto_confirm = true

            [eligibility]
            reserved_prefix = "MULTI"

            [venues.kalshi]
            refresh_interval_secs = 30

            [dedup]
            epsilon = "0.005"
            min_interval_seconds = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.matching.min_score, 0.75);
        assert_eq!(config.matching.max_per_left, 1);
        assert!(config.matching.auto_confirm);
        assert_eq!(config.matching.max_left, MatchingConfig::default().max_left);
        assert_eq!(config.eligibility.reserved_prefix, "MULTI");
        assert_eq!(config.eligibility.event_key, "event_ticker");
        assert_eq!(config.venues["kalshi"].refresh_interval_secs, 30);
        assert_eq!(config.dedup.epsilon, dec!(0.005));
    }

    #[test]
    fn invalid_values_are_rejected() {
        for toml in [
            "[matching]\nmin_score = 1.2",
            "[matching]\nlookback_hours = 0",
            "[eligibility]\nreserved_prefix = \"\"",
            "[venues.kalshi]\nrefresh_interval_secs = 0",
            "[dedup]\nepsilon = \"-0.1\"",
        ] {
            assert!(Config::parse_toml(toml).is_err(), "accepted: {toml}");
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Config::parse_toml("[matching\nmin_score = ").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }
}
