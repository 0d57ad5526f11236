//! Default run parameters for `[matching]`.

use serde::Deserialize;

use crate::domain::run::{EngineRunOptions, RunLimits, RunMode};
use crate::error::{ConfigError, Result};

/// Run defaults applied before command-line overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Markets that closed longer ago than this are skipped.
    pub lookback_hours: u32,
    pub max_left: usize,
    pub max_right: usize,
    pub max_per_left: usize,
    pub max_per_right: usize,
    /// Pairs scoring below this are dropped (inclusive bound).
    pub min_score: f64,
    pub use_eligibility_filter: bool,
    pub auto_confirm: bool,
    pub auto_reject: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let limits = RunLimits::default();
        Self {
            lookback_hours: 72,
            max_left: limits.max_left,
            max_right: limits.max_right,
            max_per_left: limits.max_per_left,
            max_per_right: limits.max_per_right,
            min_score: 0.6,
            use_eligibility_filter: true,
            auto_confirm: false,
            auto_reject: false,
        }
    }
}

impl MatchingConfig {
    /// Run options for one venue pair and topic, in suggest mode.
    #[must_use]
    pub fn options(&self, from_venue: &str, to_venue: &str, topic: &str) -> EngineRunOptions {
        let mut options = EngineRunOptions::new(from_venue, to_venue, topic);
        options.lookback_hours = self.lookback_hours;
        options.limits = RunLimits {
            max_left: self.max_left,
            max_right: self.max_right,
            max_per_left: self.max_per_left,
            max_per_right: self.max_per_right,
        };
        options.min_score = self.min_score;
        options.mode = RunMode::Suggest;
        options.auto_confirm = self.auto_confirm;
        options.auto_reject = self.auto_reject;
        options.use_eligibility_filter = self.use_eligibility_filter;
        options
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(ConfigError::InvalidValue {
                field: "matching.min_score",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        if self.lookback_hours == 0 {
            return Err(ConfigError::InvalidValue {
                field: "matching.lookback_hours",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        for (field, value) in [
            ("matching.max_left", self.max_left),
            ("matching.max_right", self.max_right),
            ("matching.max_per_left", self.max_per_left),
            ("matching.max_per_right", self.max_per_right),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let config = MatchingConfig::default();
        let options = config.options("kalshi", "polymarket", "rates");
        let engine = EngineRunOptions::new("kalshi", "polymarket", "rates");

        assert_eq!(options, engine);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_caps_are_rejected() {
        let config = MatchingConfig {
            max_per_right: 0,
            ..MatchingConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("matching.max_per_right"));
    }
}
