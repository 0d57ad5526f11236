//! Price snapshot deduplication settings under `[dedup]`.
//!
//! Read by candidate ingestion; the matching engine ignores them.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Snapshot deduplication thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Price moves smaller than this are not written.
    pub epsilon: Decimal,
    /// Minimum seconds between two snapshots of one market.
    pub min_interval_seconds: u64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            epsilon: Decimal::new(1, 3), // 0.001
            min_interval_seconds: 60,
        }
    }
}

impl DedupConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.epsilon < Decimal::ZERO || self.epsilon > Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "dedup.epsilon",
                reason: "must be between 0 and 1".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn epsilon_must_be_a_fraction() {
        let negative = DedupConfig {
            epsilon: dec!(-0.01),
            ..DedupConfig::default()
        };
        let too_large = DedupConfig {
            epsilon: dec!(1.5),
            ..DedupConfig::default()
        };

        assert!(negative.validate().is_err());
        assert!(too_large.validate().is_err());
        assert!(DedupConfig::default().validate().is_ok());
    }
}
