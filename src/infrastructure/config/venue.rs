//! Per-venue settings under `[venues.<name>]`.

use serde::Deserialize;

/// Refresh cadence for a venue's candidate ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
    pub refresh_interval_secs: u64,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 300,
        }
    }
}
