//! Builders for domain values used across tests.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    market::MarketCandidate,
    run::{EngineRunOptions, RunLimits, RunMode},
};

/// Fixed reference time so close-time proximity is reproducible.
pub fn reference_time() -> DateTime<Utc> {
    Utc::now() + Duration::days(2)
}

/// An open candidate closing at [`reference_time`].
pub fn candidate(venue: &str, market_id: &str, title: &str) -> MarketCandidate {
    MarketCandidate::new(venue, market_id, title).with_close_time(reference_time())
}

/// Options for a `left` -> `right` run with small caps and suggest mode.
pub fn options(topic: &str) -> EngineRunOptions {
    let mut options = EngineRunOptions::new("left", "right", topic);
    options.limits = RunLimits {
        max_left: 50,
        max_right: 50,
        max_per_left: 1,
        max_per_right: 1,
    };
    options.mode = RunMode::Suggest;
    options
}

/// Same as [`options`] in dry-run mode.
pub fn dry_run_options(topic: &str) -> EngineRunOptions {
    let mut options = options(topic);
    options.mode = RunMode::DryRun;
    options
}
