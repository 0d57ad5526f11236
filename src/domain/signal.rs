//! Structured signals extracted from a candidate by a topic pipeline.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Threshold comparison expressed by a market title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// "above", "over", "at least", "≥", "hike", ...
    Up,
    /// "below", "under", "at most", "≤", "cut", ...
    Down,
    /// "unchanged", "hold", "exactly", ...
    Flat,
}

/// Pipeline-specific extraction from a candidate's title and metadata.
///
/// One shape is shared by every pipeline; each pipeline fills the fields
/// that carry meaning for its topic and leaves the rest empty. Signals live
/// only for the duration of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopicSignals {
    /// Normalized, stop-word-free title tokens.
    pub tokens: BTreeSet<String>,
    /// Canonical entities (assets, central banks, teams, offices, cities).
    pub entities: BTreeSet<String>,
    /// Numeric thresholds in the pipeline's unit (bps, USD, degrees).
    pub numbers: Vec<f64>,
    pub direction: Option<Direction>,
    /// Month referenced in the title (1-12).
    pub month: Option<u32>,
    /// Year referenced in the title.
    pub year: Option<i32>,
    pub close_time: Option<DateTime<Utc>>,
    /// Free-form extraction detail for debugging.
    pub details: BTreeMap<String, String>,
}

impl TopicSignals {
    /// First numeric threshold, if any.
    #[must_use]
    pub fn primary_number(&self) -> Option<f64> {
        self.numbers.first().copied()
    }

    /// Entities filtered by a `kind:` prefix, e.g. `team:`.
    pub fn entities_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entities
            .iter()
            .filter_map(move |entity| entity.strip_prefix(kind))
    }
}
