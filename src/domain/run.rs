//! Matching run options and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{MarketId, Venue};
use super::score::ScoreDistribution;
use super::topic::CanonicalTopic;
use crate::error::{Error, Result};

/// Whether a run persists links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Score and count only; the link store is never written.
    DryRun,
    /// Upsert a link for every surviving pair.
    #[default]
    Suggest,
}

impl RunMode {
    #[must_use]
    pub const fn from_dry_run(dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun
        } else {
            Self::Suggest
        }
    }

    #[must_use]
    pub const fn is_dry_run(self) -> bool {
        matches!(self, Self::DryRun)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DryRun => "dry-run",
            Self::Suggest => "suggest",
        })
    }
}

/// Cardinality caps for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunLimits {
    /// Left-venue candidates fetched.
    pub max_left: usize,
    /// Right-venue candidates fetched.
    pub max_right: usize,
    /// Right matches kept per left candidate.
    pub max_per_left: usize,
    /// Left matches kept per right candidate.
    pub max_per_right: usize,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_left: 500,
            max_right: 500,
            max_per_left: 3,
            max_per_right: 3,
        }
    }
}

/// Options for a single-topic matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineRunOptions {
    pub from_venue: Venue,
    pub to_venue: Venue,
    /// Free-form topic string; resolved by the engine.
    pub topic: String,
    pub lookback_hours: u32,
    pub limits: RunLimits,
    /// Inclusive lower bound for retaining a pair.
    pub min_score: f64,
    pub mode: RunMode,
    pub auto_confirm: bool,
    pub auto_reject: bool,
    /// Market id whose pairs are logged in detail.
    pub debug_market_id: Option<MarketId>,
    pub use_eligibility_filter: bool,
}

impl EngineRunOptions {
    /// Options with default limits for the given venue pair and topic.
    pub fn new(from_venue: impl Into<Venue>, to_venue: impl Into<Venue>, topic: impl Into<String>) -> Self {
        Self {
            from_venue: from_venue.into(),
            to_venue: to_venue.into(),
            topic: topic.into(),
            lookback_hours: 72,
            limits: RunLimits::default(),
            min_score: 0.6,
            mode: RunMode::default(),
            auto_confirm: false,
            auto_reject: false,
            debug_market_id: None,
            use_eligibility_filter: true,
        }
    }

    /// Same options, different topic.
    #[must_use]
    pub fn for_topic(&self, topic: CanonicalTopic) -> Self {
        Self {
            topic: topic.as_str().to_string(),
            ..self.clone()
        }
    }

    /// Check option consistency.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOptions`] for identical venues, a `min_score`
    /// outside `[0, 1]`, zero limits or a zero lookback window.
    pub fn validate(&self) -> Result<()> {
        if self.from_venue == self.to_venue {
            return Err(Error::InvalidOptions(format!(
                "from and to venues must differ (both '{}')",
                self.from_venue
            )));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(Error::InvalidOptions(format!(
                "min_score must be between 0 and 1, got {}",
                self.min_score
            )));
        }
        if self.lookback_hours == 0 {
            return Err(Error::InvalidOptions(
                "lookback_hours must be greater than 0".to_string(),
            ));
        }
        let limits = &self.limits;
        if limits.max_left == 0
            || limits.max_right == 0
            || limits.max_per_left == 0
            || limits.max_per_right == 0
        {
            return Err(Error::InvalidOptions(
                "limits must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Summary of a single-topic run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineRunResult {
    pub run_id: String,
    /// Resolved topic, or the raw input when resolution failed.
    pub topic: String,
    pub algo_version: Option<String>,
    pub mode: RunMode,
    pub left_count: usize,
    pub right_count: usize,
    pub ineligible_left: usize,
    pub ineligible_right: usize,
    /// Pairs scored.
    pub pairs_considered: usize,
    /// Pairs at or above `min_score`, before capping.
    pub pairs_retained: usize,
    /// Mutual top-K survivors.
    pub pairs_linked: usize,
    pub suggestions_created: usize,
    pub auto_confirmed: usize,
    pub auto_rejected: usize,
    /// Linked pairs left alone because another topic already owns the link.
    pub owned_elsewhere: usize,
    pub duration_ms: u64,
    pub errors: Vec<String>,
    pub score_distribution: ScoreDistribution,
}

impl EngineRunResult {
    /// A zero-effect result for the given topic label.
    pub fn empty(run_id: impl Into<String>, topic: impl Into<String>, mode: RunMode) -> Self {
        Self {
            run_id: run_id.into(),
            topic: topic.into(),
            algo_version: None,
            mode,
            left_count: 0,
            right_count: 0,
            ineligible_left: 0,
            ineligible_right: 0,
            pairs_considered: 0,
            pairs_retained: 0,
            pairs_linked: 0,
            suggestions_created: 0,
            auto_confirmed: 0,
            auto_rejected: 0,
            owned_elsewhere: 0,
            duration_ms: 0,
            errors: Vec::new(),
            score_distribution: ScoreDistribution::default(),
        }
    }

    /// Total links decided or suggested in this run.
    #[must_use]
    pub const fn links_written(&self) -> usize {
        self.suggestions_created + self.auto_confirmed + self.auto_rejected
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Sums across the topics of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchTotals {
    pub topics: usize,
    pub topics_with_errors: usize,
    pub left_count: usize,
    pub right_count: usize,
    pub pairs_linked: usize,
    pub suggestions_created: usize,
    pub auto_confirmed: usize,
    pub auto_rejected: usize,
    pub owned_elsewhere: usize,
    pub errors: usize,
    pub duration_ms: u64,
    pub score_distribution: ScoreDistribution,
}

impl BatchTotals {
    /// Fold one topic's result into the totals.
    pub fn record(&mut self, result: &EngineRunResult) {
        self.topics += 1;
        if result.has_errors() {
            self.topics_with_errors += 1;
        }
        self.left_count += result.left_count;
        self.right_count += result.right_count;
        self.pairs_linked += result.pairs_linked;
        self.suggestions_created += result.suggestions_created;
        self.auto_confirmed += result.auto_confirmed;
        self.auto_rejected += result.auto_rejected;
        self.owned_elsewhere += result.owned_elsewhere;
        self.errors += result.errors.len();
        self.duration_ms += result.duration_ms;
        self.score_distribution.merge(&result.score_distribution);
    }
}

/// Per-topic results of a batch, in run order, plus totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchRunResult {
    pub results: Vec<EngineRunResult>,
    pub totals: BatchTotals,
}
