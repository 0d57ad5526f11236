//! Pair scores and score-distribution statistics.

use std::collections::BTreeMap;

use serde::Serialize;

/// Output of scoring one (left, right) candidate pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    score: f64,
    /// Supporting detail, e.g. `"entity" => "1.00"`.
    pub details: BTreeMap<String, String>,
}

impl ScoreResult {
    /// Create a result, clamping the score into `[0, 1]`.
    ///
    /// NaN is treated as zero.
    #[must_use]
    pub fn new(score: f64) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self {
            score,
            details: BTreeMap::new(),
        }
    }

    /// A zero score with the reason recorded under `rejected`.
    #[must_use]
    pub fn zero(reason: impl Into<String>) -> Self {
        Self::new(0.0).with_detail("rejected", reason)
    }

    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn score(&self) -> f64 {
        self.score
    }
}

/// Pipeline-defined score bands for automatic decisions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionBounds {
    /// Scores at or above this are auto-confirmed (when enabled).
    pub confirm_at: f64,
    /// Retained scores strictly below this are auto-rejected (when enabled).
    pub reject_below: f64,
}

impl Default for DecisionBounds {
    fn default() -> Self {
        Self {
            confirm_at: 0.95,
            reject_below: 0.65,
        }
    }
}

/// Counts of scored pairs bucketed at 0.9, 0.8, 0.7 and 0.6.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreDistribution {
    /// score >= 0.9
    pub above_90: usize,
    /// 0.8 <= score < 0.9
    pub from_80: usize,
    /// 0.7 <= score < 0.8
    pub from_70: usize,
    /// 0.6 <= score < 0.7
    pub from_60: usize,
    /// score < 0.6
    pub below_60: usize,
}

impl ScoreDistribution {
    pub fn record(&mut self, score: f64) {
        if score >= 0.9 {
            self.above_90 += 1;
        } else if score >= 0.8 {
            self.from_80 += 1;
        } else if score >= 0.7 {
            self.from_70 += 1;
        } else if score >= 0.6 {
            self.from_60 += 1;
        } else {
            self.below_60 += 1;
        }
    }

    /// Sum of all five buckets.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.above_90 + self.from_80 + self.from_70 + self.from_60 + self.below_60
    }

    /// Add another distribution's counts into this one.
    pub fn merge(&mut self, other: &ScoreDistribution) {
        self.above_90 += other.above_90;
        self.from_80 += other.from_80;
        self.from_70 += other.from_70;
        self.from_60 += other.from_60;
        self.below_60 += other.below_60;
    }
}
