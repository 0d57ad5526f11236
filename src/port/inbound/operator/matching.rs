//! Matching run requests for operator-facing adapters.

use async_trait::async_trait;

use crate::domain::run::{BatchRunResult, EngineRunResult};
use crate::error::Result;

use super::context::OperatorContext;

/// Per-run overrides on top of the `[matching]` configuration defaults.
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    pub lookback_hours: Option<u32>,
    pub max_left: Option<usize>,
    pub max_right: Option<usize>,
    pub max_per_left: Option<usize>,
    pub max_per_right: Option<usize>,
    pub min_score: Option<f64>,
    pub dry_run: bool,
    pub auto_confirm: bool,
    pub auto_reject: bool,
    pub debug_market_id: Option<String>,
    pub no_eligibility_filter: bool,
}

/// A single-topic or all-topics run between two venues.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub from_venue: String,
    pub to_venue: String,
    /// Topic name as typed; ignored by [`MatchingOperator::run_match_all`].
    pub topic: String,
    pub overrides: RunOverrides,
}

/// Matching use-cases for operator-facing adapters.
#[async_trait]
pub trait MatchingOperator: Send + Sync {
    /// Run one topic.
    async fn run_match(
        &self,
        context: &OperatorContext,
        request: &MatchRequest,
    ) -> Result<EngineRunResult>;

    /// Run every registered topic in sequence.
    async fn run_match_all(
        &self,
        context: &OperatorContext,
        request: &MatchRequest,
    ) -> Result<BatchRunResult>;
}
