//! Link maintenance use-cases for operator-facing adapters.

use async_trait::async_trait;

use crate::domain::link::{BackfillOutcome, BulkOutcome, LinkKey, LinkStats, LinkStatus, MarketLink};
use crate::error::Result;

use super::context::OperatorContext;

/// Link maintenance use-cases.
#[async_trait]
pub trait LinkOperator: Send + Sync {
    /// Counts by status, topic and algorithm version.
    async fn link_stats(&self, context: &OperatorContext) -> Result<LinkStats>;

    /// Return decided links tagged with `tag` to `suggested`.
    async fn rollback(&self, context: &OperatorContext, tag: &str, dry_run: bool)
        -> Result<BulkOutcome>;

    /// Fill missing provenance.
    async fn backfill(&self, context: &OperatorContext, dry_run: bool) -> Result<BackfillOutcome>;

    /// Record a manual decision.
    async fn review(
        &self,
        context: &OperatorContext,
        key: &LinkKey,
        status: LinkStatus,
    ) -> Result<MarketLink>;
}
