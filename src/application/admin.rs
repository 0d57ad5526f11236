//! Administrative link maintenance: rollback, backfill, manual review and
//! statistics.

use tracing::info;

use crate::domain::link::{
    BackfillOutcome, BulkOutcome, LinkKey, LinkStats, LinkStatus, MarketLink,
    LEGACY_ALGO_VERSION, MANUAL_REVIEW_REASON, UNKNOWN_TOPIC,
};
use crate::error::{Error, Result};
use crate::port::outbound::link::{FieldMatch, LinkField, LinkFilter, LinkPatch, LinkStore};

/// Maintenance operations over a [`LinkStore`].
pub struct LinkAdmin<'a, L> {
    store: &'a L,
}

impl<'a, L: LinkStore> LinkAdmin<'a, L> {
    #[must_use]
    pub fn new(store: &'a L) -> Self {
        Self { store }
    }

    /// Return decided links whose reason is exactly `tag` to `suggested`.
    ///
    /// # Errors
    /// Returns an error if the tag is blank or the store fails.
    pub async fn rollback(&self, tag: &str, dry_run: bool) -> Result<BulkOutcome> {
        if tag.trim().is_empty() {
            return Err(Error::InvalidOptions("rollback tag must not be empty".to_string()));
        }
        let filter = LinkFilter::all()
            .with_statuses(vec![LinkStatus::Confirmed, LinkStatus::Rejected])
            .with_reason(FieldMatch::Equals(tag.to_string()));
        let patch = LinkPatch {
            status: Some(LinkStatus::Suggested),
            ..LinkPatch::default()
        };
        let outcome = self.apply(&filter, &patch, dry_run).await?;
        info!(tag, matched = outcome.matched, updated = outcome.updated, dry_run, "Rollback");
        Ok(outcome)
    }

    /// Fill null provenance with the `legacy` / `unknown` sentinels.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn backfill(&self, dry_run: bool) -> Result<BackfillOutcome> {
        let algo_version = self
            .apply(
                &LinkFilter::all().with_algo_version(FieldMatch::Null),
                &LinkPatch {
                    algo_version: Some(LEGACY_ALGO_VERSION.to_string()),
                    ..LinkPatch::default()
                },
                dry_run,
            )
            .await?;
        let topic = self
            .apply(
                &LinkFilter::all().with_topic(FieldMatch::Null),
                &LinkPatch {
                    topic: Some(UNKNOWN_TOPIC.to_string()),
                    ..LinkPatch::default()
                },
                dry_run,
            )
            .await?;
        info!(
            algo_version = algo_version.matched,
            topic = topic.matched,
            dry_run,
            "Backfill"
        );
        Ok(BackfillOutcome {
            algo_version,
            topic,
        })
    }

    /// Record a manual decision on one link.
    ///
    /// # Errors
    /// Returns [`Error::LinkNotFound`] if the link does not exist, or an
    /// error if the store fails.
    pub async fn review(&self, key: &LinkKey, status: LinkStatus) -> Result<MarketLink> {
        if self.store.get_link(key).await?.is_none() {
            return Err(Error::LinkNotFound(key.clone()));
        }
        let patch = LinkPatch {
            status: Some(status),
            reason: Some(Some(MANUAL_REVIEW_REASON.to_string())),
            ..LinkPatch::default()
        };
        self.store
            .update_many(&LinkFilter::for_key(key.clone()), &patch)
            .await?;
        info!(link = %key, status = %status, "Manual review recorded");
        self.store
            .get_link(key)
            .await?
            .ok_or_else(|| Error::LinkNotFound(key.clone()))
    }

    /// Counts grouped by status, topic and algorithm version.
    ///
    /// # Errors
    /// Returns an error if the store fails.
    pub async fn link_stats(&self) -> Result<LinkStats> {
        let by_status = self.store.count_by(LinkField::Status).await?;
        let by_topic = self.store.count_by(LinkField::Topic).await?;
        let by_algo_version = self.store.count_by(LinkField::AlgoVersion).await?;
        Ok(LinkStats {
            total: by_status.values().sum(),
            by_status,
            by_topic,
            by_algo_version,
        })
    }

    async fn apply(&self, filter: &LinkFilter, patch: &LinkPatch, dry_run: bool) -> Result<BulkOutcome> {
        let matched = self.store.count_links(filter).await?;
        let updated = if dry_run || matched == 0 {
            0
        } else {
            self.store.update_many(filter, patch).await?
        };
        Ok(BulkOutcome {
            matched,
            updated,
            dry_run,
        })
    }
}
