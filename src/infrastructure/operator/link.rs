//! Link maintenance operator implementation.

use async_trait::async_trait;

use crate::adapter::outbound::sqlite::link::SqliteLinkStore;
use crate::application::admin::LinkAdmin;
use crate::domain::link::{BackfillOutcome, BulkOutcome, LinkKey, LinkStats, LinkStatus, MarketLink};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::inbound::operator::context::OperatorContext;
use crate::port::inbound::operator::link::LinkOperator;

use super::{entry::Operator, shared};

fn link_store(context: &OperatorContext) -> Result<SqliteLinkStore> {
    let config = shared::load_config(context)?;
    Ok(SqliteLinkStore::new(bootstrap::open_database(&config)?))
}

#[async_trait]
impl LinkOperator for Operator {
    async fn link_stats(&self, context: &OperatorContext) -> Result<LinkStats> {
        let store = link_store(context)?;
        LinkAdmin::new(&store).link_stats().await
    }

    async fn rollback(
        &self,
        context: &OperatorContext,
        tag: &str,
        dry_run: bool,
    ) -> Result<BulkOutcome> {
        let store = link_store(context)?;
        LinkAdmin::new(&store).rollback(tag, dry_run).await
    }

    async fn backfill(&self, context: &OperatorContext, dry_run: bool) -> Result<BackfillOutcome> {
        let store = link_store(context)?;
        LinkAdmin::new(&store).backfill(dry_run).await
    }

    async fn review(
        &self,
        context: &OperatorContext,
        key: &LinkKey,
        status: LinkStatus,
    ) -> Result<MarketLink> {
        let store = link_store(context)?;
        LinkAdmin::new(&store).review(key, status).await
    }
}
