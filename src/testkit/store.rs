//! In-memory port implementations.
//!
//! - [`InMemoryMarketSource`]: candidates held in a vector, filtered with
//!   [`MarketQuery::accepts`]. Can be told to fail every fetch.
//! - [`InMemoryLinkStore`]: links keyed by [`LinkKey`], with the same upsert
//!   semantics as the SQLite store. Can be told to fail upserts for a
//!   given left market id.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{
    id::{MarketId, Venue},
    link::{LinkKey, LinkStatus, LinkUpsert, LinkWrite, MarketLink},
    market::MarketCandidate,
};
use crate::error::{Error, Result};
use crate::port::outbound::{
    link::{LinkField, LinkFilter, LinkPatch, LinkStore, NULL_GROUP},
    market::{MarketOrder, MarketQuery, MarketSource},
};

/// Candidate store backed by a vector.
#[derive(Default)]
pub struct InMemoryMarketSource {
    markets: Mutex<Vec<MarketCandidate>>,
    failure: Mutex<Option<String>>,
}

impl InMemoryMarketSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markets(markets: impl IntoIterator<Item = MarketCandidate>) -> Self {
        let source = Self::new();
        source.insert_all(markets);
        source
    }

    pub fn insert(&self, candidate: MarketCandidate) {
        self.markets.lock().push(candidate);
    }

    pub fn insert_all(&self, markets: impl IntoIterator<Item = MarketCandidate>) {
        self.markets.lock().extend(markets);
    }

    /// Make every subsequent fetch fail with a connection error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }
}

impl MarketSource for InMemoryMarketSource {
    async fn list_eligible_markets(
        &self,
        venue: &Venue,
        query: &MarketQuery,
    ) -> Result<Vec<MarketCandidate>> {
        if let Some(message) = self.failure.lock().clone() {
            return Err(Error::Connection(message));
        }

        let mut found: Vec<MarketCandidate> = self
            .markets
            .lock()
            .iter()
            .filter(|candidate| candidate.venue == *venue && query.accepts(candidate))
            .cloned()
            .collect();
        // Stable sort; markets without a close time go last.
        found.sort_by(|a, b| match (a.close_time, b.close_time) {
            (Some(x), Some(y)) => match query.order_by {
                MarketOrder::CloseTimeAsc => x.cmp(&y),
                MarketOrder::CloseTimeDesc => y.cmp(&x),
            },
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        found.truncate(query.limit);
        Ok(found)
    }
}

/// Link store backed by a map.
#[derive(Default)]
pub struct InMemoryLinkStore {
    links: Mutex<BTreeMap<LinkKey, MarketLink>>,
    failing_left_ids: Mutex<HashSet<MarketId>>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make upserts fail for links whose left market id is `market_id`.
    pub fn fail_upserts_for(&self, market_id: &str) {
        self.failing_left_ids.lock().insert(MarketId::new(market_id));
    }

    pub fn len(&self) -> usize {
        self.links.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.lock().is_empty()
    }

    /// Snapshot of all links, ordered by key.
    pub fn all(&self) -> Vec<MarketLink> {
        self.links.lock().values().cloned().collect()
    }

    /// Insert a link row verbatim, bypassing upsert rules.
    pub fn seed(&self, link: MarketLink) {
        self.links.lock().insert(link.key.clone(), link);
    }
}

impl LinkStore for InMemoryLinkStore {
    async fn upsert_link(&self, link: &LinkUpsert) -> Result<LinkWrite> {
        if self.failing_left_ids.lock().contains(&link.key.left_market_id) {
            return Err(Error::Database(format!("injected failure for {}", link.key)));
        }

        let now = Utc::now();
        let mut links = self.links.lock();
        match links.get_mut(&link.key) {
            Some(existing) => {
                existing.score = link.score;
                existing.algo_version.clone_from(&link.algo_version);
                existing.topic.clone_from(&link.topic);
                if existing.status == LinkStatus::Suggested {
                    existing.status = link.status;
                    existing.reason.clone_from(&link.reason);
                }
                existing.updated_at = now;
                Ok(LinkWrite {
                    created: false,
                    status: existing.status,
                })
            }
            None => {
                links.insert(
                    link.key.clone(),
                    MarketLink {
                        key: link.key.clone(),
                        status: link.status,
                        score: link.score,
                        reason: link.reason.clone(),
                        algo_version: link.algo_version.clone(),
                        topic: link.topic.clone(),
                        created_at: now,
                        updated_at: now,
                    },
                );
                Ok(LinkWrite {
                    created: true,
                    status: link.status,
                })
            }
        }
    }

    async fn get_link(&self, key: &LinkKey) -> Result<Option<MarketLink>> {
        Ok(self.links.lock().get(key).cloned())
    }

    async fn list_links(&self, filter: &LinkFilter) -> Result<Vec<MarketLink>> {
        Ok(self
            .links
            .lock()
            .values()
            .filter(|link| filter.matches(link))
            .cloned()
            .collect())
    }

    async fn count_links(&self, filter: &LinkFilter) -> Result<usize> {
        Ok(self
            .links
            .lock()
            .values()
            .filter(|link| filter.matches(link))
            .count())
    }

    async fn count_by(&self, field: LinkField) -> Result<BTreeMap<String, usize>> {
        let mut counts = BTreeMap::new();
        for link in self.links.lock().values() {
            let group = field
                .value_of(link)
                .unwrap_or_else(|| NULL_GROUP.to_string());
            *counts.entry(group).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn update_many(&self, filter: &LinkFilter, patch: &LinkPatch) -> Result<usize> {
        let now = Utc::now();
        let mut updated = 0;
        for link in self.links.lock().values_mut() {
            if filter.matches(link) {
                patch.apply(link);
                link.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert(status: LinkStatus, score: f64, reason: &str) -> LinkUpsert {
        LinkUpsert {
            key: LinkKey::new("kalshi", "A", "polymarket", "X"),
            status,
            score,
            reason: Some(reason.to_string()),
            algo_version: Some("rates-v1".to_string()),
            topic: Some("RATES".to_string()),
        }
    }

    #[tokio::test]
    async fn upsert_updates_in_place() {
        let store = InMemoryLinkStore::new();
        let first = store.upsert_link(&upsert(LinkStatus::Suggested, 0.7, "a")).await.unwrap();
        let second = store.upsert_link(&upsert(LinkStatus::Suggested, 0.9, "b")).await.unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(store.len(), 1);
        let link = store.all().remove(0);
        assert_eq!(link.score, 0.9);
        assert_eq!(link.reason.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn decided_links_keep_status_and_reason() {
        let store = InMemoryLinkStore::new();
        store.upsert_link(&upsert(LinkStatus::Confirmed, 0.97, "auto")).await.unwrap();
        let write = store.upsert_link(&upsert(LinkStatus::Suggested, 0.8, "again")).await.unwrap();

        assert_eq!(write.status, LinkStatus::Confirmed);
        let link = store.all().remove(0);
        assert_eq!(link.reason.as_deref(), Some("auto"));
        assert_eq!(link.score, 0.8);
    }

    #[tokio::test]
    async fn market_source_filters_orders_and_limits() {
        let now = Utc::now();
        let source = InMemoryMarketSource::with_markets([
            MarketCandidate::new("a", "late", "x").with_close_time(now + chrono::Duration::days(2)),
            MarketCandidate::new("a", "open-ended", "x"),
            MarketCandidate::new("a", "soon", "x").with_close_time(now + chrono::Duration::hours(1)),
            MarketCandidate::new("b", "other-venue", "x"),
        ]);

        let found = source
            .list_eligible_markets(&Venue::new("a"), &MarketQuery::new(24, 2).at(now))
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|c| c.market_id.as_str()).collect();
        assert_eq!(ids, vec!["soon", "late"]);
    }
}
