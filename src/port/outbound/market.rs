//! Market source port.

use std::future::Future;

use chrono::{DateTime, Duration, Utc};

use crate::domain::{id::Venue, market::MarketCandidate};
use crate::error::Result;

/// Ordering of returned candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MarketOrder {
    #[default]
    CloseTimeAsc,
    CloseTimeDesc,
}

/// Candidate query for one venue.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketQuery {
    /// Markets that closed more than this many hours before
    /// `reference_time` are excluded. Markets without a close time are kept.
    pub lookback_hours: u32,
    pub reference_time: DateTime<Utc>,
    pub limit: usize,
    /// Case-insensitive title keywords; a market matches if its title
    /// mentions any of them as whole words. Empty means no keyword filtering.
    pub title_keywords: Vec<String>,
    /// Accepted market statuses (case-insensitive).
    pub statuses: Vec<String>,
    pub order_by: MarketOrder,
}

impl MarketQuery {
    pub fn new(lookback_hours: u32, limit: usize) -> Self {
        Self {
            lookback_hours,
            reference_time: Utc::now(),
            limit,
            title_keywords: Vec::new(),
            statuses: vec!["open".to_string(), "active".to_string()],
            order_by: MarketOrder::default(),
        }
    }

    #[must_use]
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.title_keywords = keywords;
        self
    }

    #[must_use]
    pub fn at(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = reference_time;
        self
    }

    /// Earliest close time still inside the lookback window.
    #[must_use]
    pub fn close_cutoff(&self) -> DateTime<Utc> {
        self.reference_time - Duration::hours(i64::from(self.lookback_hours))
    }

    /// Whether a candidate passes the status, lookback and keyword filters.
    ///
    /// Limit and ordering are not applied here.
    #[must_use]
    pub fn accepts(&self, candidate: &MarketCandidate) -> bool {
        let status_ok = self.statuses.is_empty()
            || self
                .statuses
                .iter()
                .any(|status| status.eq_ignore_ascii_case(&candidate.status));
        let window_ok = candidate
            .close_time
            .map_or(true, |close| close >= self.close_cutoff());
        status_ok && window_ok && self.keywords_match(candidate)
    }

    /// Whether the title mentions any keyword. True when there are none.
    #[must_use]
    pub fn keywords_match(&self, candidate: &MarketCandidate) -> bool {
        self.title_keywords.is_empty()
            || self
                .title_keywords
                .iter()
                .any(|keyword| candidate.title_mentions(keyword))
    }
}

/// Read access to the candidate markets of each venue.
///
/// Pagination, retries and rate limiting are the implementation's concern.
pub trait MarketSource: Send + Sync {
    /// List candidates for a venue, filtered and ordered per `query`.
    fn list_eligible_markets(
        &self,
        venue: &Venue,
        query: &MarketQuery,
    ) -> impl Future<Output = Result<Vec<MarketCandidate>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_applies_all_filters() {
        let now = Utc::now();
        let query = MarketQuery::new(24, 10)
            .at(now)
            .with_keywords(vec!["Fed".to_string()]);

        let fresh = MarketCandidate::new("kalshi", "a", "Will the fed hike?")
            .with_close_time(now + Duration::days(3));
        let stale = fresh.clone().with_close_time(now - Duration::hours(48));
        let settled = fresh.clone().with_status("settled");
        let off_topic = MarketCandidate::new("kalshi", "b", "Will it rain?");
        let lookalike = MarketCandidate::new("kalshi", "c", "Federal budget passes?")
            .with_close_time(now + Duration::days(3));

        assert!(query.accepts(&fresh));
        assert!(!query.accepts(&stale));
        assert!(!query.accepts(&settled));
        assert!(!query.accepts(&off_topic));
        assert!(!query.accepts(&lookalike));
    }

    #[test]
    fn open_ended_markets_stay_in_window() {
        let query = MarketQuery::new(1, 10);
        let candidate = MarketCandidate::new("kalshi", "a", "anything");
        assert!(query.accepts(&candidate));
    }
}
