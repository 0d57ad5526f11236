//! Link store port.

use std::collections::BTreeMap;
use std::future::Future;

use crate::domain::link::{LinkKey, LinkStatus, LinkUpsert, LinkWrite, MarketLink};
use crate::error::Result;

/// Predicate over a nullable text column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldMatch {
    #[default]
    Any,
    Null,
    Equals(String),
}

impl FieldMatch {
    #[must_use]
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Self::Any => true,
            Self::Null => value.is_none(),
            Self::Equals(expected) => value == Some(expected.as_str()),
        }
    }
}

/// Row filter for bulk operations. All set criteria must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    /// Exactly this link.
    pub key: Option<LinkKey>,
    /// Any of these statuses; empty means all.
    pub statuses: Vec<LinkStatus>,
    pub reason: FieldMatch,
    pub algo_version: FieldMatch,
    pub topic: FieldMatch,
}

impl LinkFilter {
    /// Filter that matches every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter that matches a single link.
    #[must_use]
    pub fn for_key(key: LinkKey) -> Self {
        Self {
            key: Some(key),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_statuses(mut self, statuses: Vec<LinkStatus>) -> Self {
        self.statuses = statuses;
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: FieldMatch) -> Self {
        self.reason = reason;
        self
    }

    #[must_use]
    pub fn with_algo_version(mut self, algo_version: FieldMatch) -> Self {
        self.algo_version = algo_version;
        self
    }

    #[must_use]
    pub fn with_topic(mut self, topic: FieldMatch) -> Self {
        self.topic = topic;
        self
    }

    /// Evaluate the filter against a link in memory.
    #[must_use]
    pub fn matches(&self, link: &MarketLink) -> bool {
        self.key.as_ref().map_or(true, |key| *key == link.key)
            && (self.statuses.is_empty() || self.statuses.contains(&link.status))
            && self.reason.matches(link.reason.as_deref())
            && self.algo_version.matches(link.algo_version.as_deref())
            && self.topic.matches(link.topic.as_deref())
    }
}

/// Fields to overwrite in a bulk update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub status: Option<LinkStatus>,
    /// `Some(None)` clears the reason.
    pub reason: Option<Option<String>>,
    pub algo_version: Option<String>,
    pub topic: Option<String>,
}

impl LinkPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.reason.is_none()
            && self.algo_version.is_none()
            && self.topic.is_none()
    }

    /// Apply the patch to a link in memory. Returns whether anything changed.
    pub fn apply(&self, link: &mut MarketLink) -> bool {
        let before = link.clone();
        if let Some(status) = self.status {
            link.status = status;
        }
        if let Some(reason) = &self.reason {
            link.reason = reason.clone();
        }
        if let Some(algo_version) = &self.algo_version {
            link.algo_version = Some(algo_version.clone());
        }
        if let Some(topic) = &self.topic {
            link.topic = Some(topic.clone());
        }
        *link != before
    }
}

/// Link column used for grouped counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Status,
    Topic,
    AlgoVersion,
}

impl LinkField {
    /// Value of this field on a link; `None` for null columns.
    #[must_use]
    pub fn value_of(self, link: &MarketLink) -> Option<String> {
        match self {
            Self::Status => Some(link.status.as_str().to_string()),
            Self::Topic => link.topic.clone(),
            Self::AlgoVersion => link.algo_version.clone(),
        }
    }
}

/// Label used for null values in grouped counts.
pub const NULL_GROUP: &str = "(none)";

/// Durable storage of market links.
///
/// # Upsert semantics
///
/// Rows are unique on [`LinkKey`]. Upserting an existing key overwrites
/// score, algo version and topic. Status and reason are overwritten only
/// while the stored row is still `suggested`; confirmed and rejected rows
/// keep their decision and its provenance.
pub trait LinkStore: Send + Sync {
    /// Insert or update the link for `link.key`.
    fn upsert_link(&self, link: &LinkUpsert) -> impl Future<Output = Result<LinkWrite>> + Send;

    /// Fetch one link by key.
    fn get_link(&self, key: &LinkKey) -> impl Future<Output = Result<Option<MarketLink>>> + Send;

    /// List links matching a filter, ordered by key.
    fn list_links(&self, filter: &LinkFilter) -> impl Future<Output = Result<Vec<MarketLink>>> + Send;

    /// Count links matching a filter.
    fn count_links(&self, filter: &LinkFilter) -> impl Future<Output = Result<usize>> + Send;

    /// Row counts grouped by one field, null values under [`NULL_GROUP`].
    fn count_by(
        &self,
        field: LinkField,
    ) -> impl Future<Output = Result<BTreeMap<String, usize>>> + Send;

    /// Apply `patch` to every link matching `filter`. Returns rows updated.
    fn update_many(
        &self,
        filter: &LinkFilter,
        patch: &LinkPatch,
    ) -> impl Future<Output = Result<usize>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn link(status: LinkStatus, reason: Option<&str>, algo: Option<&str>) -> MarketLink {
        MarketLink {
            key: LinkKey::new("kalshi", "A", "polymarket", "X"),
            status,
            score: 0.8,
            reason: reason.map(str::to_string),
            algo_version: algo.map(str::to_string),
            topic: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn filter_matches_all_criteria() {
        let filter = LinkFilter::all()
            .with_statuses(vec![LinkStatus::Confirmed])
            .with_reason(FieldMatch::Equals("rates-v1".to_string()));

        assert!(filter.matches(&link(LinkStatus::Confirmed, Some("rates-v1"), None)));
        assert!(!filter.matches(&link(LinkStatus::Suggested, Some("rates-v1"), None)));
        assert!(!filter.matches(&link(LinkStatus::Confirmed, Some("rates-v1b"), None)));
        assert!(!filter.matches(&link(LinkStatus::Confirmed, None, None)));
    }

    #[test]
    fn null_match_only_accepts_missing_values() {
        let filter = LinkFilter::all().with_algo_version(FieldMatch::Null);
        assert!(filter.matches(&link(LinkStatus::Suggested, None, None)));
        assert!(!filter.matches(&link(LinkStatus::Suggested, None, Some("v1"))));
    }

    #[test]
    fn key_filter_matches_one_link() {
        let row = link(LinkStatus::Suggested, None, None);
        assert!(LinkFilter::for_key(row.key.clone()).matches(&row));
        let other = LinkKey::new("kalshi", "B", "polymarket", "X");
        assert!(!LinkFilter::for_key(other).matches(&row));
    }

    #[test]
    fn field_values_expose_nulls() {
        let row = link(LinkStatus::Rejected, None, Some("rates-v1"));
        assert_eq!(LinkField::Status.value_of(&row).as_deref(), Some("rejected"));
        assert_eq!(LinkField::AlgoVersion.value_of(&row).as_deref(), Some("rates-v1"));
        assert_eq!(LinkField::Topic.value_of(&row), None);
    }

    #[test]
    fn patch_reports_changes() {
        let mut row = link(LinkStatus::Confirmed, Some("tag"), None);
        let patch = LinkPatch {
            status: Some(LinkStatus::Suggested),
            ..Default::default()
        };
        assert!(patch.apply(&mut row));
        assert_eq!(row.status, LinkStatus::Suggested);
        assert!(!patch.apply(&mut row));
        assert!(LinkPatch::default().is_empty());
    }
}
