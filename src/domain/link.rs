//! Market links: persisted claims that two markets are equivalent.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{MarketId, Venue};
use crate::error::Error;

/// Provenance tag written by manual review.
pub const MANUAL_REVIEW_REASON: &str = "manual-review";
/// Sentinel written by backfill for links with no algorithm version.
pub const LEGACY_ALGO_VERSION: &str = "legacy";
/// Sentinel written by backfill for links with no topic.
pub const UNKNOWN_TOPIC: &str = "unknown";

/// Lifecycle status of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Suggested,
    Confirmed,
    Rejected,
}

impl LinkStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Suggested => "suggested",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    /// Whether a reviewer (human or automatic) has decided this link.
    #[must_use]
    pub const fn is_decided(self) -> bool {
        !matches!(self, Self::Suggested)
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suggested" => Ok(Self::Suggested),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            other => Err(Error::Parse(format!("unknown link status '{other}'"))),
        }
    }
}

/// Composite key of a link. At most one link exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkKey {
    pub left_venue: Venue,
    pub left_market_id: MarketId,
    pub right_venue: Venue,
    pub right_market_id: MarketId,
}

impl LinkKey {
    pub fn new(
        left_venue: impl Into<Venue>,
        left_market_id: impl Into<MarketId>,
        right_venue: impl Into<Venue>,
        right_market_id: impl Into<MarketId>,
    ) -> Self {
        Self {
            left_venue: left_venue.into(),
            left_market_id: left_market_id.into(),
            right_venue: right_venue.into(),
            right_market_id: right_market_id.into(),
        }
    }
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} <-> {}:{}",
            self.left_venue, self.left_market_id, self.right_venue, self.right_market_id
        )
    }
}

/// A persisted link row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketLink {
    pub key: LinkKey,
    pub status: LinkStatus,
    pub score: f64,
    pub reason: Option<String>,
    pub algo_version: Option<String>,
    pub topic: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MarketLink {
    /// Whether another topic already owns this link. Links without a topic,
    /// or backfilled as [`UNKNOWN_TOPIC`], are unowned.
    #[must_use]
    pub fn owned_by_other_topic(&self, topic: &str) -> bool {
        self.topic
            .as_deref()
            .is_some_and(|owner| owner != topic && owner != UNKNOWN_TOPIC)
    }
}

/// Values written by one upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkUpsert {
    pub key: LinkKey,
    pub status: LinkStatus,
    pub score: f64,
    pub reason: Option<String>,
    pub algo_version: Option<String>,
    pub topic: Option<String>,
}

/// Outcome of one upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkWrite {
    /// True when the row did not exist before.
    pub created: bool,
    /// Status stored after the write.
    pub status: LinkStatus,
}

/// Rows matched by a bulk operation and rows actually written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub matched: usize,
    pub updated: usize,
    pub dry_run: bool,
}

/// Result of a provenance backfill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillOutcome {
    pub algo_version: BulkOutcome,
    pub topic: BulkOutcome,
}

/// Link counts grouped by status, topic and algorithm version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_topic: BTreeMap<String, usize>,
    pub by_algo_version: BTreeMap<String, usize>,
}
