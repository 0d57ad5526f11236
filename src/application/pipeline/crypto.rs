//! Crypto price threshold pipeline.
//!
//! Serves both CRYPTO_DAILY and CRYPTO_INTRADAY; the two differ only in the
//! close-time tolerance used to decide whether two contracts settle on the
//! same observation.

use chrono::Duration;

use super::text;
use crate::domain::{
    market::MarketCandidate, score::DecisionBounds, score::ScoreResult, signal::Direction,
    signal::TopicSignals, topic::CanonicalTopic,
};
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;

const ASSETS: &[(&str, &str)] = &[
    ("bitcoin", "btc"),
    ("btc", "btc"),
    ("ethereum", "eth"),
    ("ether", "eth"),
    ("eth", "eth"),
    ("solana", "sol"),
    ("sol", "sol"),
    ("xrp", "xrp"),
    ("ripple", "xrp"),
    ("dogecoin", "doge"),
    ("doge", "doge"),
    ("cardano", "ada"),
    ("bnb", "bnb"),
];

const DIRECTIONS: &[(&str, Direction)] = &[
    ("above", Direction::Up),
    ("over", Direction::Up),
    ("greater", Direction::Up),
    ("higher", Direction::Up),
    ("at least", Direction::Up),
    ("reach", Direction::Up),
    ("hit", Direction::Up),
    ("exceed", Direction::Up),
    ("below", Direction::Down),
    ("under", Direction::Down),
    ("less", Direction::Down),
    ("lower", Direction::Down),
    ("at most", Direction::Down),
    ("dip", Direction::Down),
    ("fall", Direction::Down),
    ("between", Direction::Flat),
    ("range", Direction::Flat),
];

/// Title-level direction, including bare comparison symbols.
fn direction(title: &str) -> Option<Direction> {
    text::lookup(title, DIRECTIONS).or_else(|| {
        if title.contains('>') || title.contains('≥') {
            Some(Direction::Up)
        } else if title.contains('<') || title.contains('≤') {
            Some(Direction::Down)
        } else {
            None
        }
    })
}

/// Price threshold: the first monetary amount, else the largest number.
fn threshold(title: &str) -> Option<f64> {
    let amounts = text::amounts(title);
    amounts
        .iter()
        .find(|amount| amount.monetary && !amount.percent)
        .map(|amount| amount.value)
        .or_else(|| {
            amounts
                .iter()
                .filter(|amount| !amount.percent)
                .map(|amount| amount.value)
                .fold(None, |max: Option<f64>, value| Some(max.map_or(value, |m| m.max(value))))
        })
}

/// Pipeline for the crypto topics.
#[derive(Debug, Clone)]
pub struct CryptoPipeline {
    topic: CanonicalTopic,
    algo_version: &'static str,
    tolerance: Duration,
}

impl CryptoPipeline {
    /// Daily contracts: settlement within a day and a half.
    #[must_use]
    pub fn daily() -> Self {
        Self {
            topic: CanonicalTopic::CryptoDaily,
            algo_version: "crypto-daily-v1",
            tolerance: Duration::hours(36),
        }
    }

    /// Intraday contracts: settlement within a few hours.
    #[must_use]
    pub fn intraday() -> Self {
        Self {
            topic: CanonicalTopic::CryptoIntraday,
            algo_version: "crypto-intraday-v1",
            tolerance: Duration::hours(3),
        }
    }
}

impl TopicPipeline for CryptoPipeline {
    fn topic(&self) -> CanonicalTopic {
        self.topic
    }

    fn algo_version(&self) -> &str {
        self.algo_version
    }

    fn extract_signals(&self, candidate: &MarketCandidate) -> Result<TopicSignals> {
        let title = candidate.title.trim();
        if title.is_empty() {
            return Err(Error::Extraction("empty title".to_string()));
        }

        let mut signals = TopicSignals {
            tokens: text::tokens(title),
            direction: direction(title),
            close_time: candidate.close_time,
            ..TopicSignals::default()
        };
        if let Some(asset) = text::lookup(title, ASSETS) {
            signals.entities.insert(format!("asset:{asset}"));
        }
        if let Some(price) = threshold(title) {
            signals.numbers.push(price);
        }
        Ok(signals)
    }

    fn score(&self, left: &TopicSignals, right: &TopicSignals) -> ScoreResult {
        let asset = match (left.entities_of("asset:").next(), right.entities_of("asset:").next()) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("asset mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => 0.3,
        };

        let direction = match (left.direction, right.direction) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("direction mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => 0.5,
        };

        // Full credit within 0.5% of each other, nothing beyond 5%.
        let price = match (left.primary_number(), right.primary_number()) {
            (Some(a), Some(b)) => {
                let gap = 1.0 - text::closeness(a, b);
                if gap <= 0.005 {
                    1.0
                } else {
                    (1.0 - (gap - 0.005) / 0.045).clamp(0.0, 1.0)
                }
            }
            _ => 0.4,
        };

        let timing =
            text::time_proximity(left.close_time, right.close_time, self.tolerance).unwrap_or(0.5);

        let score = 0.3 * asset + 0.35 * price + 0.15 * direction + 0.2 * timing;
        ScoreResult::new(score)
            .with_detail("asset", format!("{asset:.2}"))
            .with_detail("price", format!("{price:.2}"))
            .with_detail("direction", format!("{direction:.2}"))
            .with_detail("timing", format!("{timing:.2}"))
    }

    fn supports_auto_confirm(&self) -> bool {
        true
    }

    fn decision_bounds(&self) -> DecisionBounds {
        DecisionBounds {
            confirm_at: 0.97,
            reject_below: 0.0,
        }
    }

    fn title_keywords(&self) -> Vec<String> {
        ASSETS.iter().map(|(name, _)| (*name).to_string()).collect()
    }
}
