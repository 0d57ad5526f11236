//! Generic token-similarity pipeline for topics without dedicated logic.

use chrono::Duration;

use super::text;
use crate::domain::{
    market::MarketCandidate, score::ScoreResult, signal::TopicSignals, topic::CanonicalTopic,
};
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;

/// Scores pairs by title token overlap, numeric agreement and close-time
/// proximity. Never auto-decides.
#[derive(Debug, Clone)]
pub struct KeywordPipeline {
    topic: CanonicalTopic,
    algo_version: String,
    keywords: Vec<String>,
}

impl KeywordPipeline {
    pub fn new(topic: CanonicalTopic, keywords: &[&str]) -> Self {
        Self {
            topic,
            algo_version: format!("{}-keyword-v1", topic.as_str().to_ascii_lowercase()),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// One pipeline per topic served by keyword matching.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new(
                CanonicalTopic::Macro,
                &["cpi", "inflation", "gdp", "unemployment", "jobs", "payrolls", "recession", "pce"],
            ),
            Self::new(
                CanonicalTopic::Commodities,
                &["oil", "wti", "brent", "gold", "silver", "gas", "copper", "wheat"],
            ),
            Self::new(
                CanonicalTopic::Geopolitics,
                &["war", "ceasefire", "invade", "sanctions", "treaty", "nato", "summit"],
            ),
            Self::new(
                CanonicalTopic::Entertainment,
                &["oscar", "grammy", "emmy", "box office", "album", "movie", "billboard"],
            ),
            Self::new(
                CanonicalTopic::Finance,
                &["s&p", "nasdaq", "dow", "stock", "shares", "ipo", "earnings", "tesla", "nvidia"],
            ),
            Self::new(CanonicalTopic::Universal, &[]),
        ]
    }
}

impl TopicPipeline for KeywordPipeline {
    fn topic(&self) -> CanonicalTopic {
        self.topic
    }

    fn algo_version(&self) -> &str {
        &self.algo_version
    }

    fn extract_signals(&self, candidate: &MarketCandidate) -> Result<TopicSignals> {
        let tokens = text::tokens(&candidate.title);
        if tokens.is_empty() {
            return Err(Error::Extraction("title has no content words".to_string()));
        }
        Ok(TopicSignals {
            tokens,
            numbers: text::amounts(&candidate.title)
                .into_iter()
                .map(|amount| amount.value)
                .collect(),
            month: text::month_in(&candidate.title),
            year: text::year_in(&candidate.title),
            close_time: candidate.close_time,
            ..TopicSignals::default()
        })
    }

    fn score(&self, left: &TopicSignals, right: &TopicSignals) -> ScoreResult {
        let tokens = text::jaccard(&left.tokens, &right.tokens);
        let numbers = match (left.primary_number(), right.primary_number()) {
            (Some(a), Some(b)) => text::closeness(a, b),
            (None, None) => 0.5,
            _ => 0.3,
        };
        let timing = text::time_proximity(left.close_time, right.close_time, Duration::days(7))
            .unwrap_or(0.5);

        ScoreResult::new(0.6 * tokens + 0.2 * numbers + 0.2 * timing)
            .with_detail("tokens", format!("{tokens:.2}"))
            .with_detail("numbers", format!("{numbers:.2}"))
            .with_detail("timing", format!("{timing:.2}"))
    }

    fn title_keywords(&self) -> Vec<String> {
        self.keywords.clone()
    }
}
