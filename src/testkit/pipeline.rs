//! A pipeline whose scores are looked up from a table.

use std::collections::HashMap;

use crate::domain::{
    market::MarketCandidate, score::DecisionBounds, score::ScoreResult, signal::TopicSignals,
    topic::CanonicalTopic,
};
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;

const TITLE: &str = "title";

/// Scores pairs by title from a fixed table; unknown pairs score zero.
///
/// Extraction fails for blank titles.
pub struct ScriptedPipeline {
    topic: CanonicalTopic,
    scores: HashMap<(String, String), f64>,
    auto_confirm: bool,
    auto_reject: bool,
    bounds: DecisionBounds,
}

impl ScriptedPipeline {
    pub fn new(topic: CanonicalTopic) -> Self {
        Self {
            topic,
            scores: HashMap::new(),
            auto_confirm: false,
            auto_reject: false,
            bounds: DecisionBounds::default(),
        }
    }

    /// Score for the pair of titles, in either order.
    pub fn score_titles(mut self, left: &str, right: &str, score: f64) -> Self {
        self.scores.insert((left.to_string(), right.to_string()), score);
        self
    }

    pub fn with_auto_decisions(mut self, bounds: DecisionBounds) -> Self {
        self.auto_confirm = true;
        self.auto_reject = true;
        self.bounds = bounds;
        self
    }

    fn lookup(&self, left: &str, right: &str) -> f64 {
        self.scores
            .get(&(left.to_string(), right.to_string()))
            .or_else(|| self.scores.get(&(right.to_string(), left.to_string())))
            .copied()
            .unwrap_or(0.0)
    }
}

impl TopicPipeline for ScriptedPipeline {
    fn topic(&self) -> CanonicalTopic {
        self.topic
    }

    fn algo_version(&self) -> &str {
        "scripted-v1"
    }

    fn extract_signals(&self, candidate: &MarketCandidate) -> Result<TopicSignals> {
        if candidate.title.trim().is_empty() {
            return Err(Error::Extraction("empty title".to_string()));
        }
        let mut signals = TopicSignals {
            close_time: candidate.close_time,
            ..TopicSignals::default()
        };
        signals.details.insert(TITLE.to_string(), candidate.title.clone());
        Ok(signals)
    }

    fn score(&self, left: &TopicSignals, right: &TopicSignals) -> ScoreResult {
        match (left.details.get(TITLE), right.details.get(TITLE)) {
            (Some(l), Some(r)) => ScoreResult::new(self.lookup(l, r)),
            _ => ScoreResult::zero("missing title"),
        }
    }

    fn supports_auto_confirm(&self) -> bool {
        self.auto_confirm
    }

    fn supports_auto_reject(&self) -> bool {
        self.auto_reject
    }

    fn decision_bounds(&self) -> DecisionBounds {
        self.bounds
    }
}
