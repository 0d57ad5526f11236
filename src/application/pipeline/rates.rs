//! Central bank rate decision pipeline.
//!
//! Signals: central bank, action (hike/cut/hold), magnitude in basis points
//! and the meeting month. Magnitudes written as `25bps`, `25 basis points`
//! or `0.25%` all normalize to 25.

use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

use super::text;
use crate::domain::{
    market::MarketCandidate, score::DecisionBounds, score::ScoreResult, signal::Direction,
    signal::TopicSignals, topic::CanonicalTopic,
};
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;

const ALGO_VERSION: &str = "rates-v1";

const BANKS: &[(&str, &str)] = &[
    ("federal reserve", "fed"),
    ("fomc", "fed"),
    ("fed", "fed"),
    ("powell", "fed"),
    ("european central bank", "ecb"),
    ("ecb", "ecb"),
    ("bank of england", "boe"),
    ("boe", "boe"),
    ("bank of japan", "boj"),
    ("boj", "boj"),
    ("bank of canada", "boc"),
    ("rba", "rba"),
];

const ACTIONS: &[(&str, Direction)] = &[
    ("hike", Direction::Up),
    ("hikes", Direction::Up),
    ("raise", Direction::Up),
    ("raises", Direction::Up),
    ("increase", Direction::Up),
    ("increases", Direction::Up),
    ("cut", Direction::Down),
    ("cuts", Direction::Down),
    ("lower", Direction::Down),
    ("lowers", Direction::Down),
    ("decrease", Direction::Down),
    ("reduce", Direction::Down),
    ("hold", Direction::Flat),
    ("holds", Direction::Flat),
    ("pause", Direction::Flat),
    ("unchanged", Direction::Flat),
    ("maintain", Direction::Flat),
];

const KEYWORDS: &[&str] = &[
    "fed", "fomc", "federal reserve", "rate", "rates", "bps", "basis point", "basis points", "ecb",
    "bank of england", "bank of japan", "hike", "cut",
];

fn bps_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:bps|bp|basis\s+points?)\b").expect("static regex")
    })
}

fn percent_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").expect("static regex"))
}

/// Rate magnitude in bps and whether it describes a change (vs a level).
fn magnitude(title: &str) -> Option<(f64, bool)> {
    if let Some(caps) = bps_re().captures(title) {
        return caps[1].parse().ok().map(|bps| (bps, true));
    }
    let caps = percent_re().captures(title)?;
    let pct: f64 = caps[1].parse().ok()?;
    // Moves are quoted in fractions of a point; anything larger is a level.
    Some((pct * 100.0, pct < 1.0))
}

/// Pipeline for the RATES topic.
#[derive(Debug, Clone, Default)]
pub struct RatesPipeline;

impl RatesPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TopicPipeline for RatesPipeline {
    fn topic(&self) -> CanonicalTopic {
        CanonicalTopic::Rates
    }

    fn algo_version(&self) -> &str {
        ALGO_VERSION
    }

    fn extract_signals(&self, candidate: &MarketCandidate) -> Result<TopicSignals> {
        let title = candidate.title.trim();
        if title.is_empty() {
            return Err(Error::Extraction("empty title".to_string()));
        }

        let mut signals = TopicSignals {
            tokens: text::tokens(title),
            close_time: candidate.close_time,
            month: text::month_in(title),
            year: text::year_in(title),
            direction: text::lookup(title, ACTIONS),
            ..TopicSignals::default()
        };
        if let Some(bank) = text::lookup(title, BANKS) {
            signals.entities.insert(format!("bank:{bank}"));
        }
        if let Some((bps, is_change)) = magnitude(title) {
            signals.numbers.push(bps);
            let measure = if is_change { "change" } else { "level" };
            signals.entities.insert(format!("measure:{measure}"));
        }
        Ok(signals)
    }

    fn score(&self, left: &TopicSignals, right: &TopicSignals) -> ScoreResult {
        let left_bank = left.entities_of("bank:").next();
        let right_bank = right.entities_of("bank:").next();
        let bank = match (left_bank, right_bank) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("central bank mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => 0.5,
        };

        let action = match (left.direction, right.direction) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("action mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => 0.5,
        };

        let left_measure = left.entities_of("measure:").next();
        let right_measure = right.entities_of("measure:").next();
        let size = match (left.primary_number(), right.primary_number()) {
            (Some(_), Some(_)) if left_measure != right_measure => 0.3,
            (Some(a), Some(b)) if (a - b).abs() < 0.5 => 1.0,
            (Some(_), Some(_)) => return ScoreResult::zero("magnitude mismatch"),
            (None, None) => 0.8,
            _ => 0.6,
        };

        let timing = match (left.month, right.month) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("meeting month mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => text::time_proximity(left.close_time, right.close_time, Duration::days(21))
                .unwrap_or(0.5),
        };

        let score = 0.25 * bank + 0.3 * action + 0.2 * size + 0.25 * timing;
        ScoreResult::new(score)
            .with_detail("bank", format!("{bank:.2}"))
            .with_detail("action", format!("{action:.2}"))
            .with_detail("magnitude", format!("{size:.2}"))
            .with_detail("timing", format!("{timing:.2}"))
    }

    fn supports_auto_confirm(&self) -> bool {
        true
    }

    fn supports_auto_reject(&self) -> bool {
        true
    }

    fn decision_bounds(&self) -> DecisionBounds {
        DecisionBounds {
            confirm_at: 0.95,
            reject_below: 0.7,
        }
    }

    fn title_keywords(&self) -> Vec<String> {
        KEYWORDS.iter().map(|k| (*k).to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(title: &str) -> TopicSignals {
        RatesPipeline::new()
            .extract_signals(&MarketCandidate::new("v", "id", title))
            .unwrap()
    }

    #[test]
    fn extracts_bank_action_magnitude_month() {
        let s = signals("Fed raises rates by 25bps in March");
        assert!(s.entities.contains("bank:fed"));
        assert!(s.entities.contains("measure:change"));
        assert_eq!(s.direction, Some(Direction::Up));
        assert_eq!(s.numbers, vec![25.0]);
        assert_eq!(s.month, Some(3));
    }

    #[test]
    fn percent_moves_normalize_to_bps() {
        let s = signals("FOMC March hike ≥0.25%");
        assert!(s.entities.contains("bank:fed"));
        assert_eq!(s.numbers, vec![25.0]);
        assert_eq!(s.direction, Some(Direction::Up));

        let level = signals("Fed funds rate above 4.25% after June");
        assert!(level.entities.contains("measure:level"));
        assert!((level.numbers[0] - 425.0).abs() < 1e-9);
    }

    #[test]
    fn equivalent_titles_score_high_and_symmetric() {
        let pipeline = RatesPipeline::new();
        let a = signals("Fed raises rates by 25bps in March");
        let b = signals("FOMC March hike ≥0.25%");
        let ab = pipeline.score(&a, &b).score();
        let ba = pipeline.score(&b, &a).score();
        assert!(ab > 0.8, "score {ab}");
        assert_eq!(ab, ba);
    }

    #[test]
    fn conflicting_actions_or_banks_score_zero() {
        let pipeline = RatesPipeline::new();
        let hike = signals("Fed hike in March");
        let cut = signals("Fed cut in March");
        let ecb = signals("ECB hike in March");
        assert_eq!(pipeline.score(&hike, &cut).score(), 0.0);
        assert_eq!(pipeline.score(&hike, &ecb).score(), 0.0);
    }

    #[test]
    fn different_months_score_zero() {
        let pipeline = RatesPipeline::new();
        let march = signals("Fed hike 25bps in March");
        let june = signals("Fed hike 25bps in June");
        assert_eq!(pipeline.score(&march, &june).score(), 0.0);
    }

    #[test]
    fn empty_title_fails_extraction() {
        let result = RatesPipeline::new().extract_signals(&MarketCandidate::new("v", "id", "  "));
        assert!(matches!(result, Err(Error::Extraction(_))));
    }
}
