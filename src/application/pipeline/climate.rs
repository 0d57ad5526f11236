//! Weather and climate threshold pipeline.

use chrono::Duration;

use super::text;
use crate::domain::{
    market::MarketCandidate, score::ScoreResult, signal::Direction, signal::TopicSignals,
    topic::CanonicalTopic,
};
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;

const ALGO_VERSION: &str = "climate-v1";

const METRICS: &[(&str, &str)] = &[
    ("global temperature", "global-temp"),
    ("hottest year", "global-temp"),
    ("high temperature", "high-temp"),
    ("highest temperature", "high-temp"),
    ("high temp", "high-temp"),
    ("low temperature", "low-temp"),
    ("lowest temperature", "low-temp"),
    ("low temp", "low-temp"),
    ("temperature", "high-temp"),
    ("temp", "high-temp"),
    ("rainfall", "rain"),
    ("rain", "rain"),
    ("precipitation", "rain"),
    ("snowfall", "snow"),
    ("snow", "snow"),
    ("hurricane", "hurricane"),
    ("hurricanes", "hurricane"),
    ("tornado", "tornado"),
];

const CITIES: &[(&str, &str)] = &[
    ("new york city", "nyc"),
    ("new york", "nyc"),
    ("nyc", "nyc"),
    ("central park", "nyc"),
    ("los angeles", "la"),
    ("lax", "la"),
    ("chicago", "chicago"),
    ("miami", "miami"),
    ("austin", "austin"),
    ("denver", "denver"),
    ("philadelphia", "philadelphia"),
    ("houston", "houston"),
    ("seattle", "seattle"),
    ("london", "london"),
];

const DIRECTIONS: &[(&str, Direction)] = &[
    ("above", Direction::Up),
    ("over", Direction::Up),
    ("exceed", Direction::Up),
    ("at least", Direction::Up),
    ("or higher", Direction::Up),
    ("below", Direction::Down),
    ("under", Direction::Down),
    ("or lower", Direction::Down),
    ("between", Direction::Flat),
];

const KEYWORDS: &[&str] = &[
    "temperature", "temp", "weather", "rain", "snow", "hurricane", "degrees", "°f", "climate",
];

/// Pipeline for the CLIMATE topic.
#[derive(Debug, Clone, Default)]
pub struct ClimatePipeline;

impl ClimatePipeline {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TopicPipeline for ClimatePipeline {
    fn topic(&self) -> CanonicalTopic {
        CanonicalTopic::Climate
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
            direction: text::lookup(title, DIRECTIONS),
            month: text::month_in(title),
            close_time: candidate.close_time,
            ..TopicSignals::default()
        };
        if let Some(metric) = text::lookup(title, METRICS) {
            signals.entities.insert(format!("metric:{metric}"));
        }
        if let Some(city) = text::lookup(title, CITIES) {
            signals.entities.insert(format!("city:{city}"));
        }
        // Threshold: the first non-monetary number that is not a day of month.
        let day_like = |value: f64| signals.month.is_some() && value <= 31.0 && value.fract() == 0.0;
        let threshold = text::amounts(&title.replace('°', " "))
            .into_iter()
            .filter(|amount| !amount.monetary && !day_like(amount.value))
            .map(|amount| amount.value)
            .find(|value| !(2000.0..2100.0).contains(value) || value.fract() != 0.0);
        if let Some(threshold) = threshold {
            signals.numbers.push(threshold);
        }
        Ok(signals)
    }

    fn score(&self, left: &TopicSignals, right: &TopicSignals) -> ScoreResult {
        let metric = match (left.entities_of("metric:").next(), right.entities_of("metric:").next()) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("metric mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => 0.4,
        };

        let city = match (left.entities_of("city:").next(), right.entities_of("city:").next()) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("location mismatch"),
            (Some(_), Some(_)) => 1.0,
            (None, None) => 0.6,
            _ => 0.3,
        };

        if let (Some(a), Some(b)) = (left.direction, right.direction) {
            if a != b {
                return ScoreResult::zero("direction mismatch");
            }
        }

        let threshold = match (left.primary_number(), right.primary_number()) {
            (Some(a), Some(b)) if (a - b).abs() <= 0.5 => 1.0,
            (Some(a), Some(b)) => (1.0 - (a - b).abs() / 5.0).max(0.0),
            _ => 0.5,
        };

        let date = text::time_proximity(left.close_time, right.close_time, Duration::hours(24))
            .unwrap_or(0.5);

        let score = 0.25 * metric + 0.25 * city + 0.3 * threshold + 0.2 * date;
        ScoreResult::new(score)
            .with_detail("metric", format!("{metric:.2}"))
            .with_detail("city", format!("{city:.2}"))
            .with_detail("threshold", format!("{threshold:.2}"))
            .with_detail("date", format!("{date:.2}"))
    }

    fn title_keywords(&self) -> Vec<String> {
        KEYWORDS.iter().map(|k| (*k).to_string()).collect()
    }
}
