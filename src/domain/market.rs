//! Market candidates drawn from one venue for a matching run.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::{MarketId, Venue};

/// A market offered by one venue, as seen by the matching engine.
///
/// Candidates are read-only inside the engine. `metadata` carries
/// venue-specific fields (event/series tickers, declared flags, categories)
/// verbatim from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCandidate {
    /// Empty when absent; imports assign the venue being imported.
    #[serde(default)]
    pub venue: Venue,
    pub market_id: MarketId,
    pub title: String,
    #[serde(default)]
    pub close_time: Option<DateTime<Utc>>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

fn default_status() -> String {
    "open".to_string()
}

impl MarketCandidate {
    /// Create a candidate with no close time and empty metadata.
    pub fn new(venue: impl Into<Venue>, market_id: impl Into<MarketId>, title: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            market_id: market_id.into(),
            title: title.into(),
            close_time: None,
            status: default_status(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_close_time(mut self, close_time: DateTime<Utc>) -> Self {
        self.close_time = Some(close_time);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// String value of a metadata key, if present and textual.
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Boolean value of a metadata key.
    ///
    /// Accepts JSON booleans as well as `"true"`/`"false"` strings, since
    /// some venues serialize flags as text.
    #[must_use]
    pub fn metadata_bool(&self, key: &str) -> Option<bool> {
        match self.metadata.get(key)? {
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            Value::Number(n) => n.as_i64().map(|v| v != 0),
            _ => None,
        }
    }

    /// `venue:market_id`, used in logs and error strings.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}:{}", self.venue, self.market_id)
    }

    /// Whether `phrase` occurs in the title as whole words, ignoring case
    /// and punctuation. `"eth"` does not match "whether".
    #[must_use]
    pub fn title_mentions(&self, phrase: &str) -> bool {
        let needle = title_words(phrase);
        if needle.is_empty() {
            return false;
        }
        title_words(&self.title)
            .windows(needle.len())
            .any(|window| window == needle.as_slice())
    }
}

fn title_words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn title_mentions_whole_words_only() {
        let candidate = MarketCandidate::new("kalshi", "m1", "Whether the Fed-Reserve cuts rates?");

        assert!(candidate.title_mentions("fed reserve"));
        assert!(candidate.title_mentions("RATES"));
        assert!(!candidate.title_mentions("eth"));
        assert!(!candidate.title_mentions("at"));
        assert!(!candidate.title_mentions("rate"));
        assert!(!candidate.title_mentions("  "));
    }

    #[test]
    fn metadata_bool_accepts_text_and_numbers() {
        let candidate = MarketCandidate::new("kalshi", "m1", "title")
            .with_metadata("a", true)
            .with_metadata("b", "False")
            .with_metadata("c", json!(1))
            .with_metadata("d", json!({"nested": true}));

        assert_eq!(candidate.metadata_bool("a"), Some(true));
        assert_eq!(candidate.metadata_bool("b"), Some(false));
        assert_eq!(candidate.metadata_bool("c"), Some(true));
        assert_eq!(candidate.metadata_bool("d"), None);
        assert_eq!(candidate.metadata_bool("missing"), None);
    }

    #[test]
    fn deserializes_with_defaults() {
        let candidate: MarketCandidate = serde_json::from_value(json!({
            "venue": "Kalshi",
            "market_id": "KXFED-25MAR",
            "title": "Fed hike in March?"
        }))
        .unwrap();

        assert_eq!(candidate.venue.as_str(), "kalshi");
        assert_eq!(candidate.status, "open");
        assert!(candidate.close_time.is_none());
        assert!(candidate.metadata.is_empty());
        assert_eq!(candidate.label(), "kalshi:KXFED-25MAR");
    }
}
