//! Canonical topics used as the pipeline dispatch key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of market subject areas.
///
/// A matching run is scoped to exactly one topic; the topic selects the
/// scoring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CanonicalTopic {
    CryptoDaily,
    CryptoIntraday,
    Macro,
    Rates,
    Elections,
    Commodities,
    Climate,
    Sports,
    Geopolitics,
    Entertainment,
    Finance,
    Universal,
}

/// Legacy topic names kept for old configs and scripts.
const LEGACY_ALIASES: &[(&str, CanonicalTopic)] = &[
    ("politics", CanonicalTopic::Elections),
    ("election", CanonicalTopic::Elections),
    ("weather", CanonicalTopic::Climate),
    ("crypto", CanonicalTopic::CryptoDaily),
    ("cryptohourly", CanonicalTopic::CryptoIntraday),
    ("fed", CanonicalTopic::Rates),
    ("interestrates", CanonicalTopic::Rates),
    ("economy", CanonicalTopic::Macro),
    ("economics", CanonicalTopic::Macro),
    ("sport", CanonicalTopic::Sports),
    ("world", CanonicalTopic::Geopolitics),
    ("culture", CanonicalTopic::Entertainment),
    ("stocks", CanonicalTopic::Finance),
    ("commodity", CanonicalTopic::Commodities),
    ("general", CanonicalTopic::Universal),
    ("other", CanonicalTopic::Universal),
];

impl CanonicalTopic {
    /// Every topic, in declaration order.
    pub const ALL: [CanonicalTopic; 12] = [
        Self::CryptoDaily,
        Self::CryptoIntraday,
        Self::Macro,
        Self::Rates,
        Self::Elections,
        Self::Commodities,
        Self::Climate,
        Self::Sports,
        Self::Geopolitics,
        Self::Entertainment,
        Self::Finance,
        Self::Universal,
    ];

    /// Canonical upper-case name, e.g. `CRYPTO_DAILY`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CryptoDaily => "CRYPTO_DAILY",
            Self::CryptoIntraday => "CRYPTO_INTRADAY",
            Self::Macro => "MACRO",
            Self::Rates => "RATES",
            Self::Elections => "ELECTIONS",
            Self::Commodities => "COMMODITIES",
            Self::Climate => "CLIMATE",
            Self::Sports => "SPORTS",
            Self::Geopolitics => "GEOPOLITICS",
            Self::Entertainment => "ENTERTAINMENT",
            Self::Finance => "FINANCE",
            Self::Universal => "UNIVERSAL",
        }
    }

    /// Parse a free-form topic string.
    ///
    /// Matching ignores case, hyphens, underscores and spaces, and accepts
    /// the legacy alias table (`politics`, `weather`, ...). Returns `None`
    /// for anything else.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let key = squash(input);
        if key.is_empty() {
            return None;
        }

        Self::ALL
            .iter()
            .copied()
            .find(|topic| squash(topic.as_str()) == key)
            .or_else(|| {
                LEGACY_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == key)
                    .map(|(_, topic)| *topic)
            })
    }
}

fn squash(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for CanonicalTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
