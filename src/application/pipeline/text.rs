//! Text helpers shared by topic pipelines.
//!
//! All similarity helpers are symmetric in their arguments.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "any", "are", "be", "before", "by", "did", "do", "does", "for", "from",
    "has", "have", "if", "in", "is", "it", "its", "of", "on", "or", "the", "than", "that", "this",
    "to", "was", "what", "when", "which", "who", "will", "with", "yes", "no", "market",
];

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

/// Lowercase and replace everything except letters, digits, `.`, `%` and
/// `$` with spaces.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '%' | '$') {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Raw words of a normalized text, trailing dots trimmed.
#[must_use]
pub fn words(text: &str) -> Vec<String> {
    normalize(text)
        .split(' ')
        .map(|word| word.trim_matches('.').to_string())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Content tokens: normalized words without stop words.
#[must_use]
pub fn tokens(text: &str) -> BTreeSet<String> {
    words(text)
        .into_iter()
        .filter(|word| !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

/// Whether `phrase` occurs in `text` on word boundaries.
///
/// Both arguments are split into words first, so `"Federal Reserve"`
/// matches `"the federal-reserve."`.
#[must_use]
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    let haystack = format!(" {} ", words(text).join(" "));
    let needle = format!(" {} ", words(phrase).join(" "));
    !needle.trim().is_empty() && haystack.contains(&needle)
}

/// First entry of `table` whose phrase occurs in `text`.
#[must_use]
pub fn lookup<T: Copy>(text: &str, table: &[(&str, T)]) -> Option<T> {
    table
        .iter()
        .find(|(phrase, _)| contains_phrase(text, phrase))
        .map(|(_, value)| *value)
}

/// Jaccard similarity. Zero when both sets are empty.
#[must_use]
pub fn jaccard(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    let union = left.union(right).count();
    if union == 0 {
        return 0.0;
    }
    left.intersection(right).count() as f64 / union as f64
}

/// Overlap coefficient: shared items over the smaller set.
#[must_use]
pub fn overlap(left: &BTreeSet<String>, right: &BTreeSet<String>) -> f64 {
    let smaller = left.len().min(right.len());
    if smaller == 0 {
        return 0.0;
    }
    left.intersection(right).count() as f64 / smaller as f64
}

/// Month referenced in the text.
///
/// "may" only counts next to a number or after "in"/"of", since it is far
/// more common as a verb.
#[must_use]
pub fn month_in(text: &str) -> Option<u32> {
    let words = words(text);
    words.iter().enumerate().find_map(|(i, word)| {
        let month = MONTHS
            .iter()
            .find(|(name, _)| *name == word.as_str())
            .map(|(_, month)| *month)?;
        if word == "may" {
            let prev = i.checked_sub(1).and_then(|p| words.get(p));
            let next = words.get(i + 1);
            let anchored = prev.is_some_and(|p| p == "in" || p == "of")
                || next.is_some_and(|n| n.chars().all(|c| c.is_ascii_digit()))
                || prev.is_some_and(|p| p.chars().all(|c| c.is_ascii_digit()));
            if !anchored {
                return None;
            }
        }
        Some(month)
    })
}

/// Four-digit year between 2000 and 2099 referenced in the text.
#[must_use]
pub fn year_in(text: &str) -> Option<i32> {
    words(text).iter().find_map(|word| {
        let digits = word.trim_start_matches('$');
        if digits.len() == 4 && digits.starts_with("20") {
            digits.parse().ok()
        } else {
            None
        }
    })
}

/// A numeric amount parsed from a title word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Amount {
    pub value: f64,
    /// Written with `$`, a thousands separator or a `k`/`m`/`b` suffix.
    pub monetary: bool,
    /// Written with a trailing `%`.
    pub percent: bool,
}

/// Parse a single word such as `$100,000`, `100k`, `1.5m` or `4.25%`.
#[must_use]
pub fn parse_amount(word: &str) -> Option<Amount> {
    let mut text = word.trim().trim_end_matches(['?', '!', ',', ')', ':']).to_ascii_lowercase();
    let mut monetary = false;
    if let Some(rest) = text.strip_prefix('$') {
        text = rest.to_string();
        monetary = true;
    }
    let percent = text.ends_with('%');
    if percent {
        text.pop();
    }
    let multiplier = match text.chars().last() {
        Some('k') => 1e3,
        Some('m') => 1e6,
        Some('b') => 1e9,
        _ => 1.0,
    };
    if multiplier > 1.0 {
        text.pop();
        monetary = true;
    }
    if text.contains(',') {
        monetary = true;
        text = text.replace(',', "");
    }
    let text = text.trim_end_matches('.');
    if text.is_empty() || !text.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    Some(Amount {
        value: value * multiplier,
        monetary,
        percent,
    })
}

/// Every amount in a title, in order. Splits on whitespace only so that
/// thousands separators survive.
#[must_use]
pub fn amounts(title: &str) -> Vec<Amount> {
    title
        .split_whitespace()
        .map(|word| word.trim_start_matches(['>', '<', '≥', '≤', '=', '~', '(']))
        .filter_map(parse_amount)
        .collect()
}

/// Relative closeness of two numbers: 1 when equal, 0 when one is zero
/// and the other is not.
#[must_use]
pub fn closeness(left: f64, right: f64) -> f64 {
    let scale = left.abs().max(right.abs());
    if scale == 0.0 {
        return 1.0;
    }
    (1.0 - (left - right).abs() / scale).clamp(0.0, 1.0)
}

/// Close-time proximity: 1 when equal, falling linearly to 0 at
/// `tolerance`. `None` when either side has no close time.
#[must_use]
pub fn time_proximity(
    left: Option<DateTime<Utc>>,
    right: Option<DateTime<Utc>>,
    tolerance: Duration,
) -> Option<f64> {
    let (left, right) = (left?, right?);
    let tolerance_secs = tolerance.num_seconds().max(1) as f64;
    let gap_secs = (left - right).num_seconds().abs() as f64;
    Some((1.0 - gap_secs / tolerance_secs).clamp(0.0, 1.0))
}
