//! Composite (multivariate) market detection.
//!
//! Some venues sell contracts that bundle several independent conditions,
//! e.g. "Lakers win, Over 220.5 points". Such markets have no
//! single-condition counterpart on the other venue and must not be paired.
//!
//! Checks run in fixed priority order and the first hit wins:
//!
//! 1. event grouping identifier carries the reserved prefix
//! 2. series grouping identifier carries the reserved prefix
//! 3. declared boolean flag in metadata (`false` is a definitive eligible)
//! 4. title patterns (stacked yes/no clauses, parlay terms, total + outcome)
//!
//! Structured identifiers are authoritative; title heuristics only cover
//! markets without structured tags.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::domain::eligibility::{EligibilitySource, EligibilityVerdict};
use crate::domain::market::MarketCandidate;

/// Metadata keys and prefix used by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MveConfig {
    /// Prefix reserved for multi-condition products.
    pub reserved_prefix: String,
    /// Metadata key holding the event grouping identifier.
    pub event_key: String,
    /// Metadata key holding the series grouping identifier.
    pub series_key: String,
    /// Metadata key holding the declared multi-condition flag.
    pub flag_key: String,
}

impl Default for MveConfig {
    fn default() -> Self {
        Self {
            reserved_prefix: "KXMVE".to_string(),
            event_key: "event_ticker".to_string(),
            series_key: "series_ticker".to_string(),
            flag_key: "is_mve".to_string(),
        }
    }
}

type Check = fn(&MveClassifier, &MarketCandidate) -> Option<EligibilityVerdict>;

/// Priority order of the checks. Earlier entries always win.
const CHECKS: [Check; 4] = [
    MveClassifier::check_event_group,
    MveClassifier::check_series_group,
    MveClassifier::check_declared_field,
    MveClassifier::check_title,
];

/// Ordered title rules: label reported as the reason, and its predicate.
const TITLE_RULES: [(&str, fn(&str) -> bool); 3] = [
    ("stacked yes/no clauses", has_stacked_clauses),
    ("parlay terminology", has_parlay_terms),
    ("over/under combined with outcome clause", has_total_with_outcome),
];

/// Reusable composite-market classifier.
#[derive(Debug, Clone, Default)]
pub struct MveClassifier {
    config: MveConfig,
}

impl MveClassifier {
    #[must_use]
    pub fn new(config: MveConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MveConfig {
        &self.config
    }

    /// Classify one candidate.
    #[must_use]
    pub fn classify(&self, candidate: &MarketCandidate) -> EligibilityVerdict {
        CHECKS
            .iter()
            .find_map(|check| check(self, candidate))
            .unwrap_or_else(EligibilityVerdict::eligible)
    }

    fn has_reserved_prefix(&self, value: &str) -> bool {
        let prefix = &self.config.reserved_prefix;
        !prefix.is_empty()
            && value.len() >= prefix.len()
            && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    }

    fn check_event_group(&self, candidate: &MarketCandidate) -> Option<EligibilityVerdict> {
        let event = candidate.metadata_str(&self.config.event_key)?;
        self.has_reserved_prefix(event).then(|| {
            EligibilityVerdict::ineligible(
                EligibilitySource::EventGroup,
                format!("{} '{event}' is a multi-condition event", self.config.event_key),
            )
        })
    }

    fn check_series_group(&self, candidate: &MarketCandidate) -> Option<EligibilityVerdict> {
        let series = candidate.metadata_str(&self.config.series_key)?;
        self.has_reserved_prefix(series).then(|| {
            EligibilityVerdict::ineligible(
                EligibilitySource::SeriesGroup,
                format!("{} '{series}' is a multi-condition series", self.config.series_key),
            )
        })
    }

    fn check_declared_field(&self, candidate: &MarketCandidate) -> Option<EligibilityVerdict> {
        match candidate.metadata_bool(&self.config.flag_key)? {
            true => Some(EligibilityVerdict::ineligible(
                EligibilitySource::DeclaredField,
                format!("{} is set", self.config.flag_key),
            )),
            false => Some(EligibilityVerdict {
                is_eligible: true,
                source: EligibilitySource::DeclaredField,
                reason: Some(format!("{} is false", self.config.flag_key)),
            }),
        }
    }

    fn check_title(&self, candidate: &MarketCandidate) -> Option<EligibilityVerdict> {
        title_pattern(&candidate.title)
            .map(|label| EligibilityVerdict::ineligible(EligibilitySource::TitlePattern, label))
    }
}

/// Label of the first title rule that matches, if any.
#[must_use]
pub fn title_pattern(title: &str) -> Option<&'static str> {
    TITLE_RULES
        .iter()
        .find(|(_, predicate)| predicate(title))
        .map(|(label, _)| *label)
}

fn stacked_clause_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|,)\s*(?:yes|no)\s+[^\s,][^,]*").expect("static regex")
    })
}

fn parlay_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:same[\s-]*game[\s-]*parlay|sgp|parlay)\b").expect("static regex")
    })
}

fn total_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:\b(?:over|under)|\bo/u)\s*\d+(?:\.\d+)?").expect("static regex")
    })
}

fn outcome_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:wins?|beats?|moneyline|advances?|covers?|scores?)\b")
            .expect("static regex")
    })
}

fn clause_split_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*(?:,|;|&|\+|\band\b)\s*").expect("static regex"))
}

fn has_stacked_clauses(title: &str) -> bool {
    stacked_clause_re().find_iter(title).count() >= 2
}

fn has_parlay_terms(title: &str) -> bool {
    parlay_re().is_match(title)
}

fn has_total_with_outcome(title: &str) -> bool {
    let clauses: Vec<&str> = clause_split_re()
        .split(title)
        .filter(|clause| !clause.is_empty())
        .collect();

    clauses.iter().enumerate().any(|(i, total_clause)| {
        total_re().is_match(total_clause)
            && clauses
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && outcome_re().is_match(other))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str) -> MarketCandidate {
        MarketCandidate::new("kalshi", "m1", title)
    }

    #[test]
    fn event_group_prefix_is_ineligible() {
        let verdict = MveClassifier::default().classify(
            &candidate("Lakers vs Celtics").with_metadata("event_ticker", "KXMVESPORTS-25JAN"),
        );
        assert!(!verdict.is_eligible);
        assert_eq!(verdict.source, EligibilitySource::EventGroup);
    }

    #[test]
    fn prefix_match_ignores_case() {
        let verdict = MveClassifier::default().classify(
            &candidate("Lakers vs Celtics").with_metadata("series_ticker", "kxmveNBA"),
        );
        assert_eq!(verdict.source, EligibilitySource::SeriesGroup);
    }

    #[test]
    fn declared_false_short_circuits_title_patterns() {
        let verdict = MveClassifier::default()
            .classify(&candidate("Same game parlay: Lakers").with_metadata("is_mve", false));
        assert!(verdict.is_eligible);
        assert_eq!(verdict.source, EligibilitySource::DeclaredField);
    }

    #[test]
    fn declared_true_is_ineligible() {
        let verdict =
            MveClassifier::default().classify(&candidate("Lakers").with_metadata("is_mve", "true"));
        assert!(!verdict.is_eligible);
        assert_eq!(verdict.source, EligibilitySource::DeclaredField);
    }

    #[test]
    fn event_group_outranks_title_pattern() {
        let verdict = MveClassifier::default().classify(
            &candidate("yes Lakers, yes Over 220.5")
                .with_metadata("event_ticker", "KXMVE-1")
                .with_metadata("is_mve", false),
        );
        assert_eq!(verdict.source, EligibilitySource::EventGroup);
    }

    #[test]
    fn non_reserved_tickers_fall_through() {
        let verdict = MveClassifier::default().classify(
            &candidate("Lakers vs Celtics")
                .with_metadata("event_ticker", "KXNBAGAME-25JAN")
                .with_metadata("series_ticker", "KXNBAGAME"),
        );
        assert_eq!(verdict, EligibilityVerdict::eligible());
    }

    #[test]
    fn title_rules_in_order() {
        assert_eq!(
            title_pattern("yes Lakers, no Celtics"),
            Some("stacked yes/no clauses")
        );
        assert_eq!(title_pattern("NBA SGP: Lakers"), Some("parlay terminology"));
        assert_eq!(
            title_pattern("Same-Game Parlay Lakers"),
            Some("parlay terminology")
        );
        assert_eq!(
            title_pattern("Lakers win, over 220.5 points"),
            Some("over/under combined with outcome clause")
        );
        // stacked clauses outrank parlay wording
        assert_eq!(
            title_pattern("yes Lakers, yes parlay boost"),
            Some("stacked yes/no clauses")
        );
    }

    #[test]
    fn single_condition_titles_are_not_flagged() {
        assert_eq!(title_pattern("Will the Lakers beat the Celtics?"), None);
        assert_eq!(title_pattern("Lakers vs Celtics: over 220.5 points"), None);
        assert_eq!(title_pattern("Yes or no: will BTC close above $100k?"), None);
    }

    #[test]
    fn empty_prefix_never_matches() {
        let classifier = MveClassifier::new(MveConfig {
            reserved_prefix: String::new(),
            ..MveConfig::default()
        });
        let verdict =
            classifier.classify(&candidate("Lakers").with_metadata("event_ticker", "KXMVE-1"));
        assert!(verdict.is_eligible);
    }
}
