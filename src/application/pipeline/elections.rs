//! Election outcome pipeline.

use chrono::Duration;

use super::text;
use crate::domain::{
    market::MarketCandidate, score::ScoreResult, signal::TopicSignals, topic::CanonicalTopic,
};
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;

const ALGO_VERSION: &str = "elections-v1";

const OFFICES: &[(&str, &str)] = &[
    ("presidential", "president"),
    ("president", "president"),
    ("presidency", "president"),
    ("white house", "president"),
    ("vice president", "vice-president"),
    ("senate", "senate"),
    ("senator", "senate"),
    ("house", "house"),
    ("congress", "house"),
    ("governor", "governor"),
    ("gubernatorial", "governor"),
    ("mayor", "mayor"),
    ("mayoral", "mayor"),
    ("prime minister", "prime-minister"),
    ("parliament", "parliament"),
];

const PARTIES: &[(&str, &str)] = &[
    ("democratic", "dem"),
    ("democrat", "dem"),
    ("democrats", "dem"),
    ("dem", "dem"),
    ("republican", "gop"),
    ("republicans", "gop"),
    ("gop", "gop"),
    ("labour", "labour"),
    ("conservative", "conservative"),
    ("tory", "conservative"),
    ("liberal", "liberal"),
];

const KEYWORDS: &[&str] = &[
    "election", "elected", "win", "president", "senate", "house", "governor", "mayor", "primary",
    "nominee", "nomination", "vote", "democrat", "republican",
];

/// Words that say something about the contract but not about who wins.
const GENERIC: &[&str] = &[
    "election", "elections", "win", "wins", "winner", "elected", "race", "primary", "nominee",
    "nomination", "party", "seat", "control", "next", "general", "popular", "vote",
];

/// Remaining tokens after removing offices, parties, years and generic
/// words; mostly candidate and place names.
fn name_tokens(title: &str) -> Vec<String> {
    text::tokens(title)
        .into_iter()
        .filter(|token| {
            !GENERIC.contains(&token.as_str())
                && !OFFICES.iter().any(|(phrase, _)| *phrase == token)
                && !PARTIES.iter().any(|(phrase, _)| *phrase == token)
                && !token.chars().all(|c| c.is_ascii_digit())
        })
        .collect()
}

/// Pipeline for the ELECTIONS topic.
#[derive(Debug, Clone, Default)]
pub struct ElectionsPipeline;

impl ElectionsPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TopicPipeline for ElectionsPipeline {
    fn topic(&self) -> CanonicalTopic {
        CanonicalTopic::Elections
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
            year: text::year_in(title),
            close_time: candidate.close_time,
            ..TopicSignals::default()
        };
        if let Some(office) = text::lookup(title, OFFICES) {
            signals.entities.insert(format!("office:{office}"));
        }
        if let Some(party) = text::lookup(title, PARTIES) {
            signals.entities.insert(format!("party:{party}"));
        }
        for name in name_tokens(title) {
            signals.entities.insert(format!("name:{name}"));
        }
        Ok(signals)
    }

    fn score(&self, left: &TopicSignals, right: &TopicSignals) -> ScoreResult {
        let office = match (left.entities_of("office:").next(), right.entities_of("office:").next()) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("office mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => 0.5,
        };

        let party = match (left.entities_of("party:").next(), right.entities_of("party:").next()) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("party mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => 0.6,
        };

        let year = match (left.year, right.year) {
            (Some(a), Some(b)) if a != b => return ScoreResult::zero("election year mismatch"),
            (Some(_), Some(_)) => 1.0,
            _ => text::time_proximity(left.close_time, right.close_time, Duration::days(60))
                .unwrap_or(0.5),
        };

        let left_names = left.entities_of("name:").map(str::to_string).collect();
        let right_names = right.entities_of("name:").map(str::to_string).collect();
        let names = text::overlap(&left_names, &right_names);

        let score = 0.2 * office + 0.15 * party + 0.15 * year + 0.5 * names;
        ScoreResult::new(score)
            .with_detail("office", format!("{office:.2}"))
            .with_detail("party", format!("{party:.2}"))
            .with_detail("year", format!("{year:.2}"))
            .with_detail("names", format!("{names:.2}"))
    }

    fn title_keywords(&self) -> Vec<String> {
        KEYWORDS.iter().map(|k| (*k).to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(title: &str) -> TopicSignals {
        ElectionsPipeline::new()
            .extract_signals(&MarketCandidate::new("v", "id", title))
            .unwrap()
    }

    #[test]
    fn extracts_office_party_year_names() {
        let s = signals("Will Gavin Newsom win the 2028 Democratic presidential nomination?");
        assert!(s.entities.contains("office:president"));
        assert!(s.entities.contains("party:dem"));
        assert!(s.entities.contains("name:newsom"));
        assert!(s.entities.contains("name:gavin"));
        assert!(!s.entities.contains("name:nomination"));
        assert_eq!(s.year, Some(2028));
    }

    #[test]
    fn same_race_and_candidate_score_high() {
        let pipeline = ElectionsPipeline::new();
        let a = signals("Will Gavin Newsom win the 2028 Democratic presidential nomination?");
        let b = signals("2028 Democratic Presidential Nominee: Newsom");
        let score = pipeline.score(&a, &b).score();
        assert!(score > 0.8, "score {score}");
        assert_eq!(score, pipeline.score(&b, &a).score());
    }

    #[test]
    fn different_year_or_office_scores_zero() {
        let pipeline = ElectionsPipeline::new();
        let a = signals("Newsom wins 2028 presidential election");
        let b = signals("Newsom wins 2032 presidential election");
        let c = signals("Newsom wins 2028 senate election");
        assert_eq!(pipeline.score(&a, &b).score(), 0.0);
        assert_eq!(pipeline.score(&a, &c).score(), 0.0);
    }

    #[test]
    fn suggest_only() {
        let pipeline = ElectionsPipeline::new();
        assert!(!pipeline.supports_auto_confirm());
        assert!(!pipeline.supports_auto_reject());
    }
}
