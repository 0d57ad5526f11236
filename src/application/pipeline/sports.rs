//! Single-game sports pipeline.
//!
//! Teams are pulled from `A vs B`, `A at B`, `A @ B` and `Will A beat B`
//! titles. Composite contracts are filtered by the multi-condition
//! classifier before pairing.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::Duration;
use regex::Regex;

use super::text;
use crate::application::eligibility::mve::MveClassifier;
use crate::domain::{
    eligibility::EligibilityVerdict, market::MarketCandidate, score::ScoreResult,
    signal::TopicSignals, topic::CanonicalTopic,
};
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;

const ALGO_VERSION: &str = "sports-v1";

const LEAGUES: &[(&str, &str)] = &[
    ("nba", "nba"),
    ("wnba", "wnba"),
    ("nfl", "nfl"),
    ("super bowl", "nfl"),
    ("mlb", "mlb"),
    ("world series", "mlb"),
    ("nhl", "nhl"),
    ("stanley cup", "nhl"),
    ("premier league", "epl"),
    ("epl", "epl"),
    ("la liga", "laliga"),
    ("champions league", "ucl"),
    ("mls", "mls"),
    ("ncaa", "ncaa"),
    ("ncaab", "ncaa"),
    ("ncaaf", "ncaa"),
    ("ufc", "ufc"),
    ("atp", "tennis"),
    ("wta", "tennis"),
];

/// Prefilter words besides league names. `at` and `win` are too common
/// in other topics' titles.
const KEYWORDS: &[&str] = &["vs", "beat", "defeat", "game", "match"];

/// Words that never name a team.
const NOISE: &[&str] = &[
    "the", "will", "game", "match", "winner", "win", "wins", "tonight", "today", "moneyline",
];

fn beat_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:will\s+)?(?:the\s+)?(.+?)\s+(?:beat|defeat)s?\s+(?:the\s+)?(.+)$")
            .expect("static regex")
    })
}

fn versus_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(.+?)\s+(?:vs\.?|v\.?|versus|@|at)\s+(.+)$").expect("static regex")
    })
}

fn trailing_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s+(?:on|in|at)\s+.*$").expect("static regex"))
}

fn segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[:?()!,]|\s-\s").expect("static regex"))
}

/// Canonical team label: content words without league names or noise.
fn team_label(raw: &str) -> Option<String> {
    let raw = trailing_re().replace(raw, "");
    let words: Vec<String> = text::words(&raw)
        .into_iter()
        .filter(|word| {
            !NOISE.contains(&word.as_str()) && !LEAGUES.iter().any(|(name, _)| *name == word)
        })
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}

/// The two teams of the first title segment that reads as a matchup.
fn teams(title: &str) -> Vec<String> {
    segment_re()
        .split(title)
        .find_map(|segment| {
            let caps = beat_re()
                .captures(segment)
                .or_else(|| versus_re().captures(segment))?;
            let home = team_label(&caps[1])?;
            let away = team_label(&caps[2])?;
            Some(vec![home, away])
        })
        .unwrap_or_default()
}

fn words_of(team: &str) -> BTreeSet<String> {
    team.split(' ').map(str::to_string).collect()
}

/// Best one-to-one assignment of two team pairs, averaged.
fn team_similarity(left: &[String], right: &[String]) -> f64 {
    let sim = |a: &String, b: &String| text::overlap(&words_of(a), &words_of(b));
    match (left, right) {
        ([l1, l2], [r1, r2]) => {
            let straight = sim(l1, r1) + sim(l2, r2);
            let crossed = sim(l1, r2) + sim(l2, r1);
            straight.max(crossed) / 2.0
        }
        _ => 0.0,
    }
}

/// Pipeline for the SPORTS topic.
#[derive(Debug, Clone, Default)]
pub struct SportsPipeline {
    eligibility: MveClassifier,
}

impl SportsPipeline {
    #[must_use]
    pub fn new(eligibility: MveClassifier) -> Self {
        Self { eligibility }
    }
}

impl TopicPipeline for SportsPipeline {
    fn topic(&self) -> CanonicalTopic {
        CanonicalTopic::Sports
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
            ..TopicSignals::default()
        };
        if let Some(league) = text::lookup(title, LEAGUES) {
            signals.entities.insert(format!("league:{league}"));
        }
        let teams = teams(title);
        if !teams.is_empty() {
            signals.details.insert("teams".to_string(), teams.join(" | "));
        }
        for team in teams {
            signals.entities.insert(format!("team:{team}"));
        }
        Ok(signals)
    }

    fn score(&self, left: &TopicSignals, right: &TopicSignals) -> ScoreResult {
        if let (Some(a), Some(b)) = (left.entities_of("league:").next(), right.entities_of("league:").next()) {
            if a != b {
                return ScoreResult::zero("league mismatch");
            }
        }

        let left_teams: Vec<String> = left.entities_of("team:").map(str::to_string).collect();
        let right_teams: Vec<String> = right.entities_of("team:").map(str::to_string).collect();
        let (team, basis) = if left_teams.len() == 2 && right_teams.len() == 2 {
            (team_similarity(&left_teams, &right_teams), "teams")
        } else {
            (text::jaccard(&left.tokens, &right.tokens), "tokens")
        };

        let date = text::time_proximity(left.close_time, right.close_time, Duration::hours(36))
            .unwrap_or(0.5);

        ScoreResult::new(0.7 * team + 0.3 * date)
            .with_detail(basis, format!("{team:.2}"))
            .with_detail("date", format!("{date:.2}"))
    }

    fn title_keywords(&self) -> Vec<String> {
        KEYWORDS
            .iter()
            .chain(LEAGUES.iter().map(|(phrase, _)| phrase))
            .map(|k| (*k).to_string())
            .collect()
    }

    fn is_eligible(&self, candidate: &MarketCandidate) -> EligibilityVerdict {
        self.eligibility.classify(candidate)
    }
}
