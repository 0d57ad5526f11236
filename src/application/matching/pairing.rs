//! Pair scoring, threshold filtering and mutual top-K selection.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{score::ScoreDistribution, score::ScoreResult, signal::TopicSignals};
use crate::port::inbound::pipeline::TopicPipeline;

/// A scored pair, addressed by position in the prepared left/right lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPair {
    pub left: usize,
    pub right: usize,
    pub result: ScoreResult,
}

impl ScoredPair {
    #[must_use]
    pub fn score(&self) -> f64 {
        self.result.score()
    }
}

/// Output of the pair-and-score stage.
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    /// Pairs scored.
    pub considered: usize,
    /// Pairs at or above the minimum score, in (left, right) input order.
    pub retained: Vec<ScoredPair>,
    /// Buckets of every retained score.
    pub distribution: ScoreDistribution,
}

/// Score every left signal against every right signal.
///
/// Pairs below `min_score` are dropped right away. `inspect` sees every
/// scored pair, retained or not.
pub fn score_pairs<F>(
    pipeline: &dyn TopicPipeline,
    left: &[TopicSignals],
    right: &[TopicSignals],
    min_score: f64,
    mut inspect: F,
) -> Pairing
where
    F: FnMut(usize, usize, &ScoreResult),
{
    let mut pairing = Pairing::default();
    for (l, left_signals) in left.iter().enumerate() {
        for (r, right_signals) in right.iter().enumerate() {
            let result = pipeline.score(left_signals, right_signals);
            pairing.considered += 1;
            inspect(l, r, &result);
            if result.score() >= min_score {
                pairing.distribution.record(result.score());
                pairing.retained.push(ScoredPair {
                    left: l,
                    right: r,
                    result,
                });
            }
        }
    }
    pairing
}

/// Indices into `pairs` of the best `cap` pairs per group.
///
/// Ties keep input order, so the first-seen counterpart wins.
fn top_per_group(
    pairs: &[ScoredPair],
    group: impl Fn(&ScoredPair) -> usize,
    cap: usize,
) -> BTreeSet<usize> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (index, pair) in pairs.iter().enumerate() {
        groups.entry(group(pair)).or_default().push(index);
    }

    groups
        .into_values()
        .flat_map(|mut members| {
            // sort_by is stable
            members.sort_by(|a, b| pairs[*b].score().total_cmp(&pairs[*a].score()));
            members.truncate(cap);
            members
        })
        .collect()
}

/// Keep only pairs in both the per-left top `max_per_left` and the
/// per-right top `max_per_right`.
///
/// `pairs` must be in (left, right) input order; the output keeps it.
#[must_use]
pub fn mutual_top_k(
    pairs: Vec<ScoredPair>,
    max_per_left: usize,
    max_per_right: usize,
) -> Vec<ScoredPair> {
    let by_left = top_per_group(&pairs, |pair| pair.left, max_per_left);
    let by_right = top_per_group(&pairs, |pair| pair.right, max_per_right);

    pairs
        .into_iter()
        .enumerate()
        .filter(|(index, _)| by_left.contains(index) && by_right.contains(index))
        .map(|(_, pair)| pair)
        .collect()
}
