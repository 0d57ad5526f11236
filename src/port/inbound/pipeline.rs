//! Topic pipeline port.
//!
//! Defines the [`TopicPipeline`] trait: the capability contract every topic
//! implementation provides to the matching engine. A pipeline serves exactly
//! one [`CanonicalTopic`], turns candidates into [`TopicSignals`] and scores
//! pairs of signals.
//!
//! # Example
//!
//! ```ignore
//! use marketlink::port::inbound::pipeline::TopicPipeline;
//!
//! struct MyPipeline;
//!
//! impl TopicPipeline for MyPipeline {
//!     fn topic(&self) -> CanonicalTopic { CanonicalTopic::Finance }
//!     fn algo_version(&self) -> &str { "finance-v1" }
//!     fn extract_signals(&self, c: &MarketCandidate) -> Result<TopicSignals> { todo!() }
//!     fn score(&self, l: &TopicSignals, r: &TopicSignals) -> ScoreResult { todo!() }
//! }
//! ```

use crate::domain::{
    eligibility::EligibilityVerdict, market::MarketCandidate, score::DecisionBounds,
    score::ScoreResult, signal::TopicSignals, topic::CanonicalTopic,
};
use crate::error::Result;

/// Per-topic signal extraction and scoring.
///
/// # Implementation Requirements
///
/// - `extract_signals` and `score` must be pure and deterministic.
/// - `score(a, b)` must equal `score(b, a)`; normalize internally if the
///   extraction is venue-asymmetric.
/// - Pipelines must be thread-safe (`Send + Sync`).
pub trait TopicPipeline: Send + Sync {
    /// The topic this pipeline serves.
    fn topic(&self) -> CanonicalTopic;

    /// Version string recorded on every link this pipeline produces.
    fn algo_version(&self) -> &str;

    /// Extract topic signals from a candidate's title and metadata.
    ///
    /// # Errors
    /// Returns an error when the candidate carries nothing the pipeline can
    /// work with (e.g. an empty title). The engine skips such candidates.
    fn extract_signals(&self, candidate: &MarketCandidate) -> Result<TopicSignals>;

    /// Score a pair of signals in `[0, 1]`.
    fn score(&self, left: &TopicSignals, right: &TopicSignals) -> ScoreResult;

    /// Whether high-confidence pairs may be confirmed without review.
    fn supports_auto_confirm(&self) -> bool {
        false
    }

    /// Whether low-confidence retained pairs may be rejected without review.
    fn supports_auto_reject(&self) -> bool {
        false
    }

    /// Score bands used for auto-confirm and auto-reject.
    fn decision_bounds(&self) -> DecisionBounds {
        DecisionBounds::default()
    }

    /// Title keywords passed to the market source as a prefilter.
    ///
    /// An empty list disables keyword filtering.
    fn title_keywords(&self) -> Vec<String> {
        Vec::new()
    }

    /// Structural eligibility of a single candidate.
    ///
    /// Pipelines without a notion of structurally incompatible markets keep
    /// the default, which accepts everything.
    fn is_eligible(&self, _candidate: &MarketCandidate) -> EligibilityVerdict {
        EligibilityVerdict::eligible()
    }
}
