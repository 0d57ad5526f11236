//! Multi-topic runs over one venue pair.

use tracing::{error, info};
use uuid::Uuid;

use super::engine::MatchingEngine;
use crate::application::pipeline::registry::is_implemented;
use crate::domain::{
    run::{BatchRunResult, EngineRunOptions, EngineRunResult},
    topic::CanonicalTopic,
};
use crate::port::outbound::{link::LinkStore, market::MarketSource};

/// Runs topics one after another against the same venue pair.
pub struct BatchRunner<'a, S, L> {
    engine: &'a MatchingEngine<S, L>,
}

impl<'a, S: MarketSource, L: LinkStore> BatchRunner<'a, S, L> {
    #[must_use]
    pub fn new(engine: &'a MatchingEngine<S, L>) -> Self {
        Self { engine }
    }

    /// Run every registered topic: dedicated pipelines first, then keyword
    /// fallbacks, then UNIVERSAL.
    ///
    /// A link belongs to the first topic that writes it, so the generic
    /// topics only pick up pairs no specific topic claimed.
    pub async fn run_all(&self, base: &EngineRunOptions) -> BatchRunResult {
        let mut topics = self.engine.registry().list_topics();
        topics.sort_by_key(|&topic| run_rank(topic));
        self.run_topics(base, &topics).await
    }

    /// Run the given topics in order. `base.topic` is ignored.
    ///
    /// A topic whose run fails outright is recorded as an empty result
    /// carrying the error; the remaining topics still run.
    pub async fn run_topics(&self, base: &EngineRunOptions, topics: &[CanonicalTopic]) -> BatchRunResult {
        let mut batch = BatchRunResult::default();

        for &topic in topics {
            let options = base.for_topic(topic);
            let result = match self.engine.run(&options).await {
                Ok(result) => result,
                Err(e) => {
                    error!(topic = %topic, error = %e, "Topic run failed");
                    let mut failed =
                        EngineRunResult::empty(Uuid::new_v4().to_string(), topic.as_str(), options.mode);
                    failed.errors.push(e.to_string());
                    failed
                }
            };
            batch.totals.record(&result);
            batch.results.push(result);
        }

        info!(
            topics = batch.totals.topics,
            topics_with_errors = batch.totals.topics_with_errors,
            suggested = batch.totals.suggestions_created,
            confirmed = batch.totals.auto_confirmed,
            rejected = batch.totals.auto_rejected,
            "Batch complete"
        );
        batch
    }
}

fn run_rank(topic: CanonicalTopic) -> u8 {
    if topic == CanonicalTopic::Universal {
        2
    } else if is_implemented(topic) {
        0
    } else {
        1
    }
}
