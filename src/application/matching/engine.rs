//! Single-topic matching run.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::pairing::{mutual_top_k, score_pairs};
use crate::application::pipeline::registry::PipelineRegistry;
use crate::domain::{
    id::{MarketId, Venue},
    link::{LinkKey, LinkStatus, LinkUpsert},
    market::MarketCandidate,
    run::{EngineRunOptions, EngineRunResult},
    signal::TopicSignals,
    topic::CanonicalTopic,
};
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;
use crate::port::outbound::{
    link::LinkStore,
    market::{MarketQuery, MarketSource},
};

/// Candidates of one side that survived eligibility and extraction.
struct Prepared {
    candidates: Vec<MarketCandidate>,
    signals: Vec<TopicSignals>,
    ineligible: usize,
}

/// Orchestrates resolve, fetch, prepare, pair, cap, decide and aggregate
/// for one topic and one venue pair.
pub struct MatchingEngine<S, L> {
    registry: Arc<PipelineRegistry>,
    markets: S,
    links: L,
}

impl<S: MarketSource, L: LinkStore> MatchingEngine<S, L> {
    pub fn new(registry: Arc<PipelineRegistry>, markets: S, links: L) -> Self {
        Self {
            registry,
            markets,
            links,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &PipelineRegistry {
        &self.registry
    }

    #[must_use]
    pub fn links(&self) -> &L {
        &self.links
    }

    /// Run one topic.
    ///
    /// Invalid options, unknown topics, missing pipelines, extraction
    /// failures and individual link lookup or upsert failures are reported
    /// in [`EngineRunResult::errors`]. Pairs whose link another topic already
    /// owns are counted in [`EngineRunResult::owned_elsewhere`] and left
    /// untouched.
    ///
    /// # Errors
    /// Returns an error only when the market source fails.
    pub async fn run(&self, options: &EngineRunOptions) -> Result<EngineRunResult> {
        let run_id = Uuid::new_v4().to_string();
        let span = info_span!("match_run", run_id = %run_id, topic = %options.topic);
        self.run_inner(run_id, options).instrument(span).await
    }

    async fn run_inner(&self, run_id: String, options: &EngineRunOptions) -> Result<EngineRunResult> {
        let started = Instant::now();
        let mut result = EngineRunResult::empty(run_id, options.topic.clone(), options.mode);

        let (topic, pipeline) = match self.resolve(options) {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(error = %e, "Run aborted before fetching");
                result.errors.push(e.to_string());
                result.duration_ms = elapsed_ms(started);
                return Ok(result);
            }
        };
        result.topic = topic.as_str().to_string();
        result.algo_version = Some(pipeline.algo_version().to_string());

        let keywords = pipeline.title_keywords();
        let left_query = MarketQuery::new(options.lookback_hours, options.limits.max_left)
            .with_keywords(keywords.clone());
        let right_query = MarketQuery::new(options.lookback_hours, options.limits.max_right)
            .with_keywords(keywords);
        let (left, right) = tokio::join!(
            self.markets.list_eligible_markets(&options.from_venue, &left_query),
            self.markets.list_eligible_markets(&options.to_venue, &right_query),
        );
        let (left, right) = (left?, right?);
        result.left_count = left.len();
        result.right_count = right.len();
        debug!(left_count = left.len(), right_count = right.len(), "Candidates fetched");

        let left = prepare(pipeline.as_ref(), options, left, &mut result.errors);
        let right = prepare(pipeline.as_ref(), options, right, &mut result.errors);
        result.ineligible_left = left.ineligible;
        result.ineligible_right = right.ineligible;

        let debug_id = options.debug_market_id.as_ref();
        let pairing = score_pairs(
            pipeline.as_ref(),
            &left.signals,
            &right.signals,
            options.min_score,
            |l, r, scored| {
                let (lc, rc) = (&left.candidates[l], &right.candidates[r]);
                if debug_id.is_some_and(|id| *id == lc.market_id || *id == rc.market_id) {
                    info!(
                        left = %lc.label(),
                        right = %rc.label(),
                        score = scored.score(),
                        details = ?scored.details,
                        retained = scored.score() >= options.min_score,
                        "Debug pair scored"
                    );
                }
            },
        );
        result.pairs_considered = pairing.considered;
        result.pairs_retained = pairing.retained.len();
        result.score_distribution = pairing.distribution;

        let linked = mutual_top_k(
            pairing.retained,
            options.limits.max_per_left,
            options.limits.max_per_right,
        );
        result.pairs_linked = linked.len();

        for pair in &linked {
            let (lc, rc) = (&left.candidates[pair.left], &right.candidates[pair.right]);
            let status = decide(pipeline.as_ref(), options, pair.score());
            let key = LinkKey {
                left_venue: lc.venue.clone(),
                left_market_id: lc.market_id.clone(),
                right_venue: rc.venue.clone(),
                right_market_id: rc.market_id.clone(),
            };

            // A link belongs to the topic that created it; later topics
            // must not rewrite its provenance.
            match self.links.get_link(&key).await {
                Ok(Some(existing)) if existing.owned_by_other_topic(topic.as_str()) => {
                    debug!(
                        link = %key,
                        owner = existing.topic.as_deref().unwrap_or(""),
                        "Link owned by another topic"
                    );
                    result.owned_elsewhere += 1;
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(link = %key, error = %e, "Link lookup failed");
                    result.errors.push(format!("lookup {key}: {e}"));
                    continue;
                }
            }

            if !options.mode.is_dry_run() {
                let upsert = LinkUpsert {
                    reason: Some(provenance(status, pipeline.algo_version())),
                    algo_version: Some(pipeline.algo_version().to_string()),
                    topic: Some(topic.as_str().to_string()),
                    key,
                    status,
                    score: pair.score(),
                };
                match self.links.upsert_link(&upsert).await {
                    Ok(write) if write.status != status => {
                        debug!(
                            link = %upsert.key,
                            decided = %status,
                            stored = %write.status,
                            "Link keeps its earlier decision"
                        );
                    }
                    Ok(write) => {
                        debug!(link = %upsert.key, created = write.created, status = %write.status, "Link written");
                    }
                    Err(e) => {
                        warn!(link = %upsert.key, error = %e, "Link upsert failed");
                        result.errors.push(format!("upsert {}: {e}", upsert.key));
                        continue;
                    }
                }
            }

            match status {
                LinkStatus::Suggested => result.suggestions_created += 1,
                LinkStatus::Confirmed => result.auto_confirmed += 1,
                LinkStatus::Rejected => result.auto_rejected += 1,
            }
        }

        result.duration_ms = elapsed_ms(started);
        info!(
            algo_version = pipeline.algo_version(),
            mode = %result.mode,
            left_count = result.left_count,
            right_count = result.right_count,
            pairs_considered = result.pairs_considered,
            pairs_retained = result.pairs_retained,
            pairs_linked = result.pairs_linked,
            suggested = result.suggestions_created,
            confirmed = result.auto_confirmed,
            rejected = result.auto_rejected,
            owned_elsewhere = result.owned_elsewhere,
            errors = result.errors.len(),
            duration_ms = result.duration_ms,
            "Match run complete"
        );
        Ok(result)
    }

    fn resolve(&self, options: &EngineRunOptions) -> Result<(CanonicalTopic, Arc<dyn TopicPipeline>)> {
        options.validate()?;
        let topic = self
            .registry
            .parse_topic_string(&options.topic)
            .ok_or_else(|| Error::UnknownTopic(options.topic.clone()))?;
        let pipeline = self.registry.require(topic)?;
        Ok((topic, pipeline))
    }
}

/// Deduplicate, filter ineligible candidates and extract signals.
fn prepare(
    pipeline: &dyn TopicPipeline,
    options: &EngineRunOptions,
    candidates: Vec<MarketCandidate>,
    errors: &mut Vec<String>,
) -> Prepared {
    let mut seen: HashSet<(Venue, MarketId)> = HashSet::new();
    let mut prepared = Prepared {
        candidates: Vec::with_capacity(candidates.len()),
        signals: Vec::with_capacity(candidates.len()),
        ineligible: 0,
    };

    for candidate in candidates {
        if !seen.insert((candidate.venue.clone(), candidate.market_id.clone())) {
            debug!(market = %candidate.label(), "Duplicate candidate dropped");
            continue;
        }
        let traced = options
            .debug_market_id
            .as_ref()
            .is_some_and(|id| *id == candidate.market_id);

        if options.use_eligibility_filter {
            let verdict = pipeline.is_eligible(&candidate);
            if traced {
                info!(
                    market = %candidate.label(),
                    eligible = verdict.is_eligible,
                    source = %verdict.source,
                    reason = verdict.reason.as_deref().unwrap_or(""),
                    "Debug eligibility"
                );
            }
            if !verdict.is_eligible {
                debug!(
                    market = %candidate.label(),
                    source = %verdict.source,
                    reason = verdict.reason.as_deref().unwrap_or(""),
                    "Candidate ineligible"
                );
                prepared.ineligible += 1;
                continue;
            }
        }

        match pipeline.extract_signals(&candidate) {
            Ok(signals) => {
                if traced {
                    info!(market = %candidate.label(), signals = ?signals, "Debug signals");
                }
                prepared.candidates.push(candidate);
                prepared.signals.push(signals);
            }
            Err(e) => {
                warn!(market = %candidate.label(), error = %e, "Signal extraction failed");
                errors.push(format!("{}: {e}", candidate.label()));
            }
        }
    }
    prepared
}

/// Status for a surviving pair. Capabilities the pipeline disclaims
/// downgrade to `suggested`.
fn decide(pipeline: &dyn TopicPipeline, options: &EngineRunOptions, score: f64) -> LinkStatus {
    let bounds = pipeline.decision_bounds();
    if options.auto_confirm && pipeline.supports_auto_confirm() && score >= bounds.confirm_at {
        LinkStatus::Confirmed
    } else if options.auto_reject && pipeline.supports_auto_reject() && score < bounds.reject_below {
        LinkStatus::Rejected
    } else {
        LinkStatus::Suggested
    }
}

/// Reason recorded on a written link: the algorithm version, prefixed with
/// the automatic decision when there was one.
fn provenance(status: LinkStatus, algo_version: &str) -> String {
    match status {
        LinkStatus::Suggested => algo_version.to_string(),
        LinkStatus::Confirmed => format!("auto-confirm:{algo_version}"),
        LinkStatus::Rejected => format!("auto-reject:{algo_version}"),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
