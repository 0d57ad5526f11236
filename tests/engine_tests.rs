//! Matching engine behavior over in-memory stores.

use std::sync::Arc;

use marketlink::application::matching::batch::BatchRunner;
use marketlink::application::matching::engine::MatchingEngine;
use marketlink::application::pipeline::registry::PipelineRegistry;
use marketlink::domain::link::{LinkKey, LinkStatus, MarketLink};
use marketlink::domain::score::DecisionBounds;
use marketlink::domain::topic::CanonicalTopic;
use marketlink::infrastructure::bootstrap;
use marketlink::testkit::domain::{candidate, dry_run_options, options};
use marketlink::testkit::pipeline::ScriptedPipeline;
use marketlink::testkit::store::{InMemoryLinkStore, InMemoryMarketSource};

type Engine = MatchingEngine<InMemoryMarketSource, InMemoryLinkStore>;

fn scripted_engine(pipeline: ScriptedPipeline, source: InMemoryMarketSource) -> Engine {
    let registry = PipelineRegistry::builder().pipeline(Arc::new(pipeline)).build();
    MatchingEngine::new(Arc::new(registry), source, InMemoryLinkStore::new())
}

fn full_engine(source: InMemoryMarketSource) -> Engine {
    MatchingEngine::new(
        Arc::new(bootstrap::default_registry()),
        source,
        InMemoryLinkStore::new(),
    )
}

fn linked_keys(engine: &Engine) -> Vec<(String, String)> {
    engine
        .links()
        .all()
        .into_iter()
        .map(|link| {
            (
                link.key.left_market_id.to_string(),
                link.key.right_market_id.to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn fed_march_hike_links_across_venues() {
    let engine = full_engine(InMemoryMarketSource::with_markets([
        candidate("left", "KXFED-25MAR", "Fed raises rates by 25bps in March"),
        candidate("right", "0xfomc", "FOMC March hike ≥0.25%"),
    ]));
    let mut opts = options("RATES");
    opts.min_score = 0.6;

    let result = engine.run(&opts).await.unwrap();

    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(result.topic, "RATES");
    assert_eq!(result.pairs_linked, 1);
    assert_eq!(result.suggestions_created, 1);
    let links = engine.links().all();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].status, LinkStatus::Suggested);
    assert!(links[0].score > 0.8, "score {}", links[0].score);
    assert_eq!(links[0].reason, links[0].algo_version);
    assert_eq!(links[0].topic.as_deref(), Some("RATES"));
}

#[tokio::test]
async fn batch_links_keep_the_topic_that_created_them() {
    let engine = full_engine(InMemoryMarketSource::with_markets([
        candidate("left", "KXFED-25MAR", "Will the Fed hike rates by 25bps in March 2025?"),
        candidate("right", "0xfed", "Will the Fed hike rates by 25 bps in March 2025?"),
        candidate("left", "KXCPI-25MAR", "US CPI inflation above 3% in March 2025?"),
        candidate("right", "0xcpi", "Will US CPI inflation be above 3% in March 2025?"),
    ]));

    let batch = BatchRunner::new(&engine).run_all(&options("ignored")).await;

    let links = engine.links().all();
    assert_eq!(links.len(), 2, "{links:?}");
    for link in &links {
        let expected = match link.key.left_market_id.as_str() {
            "KXFED-25MAR" => ("RATES", "rates-v1"),
            "KXCPI-25MAR" => ("MACRO", "macro-keyword-v1"),
            other => panic!("unexpected link for {other}"),
        };
        assert_eq!(
            (link.topic.as_deref(), link.algo_version.as_deref()),
            (Some(expected.0), Some(expected.1))
        );
    }

    let sports = batch.results.iter().find(|r| r.topic == "SPORTS").unwrap();
    assert_eq!((sports.left_count, sports.right_count), (0, 0));
    let universal = batch.results.last().unwrap();
    assert_eq!(universal.topic, "UNIVERSAL");
    assert_eq!(universal.links_written(), 0);
    assert!(universal.owned_elsewhere >= 1);
}

#[tokio::test]
async fn later_topics_leave_owned_links_alone() {
    let registry = PipelineRegistry::builder()
        .pipeline(Arc::new(
            ScriptedPipeline::new(CanonicalTopic::Finance).score_titles("a", "x", 0.9),
        ))
        .pipeline(Arc::new(
            ScriptedPipeline::new(CanonicalTopic::Macro).score_titles("a", "x", 0.7),
        ))
        .build();
    let engine = MatchingEngine::new(
        Arc::new(registry),
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "a"),
            candidate("right", "X", "x"),
        ]),
        InMemoryLinkStore::new(),
    );

    engine.run(&options("FINANCE")).await.unwrap();
    let macro_run = engine.run(&options("MACRO")).await.unwrap();
    let macro_dry_run = engine.run(&dry_run_options("MACRO")).await.unwrap();

    assert_eq!(macro_run.pairs_linked, 1);
    assert_eq!(macro_run.owned_elsewhere, 1);
    assert_eq!(macro_run.links_written(), 0);
    assert_eq!(macro_dry_run.owned_elsewhere, 1);
    let link = engine.links().all().remove(0);
    assert_eq!(link.topic.as_deref(), Some("FINANCE"));
    assert_eq!(link.score, 0.9);
}

#[tokio::test]
async fn repeated_runs_keep_one_row_per_pair() {
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance).score_titles("S&P up", "SPX higher", 0.8),
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "S&P up"),
            candidate("right", "X", "SPX higher"),
        ]),
    );
    let opts = options("finance");

    let first = engine.run(&opts).await.unwrap();
    let second = engine.run(&opts).await.unwrap();

    assert_eq!(first.suggestions_created, 1);
    assert_eq!(second.suggestions_created, 1);
    assert_eq!(engine.links().len(), 1);
    assert_eq!(engine.links().all()[0].score, 0.8);
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn links_need_a_mutual_top_pick() {
    // A prefers X, but X prefers B.
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance)
            .score_titles("a", "x", 0.9)
            .score_titles("b", "x", 0.95)
            .score_titles("a", "y", 0.7)
            .score_titles("b", "y", 0.65),
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "a"),
            candidate("left", "B", "b"),
            candidate("right", "X", "x"),
            candidate("right", "Y", "y"),
        ]),
    );

    let result = engine.run(&options("FINANCE")).await.unwrap();

    assert_eq!(result.pairs_considered, 4);
    assert_eq!(result.pairs_retained, 4);
    assert_eq!(result.pairs_linked, 1);
    assert_eq!(linked_keys(&engine), vec![("B".to_string(), "X".to_string())]);
}

#[tokio::test]
async fn min_score_is_inclusive() {
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance)
            .score_titles("at", "bound", 0.7)
            .score_titles("just", "below", 0.7 - 1e-9),
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "at"),
            candidate("left", "B", "just"),
            candidate("right", "X", "bound"),
            candidate("right", "Y", "below"),
        ]),
    );
    let mut opts = options("FINANCE");
    opts.min_score = 0.7;

    let result = engine.run(&opts).await.unwrap();

    assert_eq!(result.pairs_retained, 1);
    assert_eq!(linked_keys(&engine), vec![("A".to_string(), "X".to_string())]);
}

#[tokio::test]
async fn distribution_counts_every_retained_pair() {
    let source = || {
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "a"),
            candidate("left", "B", "b"),
            candidate("right", "X", "x"),
            candidate("right", "Y", "y"),
        ])
    };
    let pipeline = || {
        ScriptedPipeline::new(CanonicalTopic::Finance)
            .score_titles("a", "x", 0.93)
            .score_titles("a", "y", 0.84)
            .score_titles("b", "x", 0.61)
            .score_titles("b", "y", 0.2)
    };

    for opts in [options("FINANCE"), dry_run_options("FINANCE")] {
        let engine = scripted_engine(pipeline(), source());
        let mut opts = opts;
        opts.min_score = 0.5;

        let result = engine.run(&opts).await.unwrap();

        assert_eq!(result.pairs_retained, 3);
        assert_eq!(result.score_distribution.total(), result.pairs_retained);
        assert_eq!(result.score_distribution.above_90, 1);
        assert_eq!(result.score_distribution.from_80, 1);
        assert_eq!(result.score_distribution.from_60, 1);
    }
}

#[tokio::test]
async fn dry_run_reports_without_writing() {
    let markets = || {
        InMemoryMarketSource::with_markets([
            candidate("left", "KXFED-25MAR", "Fed raises rates by 25bps in March"),
            candidate("left", "KXECB-25JUN", "ECB cuts rates by 25bps in June"),
            candidate("right", "0xfomc", "FOMC March hike ≥0.25%"),
            candidate("right", "0xecb", "ECB June cut of 25 basis points?"),
        ])
    };

    let dry_engine = full_engine(markets());
    let dry = dry_engine.run(&dry_run_options("RATES")).await.unwrap();
    let wet_engine = full_engine(markets());
    let wet = wet_engine.run(&options("RATES")).await.unwrap();

    assert!(dry_engine.links().is_empty());
    assert!(!wet_engine.links().is_empty());
    assert_eq!(dry.pairs_considered, wet.pairs_considered);
    assert_eq!(dry.pairs_retained, wet.pairs_retained);
    assert_eq!(dry.pairs_linked, wet.pairs_linked);
    assert_eq!(dry.suggestions_created, wet.suggestions_created);
    assert_eq!(dry.score_distribution, wet.score_distribution);
    assert!(dry.mode.is_dry_run());
}

#[tokio::test]
async fn auto_decisions_are_tagged_with_their_source() {
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance)
            .with_auto_decisions(DecisionBounds {
                confirm_at: 0.9,
                reject_below: 0.6,
            })
            .score_titles("sure", "same", 0.97)
            .score_titles("meh", "other", 0.55)
            .score_titles("mid", "maybe", 0.75),
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "sure"),
            candidate("left", "B", "meh"),
            candidate("left", "C", "mid"),
            candidate("right", "X", "same"),
            candidate("right", "Y", "other"),
            candidate("right", "Z", "maybe"),
        ]),
    );
    let mut opts = options("FINANCE");
    opts.min_score = 0.5;
    opts.auto_confirm = true;
    opts.auto_reject = true;

    let result = engine.run(&opts).await.unwrap();

    assert_eq!(result.auto_confirmed, 1);
    assert_eq!(result.auto_rejected, 1);
    assert_eq!(result.suggestions_created, 1);
    let reasons: Vec<(LinkStatus, Option<String>)> = engine
        .links()
        .all()
        .into_iter()
        .map(|link| (link.status, link.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (LinkStatus::Confirmed, Some("auto-confirm:scripted-v1".to_string())),
            (LinkStatus::Rejected, Some("auto-reject:scripted-v1".to_string())),
            (LinkStatus::Suggested, Some("scripted-v1".to_string())),
        ]
    );
}

#[tokio::test]
async fn reviewed_links_survive_later_runs() {
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance).score_titles("a", "x", 0.82),
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "a"),
            candidate("right", "X", "x"),
        ]),
    );
    let now = chrono::Utc::now();
    engine.links().seed(MarketLink {
        key: LinkKey::new("left", "A", "right", "X"),
        status: LinkStatus::Rejected,
        score: 0.5,
        reason: Some("manual-review".to_string()),
        algo_version: None,
        topic: None,
        created_at: now,
        updated_at: now,
    });

    engine.run(&options("FINANCE")).await.unwrap();

    let link = engine.links().all().remove(0);
    assert_eq!(link.status, LinkStatus::Rejected);
    assert_eq!(link.reason.as_deref(), Some("manual-review"));
    assert_eq!(link.score, 0.82);
    assert_eq!(link.algo_version.as_deref(), Some("scripted-v1"));
}

#[tokio::test]
async fn extraction_failures_skip_only_that_candidate() {
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance).score_titles("a", "x", 0.9),
        InMemoryMarketSource::with_markets([
            candidate("left", "BLANK", "   "),
            candidate("left", "A", "a"),
            candidate("right", "X", "x"),
        ]),
    );

    let result = engine.run(&options("FINANCE")).await.unwrap();

    assert_eq!(result.left_count, 2);
    assert_eq!(
        result.errors,
        vec!["left:BLANK: signal extraction failed: empty title".to_string()]
    );
    assert_eq!(result.pairs_linked, 1);
}

#[tokio::test]
async fn failed_upserts_are_reported_and_not_counted() {
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance)
            .score_titles("a", "x", 0.9)
            .score_titles("b", "y", 0.9),
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "a"),
            candidate("left", "B", "b"),
            candidate("right", "X", "x"),
            candidate("right", "Y", "y"),
        ]),
    );
    engine.links().fail_upserts_for("A");

    let result = engine.run(&options("FINANCE")).await.unwrap();

    assert_eq!(result.pairs_linked, 2);
    assert_eq!(result.suggestions_created, 1);
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("upsert left:A <-> right:X: "));
    assert_eq!(engine.links().len(), 1);
}

#[tokio::test]
async fn duplicate_candidates_are_paired_once() {
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance).score_titles("a", "x", 0.9),
        InMemoryMarketSource::with_markets([
            candidate("left", "A", "a"),
            candidate("left", "A", "a"),
            candidate("right", "X", "x"),
        ]),
    );

    let result = engine.run(&options("FINANCE")).await.unwrap();

    assert_eq!(result.left_count, 2);
    assert_eq!(result.pairs_considered, 1);
    assert_eq!(engine.links().len(), 1);
}

#[tokio::test]
async fn composite_markets_are_filtered_unless_disabled() {
    let markets = || {
        InMemoryMarketSource::with_markets([
            candidate("left", "KXNBA-LALBOS", "Lakers vs Celtics")
                .with_metadata("event_ticker", "KXNBAGAME-LALBOS"),
            candidate("left", "KXMVE-1", "Lakers vs Celtics")
                .with_metadata("event_ticker", "KXMVESGP-1"),
            candidate("right", "0xlakers", "Lakers vs Celtics"),
        ])
    };

    let filtered = full_engine(markets())
        .run(&dry_run_options("SPORTS"))
        .await
        .unwrap();
    assert_eq!(filtered.ineligible_left, 1);
    assert_eq!(filtered.pairs_considered, 1);

    let mut opts = dry_run_options("SPORTS");
    opts.use_eligibility_filter = false;
    let unfiltered = full_engine(markets()).run(&opts).await.unwrap();
    assert_eq!(unfiltered.ineligible_left, 0);
    assert_eq!(unfiltered.pairs_considered, 2);
}

#[tokio::test]
async fn unknown_topic_aborts_without_side_effects() {
    let engine = full_engine(InMemoryMarketSource::with_markets([
        candidate("left", "A", "Fed hike"),
        candidate("right", "X", "Fed hike"),
    ]));

    let result = engine.run(&options("astrology")).await.unwrap();

    assert_eq!(result.errors, vec!["unknown topic 'astrology'".to_string()]);
    assert_eq!(result.left_count, 0);
    assert!(result.algo_version.is_none());
    assert!(engine.links().is_empty());
}

#[tokio::test]
async fn unregistered_topic_is_a_configuration_error() {
    let engine = scripted_engine(
        ScriptedPipeline::new(CanonicalTopic::Finance),
        InMemoryMarketSource::new(),
    );

    let result = engine.run(&options("RATES")).await.unwrap();

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].contains("RATES"), "{:?}", result.errors);
}

#[tokio::test]
async fn invalid_options_abort_without_side_effects() {
    let engine = full_engine(InMemoryMarketSource::new());
    let mut opts = options("RATES");
    opts.to_venue = opts.from_venue.clone();

    let result = engine.run(&opts).await.unwrap();

    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("invalid run options"));
    assert!(engine.links().is_empty());
}

#[tokio::test]
async fn market_source_failure_is_an_error() {
    let source = InMemoryMarketSource::new();
    source.fail_with("venue unavailable");
    let engine = full_engine(source);

    let err = engine.run(&options("RATES")).await.unwrap_err();

    assert!(err.to_string().contains("venue unavailable"));
}
