//! Handlers for `match` and `match-all`.

use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{MatchAllArgs, MatchArgs};
use crate::adapter::inbound::cli::{operator, output};
use crate::domain::run::{BatchRunResult, EngineRunResult};
use crate::domain::score::ScoreDistribution;
use crate::error::Result;
use crate::port::inbound::operator::context::OperatorContext;
use crate::port::inbound::operator::matching::MatchRequest;

#[derive(Tabled)]
struct TopicRow {
    #[tabled(rename = "Topic")]
    topic: String,
    #[tabled(rename = "Left")]
    left: usize,
    #[tabled(rename = "Right")]
    right: usize,
    #[tabled(rename = "Retained")]
    retained: usize,
    #[tabled(rename = "Linked")]
    linked: usize,
    #[tabled(rename = "Confirmed")]
    confirmed: usize,
    #[tabled(rename = "Rejected")]
    rejected: usize,
    #[tabled(rename = "Errors")]
    errors: usize,
}

impl From<&EngineRunResult> for TopicRow {
    fn from(result: &EngineRunResult) -> Self {
        Self {
            topic: result.topic.clone(),
            left: result.left_count,
            right: result.right_count,
            retained: result.pairs_retained,
            linked: result.pairs_linked,
            confirmed: result.auto_confirmed,
            rejected: result.auto_rejected,
            errors: result.errors.len(),
        }
    }
}

/// Execute `match`.
pub async fn execute_match(context: &OperatorContext, args: &MatchArgs) -> Result<()> {
    let request = MatchRequest {
        from_venue: args.venues.from_venue.clone(),
        to_venue: args.venues.to_venue.clone(),
        topic: args.topic.clone(),
        overrides: args.overrides(),
    };

    let spinner = output::spinner(&format!(
        "Matching {} between {} and {}",
        request.topic, request.from_venue, request.to_venue
    ));
    let result = match operator::operator().run_match(context, &request).await {
        Ok(result) => {
            output::spinner_success(&spinner, "Run complete");
            result
        }
        Err(e) => {
            output::spinner_fail(&spinner, "Run failed");
            return Err(e);
        }
    };

    if output::is_json() {
        output::json_result("match", &result);
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    print_run(&result);
    Ok(())
}

/// Execute `match-all`.
pub async fn execute_match_all(context: &OperatorContext, args: &MatchAllArgs) -> Result<()> {
    let request = MatchRequest {
        from_venue: args.venues.from_venue.clone(),
        to_venue: args.venues.to_venue.clone(),
        topic: String::new(),
        overrides: args.limits.overrides(),
    };

    let spinner = output::spinner(&format!(
        "Matching all topics between {} and {}",
        request.from_venue, request.to_venue
    ));
    let batch = match operator::operator().run_match_all(context, &request).await {
        Ok(batch) => {
            output::spinner_success(&spinner, "Batch complete");
            batch
        }
        Err(e) => {
            output::spinner_fail(&spinner, "Batch failed");
            return Err(e);
        }
    };

    if output::is_json() {
        output::json_result("match-all", &batch);
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    print_batch(&batch);
    Ok(())
}

fn print_run(result: &EngineRunResult) {
    output::section(&format!("Run {}", output::highlight(&result.run_id)));
    output::field("Topic", &result.topic);
    output::field(
        "Algorithm",
        result.algo_version.as_deref().unwrap_or("-"),
    );
    output::field("Mode", result.mode);
    output::field(
        "Candidates",
        format!("{} left, {} right", result.left_count, result.right_count),
    );
    output::field(
        "Ineligible",
        format!(
            "{} left, {} right",
            result.ineligible_left, result.ineligible_right
        ),
    );
    output::field("Considered", result.pairs_considered);
    output::field("Retained", result.pairs_retained);
    output::field("Linked", result.pairs_linked);
    output::field("Suggested", result.suggestions_created);
    output::field("Confirmed", result.auto_confirmed);
    output::field("Rejected", result.auto_rejected);
    if result.owned_elsewhere > 0 {
        output::field("Owned by other topics", result.owned_elsewhere);
    }
    output::field("Duration", format!("{} ms", result.duration_ms));

    print_distribution(&result.score_distribution);
    print_errors(&result.errors);

    if result.mode.is_dry_run() {
        output::note("Dry run: no links were written.");
    }
}

fn print_batch(batch: &BatchRunResult) {
    output::section("Topics");
    let rows: Vec<TopicRow> = batch.results.iter().map(TopicRow::from).collect();
    output::lines(&Table::new(rows).to_string());

    let totals = &batch.totals;
    output::section("Totals");
    output::field("Topics", totals.topics);
    output::field("With errors", totals.topics_with_errors);
    output::field("Linked", totals.pairs_linked);
    output::field("Suggested", totals.suggestions_created);
    output::field("Confirmed", totals.auto_confirmed);
    output::field("Rejected", totals.auto_rejected);
    output::field("Owned by other topics", totals.owned_elsewhere);
    output::field("Duration", format!("{} ms", totals.duration_ms));
    print_distribution(&totals.score_distribution);

    for result in batch.results.iter().filter(|r| r.has_errors()) {
        for error in &result.errors {
            output::warning(&format!("{}: {error}", result.topic));
        }
    }
}

fn print_distribution(distribution: &ScoreDistribution) {
    if distribution.total() == 0 {
        return;
    }
    output::section("Scores");
    output::field(">= 0.90", distribution.above_90);
    output::field("0.80 - 0.90", distribution.from_80);
    output::field("0.70 - 0.80", distribution.from_70);
    output::field("0.60 - 0.70", distribution.from_60);
    output::field("< 0.60", distribution.below_60);
}

fn print_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    output::section(&format!("Errors ({})", errors.len()));
    for error in errors {
        output::warning(error);
    }
}
