//! Handlers for the `links` command group.

use std::collections::BTreeMap;

use tabled::{Table, Tabled};

use crate::adapter::inbound::cli::command::{BackfillArgs, LinksCommand, ReviewArgs, RollbackArgs};
use crate::adapter::inbound::cli::{operator, output};
use crate::domain::link::{BulkOutcome, LinkKey, LinkStatus};
use crate::error::Result;
use crate::port::inbound::operator::context::OperatorContext;

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Links")]
    links: usize,
}

/// Execute a `links` subcommand.
pub async fn execute(context: &OperatorContext, command: &LinksCommand) -> Result<()> {
    match command {
        LinksCommand::Stats => execute_stats(context).await,
        LinksCommand::Rollback(args) => execute_rollback(context, args).await,
        LinksCommand::Backfill(args) => execute_backfill(context, args).await,
        LinksCommand::Review(args) => execute_review(context, args).await,
    }
}

async fn execute_stats(context: &OperatorContext) -> Result<()> {
    let stats = operator::operator().link_stats(context).await?;

    if output::is_json() {
        output::json_result("links.stats", &stats);
        return Ok(());
    }
    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Total", stats.total);
    print_counts("By status", &stats.by_status);
    print_counts("By topic", &stats.by_topic);
    print_counts("By algorithm", &stats.by_algo_version);
    Ok(())
}

fn print_counts(title: &str, counts: &BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    output::section(title);
    let rows: Vec<CountRow> = counts
        .iter()
        .map(|(value, links)| CountRow {
            value: value.clone(),
            links: *links,
        })
        .collect();
    output::lines(&Table::new(rows).to_string());
}

async fn execute_rollback(context: &OperatorContext, args: &RollbackArgs) -> Result<()> {
    let outcome = operator::operator()
        .rollback(context, &args.tag, args.dry_run)
        .await?;

    if output::is_json() {
        output::json_result("links.rollback", &outcome);
        return Ok(());
    }

    report_bulk(&format!("rolled back ({})", args.tag), &outcome);
    Ok(())
}

async fn execute_backfill(context: &OperatorContext, args: &BackfillArgs) -> Result<()> {
    let outcome = operator::operator().backfill(context, args.dry_run).await?;

    if output::is_json() {
        output::json_result("links.backfill", &outcome);
        return Ok(());
    }

    report_bulk("given an algorithm version", &outcome.algo_version);
    report_bulk("given a topic", &outcome.topic);
    Ok(())
}

fn report_bulk(action: &str, outcome: &BulkOutcome) {
    if outcome.dry_run {
        output::note(&format!(
            "{} links would be {action} (dry run)",
            outcome.matched
        ));
    } else {
        output::success(&format!("{} links {action}", outcome.updated));
    }
}

async fn execute_review(context: &OperatorContext, args: &ReviewArgs) -> Result<()> {
    let key = LinkKey::new(
        args.left_venue.as_str(),
        args.left_id.as_str(),
        args.right_venue.as_str(),
        args.right_id.as_str(),
    );
    let status = LinkStatus::from(args.status);
    let link = operator::operator().review(context, &key, status).await?;

    if output::is_json() {
        output::json_result("links.review", &link);
        return Ok(());
    }

    output::success(&format!("{} marked {}", link.key, output::highlight(link.status)));
    Ok(())
}
