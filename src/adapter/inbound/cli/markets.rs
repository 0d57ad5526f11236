//! Handler for the `markets` command group.

use serde_json::json;

use crate::adapter::inbound::cli::command::{ImportArgs, MarketsCommand};
use crate::adapter::inbound::cli::{operator, output};
use crate::error::Result;
use crate::port::inbound::operator::context::OperatorContext;

/// Execute a `markets` subcommand.
pub fn execute(context: &OperatorContext, command: &MarketsCommand) -> Result<()> {
    match command {
        MarketsCommand::Import(args) => execute_import(context, args),
    }
}

fn execute_import(context: &OperatorContext, args: &ImportArgs) -> Result<()> {
    let payload = operator::read_import_file(&args.file)?;
    let written = operator::operator().import_markets(context, &args.venue, &payload)?;

    if output::is_json() {
        output::json_result(
            "markets.import",
            json!({ "venue": args.venue, "markets": written }),
        );
        return Ok(());
    }

    output::success(&format!(
        "Imported {written} markets for {}",
        output::highlight(&args.venue)
    ));
    Ok(())
}
