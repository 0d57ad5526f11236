//! Command dispatch from parsed CLI arguments to handlers.

use crate::adapter::inbound::cli::command::{Cli, ColorChoice, Commands};
use crate::adapter::inbound::cli::{links, markets, matching, operator, output, paths, topics};
use crate::error::Result;
use crate::port::inbound::operator::context::OperatorContext;

/// Apply global flags and run the selected subcommand.
pub async fn execute(cli: &Cli) -> Result<()> {
    apply_color(&cli.color);
    output::configure(output::OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let context = context(cli)?;
    match &cli.command {
        Commands::Match(args) => matching::execute_match(&context, args).await,
        Commands::MatchAll(args) => matching::execute_match_all(&context, args).await,
        Commands::Topics => topics::execute(&context),
        Commands::Links(command) => links::execute(&context, command).await,
        Commands::Markets(command) => markets::execute(&context, command),
    }
}

fn apply_color(choice: &ColorChoice) {
    match choice {
        ColorChoice::Auto => {}
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
    }
}

/// Build the operator context from global flags.
///
/// An explicit `--config` must exist; the default config file is read only
/// when present.
pub fn context(cli: &Cli) -> Result<OperatorContext> {
    let config_toml = match &cli.config {
        Some(path) => Some(operator::read_config_toml(path)?),
        None => {
            let path = paths::default_config();
            if path.is_file() {
                Some(operator::read_config_toml(&path)?)
            } else {
                None
            }
        }
    };

    Ok(OperatorContext {
        config_toml,
        database: cli.db.as_ref().map(|path| path.display().to_string()),
        log_level: log_level(cli.verbose).map(str::to_string),
    })
}

const fn log_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
