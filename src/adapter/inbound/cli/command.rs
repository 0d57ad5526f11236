//! Command-line interface definitions.
//!
//! Defines the CLI structure for the marketlink application using `clap`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::link::LinkStatus;
use crate::port::inbound::operator::matching::RunOverrides;

/// Cross-venue prediction market linking CLI
#[derive(Parser, Debug)]
#[command(name = "marketlink")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// Configuration file (defaults to ~/.marketlink/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database path, overriding MARKETLINK_DATABASE and the config file
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands for the marketlink CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Link markets of one topic between two venues
    Match(MatchArgs),

    /// Link markets of every registered topic between two venues
    MatchAll(MatchAllArgs),

    /// List registered topics
    Topics,

    /// Inspect and maintain stored links
    #[command(subcommand)]
    Links(LinksCommand),

    /// Manage market candidates
    #[command(subcommand)]
    Markets(MarketsCommand),
}

/// The two venues being linked.
#[derive(Args, Debug, Clone)]
pub struct VenuePairArgs {
    /// Left venue
    #[arg(long = "from")]
    pub from_venue: String,

    /// Right venue
    #[arg(long = "to")]
    pub to_venue: String,
}

/// Window, caps and threshold for a run. Unset values fall back to `[matching]`.
#[derive(Args, Debug, Clone, Default)]
pub struct LimitArgs {
    /// Ignore markets that closed more than this many hours ago
    #[arg(long)]
    pub lookback_hours: Option<u32>,

    /// Left candidates to fetch
    #[arg(long)]
    pub max_left: Option<usize>,

    /// Right candidates to fetch
    #[arg(long)]
    pub max_right: Option<usize>,

    /// Right matches kept per left market
    #[arg(long)]
    pub max_per_left: Option<usize>,

    /// Left matches kept per right market
    #[arg(long)]
    pub max_per_right: Option<usize>,

    /// Minimum score a pair needs to be kept (0.0 - 1.0)
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Score and count without writing links
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `match` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MatchArgs {
    #[command(flatten)]
    pub venues: VenuePairArgs,

    /// Topic to run (e.g. rates, crypto_daily)
    #[arg(long)]
    pub topic: String,

    #[command(flatten)]
    pub limits: LimitArgs,

    /// Confirm pairs the pipeline is certain about
    #[arg(long)]
    pub auto_confirm: bool,

    /// Reject pairs the pipeline rules out
    #[arg(long)]
    pub auto_reject: bool,

    /// Log every pair involving this market id
    #[arg(long = "debug-market")]
    pub debug_market: Option<String>,

    /// Skip the composite-market filter
    #[arg(long)]
    pub no_eligibility_filter: bool,
}

impl MatchArgs {
    /// Per-run overrides carried to the operator.
    #[must_use]
    pub fn overrides(&self) -> RunOverrides {
        RunOverrides {
            auto_confirm: self.auto_confirm,
            auto_reject: self.auto_reject,
            debug_market_id: self.debug_market.clone(),
            no_eligibility_filter: self.no_eligibility_filter,
            ..self.limits.overrides()
        }
    }
}

/// Arguments for the `match-all` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MatchAllArgs {
    #[command(flatten)]
    pub venues: VenuePairArgs,

    #[command(flatten)]
    pub limits: LimitArgs,
}

impl LimitArgs {
    /// Overrides holding only the window, caps, threshold and mode.
    #[must_use]
    pub fn overrides(&self) -> RunOverrides {
        RunOverrides {
            lookback_hours: self.lookback_hours,
            max_left: self.max_left,
            max_right: self.max_right,
            max_per_left: self.max_per_left,
            max_per_right: self.max_per_right,
            min_score: self.min_score,
            dry_run: self.dry_run,
            ..RunOverrides::default()
        }
    }
}

/// Subcommands for `links`.
#[derive(Subcommand, Debug)]
pub enum LinksCommand {
    /// Counts by status, topic and algorithm version
    Stats,

    /// Return decided links with the given reason tag to suggested
    Rollback(RollbackArgs),

    /// Fill missing algorithm version and topic
    Backfill(BackfillArgs),

    /// Record a manual decision on one link
    Review(ReviewArgs),
}

/// Arguments for `links rollback`.
#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// Reason tag, e.g. auto-confirm:rates-v1
    #[arg(long)]
    pub tag: String,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `links backfill`.
#[derive(Args, Debug)]
pub struct BackfillArgs {
    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `links review`.
#[derive(Args, Debug)]
pub struct ReviewArgs {
    #[arg(long)]
    pub left_venue: String,

    #[arg(long)]
    pub left_id: String,

    #[arg(long)]
    pub right_venue: String,

    #[arg(long)]
    pub right_id: String,

    /// New status
    #[arg(long, value_enum)]
    pub status: ReviewStatus,
}

/// Status values accepted by `links review`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReviewStatus {
    Suggested,
    Confirmed,
    Rejected,
}

impl From<ReviewStatus> for LinkStatus {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Suggested => Self::Suggested,
            ReviewStatus::Confirmed => Self::Confirmed,
            ReviewStatus::Rejected => Self::Rejected,
        }
    }
}

/// Subcommands for `markets`.
#[derive(Subcommand, Debug)]
pub enum MarketsCommand {
    /// Load a JSON array of market candidates for one venue
    Import(ImportArgs),
}

/// Arguments for `markets import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Venue the markets belong to
    #[arg(long)]
    pub venue: String,

    /// JSON file holding an array of candidates
    pub file: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_flags_become_overrides() {
        let cli = Cli::try_parse_from([
            "marketlink",
            "match",
            "--from",
            "kalshi",
            "--to",
            "polymarket",
            "--topic",
            "rates",
            "--max-per-left",
            "2",
            "--min-score",
            "0.8",
            "--dry-run",
            "--auto-confirm",
            "--debug-market",
            "KXFED-25MAR",
        ])
        .unwrap();

        let Commands::Match(args) = cli.command else {
            panic!("expected match command");
        };
        let overrides = args.overrides();
        assert_eq!(args.venues.from_venue, "kalshi");
        assert_eq!(overrides.max_per_left, Some(2));
        assert_eq!(overrides.min_score, Some(0.8));
        assert_eq!(overrides.max_left, None);
        assert!(overrides.dry_run);
        assert!(overrides.auto_confirm);
        assert!(!overrides.auto_reject);
        assert_eq!(overrides.debug_market_id.as_deref(), Some("KXFED-25MAR"));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "marketlink",
            "links",
            "stats",
            "--db",
            "/tmp/links.db",
            "--json",
            "-vv",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/links.db")));
        assert!(matches!(cli.command, Commands::Links(LinksCommand::Stats)));
    }

    #[test]
    fn review_rejects_unknown_status() {
        let result = Cli::try_parse_from([
            "marketlink",
            "links",
            "review",
            "--left-venue",
            "kalshi",
            "--left-id",
            "A",
            "--right-venue",
            "polymarket",
            "--right-id",
            "B",
            "--status",
            "maybe",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn match_requires_topic() {
        let result = Cli::try_parse_from(["marketlink", "match", "--from", "a", "--to", "b"]);
        assert!(result.is_err());
    }
}
