//! Marketlink - cross-venue prediction market linking.
//!
//! Proposes, scores and persists links between equivalent markets listed on
//! two venues (for example a Kalshi market and a Polymarket market asking the
//! same question). Each canonical topic has its own pipeline that extracts
//! structured signals from candidates, restricts the pairs worth scoring,
//! scores them and optionally decides them automatically.
//!
//! # Layout
//!
//! - [`domain`]: candidates, signals, links, run options and results
//! - [`port`]: topic pipeline capability, market source and link store
//! - [`application`]: pipelines, the eligibility classifier, the matching
//!   engine and link administration
//! - [`adapter`]: SQLite stores and the `marketlink` CLI
//! - [`infrastructure`]: configuration, bootstrap and the CLI operator
//!
//! # Example
//!
//! ```no_run
//! use marketlink::domain::run::EngineRunOptions;
//! use marketlink::infrastructure::bootstrap;
//! use marketlink::infrastructure::config::settings::Config;
//!
//! # async fn run() -> marketlink::error::Result<()> {
//! let config = Config::load("marketlink.toml")?;
//! let engine = bootstrap::build_engine(&config)?;
//! let result = engine
//!     .run(&EngineRunOptions::new("kalshi", "polymarket", "rates"))
//!     .await?;
//! println!("{} links written", result.links_written());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
