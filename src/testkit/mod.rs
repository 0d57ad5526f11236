//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`store`]: in-memory [`MarketSource`](crate::port::outbound::market::MarketSource)
//!   and [`LinkStore`](crate::port::outbound::link::LinkStore) with failure injection.
//! - [`pipeline`]: a table-driven [`TopicPipeline`](crate::port::inbound::pipeline::TopicPipeline).
//! - [`domain`]: builders for candidates and run options.
//! - [`db`]: migrated in-memory SQLite pools.

pub mod db;
pub mod domain;
pub mod pipeline;
pub mod store;
