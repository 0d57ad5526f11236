//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the link store and market
//! source ports using Diesel ORM.

pub mod database;
pub mod link;
pub mod market;
