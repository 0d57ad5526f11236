//! Operator implementations for inbound adapters.

pub mod entry;
pub mod link;
pub mod market;
pub mod matching;
pub mod topic;

mod shared;
