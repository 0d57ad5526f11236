//! Operator-facing capability ports consumed by inbound adapters.

pub mod context;
pub mod link;
pub mod market;
pub mod matching;
pub mod port;
pub mod topic;
