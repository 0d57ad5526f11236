//! Exchange-agnostic domain types.
//!
//! Pure data: no I/O, no pipeline logic. Everything here is shared by the
//! ports, the application layer and the adapters.

pub mod eligibility;
pub mod id;
pub mod link;
pub mod market;
pub mod run;
pub mod score;
pub mod signal;
pub mod topic;
