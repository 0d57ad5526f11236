//! Application services (use cases).
//!
//! Topic pipelines, the composite-market classifier, the matching engine
//! and link administration. Everything here depends on ports, never on
//! adapters.

pub mod admin;
pub mod eligibility;
pub mod matching;
pub mod pipeline;
