//! Candidate eligibility classifiers.
//!
//! - [`mve`]: composite/parlay ("multivariate event") detection

pub mod mve;
