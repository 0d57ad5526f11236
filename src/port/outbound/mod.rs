//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the market store the engine reads candidates
//! from and the link store it writes to.

pub mod link;
pub mod market;
