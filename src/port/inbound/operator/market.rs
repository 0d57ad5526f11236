//! Market candidate import for operator-facing adapters.

use crate::error::Result;

use super::context::OperatorContext;

/// Candidate ingestion use-cases.
pub trait MarketOperator: Send + Sync {
    /// Store the JSON array `payload` as candidates of `venue`, replacing
    /// rows with the same market id. Returns the number of markets written.
    fn import_markets(&self, context: &OperatorContext, venue: &str, payload: &str)
        -> Result<usize>;
}
