//! Market import operator implementation.

use crate::adapter::outbound::sqlite::market::SqliteMarketSource;
use crate::domain::{id::Venue, market::MarketCandidate};
use crate::error::{Error, Result};
use crate::infrastructure::bootstrap;
use crate::port::inbound::operator::context::OperatorContext;
use crate::port::inbound::operator::market::MarketOperator;

use super::{entry::Operator, shared};

impl MarketOperator for Operator {
    fn import_markets(
        &self,
        context: &OperatorContext,
        venue: &str,
        payload: &str,
    ) -> Result<usize> {
        let venue = Venue::new(venue);
        if venue.as_str().is_empty() {
            return Err(Error::InvalidOptions("venue must not be empty".to_string()));
        }
        let candidates: Vec<MarketCandidate> = serde_json::from_str(payload)?;
        let config = shared::load_config(context)?;
        let source = SqliteMarketSource::new(bootstrap::open_database(&config)?);
        source.import(&venue, &candidates)
    }
}
