//! Unified operator capability surface for inbound adapters.

use super::link::LinkOperator;
use super::market::MarketOperator;
use super::matching::MatchingOperator;
use super::topic::TopicOperator;

/// Unified operator capability surface consumed by inbound adapters.
pub trait OperatorPort: LinkOperator + MarketOperator + MatchingOperator + TopicOperator {}

impl<T> OperatorPort for T where T: LinkOperator + MarketOperator + MatchingOperator + TopicOperator
{}
