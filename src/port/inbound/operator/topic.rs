//! Topic listing for operator-facing adapters.

use serde::Serialize;

use crate::error::Result;

use super::context::OperatorContext;

/// One registered topic as shown by `topics`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRecord {
    pub topic: String,
    pub algo_version: String,
    /// Whether the topic has a dedicated pipeline.
    pub implemented: bool,
    pub auto_confirm: bool,
    pub auto_reject: bool,
}

/// Topic discovery use-cases.
pub trait TopicOperator: Send + Sync {
    /// Registered topics in canonical order.
    fn list_topics(&self, context: &OperatorContext) -> Result<Vec<TopicRecord>>;
}
