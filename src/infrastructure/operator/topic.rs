//! Topic listing operator implementation.

use crate::application::pipeline::registry::is_implemented;
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::inbound::operator::context::OperatorContext;
use crate::port::inbound::operator::topic::{TopicOperator, TopicRecord};

use super::{entry::Operator, shared};

impl TopicOperator for Operator {
    fn list_topics(&self, context: &OperatorContext) -> Result<Vec<TopicRecord>> {
        let config = shared::load_config(context)?;
        let registry = bootstrap::build_registry(&config.eligibility);

        Ok(registry
            .list_topics()
            .into_iter()
            .filter_map(|topic| registry.get(topic))
            .map(|pipeline| TopicRecord {
                topic: pipeline.topic().as_str().to_string(),
                algo_version: pipeline.algo_version().to_string(),
                implemented: is_implemented(pipeline.topic()),
                auto_confirm: pipeline.supports_auto_confirm(),
                auto_reject: pipeline.supports_auto_reject(),
            })
            .collect())
    }
}
