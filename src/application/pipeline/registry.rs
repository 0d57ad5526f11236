//! Topic to pipeline dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::eligibility::mve::{MveClassifier, MveConfig};
use crate::domain::topic::CanonicalTopic;
use crate::error::{Error, Result};
use crate::port::inbound::pipeline::TopicPipeline;

use super::climate::ClimatePipeline;
use super::crypto::CryptoPipeline;
use super::elections::ElectionsPipeline;
use super::keyword::KeywordPipeline;
use super::rates::RatesPipeline;
use super::sports::SportsPipeline;

/// Topics served by a dedicated pipeline.
///
/// Used by the CLI to flag topics whose matching is generic. Dispatch never
/// consults this list.
pub const IMPLEMENTED_TOPICS: &[CanonicalTopic] = &[
    CanonicalTopic::CryptoDaily,
    CanonicalTopic::CryptoIntraday,
    CanonicalTopic::Rates,
    CanonicalTopic::Elections,
    CanonicalTopic::Climate,
    CanonicalTopic::Sports,
];

/// Whether `topic` has a dedicated pipeline.
#[must_use]
pub fn is_implemented(topic: CanonicalTopic) -> bool {
    IMPLEMENTED_TOPICS.contains(&topic)
}

/// Mapping from topic to the single pipeline serving it.
///
/// Use [`PipelineRegistryBuilder`] to assemble the shipped pipelines.
#[derive(Default, Clone)]
pub struct PipelineRegistry {
    pipelines: BTreeMap<CanonicalTopic, Arc<dyn TopicPipeline>>,
}

impl PipelineRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing a registry from config.
    #[must_use]
    pub fn builder() -> PipelineRegistryBuilder {
        PipelineRegistryBuilder::new()
    }

    /// Register a pipeline under its declared topic.
    ///
    /// Re-registering a topic replaces the previous pipeline, which is
    /// returned.
    pub fn register(&mut self, pipeline: Arc<dyn TopicPipeline>) -> Option<Arc<dyn TopicPipeline>> {
        let topic = pipeline.topic();
        let algo_version = pipeline.algo_version().to_string();
        let previous = self.pipelines.insert(topic, pipeline);
        match &previous {
            Some(old) => warn!(
                topic = %topic,
                replaced = old.algo_version(),
                algo_version = %algo_version,
                "Pipeline replaced"
            ),
            None => debug!(topic = %topic, algo_version = %algo_version, "Pipeline registered"),
        }
        previous
    }

    /// Pipeline for `topic`, if registered.
    #[must_use]
    pub fn get(&self, topic: CanonicalTopic) -> Option<Arc<dyn TopicPipeline>> {
        self.pipelines.get(&topic).cloned()
    }

    /// Pipeline for `topic`.
    ///
    /// # Errors
    /// Returns [`Error::PipelineNotRegistered`] when nothing serves `topic`.
    pub fn require(&self, topic: CanonicalTopic) -> Result<Arc<dyn TopicPipeline>> {
        self.get(topic)
            .ok_or_else(|| Error::PipelineNotRegistered(topic.to_string()))
    }

    #[must_use]
    pub fn contains(&self, topic: CanonicalTopic) -> bool {
        self.pipelines.contains_key(&topic)
    }

    /// Every registered topic, in declaration order.
    #[must_use]
    pub fn list_topics(&self) -> Vec<CanonicalTopic> {
        self.pipelines.keys().copied().collect()
    }

    /// Parse a free-form topic name, including legacy aliases.
    #[must_use]
    pub fn parse_topic_string(&self, input: &str) -> Option<CanonicalTopic> {
        CanonicalTopic::parse(input)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

impl std::fmt::Debug for PipelineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.pipelines
                    .iter()
                    .map(|(topic, pipeline)| (topic.as_str(), pipeline.algo_version())),
            )
            .finish()
    }
}

/// Builder for constructing a [`PipelineRegistry`].
///
/// # Example
///
/// ```ignore
/// let registry = PipelineRegistry::builder()
///     .eligibility(config.eligibility.clone())
///     .dedicated()
///     .keyword_fallbacks()
///     .build();
/// ```
#[derive(Default)]
pub struct PipelineRegistryBuilder {
    eligibility: MveConfig,
    dedicated: bool,
    keyword_fallbacks: bool,
    extra: Vec<Arc<dyn TopicPipeline>>,
}

impl PipelineRegistryBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the composite-market classifier settings used by sports.
    #[must_use]
    pub fn eligibility(mut self, config: MveConfig) -> Self {
        self.eligibility = config;
        self
    }

    /// Enable the dedicated pipelines (rates, crypto, elections, sports, climate).
    #[must_use]
    pub fn dedicated(mut self) -> Self {
        self.dedicated = true;
        self
    }

    /// Enable keyword pipelines for the remaining topics.
    #[must_use]
    pub fn keyword_fallbacks(mut self) -> Self {
        self.keyword_fallbacks = true;
        self
    }

    /// Register an additional pipeline after the built-in ones.
    #[must_use]
    pub fn pipeline(mut self, pipeline: Arc<dyn TopicPipeline>) -> Self {
        self.extra.push(pipeline);
        self
    }

    /// Build the registry with all configured pipelines.
    #[must_use]
    pub fn build(self) -> PipelineRegistry {
        let mut registry = PipelineRegistry::new();

        if self.dedicated {
            registry.register(Arc::new(RatesPipeline::new()));
            registry.register(Arc::new(CryptoPipeline::daily()));
            registry.register(Arc::new(CryptoPipeline::intraday()));
            registry.register(Arc::new(ElectionsPipeline::new()));
            registry.register(Arc::new(ClimatePipeline::new()));
            registry.register(Arc::new(SportsPipeline::new(MveClassifier::new(
                self.eligibility,
            ))));
        }

        if self.keyword_fallbacks {
            for pipeline in KeywordPipeline::defaults() {
                registry.register(Arc::new(pipeline));
            }
        }

        for pipeline in self.extra {
            registry.register(pipeline);
        }

        registry
    }
}
