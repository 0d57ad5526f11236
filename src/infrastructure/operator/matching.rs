//! Matching operator implementation.

use async_trait::async_trait;

use crate::application::matching::batch::BatchRunner;
use crate::domain::run::{BatchRunResult, EngineRunResult};
use crate::error::Result;
use crate::infrastructure::bootstrap;
use crate::port::inbound::operator::context::OperatorContext;
use crate::port::inbound::operator::matching::{MatchRequest, MatchingOperator};

use super::{entry::Operator, shared};

#[async_trait]
impl MatchingOperator for Operator {
    async fn run_match(
        &self,
        context: &OperatorContext,
        request: &MatchRequest,
    ) -> Result<EngineRunResult> {
        let config = shared::load_config(context)?;
        let engine = bootstrap::build_engine(&config)?;
        let options = shared::run_options(&config, request);
        engine.run(&options).await
    }

    async fn run_match_all(
        &self,
        context: &OperatorContext,
        request: &MatchRequest,
    ) -> Result<BatchRunResult> {
        let config = shared::load_config(context)?;
        let engine = bootstrap::build_engine(&config)?;
        let options = shared::run_options(&config, request);
        Ok(BatchRunner::new(&engine).run_all(&options).await)
    }
}
