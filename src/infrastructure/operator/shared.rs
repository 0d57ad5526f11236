//! Shared helper routines for operator implementations.

use crate::domain::{id::MarketId, run::EngineRunOptions, run::RunMode};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::inbound::operator::context::OperatorContext;
use crate::port::inbound::operator::matching::MatchRequest;

/// Resolve configuration for one call and start logging.
pub(super) fn load_config(context: &OperatorContext) -> Result<Config> {
    let mut config = Config::from_optional_toml(context.config_toml.as_deref())?;
    if let Some(database) = &context.database {
        config.database.clone_from(database);
    }
    if let Some(level) = &context.log_level {
        config.logging.level.clone_from(level);
    }
    config.init_logging();
    Ok(config)
}

/// Configuration defaults with the request's overrides applied.
pub(super) fn run_options(config: &Config, request: &MatchRequest) -> EngineRunOptions {
    let overrides = &request.overrides;
    let mut options = config
        .matching
        .options(&request.from_venue, &request.to_venue, &request.topic);

    if let Some(hours) = overrides.lookback_hours {
        options.lookback_hours = hours;
    }
    if let Some(max_left) = overrides.max_left {
        options.limits.max_left = max_left;
    }
    if let Some(max_right) = overrides.max_right {
        options.limits.max_right = max_right;
    }
    if let Some(max_per_left) = overrides.max_per_left {
        options.limits.max_per_left = max_per_left;
    }
    if let Some(max_per_right) = overrides.max_per_right {
        options.limits.max_per_right = max_per_right;
    }
    if let Some(min_score) = overrides.min_score {
        options.min_score = min_score;
    }
    options.mode = RunMode::from_dry_run(overrides.dry_run);
    options.auto_confirm |= overrides.auto_confirm;
    options.auto_reject |= overrides.auto_reject;
    options.debug_market_id = overrides.debug_market_id.as_deref().map(MarketId::new);
    if overrides.no_eligibility_filter {
        options.use_eligibility_filter = false;
    }
    options
}
