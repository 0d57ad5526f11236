//! Infrastructure bootstrap helpers for runtime wiring.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::sqlite::database::connection::{self, DbPool};
use crate::adapter::outbound::sqlite::link::SqliteLinkStore;
use crate::adapter::outbound::sqlite::market::SqliteMarketSource;
use crate::application::eligibility::mve::MveConfig;
use crate::application::matching::engine::MatchingEngine;
use crate::application::pipeline::registry::PipelineRegistry;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Matching engine over the SQLite stores.
pub type SqliteEngine = MatchingEngine<SqliteMarketSource, SqliteLinkStore>;

/// Registry with every shipped pipeline and the default classifier settings.
#[must_use]
pub fn default_registry() -> PipelineRegistry {
    build_registry(&MveConfig::default())
}

/// Registry with every shipped pipeline.
#[must_use]
pub fn build_registry(eligibility: &MveConfig) -> PipelineRegistry {
    let registry = PipelineRegistry::builder()
        .eligibility(eligibility.clone())
        .dedicated()
        .keyword_fallbacks()
        .build();
    debug!(pipelines = registry.len(), "Pipeline registry built");
    registry
}

/// Open the configured database and apply pending migrations.
///
/// # Errors
/// Returns an error if the database directory cannot be created or the
/// database cannot be opened or migrated.
pub fn open_database(config: &Config) -> Result<DbPool> {
    if let Some(parent) = Path::new(&config.database).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let pool = connection::open(&config.database)?;
    debug!(database = %config.database, "Database ready");
    Ok(pool)
}

/// Engine wired to the configured database and the full registry.
///
/// # Errors
/// Returns an error if the database cannot be opened.
pub fn build_engine(config: &Config) -> Result<SqliteEngine> {
    let pool = open_database(config)?;
    Ok(MatchingEngine::new(
        Arc::new(build_registry(&config.eligibility)),
        SqliteMarketSource::new(pool.clone()),
        SqliteLinkStore::new(pool),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::pipeline::registry::IMPLEMENTED_TOPICS;
    use crate::domain::topic::CanonicalTopic;

    #[test]
    fn default_registry_covers_every_topic() {
        let registry = default_registry();
        assert_eq!(registry.len(), CanonicalTopic::ALL.len());
        for topic in IMPLEMENTED_TOPICS {
            assert!(registry.contains(*topic));
        }
    }

    #[test]
    fn engine_opens_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: dir.path().join("nested/links.db").to_string_lossy().into_owned(),
            ..Config::default()
        };

        let engine = build_engine(&config).unwrap();
        assert_eq!(engine.registry().len(), CanonicalTopic::ALL.len());
        assert!(dir.path().join("nested/links.db").exists());
    }
}
