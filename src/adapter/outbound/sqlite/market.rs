//! SQLite market candidate store.
//!
//! Reads candidates for the matching engine and accepts bulk imports keyed by
//! `(venue, market_id)`.

use std::collections::BTreeMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use tracing::{debug, info};

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    format_timestamp, parse_timestamp, MarketRow,
};
use crate::adapter::outbound::sqlite::database::schema::markets;
use crate::domain::{id::Venue, market::MarketCandidate};
use crate::error::{Error, Result};
use crate::port::outbound::market::{MarketOrder, MarketQuery, MarketSource};

type TitlePredicate = Box<dyn BoxableExpression<markets::table, Sqlite, SqlType = diesel::sql_types::Bool>>;

/// SQLite-backed market source.
pub struct SqliteMarketSource {
    pool: DbPool,
}

impl SqliteMarketSource {
    /// Create a new SQLite market source with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert or replace candidates under `venue`, ignoring the venue the
    /// candidates themselves carry. Returns the number of rows written.
    ///
    /// # Errors
    /// Returns an error if a candidate cannot be serialized or the write fails.
    pub fn import(&self, venue: &Venue, candidates: &[MarketCandidate]) -> Result<usize> {
        let now = format_timestamp(Utc::now());
        let rows = candidates
            .iter()
            .map(|candidate| Self::to_row(venue, candidate, &now))
            .collect::<Result<Vec<_>>>()?;

        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let written = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let mut written = 0;
                for row in &rows {
                    written += diesel::replace_into(markets::table)
                        .values(row)
                        .execute(conn)?;
                }
                Ok(written)
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        info!(venue = %venue, markets = written, "Imported markets");
        Ok(written)
    }

    fn to_row(venue: &Venue, candidate: &MarketCandidate, now: &str) -> Result<MarketRow> {
        Ok(MarketRow {
            venue: venue.to_string(),
            market_id: candidate.market_id.to_string(),
            title: candidate.title.clone(),
            close_time: candidate.close_time.map(format_timestamp),
            status: candidate.status.trim().to_ascii_lowercase(),
            metadata: serde_json::to_string(&candidate.metadata)?,
            updated_at: now.to_string(),
        })
    }

    fn from_row(row: MarketRow) -> Result<MarketCandidate> {
        let metadata: BTreeMap<String, serde_json::Value> = serde_json::from_str(&row.metadata)?;
        Ok(MarketCandidate {
            venue: Venue::new(row.venue),
            market_id: row.market_id.into(),
            title: row.title,
            close_time: row.close_time.as_deref().map(parse_timestamp).transpose()?,
            status: row.status,
            metadata,
        })
    }
}

/// Coarse case-insensitive substring prefilter on any keyword. Whole-word
/// matching happens on the loaded rows.
fn title_matches(keywords: &[String]) -> Option<TitlePredicate> {
    keywords
        .iter()
        .map(|keyword| -> TitlePredicate {
            Box::new(markets::title.like(format!("%{}%", keyword.to_lowercase())))
        })
        .reduce(|acc, next| Box::new(acc.or(next)))
}

impl MarketSource for SqliteMarketSource {
    async fn list_eligible_markets(
        &self,
        venue: &Venue,
        query: &MarketQuery,
    ) -> Result<Vec<MarketCandidate>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let cutoff = format_timestamp(query.close_cutoff());
        let mut select = markets::table
            .filter(markets::venue.eq(venue.to_string()))
            .filter(
                markets::close_time
                    .is_null()
                    .or(markets::close_time.ge(cutoff)),
            )
            .into_boxed();

        if !query.statuses.is_empty() {
            let statuses: Vec<String> = query
                .statuses
                .iter()
                .map(|status| status.trim().to_ascii_lowercase())
                .collect();
            select = select.filter(markets::status.eq_any(statuses));
        }
        if let Some(predicate) = title_matches(&query.title_keywords) {
            select = select.filter(predicate);
        }

        // Open-ended markets sort last in either direction.
        select = match query.order_by {
            MarketOrder::CloseTimeAsc => {
                select.order((markets::close_time.is_null().asc(), markets::close_time.asc()))
            }
            MarketOrder::CloseTimeDesc => {
                select.order((markets::close_time.is_null().asc(), markets::close_time.desc()))
            }
        };

        select = select.then_order_by(markets::market_id.asc());
        // Substring hits that are not whole-word matches must not use up the limit.
        if query.title_keywords.is_empty() {
            select = select.limit(i64::try_from(query.limit).unwrap_or(i64::MAX));
        }
        let rows: Vec<MarketRow> = select
            .select(MarketRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;
        let loaded = rows.len();

        let mut found = Vec::with_capacity(loaded.min(query.limit));
        for row in rows {
            if found.len() == query.limit {
                break;
            }
            let candidate = Self::from_row(row)?;
            if query.keywords_match(&candidate) {
                found.push(candidate);
            }
        }

        debug!(venue = %venue, loaded, returned = found.len(), limit = query.limit, "Loaded markets");
        Ok(found)
    }
}
