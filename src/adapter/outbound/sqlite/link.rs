//! SQLite link store implementation.
//!
//! Links are unique on their four-part key. Upserts go through
//! `INSERT ... ON CONFLICT DO UPDATE` for score and provenance, followed by a
//! status update that only touches rows still in `suggested`, both inside one
//! transaction.

use std::collections::BTreeMap;

use chrono::Utc;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::upsert::excluded;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{
    format_timestamp, parse_timestamp, LinkChangeset, LinkRow, NewLinkRow,
};
use crate::adapter::outbound::sqlite::database::schema::market_links;
use crate::domain::link::{LinkKey, LinkStatus, LinkUpsert, LinkWrite, MarketLink};
use crate::error::{Error, Result};
use crate::port::outbound::link::{
    FieldMatch, LinkField, LinkFilter, LinkPatch, LinkStore, NULL_GROUP,
};

/// SQLite-backed link store.
pub struct SqliteLinkStore {
    pool: DbPool,
}

impl SqliteLinkStore {
    /// Create a new SQLite link store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn connection(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn to_row(link: &LinkUpsert, now: &str) -> NewLinkRow {
        NewLinkRow {
            left_venue: link.key.left_venue.to_string(),
            left_market_id: link.key.left_market_id.to_string(),
            right_venue: link.key.right_venue.to_string(),
            right_market_id: link.key.right_market_id.to_string(),
            status: link.status.as_str().to_string(),
            score: link.score,
            reason: link.reason.clone(),
            algo_version: link.algo_version.clone(),
            topic: link.topic.clone(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    fn from_row(row: LinkRow) -> Result<MarketLink> {
        Ok(MarketLink {
            key: LinkKey::new(
                row.left_venue,
                row.left_market_id,
                row.right_venue,
                row.right_market_id,
            ),
            status: row.status.parse()?,
            score: row.score,
            reason: row.reason,
            algo_version: row.algo_version,
            topic: row.topic,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
        })
    }

    fn changeset(patch: &LinkPatch, now: String) -> LinkChangeset {
        LinkChangeset {
            status: patch.status.map(|status| status.as_str().to_string()),
            reason: patch.reason.clone(),
            algo_version: patch.algo_version.clone(),
            topic: patch.topic.clone(),
            updated_at: Some(now),
        }
    }
}

/// Rows addressed by one link key.
fn by_key(key: &LinkKey) -> market_links::BoxedQuery<'static, Sqlite> {
    market_links::table
        .filter(market_links::left_venue.eq(key.left_venue.to_string()))
        .filter(market_links::left_market_id.eq(key.left_market_id.to_string()))
        .filter(market_links::right_venue.eq(key.right_venue.to_string()))
        .filter(market_links::right_market_id.eq(key.right_market_id.to_string()))
        .into_boxed()
}

/// Rows matching a [`LinkFilter`].
fn filtered(filter: &LinkFilter) -> market_links::BoxedQuery<'static, Sqlite> {
    let mut query = match &filter.key {
        Some(key) => by_key(key),
        None => market_links::table.into_boxed(),
    };

    if !filter.statuses.is_empty() {
        let statuses: Vec<String> = filter
            .statuses
            .iter()
            .map(|status| status.as_str().to_string())
            .collect();
        query = query.filter(market_links::status.eq_any(statuses));
    }

    match &filter.reason {
        FieldMatch::Any => {}
        FieldMatch::Null => query = query.filter(market_links::reason.is_null()),
        FieldMatch::Equals(value) => query = query.filter(market_links::reason.eq(value.clone())),
    }
    match &filter.algo_version {
        FieldMatch::Any => {}
        FieldMatch::Null => query = query.filter(market_links::algo_version.is_null()),
        FieldMatch::Equals(value) => {
            query = query.filter(market_links::algo_version.eq(value.clone()));
        }
    }
    match &filter.topic {
        FieldMatch::Any => {}
        FieldMatch::Null => query = query.filter(market_links::topic.is_null()),
        FieldMatch::Equals(value) => query = query.filter(market_links::topic.eq(value.clone())),
    }

    query
}

impl LinkStore for SqliteLinkStore {
    async fn upsert_link(&self, link: &LinkUpsert) -> Result<LinkWrite> {
        let now = format_timestamp(Utc::now());
        let row = Self::to_row(link, &now);
        let mut conn = self.connection()?;

        let (existed, status) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                let existed = by_key(&link.key)
                    .count()
                    .get_result::<i64>(conn)?
                    > 0;

                diesel::insert_into(market_links::table)
                    .values(&row)
                    .on_conflict((
                        market_links::left_venue,
                        market_links::left_market_id,
                        market_links::right_venue,
                        market_links::right_market_id,
                    ))
                    .do_update()
                    .set((
                        market_links::score.eq(excluded(market_links::score)),
                        market_links::algo_version.eq(excluded(market_links::algo_version)),
                        market_links::topic.eq(excluded(market_links::topic)),
                        market_links::updated_at.eq(excluded(market_links::updated_at)),
                    ))
                    .execute(conn)?;

                // Decided rows keep their status and reason.
                if existed {
                    diesel::update(
                        market_links::table
                            .filter(market_links::left_venue.eq(&row.left_venue))
                            .filter(market_links::left_market_id.eq(&row.left_market_id))
                            .filter(market_links::right_venue.eq(&row.right_venue))
                            .filter(market_links::right_market_id.eq(&row.right_market_id))
                            .filter(market_links::status.eq(LinkStatus::Suggested.as_str())),
                    )
                    .set((
                        market_links::status.eq(&row.status),
                        market_links::reason.eq(&row.reason),
                    ))
                    .execute(conn)?;
                }

                let status: String = by_key(&link.key)
                    .select(market_links::status)
                    .first(conn)?;
                Ok((existed, status))
            })
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(LinkWrite {
            created: !existed,
            status: status.parse()?,
        })
    }

    async fn get_link(&self, key: &LinkKey) -> Result<Option<MarketLink>> {
        let mut conn = self.connection()?;

        let row: Option<LinkRow> = by_key(key)
            .select(LinkRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    async fn list_links(&self, filter: &LinkFilter) -> Result<Vec<MarketLink>> {
        let mut conn = self.connection()?;

        let rows: Vec<LinkRow> = filtered(filter)
            .order(market_links::id.asc())
            .select(LinkRow::as_select())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }

    async fn count_links(&self, filter: &LinkFilter) -> Result<usize> {
        let mut conn = self.connection()?;

        let count: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(usize::try_from(count).unwrap_or(0))
    }

    async fn count_by(&self, field: LinkField) -> Result<BTreeMap<String, usize>> {
        let mut conn = self.connection()?;
        let groups: Vec<(Option<String>, i64)> = match field {
            LinkField::Status => market_links::table
                .group_by(market_links::status)
                .select((market_links::status, count_star()))
                .load::<(String, i64)>(&mut conn)
                .map(|rows| rows.into_iter().map(|(group, n)| (Some(group), n)).collect()),
            LinkField::Topic => market_links::table
                .group_by(market_links::topic)
                .select((market_links::topic, count_star()))
                .load(&mut conn),
            LinkField::AlgoVersion => market_links::table
                .group_by(market_links::algo_version)
                .select((market_links::algo_version, count_star()))
                .load(&mut conn),
        }
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(groups
            .into_iter()
            .map(|(group, n)| {
                (
                    group.unwrap_or_else(|| NULL_GROUP.to_string()),
                    usize::try_from(n).unwrap_or(0),
                )
            })
            .collect())
    }

    async fn update_many(&self, filter: &LinkFilter, patch: &LinkPatch) -> Result<usize> {
        let changes = Self::changeset(patch, format_timestamp(Utc::now()));
        let mut conn = self.connection()?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let ids: Vec<i32> = filtered(filter).select(market_links::id).load(conn)?;
            if ids.is_empty() {
                return Ok(0);
            }
            diesel::update(market_links::table.filter(market_links::id.eq_any(ids)))
                .set(&changes)
                .execute(conn)
        })
        .map_err(|e| Error::Database(e.to_string()))
    }
}
