//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{market_links, markets};

/// Database row for a market link (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = market_links)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LinkRow {
    pub id: i32,
    pub left_venue: String,
    pub left_market_id: String,
    pub right_venue: String,
    pub right_market_id: String,
    pub status: String,
    pub score: f64,
    pub reason: Option<String>,
    pub algo_version: Option<String>,
    pub topic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Database row for a market link (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = market_links)]
pub struct NewLinkRow {
    pub left_venue: String,
    pub left_market_id: String,
    pub right_venue: String,
    pub right_market_id: String,
    pub status: String,
    pub score: f64,
    pub reason: Option<String>,
    pub algo_version: Option<String>,
    pub topic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial update of a market link. `None` fields are left untouched;
/// `reason: Some(None)` clears the reason.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = market_links)]
pub struct LinkChangeset {
    pub status: Option<String>,
    pub reason: Option<Option<String>>,
    pub algo_version: Option<String>,
    pub topic: Option<String>,
    pub updated_at: Option<String>,
}

/// Database row for a stored market candidate.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = markets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MarketRow {
    pub venue: String,
    pub market_id: String,
    pub title: String,
    pub close_time: Option<String>,
    pub status: String,
    pub metadata: String,
    pub updated_at: String,
}

/// Fixed-width UTC timestamp text so stored values compare lexically.
pub fn format_timestamp(at: chrono::DateTime<chrono::Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Parse a stored timestamp.
///
/// # Errors
/// Returns [`Error::Parse`](crate::error::Error::Parse) for malformed text.
pub fn parse_timestamp(text: &str) -> crate::error::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(text)
        .map(|at| at.with_timezone(&chrono::Utc))
        .map_err(|e| crate::error::Error::Parse(format!("timestamp '{text}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn timestamps_are_fixed_width_and_ordered() {
        let early = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap();

        let a = format_timestamp(early);
        let b = format_timestamp(late);
        assert_eq!(a, "2025-03-01T09:00:00.000Z");
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_timestamp(&b).unwrap(), late);
    }

    #[test]
    fn malformed_timestamp_is_a_parse_error() {
        let err = parse_timestamp("yesterday").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }
}
