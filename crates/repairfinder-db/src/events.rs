//! Database operations for `events`.
//!
//! An "anonymous search" is an event with `type = 'search'` and no lead id.

use chrono::{DateTime, Utc};
use repairfinder_core::NewEvent;
use sqlx::PgPool;

use crate::leads::MAX_LIST_LIMIT;
use crate::DbError;

/// A row from the `events` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub id: i64,
    pub session_id: String,
    pub lead_id: Option<String>,
    #[sqlx(rename = "type")]
    pub event_type: String,
    pub action: Option<String>,
    pub issue: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub shop_place_id: Option<String>,
    pub shop_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

const EVENT_COLUMNS: &str = "id, session_id, lead_id, type, action, issue, lat, lng, radius, \
                             shop_place_id, shop_name, created_at";

/// Inserts a validated event and returns its `id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_event(pool: &PgPool, event: &NewEvent) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO events \
         (session_id, lead_id, type, action, issue, lat, lng, radius, shop_place_id, shop_name) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id",
    )
    .bind(&event.session_id)
    .bind(event.lead_id.as_deref())
    .bind(&event.event_type)
    .bind(event.action.as_deref())
    .bind(event.issue.as_deref())
    .bind(event.lat)
    .bind(event.lng)
    .bind(event.radius)
    .bind(event.shop_place_id.as_deref())
    .bind(event.shop_name.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Most recent events of any type. `limit` is clamped to `1..=200`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_events(pool: &PgPool, limit: i64) -> Result<Vec<EventRow>, DbError> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events ORDER BY created_at DESC, id DESC LIMIT $1"
    ))
    .bind(limit.clamp(1, MAX_LIST_LIMIT))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Most recent anonymous searches. `limit` is clamped to `1..=200`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_anonymous_searches(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<EventRow>, DbError> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events \
         WHERE type = 'search' AND lead_id IS NULL \
         ORDER BY created_at DESC, id DESC LIMIT $1"
    ))
    .bind(limit.clamp(1, MAX_LIST_LIMIT))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Total number of anonymous searches.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_anonymous_searches(pool: &PgPool) -> Result<i64, DbError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM events WHERE type = 'search' AND lead_id IS NULL",
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
