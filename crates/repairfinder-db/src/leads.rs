//! Database operations for `leads`.

use chrono::{DateTime, Utc};
use repairfinder_core::NewLead;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// Hard cap on rows returned by a listing.
pub const MAX_LIST_LIMIT: i64 = 200;

/// A row from the `leads` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeadRow {
    pub id: i64,
    pub public_id: Uuid,
    pub session_id: Option<String>,
    pub name: String,
    pub contact: String,
    pub issue: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub consent_follow_up: bool,
    pub created_at: DateTime<Utc>,
}

const LEAD_COLUMNS: &str = "id, public_id, session_id, name, contact, issue, lat, lng, \
                            consent_follow_up, created_at";

/// Inserts a validated lead with a fresh public UUID and returns the row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_lead(pool: &PgPool, lead: &NewLead) -> Result<LeadRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, LeadRow>(&format!(
        "INSERT INTO leads \
         (public_id, session_id, name, contact, issue, lat, lng, consent_follow_up) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {LEAD_COLUMNS}"
    ))
    .bind(public_id)
    .bind(lead.session_id.as_deref())
    .bind(&lead.name)
    .bind(&lead.contact)
    .bind(&lead.issue)
    .bind(lead.lat)
    .bind(lead.lng)
    .bind(lead.consent_follow_up)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetches one lead by its public UUID.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no lead has that id, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_lead_by_public_id(pool: &PgPool, public_id: Uuid) -> Result<LeadRow, DbError> {
    sqlx::query_as::<_, LeadRow>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE public_id = $1"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Most recent leads first. `limit` is clamped to `1..=200`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_leads(pool: &PgPool, limit: i64) -> Result<Vec<LeadRow>, DbError> {
    let rows = sqlx::query_as::<_, LeadRow>(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC, id DESC LIMIT $1"
    ))
    .bind(limit.clamp(1, MAX_LIST_LIMIT))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
