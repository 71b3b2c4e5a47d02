//! `GET /admin`: recent leads, events, and anonymous searches.
//!
//! Only reachable through the shared-password gate in `middleware`.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use repairfinder_db::{EventRow, LeadRow};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

const RECENT_LEADS: i64 = 50;
const RECENT_EVENTS: i64 = 100;
const RECENT_SEARCHES: i64 = 100;

#[derive(Debug, Serialize)]
pub(super) struct AdminDashboard {
    leads: Vec<LeadItem>,
    events: Vec<EventItem>,
    anonymous_searches: Vec<EventItem>,
    anonymous_search_count: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct LeadItem {
    lead_id: Uuid,
    session_id: Option<String>,
    name: String,
    contact: String,
    issue: String,
    lat: Option<f64>,
    lng: Option<f64>,
    consent_follow_up: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct EventItem {
    id: i64,
    session_id: String,
    lead_id: Option<String>,
    #[serde(rename = "type")]
    event_type: String,
    action: Option<String>,
    issue: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    radius: Option<f64>,
    shop_place_id: Option<String>,
    shop_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<LeadRow> for LeadItem {
    fn from(row: LeadRow) -> Self {
        Self {
            lead_id: row.public_id,
            session_id: row.session_id,
            name: row.name,
            contact: row.contact,
            issue: row.issue,
            lat: row.lat,
            lng: row.lng,
            consent_follow_up: row.consent_follow_up,
            created_at: row.created_at,
        }
    }
}

impl From<EventRow> for EventItem {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            session_id: row.session_id,
            lead_id: row.lead_id,
            event_type: row.event_type,
            action: row.action,
            issue: row.issue,
            lat: row.lat,
            lng: row.lng,
            radius: row.radius,
            shop_place_id: row.shop_place_id,
            shop_name: row.shop_name,
            created_at: row.created_at,
        }
    }
}

pub(super) async fn dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AdminDashboard>>, ApiError> {
    let leads = repairfinder_db::list_recent_leads(&state.pool, RECENT_LEADS)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let events = repairfinder_db::list_recent_events(&state.pool, RECENT_EVENTS)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let searches = repairfinder_db::list_anonymous_searches(&state.pool, RECENT_SEARCHES)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let search_count = repairfinder_db::count_anonymous_searches(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AdminDashboard {
            leads: leads.into_iter().map(LeadItem::from).collect(),
            events: events.into_iter().map(EventItem::from).collect(),
            anonymous_searches: searches.into_iter().map(EventItem::from).collect(),
            anonymous_search_count: search_count,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
