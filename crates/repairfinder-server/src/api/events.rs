//! `POST /api/events`: anonymous usage events.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repairfinder_core::{validate_event, EventSubmission};
use serde_json::json;

use super::leads::SubmissionFailed;
use super::AppState;

pub(super) async fn record_event(
    State(state): State<AppState>,
    payload: Result<Json<EventSubmission>, JsonRejection>,
) -> Response {
    let Json(submission) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return SubmissionFailed::response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let event = match validate_event(submission) {
        Ok(event) => event,
        Err(e) => return SubmissionFailed::response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match repairfinder_db::insert_event(&state.pool, &event).await {
        Ok(id) => {
            tracing::debug!(event_id = id, event_type = %event.event_type, "event recorded");
            (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store event");
            SubmissionFailed::response(StatusCode::INTERNAL_SERVER_ERROR, "Could not save event")
        }
    }
}
