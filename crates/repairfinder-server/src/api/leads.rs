//! `POST /api/leads`: contact details left with consent.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repairfinder_core::{validate_lead, LeadSubmission};
use serde::Serialize;
use uuid::Uuid;

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LeadCreated {
    ok: bool,
    lead_id: Uuid,
}

/// `{ ok: false, error }` body shared by the lead and event endpoints.
#[derive(Debug, Serialize)]
pub(super) struct SubmissionFailed {
    ok: bool,
    error: String,
}

impl SubmissionFailed {
    pub(super) fn response(status: StatusCode, error: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                ok: false,
                error: error.into(),
            }),
        )
            .into_response()
    }
}

pub(super) async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Response {
    let Json(submission) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            return SubmissionFailed::response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let lead = match validate_lead(submission) {
        Ok(lead) => lead,
        Err(e) => return SubmissionFailed::response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match repairfinder_db::insert_lead(&state.pool, &lead).await {
        Ok(row) => {
            tracing::info!(lead_id = %row.public_id, "lead created");
            (
                StatusCode::OK,
                Json(LeadCreated {
                    ok: true,
                    lead_id: row.public_id,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to store lead");
            SubmissionFailed::response(StatusCode::INTERNAL_SERVER_ERROR, "Could not save lead")
        }
    }
}
