//! `GET /api/geocode?q=`: typed place to coordinates.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repairfinder_geo::GeocodeError;
use serde::{Deserialize, Serialize};

use super::AppState;

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    q: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeocodeFailure {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

pub(super) async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> Response {
    let q = query.q.unwrap_or_default();

    match state.geocoder.geocode(&q).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            let (status, body) = match e {
                GeocodeError::EmptyQuery => (
                    StatusCode::BAD_REQUEST,
                    GeocodeFailure {
                        error: "q is required",
                        details: None,
                    },
                ),
                GeocodeError::NotFound => (
                    StatusCode::NOT_FOUND,
                    GeocodeFailure {
                        error: "No location found",
                        details: None,
                    },
                ),
                GeocodeError::Upstream { details } => {
                    tracing::warn!(details = %details, "geocoding failed");
                    (
                        StatusCode::BAD_GATEWAY,
                        GeocodeFailure {
                            error: "Geocoding failed",
                            details: Some(details),
                        },
                    )
                }
            };
            (status, Json(body)).into_response()
        }
    }
}
