//! `GET /api/shops?lat=&lng=&radius=`: nearby repair shops, nearest first.
//!
//! Keeps the site's bare `{ results, error?, details? }` body rather than the
//! `{ data, meta }` envelope so the existing results page can consume it.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repairfinder_geo::{RankedShop, SearchArea};
use serde::{Deserialize, Serialize};

use super::AppState;

const UPSTREAM_BUSY: &str = "Overpass busy. Try again later.";

#[derive(Debug, Deserialize)]
pub(super) struct ShopsQuery {
    lat: Option<String>,
    lng: Option<String>,
    radius: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ShopsBody {
    results: Vec<RankedShop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ShopsBody {
    fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(error.into()),
            details,
        }
    }
}

pub(super) async fn find_shops(
    State(state): State<AppState>,
    Query(query): Query<ShopsQuery>,
) -> Response {
    let area = match SearchArea::parse(
        query.lat.as_deref(),
        query.lng.as_deref(),
        query.radius.as_deref(),
    ) {
        Ok(area) => area,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ShopsBody::failure(e.to_string(), None)),
            )
                .into_response();
        }
    };

    match state.shops.find_shops(&area).await {
        Ok(results) => {
            tracing::info!(
                lat = area.lat,
                lng = area.lng,
                radius_m = area.radius_m,
                results = results.len(),
                "shop search"
            );
            (
                StatusCode::OK,
                Json(ShopsBody {
                    results,
                    error: None,
                    details: None,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "shop search failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ShopsBody::failure(UPSTREAM_BUSY, Some(e.details().to_owned()))),
            )
                .into_response()
        }
    }
}
