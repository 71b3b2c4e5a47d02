mod admin;
mod events;
mod geocode;
mod leads;
mod shops;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use repairfinder_geo::{Geocoder, ShopFinder};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, require_admin_password, AdminAuth, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub shops: Arc<ShopFinder>,
    pub geocoder: Arc<Geocoder>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    /// An `internal_error` envelope; the only failure the JSON API reports.
    pub fn internal(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code: "internal_error".to_string(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &repairfinder_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::internal(request_id, "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn admin_router(admin: AdminAuth) -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin::dashboard))
        .route_layer(axum::middleware::from_fn_with_state(
            admin,
            require_admin_password,
        ))
}

pub fn build_app(state: AppState, admin: AdminAuth) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/shops", get(shops::find_shops))
        .route("/api/geocode", get(geocode::geocode))
        .route("/api/leads", post(leads::create_lead))
        .route("/api/events", post(events::record_event));

    Router::new()
        .merge(public_routes)
        .merge(admin_router(admin))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match repairfinder_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
