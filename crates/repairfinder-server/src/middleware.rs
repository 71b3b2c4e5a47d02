use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use percent_encoding::{percent_decode_str, utf8_percent_encode, NON_ALPHANUMERIC};
use repairfinder_core::{AppConfig, Environment};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Cookie remembering the admin password after a successful `?pwd=` visit.
pub const ADMIN_COOKIE: &str = "admin_pwd";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared-password gate for the admin view.
#[derive(Clone)]
pub struct AdminAuth {
    password: Option<Arc<str>>,
    secure_cookie: bool,
}

impl std::fmt::Debug for AdminAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAuth")
            .field("configured", &self.password.is_some())
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

impl AdminAuth {
    /// A blank password counts as unset and keeps the admin view locked.
    #[must_use]
    pub fn new(password: Option<&str>, secure_cookie: bool) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()).map(Arc::from),
            secure_cookie,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        if config.admin_password.is_none() {
            tracing::warn!("REPAIRFINDER_ADMIN_PASSWORD not set; admin view is locked");
        }
        Self::new(
            config.admin_password.as_deref(),
            config.env == Environment::Production,
        )
    }

    fn matches(expected: &str, given: &str) -> bool {
        bool::from(expected.as_bytes().ct_eq(given.as_bytes()))
    }

    /// The stored value is percent-encoded; [`cookie_value`] decodes it.
    fn cookie_header(&self, password: &str) -> Option<HeaderValue> {
        let encoded = utf8_percent_encode(password, NON_ALPHANUMERIC);
        let mut cookie = format!("{ADMIN_COOKIE}={encoded}; HttpOnly; SameSite=Lax; Path=/admin");
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware gating the admin view behind the shared password.
///
/// The credential is taken from `?pwd=` first, then the [`ADMIN_COOKIE`]
/// cookie. A match refreshes the cookie on the response.
pub async fn require_admin_password(
    State(auth): State<AdminAuth>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = auth.password.clone() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Admin password not configured",
        )
            .into_response();
    };

    let given = query_password(&req).or_else(|| cookie_value(req.headers(), ADMIN_COOKIE));

    match given {
        Some(given) if AdminAuth::matches(&expected, &given) => {
            let mut res = next.run(req).await;
            match auth.cookie_header(&expected) {
                Some(cookie) => {
                    res.headers_mut().append(header::SET_COOKIE, cookie);
                }
                None => tracing::warn!("admin password is not a valid cookie value; cookie not set"),
            }
            res
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            "Admin locked. Open: /admin?pwd=YOUR_PASSWORD",
        )
            .into_response(),
    }
}

fn query_password(req: &Request) -> Option<String> {
    Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove("pwd"))
        .filter(|p| !p.is_empty())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .and_then(|(_, v)| percent_decode_str(v).decode_utf8().ok())
        .map(std::borrow::Cow::into_owned)
        .filter(|v| !v.is_empty())
}
