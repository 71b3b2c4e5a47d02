//! Overpass interpreter client with sequential endpoint failover.
//!
//! Every configured endpoint is an equivalent mirror. A search posts the
//! query to each in order and stops at the first usable response; there is
//! no retry, backoff, or fan-out.

use std::fmt;
use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::error::{snippet, GeoError, ShopSearchError};
use crate::types::OverpassResponse;

/// Why a single endpoint attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic(pub String);

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client for a list of equivalent Overpass endpoints.
pub struct OverpassClient {
    client: Client,
    endpoints: Vec<Url>,
}

impl OverpassClient {
    /// Creates a client probing `endpoints` in the given order.
    ///
    /// # Errors
    ///
    /// - [`GeoError::NoEndpoints`] if `endpoints` is empty.
    /// - [`GeoError::InvalidUrl`] if any endpoint is not a valid URL.
    /// - [`GeoError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new<S: AsRef<str>>(
        endpoints: &[S],
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GeoError> {
        if endpoints.is_empty() {
            return Err(GeoError::NoEndpoints);
        }

        let endpoints = endpoints
            .iter()
            .map(|e| {
                let raw = e.as_ref();
                Url::parse(raw).map_err(|err| GeoError::InvalidUrl {
                    url: raw.to_owned(),
                    reason: err.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client, endpoints })
    }

    #[must_use]
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Runs `query` against each endpoint in order and returns the first
    /// successfully parsed response.
    ///
    /// Diagnostics from failed attempts are logged and dropped once an
    /// endpoint succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`ShopSearchError::UpstreamUnavailable`] carrying the last
    /// endpoint's diagnostic when every endpoint fails.
    pub async fn fetch(&self, query: &str) -> Result<OverpassResponse, ShopSearchError> {
        let mut last = Diagnostic(String::new());

        for (attempt, endpoint) in self.endpoints.iter().enumerate() {
            match self.try_endpoint(endpoint, query).await {
                Ok(response) => {
                    tracing::debug!(endpoint = %endpoint, attempt, "overpass endpoint succeeded");
                    return Ok(response);
                }
                Err(diagnostic) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        attempt,
                        diagnostic = %diagnostic,
                        "overpass endpoint failed; trying next"
                    );
                    last = diagnostic;
                }
            }
        }

        Err(ShopSearchError::UpstreamUnavailable {
            attempts: self.endpoints.len(),
            details: last.0,
        })
    }

    /// Issues one uncached POST of `data=<query>` to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a [`Diagnostic`] when the request fails, the status is not
    /// 2xx, the content type is not JSON, or the body does not parse.
    pub async fn try_endpoint(
        &self,
        endpoint: &Url,
        query: &str,
    ) -> Result<OverpassResponse, Diagnostic> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(CACHE_CONTROL, "no-cache")
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| Diagnostic(format!("Request failed: {e}")))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();

        let text = response
            .text()
            .await
            .map_err(|e| Diagnostic(format!("Body read failed: {e}")))?;

        if !status.is_success() {
            return Err(Diagnostic(format!(
                "HTTP {}: {}",
                status.as_u16(),
                snippet(&text)
            )));
        }

        if !content_type.contains("application/json") {
            return Err(Diagnostic(format!("Non-JSON response: {}", snippet(&text))));
        }

        serde_json::from_str::<OverpassResponse>(&text)
            .map_err(|_| Diagnostic(format!("JSON parse failed: {}", snippet(&text))))
    }
}
