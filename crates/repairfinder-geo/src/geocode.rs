//! Nominatim forward geocoding: free-text place to a single coordinate.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::{snippet, GeoError, GeocodeError};
use crate::types::NominatimPlace;

/// Best match for a geocoding query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

/// Client for a Nominatim-compatible `/search` endpoint.
pub struct Geocoder {
    client: Client,
    base_url: Url,
}

impl Geocoder {
    /// Creates a geocoder rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// - [`GeoError::InvalidUrl`] if `base_url` does not parse.
    /// - [`GeoError::Http`] if the `reqwest::Client` cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GeoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join("search")` appends a segment
        // instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeoError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    fn search_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("search")
            .map_err(|e| GeocodeError::Upstream {
                details: format!("invalid search URL: {e}"),
            })?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "json")
            .append_pair("limit", "1");
        Ok(url)
    }

    /// Resolves `query` to the first Nominatim match.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::EmptyQuery`] if `query` is blank.
    /// - [`GeocodeError::Upstream`] on transport failure, non-2xx status, or
    ///   an unparseable body. For a non-2xx status the details are the first
    ///   200 characters of the body.
    /// - [`GeocodeError::NotFound`] if Nominatim returns no places.
    pub async fn geocode(&self, query: &str) -> Result<GeocodeResult, GeocodeError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let url = self.search_url(query)?;
        tracing::debug!(%url, "geocoding");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GeocodeError::Upstream {
                details: format!("Request failed: {e}"),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| GeocodeError::Upstream {
            details: format!("Body read failed: {e}"),
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "geocoder returned non-success status");
            return Err(GeocodeError::Upstream {
                details: snippet(&text).to_owned(),
            });
        }

        let places: Vec<NominatimPlace> =
            serde_json::from_str(&text).map_err(|_| GeocodeError::Upstream {
                details: format!("JSON parse failed: {}", snippet(&text)),
            })?;

        let Some(place) = places.into_iter().next() else {
            return Err(GeocodeError::NotFound);
        };

        let coordinate = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| GeocodeError::Upstream {
                    details: format!("invalid coordinate '{raw}'"),
                })
        };

        Ok(GeocodeResult {
            lat: coordinate(&place.lat)?,
            lng: coordinate(&place.lon)?,
            display_name: place.display_name,
        })
    }
}
