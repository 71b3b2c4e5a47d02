use thiserror::Error;

/// Errors constructing the HTTP clients.
#[derive(Debug, Error)]
pub enum GeoError {
    /// The underlying `reqwest::Client` could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("at least one Overpass endpoint is required")]
    NoEndpoints,
}

/// Terminal failure of the shop search pipeline.
///
/// Retryable by the caller: every endpoint was tried once and none produced
/// a usable response.
#[derive(Debug, Error)]
pub enum ShopSearchError {
    #[error("all {attempts} Overpass endpoint(s) failed; last: {details}")]
    UpstreamUnavailable { attempts: usize, details: String },
}

impl ShopSearchError {
    /// Diagnostic captured from the last endpoint attempted.
    #[must_use]
    pub fn details(&self) -> &str {
        match self {
            ShopSearchError::UpstreamUnavailable { details, .. } => details,
        }
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("q is required")]
    EmptyQuery,

    #[error("No location found")]
    NotFound,

    #[error("Geocoding failed: {details}")]
    Upstream { details: String },
}

/// Maximum number of upstream body characters echoed into a diagnostic.
pub(crate) const SNIPPET_CHARS: usize = 200;

/// First [`SNIPPET_CHARS`] characters of an upstream body, on a char boundary.
pub(crate) fn snippet(text: &str) -> &str {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_truncates_to_200_chars() {
        let long = "x".repeat(500);
        assert_eq!(snippet(&long).len(), 200);
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let text = "é".repeat(300);
        let s = snippet(&text);
        assert_eq!(s.chars().count(), 200);
    }
}
