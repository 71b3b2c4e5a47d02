//! Mapping of raw Overpass elements into uniform shop candidates.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::OverpassElement;

/// Name given to elements without a usable `name` tag. Such candidates
/// never pass the relevance filter.
pub const UNNAMED_SHOP: &str = "Unnamed shop";

/// Where a candidate's coordinates came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A node: direct `lat`/`lon`.
    Point,
    /// A way or relation: Overpass-computed `center`.
    Area,
}

impl SourceKind {
    #[must_use]
    pub fn from_element_type(element_type: &str) -> Self {
        if element_type == "node" {
            SourceKind::Point
        } else {
            SourceKind::Area
        }
    }
}

/// A shop after normalization and before relevance filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopCandidate {
    #[serde(skip)]
    pub source_kind: SourceKind,
    /// `"<element type>-<element id>"`, unique within one response.
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub lat: f64,
    pub lng: f64,
}

/// Normalize every element, dropping those without usable coordinates.
///
/// Source order is preserved.
#[must_use]
pub fn normalize_elements(elements: Vec<OverpassElement>) -> Vec<ShopCandidate> {
    elements.into_iter().filter_map(normalize_element).collect()
}

/// Normalize one element.
///
/// Returns `None` when latitude or longitude is missing, zero, or NaN.
/// Treating `0.0` as missing drops real shops on the equator or prime
/// meridian; kept for compatibility with the existing site's results.
#[must_use]
pub fn normalize_element(element: OverpassElement) -> Option<ShopCandidate> {
    let source_kind = SourceKind::from_element_type(&element.element_type);

    let (lat, lng) = match source_kind {
        SourceKind::Point => (element.lat, element.lon),
        SourceKind::Area => (
            element.center.and_then(|c| c.lat),
            element.center.and_then(|c| c.lon),
        ),
    };
    let lat = truthy(lat)?;
    let lng = truthy(lng)?;

    let tags = element.tags.unwrap_or_default();

    Some(ShopCandidate {
        source_kind,
        place_id: format!("{}-{}", element.element_type, element.id),
        name: first_tag(&tags, &["name"]).unwrap_or(UNNAMED_SHOP).to_owned(),
        address: first_tag(&tags, &["addr:full", "addr:street"])
            .unwrap_or_default()
            .to_owned(),
        phone: first_tag(&tags, &["contact:phone", "phone"])
            .unwrap_or_default()
            .to_owned(),
        lat,
        lng,
    })
}

/// First non-empty tag value among `keys`, in order.
fn first_tag<'a>(tags: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| tags.get(*k))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

#[allow(clippy::float_cmp)]
fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
