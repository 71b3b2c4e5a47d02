//! Wire types for the Overpass and Nominatim JSON APIs.

use std::collections::HashMap;

use serde::Deserialize;

/// Top-level Overpass `[out:json]` body: `{ "elements": [ ... ] }`.
///
/// Other top-level keys (`version`, `generator`, `osm3s`, `remark`) are ignored.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Option<Vec<OverpassElement>>,
}

impl OverpassResponse {
    #[must_use]
    pub fn into_elements(self) -> Vec<OverpassElement> {
        self.elements.unwrap_or_default()
    }
}

/// One OSM element. Nodes carry `lat`/`lon`; ways and relations carry a
/// `center` when the query asks for `out center`.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub element_type: String,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// One entry of a Nominatim `/search?format=json` array.
///
/// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}
