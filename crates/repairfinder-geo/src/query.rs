//! Search area parsing and Overpass QL construction.

use thiserror::Error;

pub const MIN_RADIUS_M: f64 = 500.0;
pub const MAX_RADIUS_M: f64 = 12_000.0;
pub const DEFAULT_RADIUS_M: f64 = 3_000.0;

/// Server-side Overpass timeout declared in the query header.
pub const QUERY_TIMEOUT_SECS: u32 = 25;

/// Client input rejected before any remote call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("lat and lng required")]
    MissingCoordinates,

    #[error("lat/lng/radius must be numbers")]
    NotANumber,
}

/// A validated search center with its radius already clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchArea {
    pub lat: f64,
    pub lng: f64,
    pub radius_m: f64,
}

impl SearchArea {
    /// Build a search area from numeric inputs.
    ///
    /// `radius_m` defaults to 3000 and is clamped to `[500, 12000]`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::NotANumber`] for non-finite coordinates or a NaN radius.
    pub fn new(lat: f64, lng: f64, radius_m: Option<f64>) -> Result<Self, InputError> {
        let radius_m = radius_m.unwrap_or(DEFAULT_RADIUS_M);
        if !lat.is_finite() || !lng.is_finite() || radius_m.is_nan() {
            return Err(InputError::NotANumber);
        }
        Ok(Self {
            lat,
            lng,
            radius_m: clamp_radius(radius_m),
        })
    }

    /// Parse raw query-string values.
    ///
    /// Missing or blank `lat`/`lng` is [`InputError::MissingCoordinates`]; a
    /// blank `radius` falls back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] when coordinates are missing or any value is not a number.
    pub fn parse(
        lat: Option<&str>,
        lng: Option<&str>,
        radius: Option<&str>,
    ) -> Result<Self, InputError> {
        fn non_blank(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        let (Some(lat), Some(lng)) = (non_blank(lat), non_blank(lng)) else {
            return Err(InputError::MissingCoordinates);
        };

        let number = |s: &str| s.parse::<f64>().map_err(|_| InputError::NotANumber);

        let radius = non_blank(radius).map(number).transpose()?;
        Self::new(number(lat)?, number(lng)?, radius)
    }

    /// Overpass QL for this area.
    #[must_use]
    pub fn to_query(&self) -> String {
        build_query(self.lat, self.lng, self.radius_m)
    }
}

/// Clamp a radius in meters to the supported search band.
#[must_use]
pub fn clamp_radius(radius_m: f64) -> f64 {
    radius_m.clamp(MIN_RADIUS_M, MAX_RADIUS_M)
}

/// Build the Overpass QL selecting phone shops and electronics repair crafts
/// around a point.
///
/// `out center` makes Overpass attach a centroid to ways and relations.
/// Inputs are finite numbers, so interpolation needs no escaping.
#[must_use]
pub fn build_query(lat: f64, lng: f64, radius_m: f64) -> String {
    let radius = clamp_radius(radius_m);
    format!(
        "[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n\
         (\n  \
         nwr(around:{radius},{lat},{lng})[\"shop\"=\"mobile_phone\"];\n  \
         nwr(around:{radius},{lat},{lng})[\"craft\"=\"electronics_repair\"];\n\
         );\n\
         out center;"
    )
}
