//! Repair shop discovery: Overpass query construction, endpoint failover,
//! normalization, relevance filtering, and distance ranking, plus the
//! Nominatim geocoder used to turn a typed place into coordinates.

pub mod error;
pub mod geocode;
pub mod normalize;
pub mod overpass;
pub mod pipeline;
pub mod query;
pub mod rank;
pub mod relevance;
pub mod types;

pub use error::{GeoError, GeocodeError, ShopSearchError};
pub use geocode::{GeocodeResult, Geocoder};
pub use normalize::{normalize_elements, ShopCandidate, SourceKind, UNNAMED_SHOP};
pub use overpass::{Diagnostic, OverpassClient};
pub use pipeline::{PipelineStage, ShopFinder};
pub use query::{build_query, clamp_radius, InputError, SearchArea};
pub use rank::{haversine_meters, rank_by_distance, RankedShop, EARTH_RADIUS_M};
pub use relevance::RelevanceFilter;
