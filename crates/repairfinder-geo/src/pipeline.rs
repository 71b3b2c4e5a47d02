//! End-to-end shop search: query, failover fetch, normalize, filter, rank.

use std::fmt;

use repairfinder_core::{AppConfig, RelevanceKeywords};

use crate::error::{GeoError, ShopSearchError};
use crate::normalize::normalize_elements;
use crate::overpass::OverpassClient;
use crate::query::SearchArea;
use crate::rank::{rank_by_distance, RankedShop};
use crate::relevance::RelevanceFilter;

/// Stages a single search passes through, in order. Used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    BuildingQuery,
    Fetching,
    Normalizing,
    Filtering,
    Ranking,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStage::BuildingQuery => "building_query",
            PipelineStage::Fetching => "fetching",
            PipelineStage::Normalizing => "normalizing",
            PipelineStage::Filtering => "filtering",
            PipelineStage::Ranking => "ranking",
            PipelineStage::Done => "done",
        };
        f.write_str(s)
    }
}

/// Shared, stateless shop search. Safe to call concurrently.
pub struct ShopFinder {
    overpass: OverpassClient,
    filter: RelevanceFilter,
}

impl ShopFinder {
    #[must_use]
    pub fn new(overpass: OverpassClient, filter: RelevanceFilter) -> Self {
        Self { overpass, filter }
    }

    /// Builds the finder from runtime config and the loaded keyword sets.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if the Overpass client cannot be constructed.
    pub fn from_config(config: &AppConfig, keywords: RelevanceKeywords) -> Result<Self, GeoError> {
        let overpass = OverpassClient::new(
            &config.overpass_endpoints,
            config.overpass_timeout_secs,
            &config.user_agent,
        )?;
        Ok(Self::new(overpass, RelevanceFilter::new(keywords)))
    }

    /// Relevant repair shops around `area`, nearest first.
    ///
    /// An empty list is a valid outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ShopSearchError::UpstreamUnavailable`] when no Overpass
    /// endpoint produced a usable response.
    pub async fn find_shops(&self, area: &SearchArea) -> Result<Vec<RankedShop>, ShopSearchError> {
        tracing::debug!(stage = %PipelineStage::BuildingQuery, lat = area.lat, lng = area.lng, radius_m = area.radius_m);
        let query = area.to_query();

        tracing::debug!(stage = %PipelineStage::Fetching, endpoints = self.overpass.endpoints().len());
        let elements = self.overpass.fetch(&query).await?.into_elements();

        tracing::debug!(stage = %PipelineStage::Normalizing, elements = elements.len());
        let candidates = normalize_elements(elements);

        tracing::debug!(stage = %PipelineStage::Filtering, candidates = candidates.len());
        let relevant = self.filter.apply(candidates);

        tracing::debug!(stage = %PipelineStage::Ranking, relevant = relevant.len());
        let ranked = rank_by_distance((area.lat, area.lng), relevant);

        tracing::debug!(stage = %PipelineStage::Done, results = ranked.len());
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_is_snake_case() {
        assert_eq!(PipelineStage::BuildingQuery.to_string(), "building_query");
        assert_eq!(PipelineStage::Done.to_string(), "done");
    }
}
