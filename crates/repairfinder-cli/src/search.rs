//! `shops` and `geocode` handlers: run the discovery pipeline or the
//! geocoder once and print the result as JSON on stdout.

use repairfinder_core::{AppConfig, RelevanceKeywords};
use repairfinder_geo::{Geocoder, SearchArea, ShopFinder};

/// Run one shop search and print the ranked results.
///
/// # Errors
///
/// Returns an error if the inputs are not finite numbers, the keyword file
/// cannot be loaded, or every Overpass endpoint fails.
pub(crate) async fn run_shops(
    config: &AppConfig,
    lat: f64,
    lng: f64,
    radius: Option<f64>,
) -> anyhow::Result<()> {
    let area = SearchArea::new(lat, lng, radius)?;

    let keywords = match &config.keywords_path {
        Some(path) => repairfinder_core::load_keywords(path)?,
        None => RelevanceKeywords::default(),
    };
    let finder = ShopFinder::from_config(config, keywords)?;

    let shops = finder.find_shops(&area).await?;
    tracing::info!(results = shops.len(), radius_m = area.radius_m, "shop search complete");

    println!("{}", serde_json::to_string_pretty(&shops)?);
    Ok(())
}

/// Geocode `query` and print the match.
///
/// # Errors
///
/// Returns an error if the query is blank, nothing matches, or the geocoder
/// is unreachable.
pub(crate) async fn run_geocode(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let geocoder = Geocoder::new(
        &config.geocoder_base_url,
        config.geocoder_timeout_secs,
        &config.user_agent,
    )?;

    let result = geocoder.geocode(query).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
