mod api;
mod middleware;

use std::sync::Arc;

use repairfinder_core::RelevanceKeywords;
use repairfinder_geo::{Geocoder, ShopFinder};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AdminAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = repairfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let keywords = match &config.keywords_path {
        Some(path) => repairfinder_core::load_keywords(path)?,
        None => RelevanceKeywords::default(),
    };

    let pool_config = repairfinder_db::PoolConfig::from_app_config(&config);
    let pool = repairfinder_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = repairfinder_db::run_migrations(&pool).await?;
    tracing::info!(applied, "migrations up to date");

    let shops = ShopFinder::from_config(&config, keywords)?;
    let geocoder = Geocoder::new(
        &config.geocoder_base_url,
        config.geocoder_timeout_secs,
        &config.user_agent,
    )?;
    let admin = AdminAuth::from_config(&config);

    let app = build_app(
        AppState {
            pool,
            shops: Arc::new(shops),
            geocoder: Arc::new(geocoder),
        },
        admin,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "repairfinder-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
