use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Overpass interpreters used when `REPAIRFINDER_OVERPASS_ENDPOINTS` is unset.
pub const DEFAULT_OVERPASS_ENDPOINTS: &[&str] = &[
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
];

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("REPAIRFINDER_ENV", "development"))?;

    let bind_addr = parse("REPAIRFINDER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("REPAIRFINDER_LOG_LEVEL", "info");
    let admin_password = optional("REPAIRFINDER_ADMIN_PASSWORD");
    let keywords_path = optional("REPAIRFINDER_KEYWORDS_PATH").map(PathBuf::from);

    let db_max_connections = parse_u32("REPAIRFINDER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("REPAIRFINDER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("REPAIRFINDER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    if db_min_connections > db_max_connections {
        return Err(ConfigError::InvalidEnvVar {
            var: "REPAIRFINDER_DB_MIN_CONNECTIONS".to_string(),
            reason: format!(
                "min connections ({db_min_connections}) exceeds max connections ({db_max_connections})"
            ),
        });
    }

    let overpass_endpoints = parse_endpoints(
        "REPAIRFINDER_OVERPASS_ENDPOINTS",
        &or_default(
            "REPAIRFINDER_OVERPASS_ENDPOINTS",
            &DEFAULT_OVERPASS_ENDPOINTS.join(","),
        ),
    )?;
    let overpass_timeout_secs = parse_u64("REPAIRFINDER_OVERPASS_TIMEOUT_SECS", "30")?;

    let geocoder_base_url = or_default(
        "REPAIRFINDER_GEOCODER_BASE_URL",
        "https://nominatim.openstreetmap.org",
    );
    let geocoder_timeout_secs = parse_u64("REPAIRFINDER_GEOCODER_TIMEOUT_SECS", "10")?;

    let user_agent = or_default(
        "REPAIRFINDER_USER_AGENT",
        "repairfinder/0.1 (repair-shop-discovery)",
    );

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        admin_password,
        keywords_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        overpass_endpoints,
        overpass_timeout_secs,
        geocoder_base_url,
        geocoder_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REPAIRFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Split a comma-separated endpoint list, preserving order.
///
/// Order matters: the failover loop probes endpoints front to back.
fn parse_endpoints(var: &str, raw: &str) -> Result<Vec<String>, ConfigError> {
    let endpoints: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    if endpoints.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "at least one endpoint is required".to_string(),
        });
    }

    if let Some(bad) = endpoints
        .iter()
        .find(|e| !(e.starts_with("http://") || e.starts_with("https://")))
    {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("endpoint '{bad}' must be an http(s) URL"),
        });
    }

    Ok(endpoints)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
