use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
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
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing is decoupled from the real environment so tests can drive it
/// from a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    use rust_decimal::Decimal;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = lookup("DATABASE_URL").ok().filter(|s| !s.trim().is_empty());
    let env = parse_environment(&or_default("PHARMALOC_ENV", "development"));
    let bind_addr: SocketAddr = parse_or(&lookup, "PHARMALOC_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PHARMALOC_LOG_LEVEL", "info");

    let use_external_store = parse_bool(
        "PHARMALOC_USE_EXTERNAL_STORE",
        &or_default("PHARMALOC_USE_EXTERNAL_STORE", "true"),
    )?;
    let fallback_path = lookup("PHARMALOC_FALLBACK_PATH").ok().map(PathBuf::from);

    let default_lat: f64 = parse_or(
        &lookup,
        "PHARMALOC_DEFAULT_LAT",
        &Coordinate::OUAGADOUGOU.lat.to_string(),
    )?;
    let default_lng: f64 = parse_or(
        &lookup,
        "PHARMALOC_DEFAULT_LNG",
        &Coordinate::OUAGADOUGOU.lng.to_string(),
    )?;
    let default_location = Coordinate::new(default_lat, default_lng)
        .map_err(|e| ConfigError::Validation(format!("default location: {e}")))?;

    let geo_timeout_ms: u64 = parse_or(&lookup, "PHARMALOC_GEO_TIMEOUT_MS", "15000")?;
    let geo_max_age_ms: u64 = parse_or(&lookup, "PHARMALOC_GEO_MAX_AGE_MS", "60000")?;
    let geo_url = lookup("PHARMALOC_GEO_URL").ok().filter(|s| !s.trim().is_empty());
    let store_timeout_secs: u64 = parse_or(&lookup, "PHARMALOC_STORE_TIMEOUT_SECS", "10")?;

    let fallback_price_min: Decimal = parse_or(&lookup, "PHARMALOC_FALLBACK_PRICE_MIN", "500")?;
    let fallback_price_max: Decimal = parse_or(&lookup, "PHARMALOC_FALLBACK_PRICE_MAX", "5000")?;
    if fallback_price_min.is_sign_negative() {
        return Err(ConfigError::Validation(format!(
            "fallback price minimum must not be negative: {fallback_price_min}"
        )));
    }
    if fallback_price_min > fallback_price_max {
        return Err(ConfigError::Validation(format!(
            "fallback price range is empty: {fallback_price_min} > {fallback_price_max}"
        )));
    }

    let db_max_connections: u32 = parse_or(&lookup, "PHARMALOC_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections: u32 = parse_or(&lookup, "PHARMALOC_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs: u64 =
        parse_or(&lookup, "PHARMALOC_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        use_external_store,
        fallback_path,
        default_location,
        geo_timeout_ms,
        geo_max_age_ms,
        geo_url,
        store_timeout_secs,
        fallback_price_min,
        fallback_price_max,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse `var` from the lookup, falling back to `default` when it is unset.
fn parse_or<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got '{other}'"),
        }),
    }
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
