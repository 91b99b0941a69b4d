use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::app_config::{AdvisoryFeedSource, AppConfig, Environment};
use crate::geo::Coordinate;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Core parsing/validation, decoupled from the process environment so tests
/// can feed a plain map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("DISPATCH_ENV", "development"))?;
    let bind_addr = parse_or(&lookup, "DISPATCH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("DISPATCH_LOG_LEVEL", "info");

    let places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let places_base_url = or_default(
        "DISPATCH_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api/place/",
    );
    let places_timeout_secs = parse_or(&lookup, "DISPATCH_PLACES_TIMEOUT_SECS", "10")?;

    let lat: f64 = parse_or(&lookup, "DISPATCH_REFERENCE_LAT", "37.8715")?;
    let lng: f64 = parse_or(&lookup, "DISPATCH_REFERENCE_LNG", "-122.2730")?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(invalid("DISPATCH_REFERENCE_LAT", "must be within [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(invalid("DISPATCH_REFERENCE_LNG", "must be within [-180, 180]"));
    }

    let search_radius = parse_or(&lookup, "DISPATCH_SEARCH_RADIUS", "5000")?;
    let eta_minutes_per_mile: f64 = parse_or(&lookup, "DISPATCH_ETA_MINUTES_PER_MILE", "2.0")?;
    if !eta_minutes_per_mile.is_finite() || eta_minutes_per_mile < 0.0 {
        return Err(invalid(
            "DISPATCH_ETA_MINUTES_PER_MILE",
            "must be a non-negative number",
        ));
    }

    let advisory_feed =
        AdvisoryFeedSource::parse(&or_default("DISPATCH_ADVISORY_FEED", "./data/advisories.json"));
    let advisory_poll_secs: u64 = parse_or(&lookup, "DISPATCH_ADVISORY_POLL_SECS", "3")?;
    if advisory_poll_secs == 0 {
        return Err(invalid("DISPATCH_ADVISORY_POLL_SECS", "must be at least 1"));
    }
    let advisory_capacity: usize = parse_or(&lookup, "DISPATCH_ADVISORY_CAPACITY", "200")?;
    if advisory_capacity == 0 {
        return Err(invalid("DISPATCH_ADVISORY_CAPACITY", "must be at least 1"));
    }
    let advisory_feed_timeout_secs: u64 =
        parse_or(&lookup, "DISPATCH_ADVISORY_FEED_TIMEOUT_SECS", "2")?;
    if advisory_feed_timeout_secs == 0 {
        return Err(invalid(
            "DISPATCH_ADVISORY_FEED_TIMEOUT_SECS",
            "must be at least 1",
        ));
    }
    let advisory_store_path = PathBuf::from(or_default(
        "DISPATCH_ADVISORY_STORE_PATH",
        "./data/advisory_store.json",
    ));

    let proxy_rate_limit_per_minute: usize =
        parse_or(&lookup, "DISPATCH_PROXY_RATE_LIMIT_PER_MINUTE", "60")?;
    if proxy_rate_limit_per_minute == 0 {
        return Err(invalid(
            "DISPATCH_PROXY_RATE_LIMIT_PER_MINUTE",
            "must be at least 1",
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        places_timeout_secs,
        reference: Coordinate::new(lat, lng),
        search_radius,
        eta_minutes_per_mile,
        advisory_feed,
        advisory_poll_secs,
        advisory_capacity,
        advisory_feed_timeout_secs,
        advisory_store_path,
        proxy_rate_limit_per_minute,
    })
}

fn parse_or<T, F>(lookup: &F, var: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let raw = lookup(var).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| invalid(var, &e.to_string()))
}

fn invalid(var: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(invalid(
            "DISPATCH_ENV",
            &format!("unknown environment '{other}'"),
        )),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
