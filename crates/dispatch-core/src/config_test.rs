use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "DISPATCH_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.places_api_key.is_none());
    assert_eq!(
        cfg.places_base_url,
        "https://maps.googleapis.com/maps/api/place/"
    );
    assert_eq!(cfg.places_timeout_secs, 10);
    assert_eq!(cfg.reference, Coordinate::new(37.8715, -122.2730));
    assert_eq!(cfg.search_radius, 5000);
    assert!((cfg.eta_minutes_per_mile - 2.0).abs() < f64::EPSILON);
    assert_eq!(
        cfg.advisory_feed,
        AdvisoryFeedSource::File(PathBuf::from("./data/advisories.json"))
    );
    assert_eq!(cfg.advisory_poll_secs, 3);
    assert_eq!(cfg.advisory_capacity, 200);
    assert_eq!(cfg.advisory_feed_timeout(), std::time::Duration::from_secs(2));
    assert_eq!(
        cfg.advisory_store_path,
        PathBuf::from("./data/advisory_store.json")
    );
    assert_eq!(cfg.proxy_rate_limit_per_minute, 60);
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("DISPATCH_ENV", "production");
    map.insert("GOOGLE_PLACES_API_KEY", "secret-key");
    map.insert("DISPATCH_REFERENCE_LAT", "34.0522");
    map.insert("DISPATCH_REFERENCE_LNG", "-118.2437");
    map.insert("DISPATCH_SEARCH_RADIUS", "8000");
    map.insert("DISPATCH_ETA_MINUTES_PER_MILE", "1.5");
    map.insert("DISPATCH_ADVISORY_FEED", "http://localhost:8000/advice.json");

    let cfg = build_app_config(lookup_from_map(&map)).expect("overrides should load");

    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.places_api_key.as_deref(), Some("secret-key"));
    assert_eq!(cfg.reference, Coordinate::new(34.0522, -118.2437));
    assert_eq!(cfg.search_radius, 8000);
    assert!((cfg.ranking().minutes_per_mile - 1.5).abs() < f64::EPSILON);
    assert_eq!(
        cfg.advisory_feed,
        AdvisoryFeedSource::Url("http://localhost:8000/advice.json".to_string())
    );
}

#[test]
fn blank_api_key_counts_as_missing() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_PLACES_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert!(cfg.places_api_key.is_none());
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("GOOGLE_PLACES_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    let debug = format!("{cfg:?}");
    assert!(!debug.contains("secret-key"));
    assert!(debug.contains("[redacted]"));
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("DISPATCH_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DISPATCH_BIND_ADDR"),
        "expected InvalidEnvVar(DISPATCH_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_out_of_range_reference() {
    let mut map = HashMap::new();
    map.insert("DISPATCH_REFERENCE_LAT", "91");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DISPATCH_REFERENCE_LAT"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_radius() {
    let mut map = HashMap::new();
    map.insert("DISPATCH_SEARCH_RADIUS", "five miles");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DISPATCH_SEARCH_RADIUS"),
        "got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_poll_interval_and_capacity() {
    let mut map = HashMap::new();
    map.insert("DISPATCH_ADVISORY_POLL_SECS", "0");
    assert!(matches!(
        build_app_config(lookup_from_map(&map)),
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DISPATCH_ADVISORY_POLL_SECS"
    ));

    let mut map = HashMap::new();
    map.insert("DISPATCH_ADVISORY_CAPACITY", "0");
    assert!(matches!(
        build_app_config(lookup_from_map(&map)),
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DISPATCH_ADVISORY_CAPACITY"
    ));
}

#[test]
fn advisory_feed_timeout_is_separate_from_places_timeout() {
    let mut map = HashMap::new();
    map.insert("DISPATCH_PLACES_TIMEOUT_SECS", "30");
    map.insert("DISPATCH_ADVISORY_FEED_TIMEOUT_SECS", "1");
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    assert_eq!(cfg.places_timeout_secs, 30);
    assert_eq!(cfg.advisory_feed_timeout_secs, 1);

    let mut map = HashMap::new();
    map.insert("DISPATCH_ADVISORY_FEED_TIMEOUT_SECS", "0");
    assert!(matches!(
        build_app_config(lookup_from_map(&map)),
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DISPATCH_ADVISORY_FEED_TIMEOUT_SECS"
    ));
}

#[test]
fn feed_source_detects_urls() {
    assert_eq!(
        AdvisoryFeedSource::parse("https://example.com/feed.json"),
        AdvisoryFeedSource::Url("https://example.com/feed.json".to_string())
    );
    assert_eq!(
        AdvisoryFeedSource::parse("feed.json"),
        AdvisoryFeedSource::File(PathBuf::from("feed.json"))
    );
}

#[test]
fn require_places_api_key_reports_missing_var() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("config");
    let err = cfg.require_places_api_key().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "GOOGLE_PLACES_API_KEY"));
}
