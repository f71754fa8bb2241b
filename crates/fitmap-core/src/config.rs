use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

/// Provider limits for the keyword-search endpoint.
const MAX_SEARCH_RADIUS_M: u32 = 20_000;
const MAX_PAGE_SIZE: u32 = 15;

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
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let kakao_rest_api_key = require("KAKAO_REST_API_KEY")?;

    let env = parse_environment(&or_default("FITMAP_ENV", "development"))?;
    let log_level = or_default("FITMAP_LOG_LEVEL", "info");
    let kakao_base_url = or_default("FITMAP_KAKAO_BASE_URL", "https://dapi.kakao.com/");
    let request_timeout_secs: u64 = parse_var(
        "FITMAP_REQUEST_TIMEOUT_SECS",
        &or_default("FITMAP_REQUEST_TIMEOUT_SECS", "10"),
    )?;
    let user_agent = or_default("FITMAP_USER_AGENT", "fitmap/0.1 (nearby-facilities)");

    let search_radius_m: u32 = parse_var(
        "FITMAP_SEARCH_RADIUS_M",
        &or_default("FITMAP_SEARCH_RADIUS_M", "2000"),
    )?;
    ensure_range("FITMAP_SEARCH_RADIUS_M", search_radius_m, MAX_SEARCH_RADIUS_M)?;

    let page_size: u32 = parse_var("FITMAP_PAGE_SIZE", &or_default("FITMAP_PAGE_SIZE", "15"))?;
    ensure_range("FITMAP_PAGE_SIZE", page_size, MAX_PAGE_SIZE)?;

    let default_lat: f64 =
        parse_var("FITMAP_DEFAULT_LAT", &or_default("FITMAP_DEFAULT_LAT", "37.5665"))?;
    let default_lng: f64 =
        parse_var("FITMAP_DEFAULT_LNG", &or_default("FITMAP_DEFAULT_LNG", "126.9780"))?;
    let default_center =
        Coordinate::new(default_lat, default_lng).map_err(|e| ConfigError::InvalidEnvVar {
            var: "FITMAP_DEFAULT_LAT/FITMAP_DEFAULT_LNG".to_string(),
            reason: e.to_string(),
        })?;

    let default_zoom: u8 = parse_var("FITMAP_DEFAULT_ZOOM", &or_default("FITMAP_DEFAULT_ZOOM", "4"))?;
    let discovery_path = lookup("FITMAP_DISCOVERY_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        kakao_rest_api_key,
        kakao_base_url,
        request_timeout_secs,
        user_agent,
        search_radius_m,
        page_size,
        default_center,
        default_zoom,
        discovery_path,
    })
}

fn parse_var<T>(var: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn ensure_range(var: &str, value: u32, max: u32) -> Result<(), ConfigError> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("must be between 1 and {max}, got {value}"),
        })
    }
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FITMAP_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
