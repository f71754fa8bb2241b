use std::path::PathBuf;

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub kakao_rest_api_key: String,
    pub kakao_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Radius of every per-keyword search, in meters.
    pub search_radius_m: u32,
    /// Results requested per keyword search.
    pub page_size: u32,
    /// Used when geolocation fails.
    pub default_center: Coordinate,
    pub default_zoom: u8,
    /// Optional YAML file overriding the built-in keywords and rules.
    pub discovery_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("kakao_rest_api_key", &"[redacted]")
            .field("kakao_base_url", &self.kakao_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_radius_m", &self.search_radius_m)
            .field("page_size", &self.page_size)
            .field("default_center", &self.default_center)
            .field("default_zoom", &self.default_zoom)
            .field("discovery_path", &self.discovery_path)
            .finish()
    }
}
