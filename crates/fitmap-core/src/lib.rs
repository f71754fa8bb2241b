//! Domain types and pure pipeline stages for the nearby exercise facility
//! finder: geodesic math, distance-base resolution, classification rules,
//! filtering and distance ordering.

pub mod app_config;
pub mod config;
pub mod discovery;
pub mod distance_base;
pub mod facility;
pub mod filter;
pub mod geo;
pub mod sort;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use discovery::{
    default_rules, load_discovery, AttributeRule, DiscoveryFile, MatchField, RuleAttribute,
    DEFAULT_KEYWORDS,
};
pub use distance_base::resolve_distance_base;
pub use facility::{AttributeTag, Facility, FacilityAttributes, OpenState};
pub use filter::{apply_filters, FilterState};
pub use geo::{distance_km, distance_meters, format_distance, Coordinate};
pub use sort::sort_by_distance;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate out of range: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("unknown attribute filter: {0}")]
    UnknownAttributeTag(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read discovery file {path}: {source}")]
    DiscoveryFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse discovery file: {0}")]
    DiscoveryFileParse(#[from] serde_yaml::Error),

    #[error("discovery file validation failed: {0}")]
    Validation(String),
}
