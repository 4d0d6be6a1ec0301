pub mod app_config;
pub mod config;
pub mod fallback;
pub mod geo;
pub mod pharmacy;
pub mod rank;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use fallback::{load_fallback_dataset, FallbackDataset, FallbackMedicine};
pub use geo::{haversine_km, round_km, Coordinate, EARTH_RADIUS_KM};
pub use pharmacy::{Pharmacy, PharmacyStatus, Product, SearchResult};
pub use rank::rank;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read fallback dataset at {path}: {source}")]
    FallbackFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fallback dataset: {0}")]
    FallbackFileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("coordinate out of range: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("unknown pharmacy status: {0}")]
    UnknownStatus(String),
}
