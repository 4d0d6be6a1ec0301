use std::net::SocketAddr;
use std::path::PathBuf;

use rust_decimal::Decimal;

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
    /// Catalog store connection string. `None` disables the store.
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub use_external_store: bool,
    pub fallback_path: Option<PathBuf>,
    pub default_location: Coordinate,
    pub geo_timeout_ms: u64,
    pub geo_max_age_ms: u64,
    pub geo_url: Option<String>,
    pub store_timeout_secs: u64,
    pub fallback_price_min: Decimal,
    pub fallback_price_max: Decimal,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Whether searches should query the catalog store at all.
    #[must_use]
    pub fn store_enabled(&self) -> bool {
        self.use_external_store && self.database_url.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("use_external_store", &self.use_external_store)
            .field("fallback_path", &self.fallback_path)
            .field("default_location", &self.default_location)
            .field("geo_timeout_ms", &self.geo_timeout_ms)
            .field("geo_max_age_ms", &self.geo_max_age_ms)
            .field("geo_url", &self.geo_url)
            .field("store_timeout_secs", &self.store_timeout_secs)
            .field("fallback_price_min", &self.fallback_price_min)
            .field("fallback_price_max", &self.fallback_price_max)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
