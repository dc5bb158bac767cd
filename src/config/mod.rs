//! Application configuration.
//!
//! Settings are read from environment variables through the `config` and
//! `dotenvy` crates. Keys use the `RAVEN` prefix and `__` between nesting
//! levels, so `RAVEN__DATABASE__URL` becomes `database.url`.
//!
//! ```no_run
//! use raven::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod document_server;
mod error;
mod hub;
mod server;
mod storage;

pub use database::DatabaseConfig;
pub use document_server::DocumentServerConfig;
pub use error::{ConfigError, ValidationError};
pub use hub::HubConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL connection. The only section without usable defaults.
    pub database: DatabaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Event hub queue sizing and stream keep-alive.
    #[serde(default)]
    pub hub: HubConfig,

    #[serde(default)]
    pub document_server: DocumentServerConfig,
}

impl AppConfig {
    /// Load configuration from the environment, reading `.env` first if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required key is missing or a value does
    /// not parse into its field type.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RAVEN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.storage.validate()?;
        self.hub.validate()?;
        self.document_server.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
