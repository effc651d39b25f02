//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod database;
pub mod logging;
pub mod release;
pub mod report;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;
pub use self::release::ReleaseConfig;
pub use self::report::ReportConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persistence settings.
    pub database: DatabaseConfig,
    /// Asset and report storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Release payload limits.
    #[serde(default)]
    pub release: ReleaseConfig,
    /// Report generation settings.
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default`, the environment-specific overlay
    /// `config/{env}` and environment variables prefixed with `NOVA__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration starting from an explicit base file.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("NOVA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
