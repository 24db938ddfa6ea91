//! Service Configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `FLIGHT_DELAY__*` environment variables.

use config::{Config, ConfigError, Environment, File};
use inference_engine::ClassifierConfig;
use serde::{Deserialize, Serialize};

/// Default configuration file, without extension
pub const DEFAULT_CONFIG_PATH: &str = "config/flight-delay";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "FLIGHT_DELAY";

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

/// Training data settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV dataset read once at startup
    pub dataset_path: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
}

/// Top-level service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl AppConfig {
    /// Load from the default file location and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from a given file (optional) and the environment
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.bind_addr", "0.0.0.0:8080")?
            .set_default("data.dataset_path", "data/data.csv")?
            .set_default("logging.level", "info")?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
