use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::repositories::{FileStorage, KeyValueStorage, MemoryStorage, UnavailableStorage};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

/// Persistent medium behind the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum StorageBackend {
    Memory,
    File,
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(rename = "storage_backend", default = "default_storage_backend")]
    pub backend: StorageBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
    #[serde(default = "default_favorites_key")]
    pub favorites_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

impl Config {
    pub fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let config = Config {
            storage: StorageConfig::from_env()?,
            observability: ObservabilityConfig::from_env()?,
        };

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Configuration: {:?}", config);

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.cart_key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Cart key cannot be empty".to_string(),
            });
        }

        if self.storage.favorites_key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Favorites key cannot be empty".to_string(),
            });
        }

        if self.storage.cart_key == self.storage.favorites_key {
            return Err(ConfigError::ValidationError {
                message: "Cart and favorites keys must differ".to_string(),
            });
        }

        if self.storage.backend == StorageBackend::File
            && self.storage.data_dir.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationError {
                message: "Data directory cannot be empty for the file backend".to_string(),
            });
        }

        Ok(())
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_from_env("storage")
    }

    /// Open the configured backend
    pub fn open_backend(&self) -> Result<Arc<dyn KeyValueStorage>, ConfigError> {
        let storage: Arc<dyn KeyValueStorage> = match self.backend {
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
            StorageBackend::File => {
                Arc::new(FileStorage::open(&self.data_dir).map_err(|e| {
                    ConfigError::LoadError {
                        message: format!(
                            "Failed to open data directory {}: {}",
                            self.data_dir.display(),
                            e
                        ),
                    }
                })?)
            }
            StorageBackend::None => Arc::new(UnavailableStorage),
        };
        Ok(storage)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_dir: default_data_dir(),
            cart_key: default_cart_key(),
            favorites_key: default_favorites_key(),
        }
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_from_env("observability")
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_level: default_log_level(),
            enable_json_logging: default_enable_json_logging(),
        }
    }
}

fn load_from_env<T: serde::de::DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix("MOTOSHOP"))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "none" => Ok(StorageBackend::None),
            other => Err(ConfigError::ValidationError {
                message: format!(
                    "Unknown storage backend '{}', expected memory, file or none",
                    other
                ),
            }),
        }
    }
}

impl TryFrom<String> for StorageBackend {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::File => write!(f, "file"),
            StorageBackend::None => write!(f, "none"),
        }
    }
}

// Default value functions
pub(crate) fn default_storage_backend() -> StorageBackend {
    StorageBackend::Memory
}

pub(crate) fn default_data_dir() -> PathBuf {
    PathBuf::from(".motoshop")
}

pub(crate) fn default_cart_key() -> String {
    "cart".to_string()
}

pub(crate) fn default_favorites_key() -> String {
    "favorites".to_string()
}

pub(crate) fn default_service_name() -> String {
    "motoshop-rs".to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_enable_json_logging() -> bool {
    false
}
