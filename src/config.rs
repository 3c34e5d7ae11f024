use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lead_times::LeadTimes;
use crate::persistence::{JsonStyleStore, PersistenceError, StyleStore};

pub const CONFIG_PATH_ENV: &str = "GARMENT_SCHEDULE_CONFIG";
pub const DATA_DIR_ENV: &str = "GARMENT_SCHEDULE_DATA_DIR";
pub const BACKEND_ENV: &str = "GARMENT_SCHEDULE_BACKEND";
pub const BIND_ENV: &str = "GARMENT_SCHEDULE_BIND";
pub const LOG_ENV: &str = "GARMENT_SCHEDULE_LOG";

const DEFAULT_CONFIG_FILE: &str = "garment-schedule.toml";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub storage: StorageConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub lead_times: LeadTimes,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    /// Defaults to `styles.db` inside `data_dir`.
    pub sqlite_path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("user_data"),
            backend: StorageBackend::Json,
            sqlite_path: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::Validation(format!(
                "unsupported storage backend `{other}` (expected json|sqlite)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|json)"
            ))),
        }
    }
}

impl PlannerConfig {
    /// Defaults, then the config file, then `GARMENT_SCHEDULE_*` variables.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        Self::load_with(options, |key| env::var(key).ok())
    }

    /// Like [`PlannerConfig::load`] with environment lookups supplied by the
    /// caller.
    pub fn load_with<F>(options: LoadOptions, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit = options
            .config_path
            .clone()
            .or_else(|| read_var(&lookup, CONFIG_PATH_ENV).map(PathBuf::from));
        let path = explicit.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.is_file() {
            Self::from_file(&path)?
        } else if options.require_file || explicit.is_some() {
            return Err(ConfigError::MissingConfigFile(path));
        } else {
            Self::default()
        };

        config.apply_env_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_env_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = read_var(lookup, DATA_DIR_ENV) {
            self.storage.data_dir = PathBuf::from(value);
        }
        if let Some(value) = read_var(lookup, BACKEND_ENV) {
            self.storage.backend = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: BACKEND_ENV.to_string(),
                value: value.clone(),
            })?;
        }
        if let Some(value) = read_var(lookup, BIND_ENV) {
            self.server.bind_address = value;
        }
        if let Some(value) = read_var(lookup, LOG_ENV) {
            self.logging.level = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "storage.data_dir must not be empty".to_string(),
            ));
        }
        if self.server.bind_address.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.bind_address `{}` is not a socket address",
                self.server.bind_address
            )));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }
        let negative = self.lead_times.negative_fields();
        if !negative.is_empty() {
            return Err(ConfigError::Validation(format!(
                "lead times must not be negative: {}",
                negative.join(", ")
            )));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "server.bind_address `{}` is not a socket address",
                self.server.bind_address
            ))
        })
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.storage
            .sqlite_path
            .clone()
            .unwrap_or_else(|| self.storage.data_dir.join("styles.db"))
    }

    /// Opens the configured style store.
    pub fn open_store(&self) -> Result<Arc<dyn StyleStore>, PersistenceError> {
        match self.storage.backend {
            StorageBackend::Json => Ok(Arc::new(JsonStyleStore::new(&self.storage.data_dir)?)),
            #[cfg(feature = "sqlite")]
            StorageBackend::Sqlite => {
                let path = self.sqlite_path();
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                Ok(Arc::new(crate::persistence::sqlite::SqliteStyleStore::new(path)?))
            }
            #[cfg(not(feature = "sqlite"))]
            StorageBackend::Sqlite => Err(PersistenceError::InvalidData(
                "sqlite backend requested but the `sqlite` feature is disabled".to_string(),
            )),
        }
    }
}

fn read_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
