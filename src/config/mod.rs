//! Configuration loading and management
//!
//! The whole service is driven by one [`AppConfig`] value, loaded from YAML and
//! optionally patched from environment variables. It is handed to the
//! components that need it at construction time; nothing reads process state
//! after startup.
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 5000
//! database:
//!   uri: mongodb://localhost:27017
//!   name: foods
//! upload:
//!   file_upload_path: ./public/uploads
//!   max_file_upload: 1000000
//! query:
//!   default_limit: 10
//!   max_limit: 100
//!   default_sort: -createdAt
//!   count_mode: collection
//! ```

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
    pub query: QueryConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Document store settings
///
/// When `uri` is absent the service runs on the in-memory collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub uri: Option<String>,
    pub name: String,
    pub collection: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            name: "foods".to_string(),
            collection: "foods".to_string(),
        }
    }
}

/// Photo upload settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory photos are written to
    pub file_upload_path: PathBuf,

    /// Maximum photo size in bytes
    pub max_file_upload: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            file_upload_path: PathBuf::from("./public/uploads"),
            max_file_upload: 1_000_000,
        }
    }
}

/// Which documents the pagination total is computed over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Count every document in the collection, ignoring the filter.
    /// `next`/`prev` links can be off whenever a filter is applied.
    #[default]
    Collection,

    /// Count only the documents matching the filter
    Filtered,
}

/// List query defaults and bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_page: usize,
    pub default_limit: usize,

    /// Upper bound for `limit`; `None` leaves it unbounded
    pub max_limit: Option<usize>,

    /// Sort applied when the request has no `sort` directive
    pub default_sort: String,

    pub count_mode: CountMode,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_limit: 10,
            max_limit: Some(100),
            default_sort: "-createdAt".to_string(),
            count_mode: CountMode::Collection,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.display().to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    ///
    /// Recognized variables: `HOST`, `PORT`, `MONGO_URI`, `MONGO_DATABASE`,
    /// `FILE_UPLOAD_PATH`, `MAX_FILE_UPLOAD`.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup function
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_override("PORT", &port)?;
        }
        if let Some(uri) = lookup("MONGO_URI") {
            self.database.uri = Some(uri);
        }
        if let Some(name) = lookup("MONGO_DATABASE") {
            self.database.name = name;
        }
        if let Some(path) = lookup("FILE_UPLOAD_PATH") {
            self.upload.file_upload_path = PathBuf::from(path);
        }
        if let Some(max) = lookup("MAX_FILE_UPLOAD") {
            self.upload.max_file_upload = parse_override("MAX_FILE_UPLOAD", &max)?;
        }
        Ok(self)
    }
}

fn parse_override<T>(field: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}
