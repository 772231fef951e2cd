//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `BOOKFINDER_*` environment variables (nested keys use `__`, for example
//! `BOOKFINDER_CATALOG__BASE_URL`).
//!
//! # Configuration File Format
//!
//! ```toml
//! [catalog]
//! base_url = "https://openlibrary.org"
//! covers_url = "https://covers.openlibrary.org"
//! timeout_secs = 30
//!
//! [limits]
//! page_size = 100
//! max_pages = 5
//! max_items = 500
//!
//! [display]
//! books_per_page = 12
//! initial_query = "popular"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::DEFAULT_COVERS_URL;
use crate::search::{AggregationLimits, BOOKS_PER_PAGE};
use crate::sources::DEFAULT_BASE_URL;

/// File name looked up in the config directories
pub const CONFIG_FILE_NAME: &str = "bookfinder.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog endpoints and HTTP settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Aggregation bounds
    #[serde(default)]
    pub limits: AggregationLimits,

    /// Result view settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Search and work endpoint host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Cover image host
    #[serde(default = "default_covers_url")]
    pub covers_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Custom user agent
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            covers_url: default_covers_url(),
            timeout_secs: default_timeout(),
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_covers_url() -> String {
    DEFAULT_COVERS_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Books shown per page
    #[serde(default = "default_books_per_page")]
    pub books_per_page: usize,

    /// Query run when an interactive session opens
    #[serde(default = "default_initial_query")]
    pub initial_query: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            books_per_page: default_books_per_page(),
            initial_query: default_initial_query(),
        }
    }
}

fn default_books_per_page() -> usize {
    BOOKS_PER_PAGE
}

fn default_initial_query() -> String {
    "popular".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Load configuration from an optional file plus `BOOKFINDER_*` environment variables
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("BOOKFINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

/// Find a config file in the usual places.
///
/// Checks `./bookfinder.toml`, then `<config dir>/bookfinder/config.toml`.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("bookfinder").join("config.toml"))
        .filter(|path| path.is_file())
}
