//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (VINLOOKUP_*)
//! 2. TOML config file (if VINLOOKUP_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::LabelMap;

mod validation;

pub use validation::ConfigError;

/// CSS selectors locating the label/value table on the decoder page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMarkers {
    /// Block holding the table. Only the first match is read.
    #[serde(default = "default_container_marker")]
    pub container: String,
    /// One label/value pair, searched within the container.
    #[serde(default = "default_row_marker")]
    pub row: String,
    #[serde(default = "default_label_marker")]
    pub label: String,
    #[serde(default = "default_value_marker")]
    pub value: String,
}

fn default_container_marker() -> String {
    "div.table-info".into()
}

fn default_row_marker() -> String {
    "tr".into()
}

fn default_label_marker() -> String {
    "td.info-left".into()
}

fn default_value_marker() -> String {
    "td.info-right".into()
}

impl Default for TableMarkers {
    fn default() -> Self {
        Self {
            container: default_container_marker(),
            row: default_row_marker(),
            label: default_label_marker(),
            value: default_value_marker(),
        }
    }
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (VINLOOKUP_*)
/// 2. TOML config file (if VINLOOKUP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite record store.
    ///
    /// Set via VINLOOKUP_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Decoder page prefix; the VIN is appended verbatim.
    ///
    /// Set via VINLOOKUP_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent sent to the decoder page. It rejects non-browser clients.
    ///
    /// Set via VINLOOKUP_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional HTTP request timeout in milliseconds.
    ///
    /// Set via VINLOOKUP_TIMEOUT_MS. Unset leaves the transport default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Page labels for each record field.
    ///
    /// Set via VINLOOKUP_LABELS__MAKE, VINLOOKUP_LABELS__MODEL, etc.
    #[serde(default)]
    pub labels: LabelMap,

    /// Selectors for the label/value table.
    ///
    /// Set via VINLOOKUP_MARKERS__CONTAINER, VINLOOKUP_MARKERS__ROW, etc.
    #[serde(default)]
    pub markers: TableMarkers,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./vinlookup.sqlite")
}

fn default_base_url() -> String {
    "https://www.freevindecoder.eu/ro/".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: None,
            labels: LabelMap::default(),
            markers: TableMarkers::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `VINLOOKUP_`
    /// 2. TOML file from `VINLOOKUP_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("VINLOOKUP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("VINLOOKUP_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
