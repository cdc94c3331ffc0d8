//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `base_url` is not an http(s) URL ending in `/`
    /// - `user_agent` is empty
    /// - `timeout_ms` is set below 100ms or above 5 minutes
    /// - a label or table marker is empty
    ///
    /// Returns `ConfigError::Missing` if `db_path` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::Missing {
                field: "db_path".into(),
                hint: "Set VINLOOKUP_DB_PATH environment variable".into(),
            });
        }

        let base = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid { field: "base_url".into(), reason: e.to_string() })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid { field: "base_url".into(), reason: "must be http or https".into() });
        }
        if !self.base_url.ends_with('/') {
            return Err(ConfigError::Invalid {
                field: "base_url".into(),
                reason: "must end with '/' so the VIN forms the last path segment".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms < 100 {
                return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
            }
            if timeout_ms > 300_000 {
                return Err(ConfigError::Invalid {
                    field: "timeout_ms".into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        for (field, label) in self.labels.entries() {
            if label.is_empty() {
                return Err(ConfigError::Invalid { field: format!("labels.{field}"), reason: "must not be empty".into() });
            }
        }

        let markers = [
            ("container", &self.markers.container),
            ("row", &self.markers.row),
            ("label", &self.markers.label),
            ("value", &self.markers.value),
        ];
        for (field, marker) in markers {
            if marker.trim().is_empty() {
                return Err(ConfigError::Invalid { field: format!("markers.{field}"), reason: "must not be empty".into() });
            }
        }

        if self.labels.make == self.labels.model {
            tracing::warn!(label = %self.labels.make, "make and model share a label; both fields will hold the same value");
        }

        Ok(())
    }
}
