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

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `script_pattern` does not compile or lacks a capture group
    /// - `source_url` is not an absolute http(s) URL
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `request_timeout_ms` is shorter than `timeout_ms`
    /// - `cache_ttl_secs` is 0
    /// - the feature and page snapshot keys collide
    ///
    /// Returns `ConfigError::Missing` if the user agent or a key is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.script_regex()?;

        let source = url::Url::parse(&self.source_url).map_err(|e| invalid("source_url", &e.to_string()))?;
        if !matches!(source.scheme(), "http" | "https") {
            return Err(invalid("source_url", "scheme must be http or https"));
        }

        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }
        if self.request_timeout_ms < self.timeout_ms {
            return Err(invalid("request_timeout_ms", "must not be shorter than timeout_ms"));
        }

        if self.cache_ttl_secs == 0 {
            return Err(invalid("cache_ttl_secs", "must be greater than 0"));
        }

        for (field, value) in [
            ("user_agent", &self.user_agent),
            ("cache_key", &self.cache_key),
            ("feature_kind", &self.feature_kind),
            ("feature_id", &self.feature_id),
            ("page_kind", &self.page_kind),
            ("page_id", &self.page_id),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Missing {
                    field: field.into(),
                    hint: format!("Set CLASSGEO_{} or remove the empty override", field.to_uppercase()),
                });
            }
        }

        if self.feature_key() == self.page_key() {
            return Err(invalid("page_id", "page snapshot key must differ from the feature key"));
        }

        Ok(())
    }
}
