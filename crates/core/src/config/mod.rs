//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CLASSGEO_*)
//! 2. TOML config file (if CLASSGEO_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cache::EntityKey;

mod validation;

pub use validation::ConfigError;

/// How the pipeline obtains the source page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Always fetch over the network.
    #[default]
    Live,
    /// Reuse a page snapshot kept in the durable store (local development).
    Cached,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CLASSGEO_*)
/// 2. TOML config file (if CLASSGEO_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Path to the SQLite durable store.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Class finder page holding the map script.
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Pattern locating the map literal; capture group 1 is the literal.
    #[serde(default = "default_script_pattern")]
    pub script_pattern: String,

    /// Set via CLASSGEO_FETCH_MODE (`live` or `cached`).
    #[serde(default)]
    pub fetch_mode: FetchMode,

    /// Fast cache key for the serialized feature collection.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    #[serde(default = "default_feature_kind")]
    pub feature_kind: String,

    #[serde(default = "default_feature_id")]
    pub feature_id: String,

    /// Durable key kind for the raw page snapshot (cached fetch mode only).
    #[serde(default = "default_page_kind")]
    pub page_kind: String,

    #[serde(default = "default_page_id")]
    pub page_id: String,

    /// Fast cache entry lifetime in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Source page fetch timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Deadline for a whole inbound request in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Directory holding the map front end. Unset means the assets shipped
    /// with the server crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./classgeo-store.sqlite")
}

fn default_source_url() -> String {
    "http://www.buggyfit.co.uk/find-a-class/".into()
}

fn default_script_pattern() -> String {
    r"var\s+maplistScriptParamsKo\s+=\s+(\{.+\})".into()
}

fn default_cache_key() -> String {
    "geo".into()
}

fn default_feature_kind() -> String {
    "geo".into()
}

fn default_feature_id() -> String {
    "bugfit".into()
}

fn default_page_kind() -> String {
    "html".into()
}

fn default_page_id() -> String {
    "bugfitCache".into()
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_user_agent() -> String {
    "classgeo/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            db_path: default_db_path(),
            source_url: default_source_url(),
            script_pattern: default_script_pattern(),
            fetch_mode: FetchMode::Live,
            cache_key: default_cache_key(),
            feature_kind: default_feature_kind(),
            feature_id: default_feature_id(),
            page_kind: default_page_kind(),
            page_id: default_page_id(),
            cache_ttl_secs: default_cache_ttl_secs(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            static_dir: None,
        }
    }
}

impl AppConfig {
    /// Fetch timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Durable key of the serialized feature collection.
    pub fn feature_key(&self) -> EntityKey {
        EntityKey::new(&self.feature_kind, &self.feature_id)
    }

    /// Durable key of the raw page snapshot.
    pub fn page_key(&self) -> EntityKey {
        EntityKey::new(&self.page_kind, &self.page_id)
    }

    /// Compile the script pattern.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if the pattern does not compile or has
    /// no capture group.
    pub fn script_regex(&self) -> Result<Regex, ConfigError> {
        let re = Regex::new(&self.script_pattern)
            .map_err(|e| ConfigError::Invalid { field: "script_pattern".into(), reason: e.to_string() })?;
        if re.captures_len() < 2 {
            return Err(ConfigError::Invalid {
                field: "script_pattern".into(),
                reason: "must contain a capture group for the literal".into(),
            });
        }
        Ok(re)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CLASSGEO_`
    /// 2. TOML file from `CLASSGEO_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var("CLASSGEO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CLASSGEO_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
