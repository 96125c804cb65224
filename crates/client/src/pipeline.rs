//! Regeneration pipeline: fetch → extract → decode → transform → serialize → persist.
//!
//! One run rebuilds the whole feature collection. Each stage's error is
//! tagged with [`Stage`] and returned as-is; there are no retries here.
//! The durable store is written only after every earlier stage succeeded,
//! and the write replaces whatever was stored before.

use std::sync::Arc;

use regex::Regex;
use reqwest::Url;
use tokio::time::Instant;

use classgeo_core::deadline::within;
use classgeo_core::{
    AppConfig, ConfigError, DurableStore, EntityKey, Error, FeatureCollection, RefreshError, Stage, StageExt,
};

use crate::decode::decode_objects;
use crate::extract::{locate_literal, parse_document};
use crate::fetch::{Fetcher, canonicalize};
use crate::transform::to_collection;

/// Validated, compiled pipeline settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source_url: Url,
    pub script_pattern: Regex,
    pub feature_key: EntityKey,
}

impl PipelineConfig {
    /// Build from the loaded application config.
    pub fn from_app(config: &AppConfig) -> Result<Self, ConfigError> {
        let source_url = canonicalize(&config.source_url)
            .map_err(|e| ConfigError::Invalid { field: "source_url".into(), reason: e.to_string() })?;

        Ok(Self { source_url, script_pattern: config.script_regex()?, feature_key: config.feature_key() })
    }
}

/// Produces and persists the serialized feature collection.
pub struct ContentPipeline {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn DurableStore>,
    config: Arc<PipelineConfig>,
}

impl ContentPipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: Arc<dyn DurableStore>, config: Arc<PipelineConfig>) -> Self {
        Self { fetcher, store, config }
    }

    /// Run the full pipeline and return the bytes written to the durable store.
    ///
    /// The fetch and the store write are bounded by `deadline`.
    pub async fn regenerate(&self, deadline: Instant) -> Result<Vec<u8>, RefreshError> {
        tracing::info!(url = %self.config.source_url, "regenerating class location data");

        let page = within(deadline, "fetch class page", self.fetcher.fetch(&self.config.source_url))
            .await
            .at_stage(Stage::Fetch)?;
        let from_snapshot = page.from_snapshot;
        tracing::debug!(
            content_type = page.content_type.as_deref().unwrap_or("unknown"),
            bytes = page.bytes.len(),
            fetch_ms = page.fetch_ms,
            from_snapshot,
            "class page fetched"
        );

        let collection = build_collection(&page.bytes, &self.config.script_pattern)?;
        drop(page);

        let payload = serde_json::to_vec(&collection)
            .map_err(|e| Error::Encode(e.to_string()))
            .at_stage(Stage::Serialize)?;

        within(deadline, "persist feature collection", self.store.put(&self.config.feature_key, &payload))
            .await
            .at_stage(Stage::Persist)?;

        tracing::info!(
            features = collection.features.len(),
            bytes = payload.len(),
            from_snapshot,
            key = %self.config.feature_key,
            "class location data regenerated"
        );

        Ok(payload)
    }
}

/// Extract, decode and transform a page body.
pub fn build_collection(body: &[u8], pattern: &Regex) -> Result<FeatureCollection, RefreshError> {
    let literal = {
        let document = parse_document(body).at_stage(Stage::Extract)?;
        locate_literal(&document, pattern).at_stage(Stage::Extract)?
    };

    let objects = decode_objects(&literal).at_stage(Stage::Decode)?;

    to_collection(&objects).at_stage(Stage::Transform)
}
