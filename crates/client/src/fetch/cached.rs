//! Snapshot-backed fetcher for local development.
//!
//! Repeated local runs reuse one stored copy of the class page instead of
//! hitting the live site every time.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use classgeo_core::{DurableStore, EntityKey, Error};

use super::{FetchResponse, Fetcher};

/// Serves the page snapshot from the durable store, fetching and storing it
/// through `inner` on a miss.
pub struct CachedPageFetcher {
    inner: Arc<dyn Fetcher>,
    store: Arc<dyn DurableStore>,
    key: EntityKey,
}

impl CachedPageFetcher {
    pub fn new(inner: Arc<dyn Fetcher>, store: Arc<dyn DurableStore>, key: EntityKey) -> Self {
        Self { inner, store, key }
    }
}

#[async_trait]
impl Fetcher for CachedPageFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        match self.store.get(&self.key).await {
            Ok(Some(body)) => {
                tracing::debug!(key = %self.key, bytes = body.len(), "serving class page from snapshot");
                Ok(FetchResponse {
                    url: url.clone(),
                    content_type: None,
                    bytes: Bytes::from(body),
                    fetch_ms: 0,
                    from_snapshot: true,
                })
            }
            Ok(None) => {
                tracing::info!(key = %self.key, "no class page snapshot, fetching live");
                let response = self.inner.fetch(url).await?;
                self.store.put(&self.key, &response.bytes).await?;
                Ok(response)
            }
            Err(e) => Err(Error::Fetch(format!("failed to read page snapshot: {e}"))),
        }
    }
}
