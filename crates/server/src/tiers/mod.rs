//! Tiered lookup for the serialized feature collection.
//!
//! Tiers are consulted in order and the first one that yields bytes wins.
//! A tier that misses or fails on a recoverable error returns `Ok(None)`
//! and the chain moves on. Only the last tier (regeneration) may end the
//! request with an error.

mod durable;
mod fast;
mod regenerate;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use classgeo_client::ContentPipeline;
use classgeo_core::{AppConfig, DurableStore, EntityKey, FastCache};

use crate::error::WebError;

pub use durable::DurableStoreTier;
pub use fast::FastCacheTier;
pub use regenerate::RegenerationTier;

/// One source of the serialized feature collection.
#[async_trait]
pub trait Tier: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` passes the request to the next tier.
    async fn respond(&self, deadline: Instant) -> Result<Option<Vec<u8>>, WebError>;
}

/// Keys and TTL shared by the standard tiers.
#[derive(Debug, Clone)]
pub struct TierSettings {
    pub cache_key: String,
    pub feature_key: EntityKey,
    pub cache_ttl: Duration,
}

impl From<&AppConfig> for TierSettings {
    fn from(config: &AppConfig) -> Self {
        Self { cache_key: config.cache_key.clone(), feature_key: config.feature_key(), cache_ttl: config.cache_ttl() }
    }
}

/// Ordered fallback over tiers.
pub struct TieredChain {
    tiers: Vec<Box<dyn Tier>>,
}

impl TieredChain {
    pub fn new(tiers: Vec<Box<dyn Tier>>) -> Self {
        Self { tiers }
    }

    /// Fast cache, then durable store (with write-back), then regeneration.
    pub fn standard(
        cache: Arc<dyn FastCache>, store: Arc<dyn DurableStore>, pipeline: Arc<ContentPipeline>,
        settings: TierSettings,
    ) -> Self {
        Self::new(vec![
            Box::new(FastCacheTier::new(cache.clone(), settings.cache_key.clone())),
            Box::new(DurableStoreTier::new(store, cache, settings)),
            Box::new(RegenerationTier::new(pipeline)),
        ])
    }

    pub async fn respond(&self, deadline: Instant) -> Result<Vec<u8>, WebError> {
        for tier in &self.tiers {
            if let Some(body) = tier.respond(deadline).await? {
                tracing::debug!(tier = tier.name(), bytes = body.len(), "served class location data");
                return Ok(body);
            }
        }
        Err(WebError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFastCache, MockFetcher, MockStore, PAGE, pipeline, settings};
    use std::sync::atomic::Ordering;

    struct Chain {
        chain: TieredChain,
        cache: Arc<MockFastCache>,
        store: Arc<MockStore>,
        fetcher: Arc<MockFetcher>,
    }

    fn chain(cache: MockFastCache, store: MockStore, fetcher: MockFetcher) -> Chain {
        let (cache, store, fetcher) = (Arc::new(cache), Arc::new(store), Arc::new(fetcher));
        let pipeline = pipeline(fetcher.clone(), store.clone());
        let chain = TieredChain::standard(cache.clone(), store.clone(), Arc::new(pipeline), settings());
        Chain { chain, cache, store, fetcher }
    }

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(10)
    }

    #[tokio::test]
    async fn test_fast_hit_skips_other_tiers() {
        let t = chain(MockFastCache::with("geo", b"cached"), MockStore::default(), MockFetcher::page(PAGE));

        let body = t.chain.respond(deadline()).await.unwrap();

        assert_eq!(body, b"cached");
        assert_eq!(t.store.gets.load(Ordering::SeqCst), 0);
        assert_eq!(t.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_durable_hit_writes_back_with_ttl() {
        let t = chain(MockFastCache::default(), MockStore::with(b"stored"), MockFetcher::page(PAGE));

        let body = t.chain.respond(deadline()).await.unwrap();

        assert_eq!(body, b"stored");
        assert_eq!(t.cache.sets(), vec![("geo".to_string(), Duration::from_secs(3600))]);
        assert_eq!(t.cache.value("geo"), Some(b"stored".to_vec()));
        assert_eq!(t.fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_both_miss_regenerates_once() {
        let t = chain(MockFastCache::default(), MockStore::default(), MockFetcher::page(PAGE));

        let body = t.chain.respond(deadline()).await.unwrap();

        assert_eq!(t.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(t.store.value(), Some(body.clone()));
        assert!(t.cache.sets().is_empty());

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_regeneration_failure_touches_nothing() {
        let t = chain(MockFastCache::default(), MockStore::default(), MockFetcher::failing());

        let err = t.chain.respond(deadline()).await.unwrap_err();

        assert!(matches!(err, WebError::Refresh(_)));
        assert!(err.to_string().starts_with("location data refresh error"));
        assert_eq!(t.store.puts.load(Ordering::SeqCst), 0);
        assert!(t.cache.sets().is_empty());
    }

    #[tokio::test]
    async fn test_fast_cache_error_falls_through() {
        let t = chain(MockFastCache::broken(), MockStore::with(b"stored"), MockFetcher::page(PAGE));

        let body = t.chain.respond(deadline()).await.unwrap();

        assert_eq!(body, b"stored");
        assert_eq!(t.store.gets.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_read_error_falls_through_to_regeneration() {
        let t = chain(MockFastCache::default(), MockStore::broken_reads(), MockFetcher::page(PAGE));

        let body = t.chain.respond(deadline()).await.unwrap();

        assert_eq!(t.fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(t.store.value(), Some(body));
    }

    #[tokio::test]
    async fn test_write_back_failure_still_serves() {
        let t = chain(MockFastCache::broken(), MockStore::with(b"stored"), MockFetcher::page(PAGE));

        let body = t.chain.respond(deadline()).await.unwrap();

        assert_eq!(body, b"stored");
        assert_eq!(t.cache.sets().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_chain_is_exhausted() {
        let chain = TieredChain::new(Vec::new());
        assert!(matches!(chain.respond(deadline()).await, Err(WebError::Exhausted)));
    }
}
