use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use classgeo_core::deadline::within;
use classgeo_core::{DurableStore, EntityKey, FastCache};

use super::{Tier, TierSettings};
use crate::error::WebError;

/// Durable store lookup with write-back into the fast cache on a hit.
pub struct DurableStoreTier {
    store: Arc<dyn DurableStore>,
    cache: Arc<dyn FastCache>,
    feature_key: EntityKey,
    cache_key: String,
    cache_ttl: Duration,
}

impl DurableStoreTier {
    pub fn new(store: Arc<dyn DurableStore>, cache: Arc<dyn FastCache>, settings: TierSettings) -> Self {
        Self {
            store,
            cache,
            feature_key: settings.feature_key,
            cache_key: settings.cache_key,
            cache_ttl: settings.cache_ttl,
        }
    }

    async fn write_back(&self, deadline: Instant, body: &[u8]) {
        let set = self.cache.set(&self.cache_key, body.to_vec(), self.cache_ttl);
        if let Err(e) = within(deadline, "fast cache write", set).await {
            tracing::error!(key = %self.cache_key, error = %e, "failed to write class location data to fast cache");
        }
    }
}

#[async_trait]
impl Tier for DurableStoreTier {
    fn name(&self) -> &'static str {
        "durable_store"
    }

    async fn respond(&self, deadline: Instant) -> Result<Option<Vec<u8>>, WebError> {
        match within(deadline, "durable store read", self.store.get(&self.feature_key)).await {
            Ok(Some(body)) => {
                self.write_back(deadline, &body).await;
                Ok(Some(body))
            }
            Ok(None) => {
                tracing::warn!(key = %self.feature_key, "no class location data in store, falling back to live fetch");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(key = %self.feature_key, error = %e, "durable store read failed, falling back to live fetch");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFastCache, MockStore, settings};

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(1)
    }

    #[tokio::test]
    async fn test_miss_does_not_write_back() {
        let cache = Arc::new(MockFastCache::default());
        let tier = DurableStoreTier::new(Arc::new(MockStore::default()), cache.clone(), settings());

        assert_eq!(tier.respond(deadline()).await.unwrap(), None);
        assert!(cache.sets().is_empty());
    }

    #[tokio::test]
    async fn test_error_is_a_miss() {
        let cache = Arc::new(MockFastCache::default());
        let tier = DurableStoreTier::new(Arc::new(MockStore::broken_reads()), cache.clone(), settings());

        assert_eq!(tier.respond(deadline()).await.unwrap(), None);
        assert!(cache.sets().is_empty());
    }
}
