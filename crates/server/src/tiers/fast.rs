use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;

use classgeo_core::FastCache;
use classgeo_core::deadline::within;

use super::Tier;
use crate::error::WebError;

/// In-process cache lookup. Misses and errors both fall through.
pub struct FastCacheTier {
    cache: Arc<dyn FastCache>,
    key: String,
}

impl FastCacheTier {
    pub fn new(cache: Arc<dyn FastCache>, key: impl Into<String>) -> Self {
        Self { cache, key: key.into() }
    }
}

#[async_trait]
impl Tier for FastCacheTier {
    fn name(&self) -> &'static str {
        "fast_cache"
    }

    async fn respond(&self, deadline: Instant) -> Result<Option<Vec<u8>>, WebError> {
        match within(deadline, "fast cache read", self.cache.get(&self.key)).await {
            Ok(Some(body)) => Ok(Some(body)),
            Ok(None) => {
                tracing::info!(key = %self.key, "cache miss for class location data, falling back to durable store");
                Ok(None)
            }
            Err(e) => {
                tracing::error!(key = %self.key, error = %e, "fast cache read failed, falling back to durable store");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFastCache;
    use std::time::Duration;

    #[tokio::test]
    async fn test_hit_and_miss() {
        let cache = Arc::new(MockFastCache::with("geo", b"cached"));
        let deadline = Instant::now() + Duration::from_secs(1);

        let hit = FastCacheTier::new(cache.clone(), "geo").respond(deadline).await.unwrap();
        let miss = FastCacheTier::new(cache, "other").respond(deadline).await.unwrap();

        assert_eq!(hit, Some(b"cached".to_vec()));
        assert_eq!(miss, None);
    }

    #[tokio::test]
    async fn test_error_is_a_miss() {
        let tier = FastCacheTier::new(Arc::new(MockFastCache::broken()), "geo");
        let result = tier.respond(Instant::now() + Duration::from_secs(1)).await;
        assert!(matches!(result, Ok(None)));
    }
}
