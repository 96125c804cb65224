use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;

use classgeo_client::ContentPipeline;

use super::Tier;
use crate::error::WebError;

/// Terminal tier: rebuilds the collection from the live page.
///
/// The pipeline persists to the durable store itself; the fast cache is
/// left for the next durable hit to populate.
pub struct RegenerationTier {
    pipeline: Arc<ContentPipeline>,
}

impl RegenerationTier {
    pub fn new(pipeline: Arc<ContentPipeline>) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl Tier for RegenerationTier {
    fn name(&self) -> &'static str {
        "regeneration"
    }

    async fn respond(&self, deadline: Instant) -> Result<Option<Vec<u8>>, WebError> {
        Ok(Some(self.pipeline.regenerate(deadline).await?))
    }
}
