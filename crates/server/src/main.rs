//! classgeo server entry point.
//!
//! Loads configuration, opens the durable store, wires the tiered chain and
//! serves the HTTP routes until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use classgeo_client::{CachedPageFetcher, ContentPipeline, FetchConfig, Fetcher, LiveFetcher, PipelineConfig};
use classgeo_core::{AppConfig, CacheDb, DurableStore, FastCache, FetchMode, MemoryCache};

mod error;
mod handler;
#[cfg(test)]
mod testing;
mod tiers;

use handler::AppState;
use tiers::{TierSettings, TieredChain};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let config = AppConfig::load()?;
    let state = build_state(&config).await?;

    let listener = TcpListener::bind(config.listen_addr.as_str()).await?;
    tracing::info!(addr = %config.listen_addr, mode = ?config.fetch_mode, "classgeo listening");

    axum::serve(listener, handler::router(state)).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("classgeo stopped");
    Ok(())
}

async fn build_state(config: &AppConfig) -> Result<AppState> {
    let db = CacheDb::open(&config.db_path).await?;
    let store: Arc<dyn DurableStore> = Arc::new(db);
    let cache: Arc<dyn FastCache> = Arc::new(MemoryCache::new());

    let live: Arc<dyn Fetcher> = Arc::new(LiveFetcher::new(FetchConfig::from(config))?);
    let fetcher: Arc<dyn Fetcher> = match config.fetch_mode {
        FetchMode::Live => live,
        FetchMode::Cached => Arc::new(CachedPageFetcher::new(live, store.clone(), config.page_key())),
    };

    let pipeline = Arc::new(ContentPipeline::new(fetcher, store.clone(), Arc::new(PipelineConfig::from_app(config)?)));
    let chain = TieredChain::standard(cache, store, pipeline.clone(), TierSettings::from(config));

    let static_dir =
        config.static_dir.clone().unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"));
    tracing::debug!(dir = %static_dir.display(), "serving map front end");

    Ok(AppState { chain: Arc::new(chain), pipeline, request_timeout: config.request_timeout(), static_dir })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("received shutdown signal");
}
