//! Source page fetching.
//!
//! The pipeline depends on the [`Fetcher`] capability. Two variants exist:
//!
//! - [`LiveFetcher`]: HTTP GET through reqwest with rustls, compression,
//!   bounded redirects, a per-request timeout and a body size cap.
//! - [`CachedPageFetcher`]: for local development; serves a page snapshot
//!   kept in the durable store and only goes to the network when the
//!   snapshot is missing.
//!
//! The composition root picks one from `FetchMode` and injects it.

pub mod cached;
pub mod url;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::{Client, Url, header};
use std::time::{Duration, Instant};

pub use cached::CachedPageFetcher;
pub use self::url::{UrlError, canonicalize};

use classgeo_core::{AppConfig, Error};

/// Configuration for the live fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "classgeo/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "classgeo/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20000),
            max_redirects: 5,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            ..Default::default()
        }
    }
}

/// A fetched page body.
///
/// The body is fully buffered and owned; dropping the response releases it.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL that was requested
    pub url: Url,
    /// Content-Type header, if the network supplied one
    pub content_type: Option<String>,
    /// Page body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
    /// Whether the body came from a stored snapshot rather than the network
    pub from_snapshot: bool,
}

/// Capability to retrieve the source page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error>;
}

/// Network fetcher.
pub struct LiveFetcher {
    http: Client,
    config: FetchConfig,
}

impl LiveFetcher {
    /// Create a new live fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Fetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl Fetcher for LiveFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let mut response = self
            .http
            .get(url.as_str())
            .header(header::ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| Error::Fetch(format!("failed to fetch class page: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("class page returned status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::Fetch(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        // Chunked responses carry no Content-Length; the cap applies while reading.
        let mut body = BytesMut::with_capacity(response.content_length().map_or(0, |len| len as usize));
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::Fetch(format!("failed to read class page: {}", e)))?
        {
            if body.len() + chunk.len() > self.config.max_bytes {
                return Err(Error::Fetch(format!(
                    "{} bytes exceeds {}",
                    body.len() + chunk.len(),
                    self.config.max_bytes
                )));
            }
            body.extend_from_slice(&chunk);
        }
        let bytes = body.freeze();

        let fetch_ms = start.elapsed().as_millis() as u64;
        tracing::debug!("fetched {} in {}ms ({} bytes)", url, fetch_ms, bytes.len());

        Ok(FetchResponse { url: url.clone(), content_type, bytes, fetch_ms, from_snapshot: false })
    }
}
