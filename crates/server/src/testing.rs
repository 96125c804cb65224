//! Counting doubles for the tier and router tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;

use classgeo_client::{ContentPipeline, FetchResponse, Fetcher, PipelineConfig};
use classgeo_core::{AppConfig, DurableStore, EntityKey, Error, FastCache};

use crate::tiers::TierSettings;

pub const PAGE: &str = concat!(
    "<html><body><div id=\"map\"></div>\n<script type='text/javascript'>\n",
    r#"var maplistScriptParamsKo = {"KOObject":[{"id":7,"locations":["#,
    r#"{"locationUrl":"https://example.com/leeds","title":"<b>Leeds</b>","address":"Roundhay Park","latitude":"53.83","longitude":"-1.49"},"#,
    r#"{"locationUrl":"https://example.com/york","title":"York","address":"Rowntree Park","latitude":"53.94","longitude":"-1.08"}"#,
    "]}]};\n</script></body></html>"
);

pub fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

pub fn settings() -> TierSettings {
    TierSettings::from(&AppConfig::default())
}

pub fn pipeline(fetcher: Arc<dyn Fetcher>, store: Arc<dyn DurableStore>) -> ContentPipeline {
    let config = PipelineConfig::from_app(&AppConfig::default()).unwrap();
    ContentPipeline::new(fetcher, store, Arc::new(config))
}

#[derive(Default)]
pub struct MockFastCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    sets: Mutex<Vec<(String, Duration)>>,
    broken: bool,
}

impl MockFastCache {
    pub fn with(key: &str, value: &[u8]) -> Self {
        let cache = Self::default();
        cache.entries.lock().unwrap().insert(key.to_string(), value.to_vec());
        cache
    }

    pub fn broken() -> Self {
        Self { broken: true, ..Self::default() }
    }

    /// Every attempted write, including failed ones.
    pub fn sets(&self) -> Vec<(String, Duration)> {
        self.sets.lock().unwrap().clone()
    }

    pub fn value(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl FastCache for MockFastCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        if self.broken {
            return Err(Error::StoreUnavailable("cache offline".into()));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), Error> {
        self.sets.lock().unwrap().push((key.to_string(), ttl));
        if self.broken {
            return Err(Error::StoreUnavailable("cache offline".into()));
        }
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockStore {
    entries: Mutex<HashMap<EntityKey, Vec<u8>>>,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    broken_reads: bool,
}

impl MockStore {
    pub fn with(value: &[u8]) -> Self {
        let store = Self::default();
        store.entries.lock().unwrap().insert(AppConfig::default().feature_key(), value.to_vec());
        store
    }

    pub fn broken_reads() -> Self {
        Self { broken_reads: true, ..Self::default() }
    }

    /// Payload stored under the feature key.
    pub fn value(&self) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(&AppConfig::default().feature_key()).cloned()
    }
}

#[async_trait]
impl DurableStore for MockStore {
    async fn get(&self, key: &EntityKey) -> Result<Option<Vec<u8>>, Error> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.broken_reads {
            return Err(Error::StoreUnavailable("datastore offline".into()));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &EntityKey, payload: &[u8]) -> Result<(), Error> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().insert(key.clone(), payload.to_vec());
        Ok(())
    }
}

pub struct MockFetcher {
    body: Option<&'static str>,
    pub calls: AtomicUsize,
}

impl MockFetcher {
    pub fn page(body: &'static str) -> Self {
        Self { body: Some(body), calls: AtomicUsize::new(0) }
    }

    pub fn failing() -> Self {
        Self { body: None, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = self.body.ok_or_else(|| Error::Fetch("connection refused".into()))?;
        Ok(FetchResponse {
            url: url.clone(),
            content_type: Some("text/html".into()),
            bytes: Bytes::from_static(body.as_bytes()),
            fetch_ms: 1,
            from_snapshot: false,
        })
    }
}
