//! Interfaces the serving path requires of its cache collaborators.
//!
//! Both stores report an absent key as `Ok(None)`; `Err` is reserved for
//! genuine I/O failures so callers can tell a miss from an unhealthy store.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::Error;

/// Identifies a durable-store entity by `(kind, string_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub kind: String,
    pub string_id: String,
}

impl EntityKey {
    pub fn new(kind: impl Into<String>, string_id: impl Into<String>) -> Self {
        Self { kind: kind.into(), string_id: string_id.into() }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.string_id)
    }
}

/// Low-latency, possibly-evicting key/value cache with expiration.
#[async_trait]
pub trait FastCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), Error>;
}

/// Persistent key/value store with last-writer-wins puts and no expiry.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get(&self, key: &EntityKey) -> Result<Option<Vec<u8>>, Error>;

    async fn put(&self, key: &EntityKey, payload: &[u8]) -> Result<(), Error>;
}
