//! Cache tiers for the served feature collection.
//!
//! - [`FastCache`]: low-latency key/value store with per-entry expiry
//!   ([`MemoryCache`] is the in-process implementation).
//! - [`DurableStore`]: persistent, non-expiring store keyed by [`EntityKey`]
//!   ([`CacheDb`] is the SQLite implementation, run through tokio-rusqlite
//!   with WAL mode and versioned migrations).

pub mod connection;
pub mod entities;
pub mod memory;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use memory::MemoryCache;
pub use store::{DurableStore, EntityKey, FastCache};
