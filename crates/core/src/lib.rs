//! Core types and shared functionality for classgeo.
//!
//! This crate provides:
//! - The class location data model (raw scrape types and GeoJSON output)
//! - Fast cache and durable store interfaces with their default backends
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod deadline;
pub mod error;
pub mod model;

pub use cache::{CacheDb, DurableStore, EntityKey, FastCache, MemoryCache};
pub use config::{AppConfig, ConfigError, FetchMode};
pub use error::{Error, RefreshError, Stage, StageExt};
pub use model::{Feature, FeatureCollection, Geometry, RawLocation, RawObject, RawObjectSet};
