//! Content pipeline for classgeo.
//!
//! This crate fetches the class finder page, pulls the map literal out of
//! its scripts, and turns it into a GeoJSON feature collection that is
//! persisted to the durable store.

pub mod coords;
pub mod decode;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod transform;

pub use coords::parse_coordinate;
pub use decode::decode_objects;
pub use extract::{locate_literal, markup_text, parse_document, script_bodies};
pub use fetch::{CachedPageFetcher, FetchConfig, FetchResponse, Fetcher, LiveFetcher};
pub use pipeline::{ContentPipeline, PipelineConfig, build_collection};
pub use transform::{to_collection, to_feature};
