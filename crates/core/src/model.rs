//! Class location data model.
//!
//! `Raw*` types mirror the map plugin's script literal as scraped.
//! `Feature` and `FeatureCollection` are the GeoJSON shapes served to clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Map parameters from the class finder's map plugin script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawObjectSet {
    #[serde(rename = "KOObject")]
    pub objects: Vec<RawObject>,
}

/// A single map's parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawObject {
    pub id: i64,
    pub locations: Vec<RawLocation>,
}

/// A single map marker, as scraped. Text fields may carry markup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawLocation {
    #[serde(rename = "locationUrl")]
    pub url: String,
    pub title: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

/// A GeoJSON point geometry. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(longitude: f64, latitude: f64) -> Self {
        Self { kind: "Point".into(), coordinates: [longitude, latitude] }
    }
}

/// A GeoJSON feature with sanitized string properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, String>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry, kind: "Feature".into(), properties: BTreeMap::new() }
    }
}

/// The served, cached and persisted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { kind: "FeatureCollection".into(), features }
    }
}
