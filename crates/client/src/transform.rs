//! Raw map objects to GeoJSON features.

use classgeo_core::{Error, Feature, FeatureCollection, Geometry, RawLocation, RawObjectSet};

use crate::coords::parse_coordinate;
use crate::extract::markup_text;

/// Build the feature collection from the first map object.
///
/// Locations keep their scraped order. A single malformed coordinate fails
/// the whole collection; partial collections are never produced.
///
/// # Errors
///
/// `Error::Decode` if the set has no objects, `Error::ValueFormat` for a bad
/// coordinate.
pub fn to_collection(set: &RawObjectSet) -> Result<FeatureCollection, Error> {
    let first = set
        .objects
        .first()
        .ok_or_else(|| Error::Decode("script data contains no map objects".into()))?;

    let features = first.locations.iter().map(to_feature).collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureCollection::new(features))
}

/// Convert one scraped marker. Coordinates are emitted longitude first.
pub fn to_feature(location: &RawLocation) -> Result<Feature, Error> {
    let longitude = parse_coordinate("longitude", &location.longitude)?;
    let latitude = parse_coordinate("latitude", &location.latitude)?;

    let mut feature = Feature::new(Geometry::point(longitude, latitude));
    for (key, raw) in [("locationUrl", &location.url), ("title", &location.title), ("address", &location.address)] {
        feature.properties.insert(key.to_string(), markup_text(raw));
    }

    Ok(feature)
}
