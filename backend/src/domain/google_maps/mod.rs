//! Mapping from places/routing/geocoding payloads to GeoJSON.
//!
//! Every mapper walks upstream results in order and emits one feature per
//! result that carries a usable geometry. Results without one are skipped and
//! logged; they never fail the batch.

mod directions;
mod places;

pub use directions::{
    DirectionsGeoJson, MappedRoute, RouteDecodeFailure, directions_to_geojson, route_to_feature,
};
pub use places::{GEOCODE_PROPERTY_KEYS, PLACE_PROPERTY_KEYS, geocode_to_geojson, places_to_geojson};

use serde_json::{Map, Value};

use crate::domain::geojson::Properties;

/// Copy `keys` from `source` when present and non-null.
fn copy_present_keys(source: &Map<String, Value>, keys: &[&str]) -> Properties {
    keys.iter()
        .filter_map(|key| {
            source
                .get(*key)
                .filter(|value| !value.is_null())
                .map(|value| ((*key).to_owned(), value.clone()))
        })
        .collect()
}
