//! Places and geocoding results to `Point` features.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::copy_present_keys;
use crate::domain::MissingData;
use crate::domain::geojson::{Coordinate, Feature, FeatureCollection, Geometry};
use crate::domain::ports::{GeocodePayload, PlacesPayload};

/// Place properties copied verbatim when present.
pub const PLACE_PROPERTY_KEYS: &[&str] = &[
    "name",
    "place_id",
    "rating",
    "price_level",
    "types",
    "vicinity",
    "formatted_address",
    "user_ratings_total",
    "business_status",
];

/// Geocoding properties copied verbatim when present.
pub const GEOCODE_PROPERTY_KEYS: &[&str] =
    &["formatted_address", "place_id", "types", "address_components"];

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Map a places text-search payload to `Point` features.
///
/// # Examples
///
/// ```
/// use mapbridge::domain::google_maps::places_to_geojson;
/// use mapbridge::domain::ports::PlacesPayload;
/// use serde_json::json;
///
/// let payload: PlacesPayload = serde_json::from_value(json!({
///     "results": [
///         {"name": "Ueno Park", "geometry": {"location": {"lat": 35.715, "lng": 139.773}}},
///         {"name": "No geometry"}
///     ]
/// }))
/// .expect("payload parses");
/// let collection = places_to_geojson(&payload);
/// assert_eq!(collection.len(), 1);
/// ```
pub fn places_to_geojson(payload: &PlacesPayload) -> FeatureCollection {
    located_results_to_geojson(&payload.results, PLACE_PROPERTY_KEYS, "place")
}

/// Map a geocoding payload to `Point` features.
pub fn geocode_to_geojson(payload: &GeocodePayload) -> FeatureCollection {
    located_results_to_geojson(&payload.results, GEOCODE_PROPERTY_KEYS, "geocode")
}

fn located_results_to_geojson(
    results: &[Value],
    keys: &[&str],
    kind: &'static str,
) -> FeatureCollection {
    results
        .iter()
        .enumerate()
        .filter_map(|(index, result)| match located_feature(result, keys) {
            Ok(feature) => Some(feature),
            Err(reason) => {
                debug!(kind, index, %reason, "skipping result without usable location");
                None
            }
        })
        .collect()
}

fn located_feature(result: &Value, keys: &[&str]) -> Result<Feature, MissingData> {
    let object = result
        .as_object()
        .ok_or_else(|| MissingData::malformed("result is not an object"))?;
    let location = result
        .pointer("/geometry/location")
        .filter(|value| !value.is_null())
        .ok_or(MissingData::Location)?;
    let LatLng { lat, lng } = LatLng::deserialize(location).map_err(MissingData::malformed)?;
    let coordinate = Coordinate::from_lat_lng(lat, lng);
    if !coordinate.is_finite() {
        return Err(MissingData::malformed("location is not finite"));
    }

    Ok(Feature::new(
        Geometry::Point(coordinate),
        copy_present_keys(object, keys),
    ))
}
