//! Directions routes to `LineString` features.
//!
//! A route's line is the concatenation of every step polyline, in step, leg
//! and route order. Shared endpoints between consecutive steps are kept.

use polyline_codec::{DecodeError, decode};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::copy_present_keys;
use crate::domain::MissingData;
use crate::domain::geojson::{Feature, FeatureCollection, Geometry, Properties};
use crate::domain::ports::DirectionsPayload;

const LEG_SUMMARY_KEYS: &[&str] = &["distance", "duration", "start_address", "end_address"];

#[derive(Debug, Default, Deserialize)]
struct RouteDto {
    #[serde(default)]
    summary: Option<Value>,
    #[serde(default)]
    legs: Vec<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct StepDto {
    #[serde(default)]
    polyline: Option<PolylineDto>,
}

#[derive(Debug, Default, Deserialize)]
struct PolylineDto {
    #[serde(default)]
    points: Option<String>,
}

/// A step polyline that failed to decode. Only that step is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecodeFailure {
    /// Route ordinal in the upstream payload.
    pub route_index: usize,
    /// Leg ordinal within the route.
    pub leg_index: usize,
    /// Step ordinal within the leg.
    pub step_index: usize,
    /// Codec failure.
    pub error: DecodeError,
}

impl std::fmt::Display for RouteDecodeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "route {} leg {} step {}: {}",
            self.route_index, self.leg_index, self.step_index, self.error
        )
    }
}

impl std::error::Error for RouteDecodeFailure {}

/// Directions output: mapped routes plus every step polyline that failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectionsGeoJson {
    /// One `LineString` feature per route with a non-empty line.
    pub collection: FeatureCollection,
    /// Step polylines skipped because they did not decode.
    pub failures: Vec<RouteDecodeFailure>,
}

/// One mapped route: its feature, if any coordinates survived, and the
/// steps that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedRoute {
    /// `LineString` over every decodable step; `None` when none decoded.
    pub feature: Option<Feature>,
    /// Steps whose polyline did not decode.
    pub failures: Vec<RouteDecodeFailure>,
}

/// Map a directions payload to `LineString` features.
///
/// A malformed step polyline is skipped and reported in
/// [`DirectionsGeoJson::failures`]; the remaining steps of the same route
/// still contribute. Routes without any decodable step are dropped.
pub fn directions_to_geojson(payload: &DirectionsPayload) -> DirectionsGeoJson {
    let mut output = DirectionsGeoJson::default();
    for (route_index, route) in payload.routes.iter().enumerate() {
        let mapped = route_to_feature(route_index, route);
        output.failures.extend(mapped.failures);
        match mapped.feature {
            Some(feature) => output.collection.features.push(feature),
            None => debug!(route_index, "dropping route without decodable steps"),
        }
    }
    output
}

/// Map one route, concatenating every decodable step polyline.
///
/// # Examples
///
/// ```
/// use mapbridge::domain::google_maps::route_to_feature;
/// use serde_json::json;
///
/// let route = json!({
///     "legs": [{"steps": [
///         {"polyline": {"points": "_p~iF~ps|U_ulLnnqC"}},
///         {"polyline": {"points": "_p~iF"}}
///     ]}]
/// });
/// let mapped = route_to_feature(0, &route);
/// let feature = mapped.feature.expect("first step decodes");
/// assert_eq!(feature.properties["route_index"], 0);
/// assert_eq!(mapped.failures.len(), 1);
/// ```
pub fn route_to_feature(route_index: usize, route: &Value) -> MappedRoute {
    let route_dto = match RouteDto::deserialize(route) {
        Ok(dto) => dto,
        Err(error) => {
            let reason = MissingData::malformed(error);
            debug!(route_index, %reason, "skipping malformed route");
            return MappedRoute::default();
        }
    };

    let mut coordinates = Vec::new();
    let mut failures = Vec::new();
    for (leg_index, leg) in route_dto.legs.iter().enumerate() {
        for (step_index, step) in leg_steps(leg).into_iter().enumerate() {
            let Some(points) = step.polyline.and_then(|polyline| polyline.points) else {
                continue;
            };
            match decode(&points) {
                Ok(decoded) => coordinates.extend(decoded),
                Err(error) => failures.push(RouteDecodeFailure {
                    route_index,
                    leg_index,
                    step_index,
                    error,
                }),
            }
        }
    }

    let feature = (!coordinates.is_empty()).then(|| {
        Feature::new(
            Geometry::LineString(coordinates),
            route_properties(route_index, &route_dto),
        )
    });
    MappedRoute { feature, failures }
}

fn leg_steps(leg: &Map<String, Value>) -> Vec<StepDto> {
    let Some(Value::Array(steps)) = leg.get("steps") else {
        return Vec::new();
    };
    steps
        .iter()
        .map(|step| StepDto::deserialize(step).unwrap_or_default())
        .collect()
}

fn route_properties(route_index: usize, route: &RouteDto) -> Properties {
    let mut properties = Properties::new();
    properties.insert("route_index".to_owned(), json!(route_index));
    if let Some(summary) = route.summary.as_ref().filter(|value| !value.is_null()) {
        properties.insert("summary".to_owned(), summary.clone());
    }
    let legs = route
        .legs
        .iter()
        .map(|leg| Value::Object(copy_present_keys(leg, LEG_SUMMARY_KEYS)))
        .collect();
    properties.insert("legs".to_owned(), Value::Array(legs));
    properties
}
