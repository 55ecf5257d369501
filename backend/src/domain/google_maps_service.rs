//! Places, directions and geocoding to GeoJSON.
//!
//! The service validates caller input, calls the [`GoogleMapsSource`] port
//! once per request and maps the payload with the pure mappers in
//! [`crate::domain::google_maps`].

use std::sync::Arc;

use tracing::warn;

use crate::domain::Error;
use crate::domain::geojson::{Coordinate, FeatureCollection};
use crate::domain::google_maps::{
    DirectionsGeoJson, directions_to_geojson, geocode_to_geojson, places_to_geojson,
};
use crate::domain::ports::{
    DirectionsRequest, GeocodeRequest, GoogleMapsSource, GoogleMapsSourceError,
    PlaceSearchRequest,
};

/// Largest search radius the places endpoint accepts, in metres.
pub const MAX_SEARCH_RADIUS_M: u32 = 50_000;

fn map_source_error(operation: &str, error: GoogleMapsSourceError) -> Error {
    if error.is_retryable() {
        return Error::upstream_unavailable(format!("maps {operation} unavailable: {error}"));
    }
    match error {
        GoogleMapsSourceError::InvalidRequest { message } => {
            Error::upstream_rejected(format!("maps {operation} rejected: {message}"))
        }
        other => Error::internal(format!("maps {operation} failed: {other}")),
    }
}

fn require_text(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_request(format!("{field} must not be blank")));
    }
    Ok(())
}

fn validate_location(location: Coordinate) -> Result<(), Error> {
    let in_range = location.is_finite()
        && (-90.0..=90.0).contains(&location.lat)
        && (-180.0..=180.0).contains(&location.lng);
    if in_range {
        Ok(())
    } else {
        Err(Error::invalid_request(format!(
            "location [{}, {}] is outside WGS84 bounds",
            location.lng, location.lat
        )))
    }
}

fn validate_place_search(request: &PlaceSearchRequest) -> Result<(), Error> {
    require_text("query", &request.query)?;
    if let Some(location) = request.location {
        validate_location(location)?;
    }
    if let Some(radius) = request
        .radius_m
        .filter(|radius| !(1..=MAX_SEARCH_RADIUS_M).contains(radius))
    {
        return Err(Error::invalid_request(format!(
            "radius must be between 1 and {MAX_SEARCH_RADIUS_M} metres, got {radius}"
        )));
    }
    if request
        .place_type
        .as_deref()
        .is_some_and(|place_type| place_type.trim().is_empty())
    {
        return Err(Error::invalid_request("place type must not be blank"));
    }
    Ok(())
}

/// GeoJSON service over the places/routing/geocoding port.
#[derive(Clone)]
pub struct GoogleMapsGeoJsonService<S> {
    source: Arc<S>,
}

impl<S> GoogleMapsGeoJsonService<S> {
    /// Create a new service backed by `source`.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

impl<S> GoogleMapsGeoJsonService<S>
where
    S: GoogleMapsSource,
{
    /// Search places and return one `Point` feature per located result.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request [`Error`] for a blank query, an out-of-range
    /// location or radius, or a blank place type; otherwise the mapped port
    /// failure.
    pub async fn places(&self, request: &PlaceSearchRequest) -> Result<FeatureCollection, Error> {
        validate_place_search(request)?;
        let payload = self
            .source
            .search_places(request)
            .await
            .map_err(|error| map_source_error("place search", error))?;
        Ok(places_to_geojson(&payload))
    }

    /// Compute routes and return one `LineString` feature per route.
    ///
    /// Malformed step polylines are logged and listed in
    /// [`DirectionsGeoJson::failures`]; the other steps still map.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request [`Error`] for a blank origin or destination;
    /// otherwise the mapped port failure.
    pub async fn directions(&self, request: &DirectionsRequest) -> Result<DirectionsGeoJson, Error> {
        require_text("origin", &request.origin)?;
        require_text("destination", &request.destination)?;
        let payload = self
            .source
            .directions(request)
            .await
            .map_err(|error| map_source_error("directions", error))?;

        let output = directions_to_geojson(&payload);
        for failure in &output.failures {
            warn!(
                route_index = failure.route_index,
                leg_index = failure.leg_index,
                step_index = failure.step_index,
                error = %failure.error,
                "skipping malformed step polyline"
            );
        }
        Ok(output)
    }

    /// Geocode an address into candidate `Point` features.
    ///
    /// # Errors
    ///
    /// Returns an invalid-request [`Error`] for a blank address; otherwise the
    /// mapped port failure.
    pub async fn geocode(&self, request: &GeocodeRequest) -> Result<FeatureCollection, Error> {
        require_text("address", &request.address)?;
        let payload = self
            .source
            .geocode(request)
            .await
            .map_err(|error| map_source_error("geocode", error))?;
        Ok(geocode_to_geojson(&payload))
    }
}

#[cfg(test)]
#[path = "google_maps_service_tests.rs"]
mod tests;
