//! Driven port for the commercial places, routing and geocoding API.
//!
//! The domain owns request shapes and the raw payload envelopes; mappers in
//! [`crate::domain::google_maps`] turn payloads into GeoJSON.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::define_source_error;
use crate::domain::geojson::Coordinate;

/// Text search for places, optionally biased around a location.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSearchRequest {
    /// Free-text query.
    pub query: String,
    /// Bias location.
    pub location: Option<Coordinate>,
    /// Bias radius in metres.
    pub radius_m: Option<u32>,
    /// Upstream place type filter (for example `restaurant`).
    pub place_type: Option<String>,
}

/// Travel modes accepted by the directions endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    /// Road network by car.
    #[default]
    Driving,
    /// Pedestrian paths.
    Walking,
    /// Cycle paths.
    Bicycling,
    /// Public transit.
    Transit,
}

impl TravelMode {
    /// Upstream query parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a travel mode string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode '{0}'; expected driving, walking, bicycling or transit")]
pub struct UnknownTravelMode(pub String);

impl FromStr for TravelMode {
    type Err = UnknownTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(Self::Driving),
            "walking" => Ok(Self::Walking),
            "bicycling" => Ok(Self::Bicycling),
            "transit" => Ok(Self::Transit),
            _ => Err(UnknownTravelMode(s.to_owned())),
        }
    }
}

/// Route request between two free-text or `lat,lng` endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    /// Route origin.
    pub origin: String,
    /// Route destination.
    pub destination: String,
    /// Travel mode.
    pub mode: TravelMode,
    /// Ask for alternative routes.
    pub alternatives: bool,
}

/// Forward geocoding request.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeRequest {
    /// Address to resolve.
    pub address: String,
}

/// `results` envelope shared by the places and geocoding endpoints.
///
/// Elements stay raw so one malformed result cannot fail the whole payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResultsPayload {
    /// Upstream status string (`OK`, `ZERO_RESULTS`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Raw result objects.
    #[serde(default)]
    pub results: Vec<Value>,
    /// Upstream diagnostic message.
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Places text search payload.
pub type PlacesPayload = SearchResultsPayload;

/// Geocoding payload.
pub type GeocodePayload = SearchResultsPayload;

/// `routes` envelope returned by the directions endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DirectionsPayload {
    /// Upstream status string.
    #[serde(default)]
    pub status: Option<String>,
    /// Raw route objects.
    #[serde(default)]
    pub routes: Vec<Value>,
    /// Upstream diagnostic message.
    #[serde(default)]
    pub error_message: Option<String>,
}

define_source_error! {
    /// Errors surfaced while calling the places/routing API.
    pub enum GoogleMapsSourceError {
        /// Network transport failed before a usable response arrived.
        Transport { message: String } =>
            "maps transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "maps timeout: {message}",
        /// The API throttled the request.
        RateLimited { message: String } =>
            "maps rate limited request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "maps response decode failed: {message}",
        /// The API or the adapter rejected the request.
        InvalidRequest { message: String } =>
            "maps request invalid: {message}",
    }
    retryable: Transport, Timeout, RateLimited
}

/// Port for the places/routing/geocoding API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleMapsSource: Send + Sync {
    /// Run a places text search.
    async fn search_places(
        &self,
        request: &PlaceSearchRequest,
    ) -> Result<PlacesPayload, GoogleMapsSourceError>;

    /// Compute routes between two endpoints.
    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsPayload, GoogleMapsSourceError>;

    /// Resolve an address into candidate locations.
    async fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> Result<GeocodePayload, GoogleMapsSourceError>;
}

/// Fixture implementation returning empty payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureGoogleMapsSource;

#[async_trait]
impl GoogleMapsSource for FixtureGoogleMapsSource {
    async fn search_places(
        &self,
        _request: &PlaceSearchRequest,
    ) -> Result<PlacesPayload, GoogleMapsSourceError> {
        Ok(PlacesPayload::default())
    }

    async fn directions(
        &self,
        _request: &DirectionsRequest,
    ) -> Result<DirectionsPayload, GoogleMapsSourceError> {
        Ok(DirectionsPayload::default())
    }

    async fn geocode(
        &self,
        _request: &GeocodeRequest,
    ) -> Result<GeocodePayload, GoogleMapsSourceError> {
        Ok(GeocodePayload::default())
    }
}
