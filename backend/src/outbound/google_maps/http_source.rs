//! Reqwest-backed places/routing/geocoding source adapter.
//!
//! This adapter owns transport details only: query parameters, timeout and
//! HTTP error mapping, envelope decoding and upstream `status` checks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{ConfigError, MapbridgeSettings};
use crate::domain::ports::{
    DirectionsPayload, DirectionsRequest, GeocodePayload, GeocodeRequest, GoogleMapsSource,
    GoogleMapsSourceError, PlaceSearchRequest, PlacesPayload,
};
use crate::outbound::http_support::{
    StatusFailure, classify_status, endpoint_url, status_message,
};

const PLACE_TEXT_SEARCH_PATH: &[&str] = &["place", "textsearch", "json"];
const DIRECTIONS_PATH: &[&str] = &["directions", "json"];
const GEOCODE_PATH: &[&str] = &["geocode", "json"];

type QueryParams = Vec<(&'static str, String)>;

/// Places/routing/geocoding adapter issuing GET requests under one base URL.
pub struct GoogleMapsHttpSource {
    client: Client,
    base_url: Url,
    api_key: String,
    language: String,
}

impl GoogleMapsHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            language: language.into(),
        })
    }

    /// Build an adapter from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the API key is missing, the base URL is
    /// invalid or the client cannot be constructed.
    pub fn from_settings(settings: &MapbridgeSettings) -> Result<Self, ConfigError> {
        let api_key = settings.google_maps_api_key()?;
        let base_url = settings.google_maps_base_url()?;
        Self::new(
            base_url,
            api_key,
            settings.language(),
            settings.request_timeout(),
        )
        .map_err(|error| ConfigError::HttpClient {
            message: error.to_string(),
        })
    }

    fn common_params(&self) -> QueryParams {
        vec![
            ("key", self.api_key.clone()),
            ("language", self.language.clone()),
        ]
    }

    async fn get_payload<T>(
        &self,
        path: &[&str],
        mut params: QueryParams,
    ) -> Result<T, GoogleMapsSourceError>
    where
        T: DeserializeOwned,
    {
        let url = endpoint_url(&self.base_url, path).ok_or_else(|| {
            GoogleMapsSourceError::invalid_request(format!(
                "base URL {} cannot hold a path",
                self.base_url
            ))
        })?;
        params.extend(self.common_params());
        debug!(endpoint = %path.join("/"), "requesting maps endpoint");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        serde_json::from_slice(body.as_ref()).map_err(|error| {
            GoogleMapsSourceError::decode(format!("invalid maps JSON payload: {error}"))
        })
    }
}

#[async_trait]
impl GoogleMapsSource for GoogleMapsHttpSource {
    async fn search_places(
        &self,
        request: &PlaceSearchRequest,
    ) -> Result<PlacesPayload, GoogleMapsSourceError> {
        let payload: PlacesPayload = self
            .get_payload(PLACE_TEXT_SEARCH_PATH, place_search_params(request))
            .await?;
        check_status(payload.status.as_deref(), payload.error_message.as_deref())?;
        Ok(payload)
    }

    async fn directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsPayload, GoogleMapsSourceError> {
        let payload: DirectionsPayload = self
            .get_payload(DIRECTIONS_PATH, directions_params(request))
            .await?;
        check_status(payload.status.as_deref(), payload.error_message.as_deref())?;
        Ok(payload)
    }

    async fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> Result<GeocodePayload, GoogleMapsSourceError> {
        let payload: GeocodePayload = self
            .get_payload(GEOCODE_PATH, geocode_params(request))
            .await?;
        check_status(payload.status.as_deref(), payload.error_message.as_deref())?;
        Ok(payload)
    }
}

fn place_search_params(request: &PlaceSearchRequest) -> QueryParams {
    let mut params = vec![("query", request.query.trim().to_owned())];
    if let Some(location) = request.location {
        params.push(("location", format!("{},{}", location.lat, location.lng)));
    }
    if let Some(radius) = request.radius_m {
        params.push(("radius", radius.to_string()));
    }
    if let Some(place_type) = request.place_type.as_deref() {
        params.push(("type", place_type.trim().to_owned()));
    }
    params
}

fn directions_params(request: &DirectionsRequest) -> QueryParams {
    vec![
        ("origin", request.origin.trim().to_owned()),
        ("destination", request.destination.trim().to_owned()),
        ("mode", request.mode.as_str().to_owned()),
        ("alternatives", request.alternatives.to_string()),
    ]
}

fn geocode_params(request: &GeocodeRequest) -> QueryParams {
    vec![("address", request.address.trim().to_owned())]
}

/// Map the envelope `status`. `OK`, `ZERO_RESULTS` and an absent status pass.
fn check_status(
    status: Option<&str>,
    error_message: Option<&str>,
) -> Result<(), GoogleMapsSourceError> {
    let Some(status) = status else {
        return Ok(());
    };
    let message = match error_message {
        Some(detail) if !detail.trim().is_empty() => format!("{status}: {}", detail.trim()),
        _ => status.to_owned(),
    };
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(GoogleMapsSourceError::rate_limited(message)),
        "REQUEST_DENIED" | "INVALID_REQUEST" => {
            Err(GoogleMapsSourceError::invalid_request(message))
        }
        _ => Err(GoogleMapsSourceError::transport(message)),
    }
}

fn map_transport_error(error: reqwest::Error) -> GoogleMapsSourceError {
    if error.is_timeout() {
        GoogleMapsSourceError::timeout(error.to_string())
    } else {
        GoogleMapsSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GoogleMapsSourceError {
    let message = status_message(status, body);
    match classify_status(status) {
        StatusFailure::RateLimited => GoogleMapsSourceError::rate_limited(message),
        StatusFailure::Timeout => GoogleMapsSourceError::timeout(message),
        StatusFailure::InvalidRequest => GoogleMapsSourceError::invalid_request(message),
        StatusFailure::Transport => GoogleMapsSourceError::transport(message),
    }
}
