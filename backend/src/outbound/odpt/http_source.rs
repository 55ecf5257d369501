//! Reqwest-backed transit linked-data source adapter.
//!
//! This adapter owns transport details only: consumer-key and filter query
//! parameters, timeout and HTTP error mapping, bounded retries and the
//! array-shaped response check.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ConfigError, MapbridgeSettings};
use crate::domain::ports::{
    StationQuery, SurveyQuery, TransitDataSource, TransitDataSourceError,
};
use crate::outbound::http_support::{
    StatusFailure, classify_status, endpoint_url, status_message,
};

const STATION_ENDPOINT: &str = "odpt:Station";
const SURVEY_ENDPOINT: &str = "odpt:PassengerSurvey";
const CONSUMER_KEY_PARAM: &str = "acl:consumerKey";

type QueryParams = Vec<(&'static str, String)>;

/// Transit data adapter issuing GET requests under one base URL.
pub struct OdptHttpSource {
    client: Client,
    base_url: Url,
    consumer_key: String,
    max_attempts: u32,
}

impl OdptHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    /// `max_attempts` counts the first try and is raised to at least one.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        consumer_key: impl Into<String>,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            consumer_key: consumer_key.into(),
            max_attempts: max_attempts.max(1),
        })
    }

    /// Build an adapter from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the consumer key is missing, the base URL
    /// is invalid or the client cannot be constructed.
    pub fn from_settings(settings: &MapbridgeSettings) -> Result<Self, ConfigError> {
        let consumer_key = settings.odpt_api_key()?;
        let base_url = settings.odpt_base_url()?;
        Self::new(
            base_url,
            consumer_key,
            settings.request_timeout(),
            settings.fetch_attempts(),
        )
        .map_err(|error| ConfigError::HttpClient {
            message: error.to_string(),
        })
    }

    async fn get_records(
        &self,
        endpoint: &'static str,
        filters: QueryParams,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        let url = endpoint_url(&self.base_url, &[endpoint]).ok_or_else(|| {
            TransitDataSourceError::invalid_request(format!(
                "base URL {} cannot hold a path",
                self.base_url
            ))
        })?;
        let mut params = filters;
        params.push((CONSUMER_KEY_PARAM, self.consumer_key.clone()));

        for attempt in 1..=self.max_attempts {
            match self.fetch_once(&url, &params).await {
                Ok(records) => {
                    debug!(endpoint, attempt, records = records.len(), "fetched transit records");
                    return Ok(records);
                }
                Err(error) if error.is_retryable() && attempt < self.max_attempts => {
                    warn!(endpoint, attempt, %error, "transit fetch failed; retrying");
                }
                Err(error) => {
                    warn!(endpoint, attempt, %error, "transit fetch failed");
                    return Err(error);
                }
            }
        }

        Err(TransitDataSourceError::transport(format!(
            "no attempt was made to fetch {endpoint}"
        )))
    }

    async fn fetch_once(
        &self,
        url: &Url,
        params: &QueryParams,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_records(body.as_ref())
    }
}

#[async_trait]
impl TransitDataSource for OdptHttpSource {
    async fn fetch_stations(
        &self,
        query: &StationQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        self.get_records(STATION_ENDPOINT, station_params(query)).await
    }

    async fn fetch_surveys(
        &self,
        query: &SurveyQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        self.get_records(SURVEY_ENDPOINT, survey_params(*query)).await
    }
}

fn station_params(query: &StationQuery) -> QueryParams {
    query
        .operator
        .as_deref()
        .map(str::trim)
        .filter(|operator| !operator.is_empty())
        .map(|operator| ("odpt:operator", operator.to_owned()))
        .into_iter()
        .collect()
}

fn survey_params(query: SurveyQuery) -> QueryParams {
    query
        .survey_year
        .map(|year| ("odpt:surveyYear", year.to_string()))
        .into_iter()
        .collect()
}

fn parse_records(body: &[u8]) -> Result<Vec<Value>, TransitDataSourceError> {
    let decoded: Value = serde_json::from_slice(body).map_err(|error| {
        TransitDataSourceError::decode(format!("invalid transit JSON payload: {error}"))
    })?;
    match decoded {
        Value::Array(records) => Ok(records),
        other => Err(TransitDataSourceError::decode(format!(
            "expected a JSON array of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn map_transport_error(error: reqwest::Error) -> TransitDataSourceError {
    if error.is_timeout() {
        TransitDataSourceError::timeout(error.to_string())
    } else {
        TransitDataSourceError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TransitDataSourceError {
    let message = status_message(status, body);
    match classify_status(status) {
        StatusFailure::RateLimited => TransitDataSourceError::rate_limited(message),
        StatusFailure::Timeout => TransitDataSourceError::timeout(message),
        StatusFailure::InvalidRequest => TransitDataSourceError::invalid_request(message),
        StatusFailure::Transport => TransitDataSourceError::transport(message),
    }
}
