//! Driven port for the public-transit linked-data API.
//!
//! Station and passenger-survey records come back as raw JSON-LD objects. The
//! joiner decodes each record on its own so malformed entries are skipped
//! rather than failing the batch.

use async_trait::async_trait;
use serde_json::Value;

use super::define_source_error;

/// Filters for the station listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationQuery {
    /// Restrict to one operator (for example `odpt.Operator:JR-East`).
    pub operator: Option<String>,
}

/// Filters for the passenger-survey listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurveyQuery {
    /// Restrict to one survey year.
    pub survey_year: Option<i32>,
}

define_source_error! {
    /// Errors surfaced while calling the transit data API.
    pub enum TransitDataSourceError {
        /// Network transport failed before a usable response arrived.
        Transport { message: String } =>
            "transit data transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "transit data timeout: {message}",
        /// The API throttled the request.
        RateLimited { message: String } =>
            "transit data rate limited request: {message}",
        /// The response body was not a JSON array.
        Decode { message: String } =>
            "transit data decode failed: {message}",
        /// The API rejected the request (bad key, bad filter).
        InvalidRequest { message: String } =>
            "transit data request invalid: {message}",
    }
    retryable: Transport, Timeout, RateLimited
}

/// Port for station and passenger-survey listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransitDataSource: Send + Sync {
    /// Fetch raw station records.
    async fn fetch_stations(
        &self,
        query: &StationQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError>;

    /// Fetch raw passenger-survey records.
    async fn fetch_surveys(
        &self,
        query: &SurveyQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError>;
}

/// Fixture implementation returning no records.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureTransitDataSource;

#[async_trait]
impl TransitDataSource for FixtureTransitDataSource {
    async fn fetch_stations(
        &self,
        _query: &StationQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        Ok(Vec::new())
    }

    async fn fetch_surveys(
        &self,
        _query: &SurveyQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        Ok(Vec::new())
    }
}
