//! Domain primitives, mappers and services.
//!
//! Purpose: normalise upstream places/routing/geocoding payloads and transit
//! linked-data records into GeoJSON and joined station records. Mappers and
//! the joiner are pure functions; services own the port calls.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — failure payload with a stable code.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - TraceId — task-local correlation identifier.
//! - GoogleMapsGeoJsonService / PassengerSurveyService — orchestration over
//!   the driven ports in [`ports`].

pub mod error;
pub mod geojson;
pub mod google_maps;
mod google_maps_service;
mod missing_data;
pub mod passenger_survey;
mod passenger_survey_service;
pub mod ports;
pub mod trace_id;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::google_maps_service::{GoogleMapsGeoJsonService, MAX_SEARCH_RADIUS_M};
pub use self::missing_data::MissingData;
pub use self::passenger_survey_service::{PassengerSurveyQuery, PassengerSurveyService};
pub use self::trace_id::TraceId;

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use mapbridge::domain::{DomainResult, Error};
///
/// fn lookup() -> DomainResult<()> {
///     Err(Error::invalid_request("address must not be blank"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
