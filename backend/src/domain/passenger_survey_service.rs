//! Joined station and heatmap service over the transit data port.
//!
//! Station and survey listings are fetched concurrently; the join starts only
//! once both have arrived. A failure on either side aborts the whole call.

use std::sync::Arc;

use tracing::debug;

use crate::domain::Error;
use crate::domain::passenger_survey::{HeatmapPoint, JoinedStations, TimeSlot, join, weigh};
use crate::domain::ports::{
    StationQuery, SurveyQuery, TransitDataSource, TransitDataSourceError,
};

fn map_source_error(error: TransitDataSourceError) -> Error {
    if error.is_retryable() {
        return Error::upstream_unavailable(format!("transit data unavailable: {error}"));
    }
    match error {
        TransitDataSourceError::InvalidRequest { message } => {
            Error::upstream_rejected(format!("transit data request rejected: {message}"))
        }
        other => Error::internal(format!("transit data call failed: {other}")),
    }
}

/// Filters for a join: the operator narrows stations, the year narrows
/// surveys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassengerSurveyQuery {
    /// Operator identity filter.
    pub operator: Option<String>,
    /// Survey year filter.
    pub survey_year: Option<i32>,
}

impl PassengerSurveyQuery {
    fn station_query(&self) -> StationQuery {
        StationQuery {
            operator: self.operator.clone(),
        }
    }

    fn survey_query(&self) -> SurveyQuery {
        SurveyQuery {
            survey_year: self.survey_year,
        }
    }
}

/// Station/survey join service.
#[derive(Clone)]
pub struct PassengerSurveyService<S> {
    source: Arc<S>,
}

impl<S> PassengerSurveyService<S> {
    /// Create a new service backed by `source`.
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }
}

impl<S> PassengerSurveyService<S>
where
    S: TransitDataSource,
{
    /// Fetch stations and surveys concurrently and join them.
    ///
    /// # Errors
    ///
    /// Returns the mapped port failure when either fetch fails; no partial
    /// join is produced.
    pub async fn joined_stations(
        &self,
        query: &PassengerSurveyQuery,
    ) -> Result<JoinedStations, Error> {
        let station_query = query.station_query();
        let survey_query = query.survey_query();
        let (stations, surveys) = tokio::try_join!(
            self.source.fetch_stations(&station_query),
            self.source.fetch_surveys(&survey_query),
        )
        .map_err(map_source_error)?;
        debug!(
            stations = stations.len(),
            surveys = surveys.len(),
            "fetched transit records"
        );
        Ok(join(&stations, &surveys))
    }

    /// Join and weigh every located, surveyed station for `slot`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::joined_stations`].
    pub async fn heatmap(
        &self,
        query: &PassengerSurveyQuery,
        slot: &TimeSlot,
    ) -> Result<Vec<HeatmapPoint>, Error> {
        let joined = self.joined_stations(query).await?;
        Ok(weigh(&joined, slot))
    }
}

#[cfg(test)]
#[path = "passenger_survey_service_tests.rs"]
mod tests;
