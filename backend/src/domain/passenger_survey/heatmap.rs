//! Time-of-day weighting of joined survey totals.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::join::JoinedStations;
use crate::domain::geojson::Coordinate;

/// Requested time slot. Unrecognised slots keep their text and take the
/// default weight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TimeSlot {
    /// Morning peak.
    #[default]
    Morning,
    /// Midday.
    Noon,
    /// Evening peak.
    Evening,
    /// Anything else.
    Other(String),
}

impl TimeSlot {
    /// Weight applied to a station's survey total.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapbridge::domain::passenger_survey::TimeSlot;
    ///
    /// assert_eq!("Evening".parse::<TimeSlot>().map(|slot| slot.weight()), Ok(0.9));
    /// assert_eq!(TimeSlot::Other("night".into()).weight(), 0.7);
    /// ```
    pub fn weight(&self) -> f64 {
        match self {
            Self::Morning => 1.0,
            Self::Noon => 0.6,
            Self::Evening => 0.9,
            Self::Other(_) => 0.7,
        }
    }
}

impl FromStr for TimeSlot {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "morning" => Self::Morning,
            "noon" => Self::Noon,
            "evening" => Self::Evening,
            _ => Self::Other(trimmed.to_owned()),
        })
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Morning => f.write_str("morning"),
            Self::Noon => f.write_str("noon"),
            Self::Evening => f.write_str("evening"),
            Self::Other(slot) => f.write_str(slot),
        }
    }
}

/// One weighted station.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPoint {
    /// Canonical station identity.
    pub id: String,
    /// Station title.
    pub title: Option<String>,
    /// Station location.
    pub coordinate: Coordinate,
    /// Survey total multiplied by the slot weight.
    pub value: f64,
}

#[derive(Serialize)]
struct HeatmapPointDto<'a> {
    id: &'a str,
    title: Option<&'a str>,
    lat: f64,
    lon: f64,
    value: f64,
}

impl Serialize for HeatmapPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        HeatmapPointDto {
            id: &self.id,
            title: self.title.as_deref(),
            lat: self.coordinate.lat,
            lon: self.coordinate.lng,
            value: self.value,
        }
        .serialize(serializer)
    }
}

/// Weigh every station carrying both a coordinate and a survey aggregate.
/// Stations missing either are left out.
pub fn weigh(stations: &JoinedStations, slot: &TimeSlot) -> Vec<HeatmapPoint> {
    let weight = slot.weight();
    stations
        .iter()
        .filter_map(|record| {
            let coordinate = record.coordinate?;
            let survey = record.survey?;
            Some(HeatmapPoint {
                id: record.id.clone(),
                title: record.title.clone(),
                coordinate,
                value: survey.value as f64 * weight,
            })
        })
        .collect()
}
