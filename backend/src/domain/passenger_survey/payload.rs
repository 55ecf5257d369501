//! Typed views over raw station and passenger-survey records.
//!
//! Every record is decoded on its own. Numeric fields tolerate JSON numbers
//! and numeric strings; anything else reads as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::geojson::Coordinate;

/// Nested sub-object array keys, in the order they are applied.
pub(super) const NESTED_OBJECT_KEYS: [&str; 3] = [
    "odpt:surveyObject",
    "odpt:passengerSurveyObject",
    "odpt:objects",
];

#[derive(Debug, Default, Deserialize)]
pub(super) struct StationDto {
    #[serde(rename = "owl:sameAs", default, deserialize_with = "non_empty_string")]
    pub same_as: Option<String>,
    #[serde(rename = "@id", default, deserialize_with = "non_empty_string")]
    pub raw_id: Option<String>,
    #[serde(rename = "dc:title", default)]
    pub title: Option<String>,
    #[serde(rename = "odpt:stationCode", default)]
    pub code: Option<String>,
    #[serde(rename = "odpt:operator", default)]
    pub operator: Option<String>,
    #[serde(rename = "odpt:railway", default)]
    pub railway: Option<String>,
    #[serde(rename = "geo:lat", default, deserialize_with = "lenient_number")]
    pub lat: Option<f64>,
    #[serde(rename = "geo:long", default, deserialize_with = "lenient_number")]
    pub lon: Option<f64>,
    #[serde(rename = "ug:region", default)]
    pub region: Option<RegionDto>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RegionDto {
    #[serde(default)]
    coordinates: Option<Value>,
}

impl StationDto {
    /// `owl:sameAs` when present, else `@id`.
    pub fn canonical_id(&self) -> Option<&str> {
        self.same_as.as_deref().or(self.raw_id.as_deref())
    }

    /// Direct `geo:lat`/`geo:long`, else the first two region coordinates
    /// read as `[lon, lat]`.
    pub fn coordinate(&self) -> Option<Coordinate> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Some(Coordinate::from_lat_lng(lat, lon));
        }
        let Some(Value::Array(positions)) = self.region.as_ref()?.coordinates.as_ref() else {
            return None;
        };
        match positions.as_slice() {
            [lon, lat, ..] => Some(Coordinate::new(number(lon)?, number(lat)?)),
            _ => None,
        }
    }
}

/// Value fields shared by flat survey records and nested sub-objects.
#[derive(Debug, Default, Deserialize)]
pub(super) struct PassengerCounts {
    #[serde(rename = "odpt:passengerJourneys", default, deserialize_with = "lenient_number")]
    journeys: Option<f64>,
    #[serde(rename = "odpt:annualPassengers", default, deserialize_with = "lenient_number")]
    annual: Option<f64>,
    #[serde(rename = "odpt:dailyPassengers", default, deserialize_with = "lenient_number")]
    daily: Option<f64>,
}

impl PassengerCounts {
    /// First present count in priority order (journeys, annual, daily),
    /// truncated toward zero.
    pub fn value(&self) -> Option<i64> {
        self.journeys
            .or(self.annual)
            .or(self.daily)
            .map(|count| count.trunc() as i64)
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SurveyDto {
    #[serde(rename = "odpt:surveyYear", default, deserialize_with = "lenient_year")]
    pub year: Option<i32>,
    #[serde(rename = "odpt:station", default, deserialize_with = "station_ids")]
    pub stations: Vec<String>,
    #[serde(flatten)]
    pub counts: PassengerCounts,
    #[serde(rename = "odpt:surveyObject", default)]
    survey_object: Option<Value>,
    #[serde(rename = "odpt:passengerSurveyObject", default)]
    passenger_survey_object: Option<Value>,
    #[serde(rename = "odpt:objects", default)]
    objects: Option<Value>,
}

impl SurveyDto {
    /// Raw nested sub-objects from every recognised array key, in key order.
    /// Keys holding something other than an array are ignored.
    pub fn nested_objects(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        NESTED_OBJECT_KEYS
            .into_iter()
            .zip([
                &self.survey_object,
                &self.passenger_survey_object,
                &self.objects,
            ])
            .filter_map(|(key, field)| match field {
                Some(Value::Array(objects)) => Some((key, objects)),
                _ => None,
            })
            .flat_map(|(key, objects)| objects.iter().map(move |object| (key, object)))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SurveyObjectDto {
    #[serde(rename = "odpt:station", default, deserialize_with = "non_empty_string")]
    pub station: Option<String>,
    #[serde(flatten)]
    pub counts: PassengerCounts,
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|parsed| parsed.is_finite())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number))
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(number)
        .map(f64::trunc)
        .filter(|year| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(year))
        .map(|year| year as i32))
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        _ => None,
    })
}

/// `odpt:station` holds one identifier or a list; non-string members are
/// dropped.
fn station_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) if !id.is_empty() => vec![id],
        Some(Value::Array(ids)) => ids
            .into_iter()
            .filter_map(|id| match id {
                Value::String(text) if !text.is_empty() => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
