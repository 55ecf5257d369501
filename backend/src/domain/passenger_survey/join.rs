//! Station/survey join over an arena of records with a key index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::{debug, info};

use super::payload::{StationDto, SurveyDto, SurveyObjectDto};
use crate::domain::MissingData;
use crate::domain::geojson::Coordinate;

/// Accumulated passenger count for one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SurveyAggregate {
    /// Survey year of the first matched contribution.
    pub year: Option<i32>,
    /// Running sum of every matched contribution.
    pub value: i64,
}

/// One joined station.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    /// Canonical identity (`owl:sameAs`, else `@id`).
    pub id: String,
    /// Other identities resolving to this record.
    pub aliases: Vec<String>,
    /// Station title.
    pub title: Option<String>,
    /// Station code.
    pub code: Option<String>,
    /// Operator identity.
    pub operator: Option<String>,
    /// Railway identity.
    pub railway: Option<String>,
    /// Station location.
    pub coordinate: Option<Coordinate>,
    /// Survey totals, absent until a contribution matches.
    pub survey: Option<SurveyAggregate>,
}

impl StationRecord {
    fn from_dto(id: String, dto: StationDto) -> Self {
        let coordinate = dto.coordinate();
        Self {
            id,
            aliases: Vec::new(),
            title: dto.title,
            code: dto.code,
            operator: dto.operator,
            railway: dto.railway,
            coordinate,
            survey: None,
        }
    }

    fn contribute(&mut self, year: Option<i32>, value: i64) {
        let aggregate = self
            .survey
            .get_or_insert(SurveyAggregate { year, value: 0 });
        aggregate.value = aggregate.value.saturating_add(value);
    }
}

#[derive(Serialize)]
struct GeoPoint {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
struct StationRecordView<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    aliases: &'a [String],
    title: Option<&'a str>,
    code: Option<&'a str>,
    operator: Option<&'a str>,
    railway: Option<&'a str>,
    geo: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    survey: Option<SurveyAggregate>,
}

impl Serialize for StationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StationRecordView {
            id: &self.id,
            aliases: &self.aliases,
            title: self.title.as_deref(),
            code: self.code.as_deref(),
            operator: self.operator.as_deref(),
            railway: self.railway.as_deref(),
            geo: self.coordinate.map(|coordinate| GeoPoint {
                lat: coordinate.lat,
                lon: coordinate.lng,
            }),
            survey: self.survey,
        }
        .serialize(serializer)
    }
}

/// Joined stations: records in first-registration order plus an index from
/// every canonical and alias identity to its record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedStations {
    records: Vec<StationRecord>,
    index: HashMap<String, usize>,
}

impl JoinedStations {
    /// Number of distinct records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no station was registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve a canonical or alias identity.
    pub fn get(&self, id: &str) -> Option<&StationRecord> {
        self.index.get(id).and_then(|slot| self.records.get(*slot))
    }

    /// Records in first-registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, StationRecord> {
        self.records.iter()
    }

    /// Records as a slice.
    pub fn records(&self) -> &[StationRecord] {
        &self.records
    }

    /// Consume into the owned records.
    pub fn into_records(self) -> Vec<StationRecord> {
        self.records
    }

    fn register(&mut self, dto: StationDto) -> Result<(), MissingData> {
        let canonical = dto.canonical_id().ok_or(MissingData::Identity)?.to_owned();
        let raw_id = dto.raw_id.clone();

        let slot = if let Some(&existing) = self.index.get(&canonical) {
            debug!(id = %canonical, "station already registered; keeping first-seen attributes");
            existing
        } else {
            let slot = self.records.len();
            self.records.push(StationRecord::from_dto(canonical.clone(), dto));
            self.index.insert(canonical.clone(), slot);
            slot
        };

        if let Some(alias) = raw_id.filter(|alias| *alias != canonical) {
            self.register_alias(slot, alias);
        }
        Ok(())
    }

    fn register_alias(&mut self, slot: usize, alias: String) {
        match self.index.get(&alias) {
            Some(&owner) if owner == slot => {}
            Some(_) => debug!(%alias, "alias already owned by another station; ignoring"),
            None => {
                if let Some(record) = self.records.get_mut(slot) {
                    record.aliases.push(alias.clone());
                }
                self.index.insert(alias, slot);
            }
        }
    }

    fn contribute(&mut self, id: &str, year: Option<i32>, value: i64) -> bool {
        let Some(&slot) = self.index.get(id) else {
            debug!(%id, "survey references unknown station; dropping contribution");
            return false;
        };
        match self.records.get_mut(slot) {
            Some(record) => {
                record.contribute(year, value);
                true
            }
            None => false,
        }
    }

    fn apply_survey(&mut self, survey: &SurveyDto) -> usize {
        let mut applied = 0;

        if let Some(value) = survey.counts.value() {
            for id in &survey.stations {
                applied += usize::from(self.contribute(id, survey.year, value));
            }
        }

        for (key, raw) in survey.nested_objects() {
            let object = match SurveyObjectDto::deserialize(raw) {
                Ok(object) => object,
                Err(error) => {
                    let reason = MissingData::malformed(error);
                    debug!(key, %reason, "skipping nested survey object");
                    continue;
                }
            };
            let (Some(id), Some(value)) = (object.station.as_deref(), object.counts.value())
            else {
                debug!(key, "nested survey object lacks station or value; skipping");
                continue;
            };
            applied += usize::from(self.contribute(id, survey.year, value));
        }

        applied
    }
}

impl<'a> IntoIterator for &'a JoinedStations {
    type Item = &'a StationRecord;
    type IntoIter = std::slice::Iter<'a, StationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for JoinedStations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

/// Join raw station records with raw passenger-survey records.
///
/// Stations are registered under their canonical identity and, when it
/// differs, their raw `@id`. Survey contributions add onto the matched
/// record's aggregate; the aggregate's year is fixed by the first match.
/// Malformed entries and unknown stations are skipped.
///
/// # Examples
///
/// ```
/// use mapbridge::domain::passenger_survey::join;
/// use serde_json::json;
///
/// let stations = [json!({"owl:sameAs": "odpt.Station:A", "@id": "urn:a"})];
/// let surveys = [
///     json!({"odpt:surveyYear": 2022, "odpt:station": "urn:a", "odpt:passengerJourneys": 100}),
///     json!({"odpt:surveyYear": 2023, "odpt:objects": [
///         {"odpt:station": "odpt.Station:A", "odpt:dailyPassengers": 50}
///     ]}),
/// ];
///
/// let joined = join(&stations, &surveys);
/// let survey = joined.get("urn:a").and_then(|record| record.survey).expect("joined");
/// assert_eq!((survey.year, survey.value), (Some(2022), 150));
/// ```
pub fn join(stations: &[Value], surveys: &[Value]) -> JoinedStations {
    let mut joined = JoinedStations::default();

    for (index, raw) in stations.iter().enumerate() {
        let registered = StationDto::deserialize(raw)
            .map_err(MissingData::malformed)
            .and_then(|dto| joined.register(dto));
        if let Err(reason) = registered {
            debug!(index, %reason, "skipping station record");
        }
    }

    let mut contributions = 0;
    for (index, raw) in surveys.iter().enumerate() {
        match SurveyDto::deserialize(raw) {
            Ok(survey) => contributions += joined.apply_survey(&survey),
            Err(error) => {
                let reason = MissingData::malformed(error);
                debug!(index, %reason, "skipping survey record");
            }
        }
    }

    info!(
        stations = joined.len(),
        keys = joined.index.len(),
        contributions,
        "joined stations with passenger surveys"
    );
    joined
}
