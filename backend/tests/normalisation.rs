//! End-to-end normalisation over recorded upstream payloads.
//!
//! Static sources replay the JSON fixtures under `tests/fixtures/` through
//! the public services, so these tests cover the same path the CLI takes
//! without touching the network.

use std::sync::Arc;

use async_trait::async_trait;
use mapbridge::domain::geojson::Geometry;
use mapbridge::domain::google_maps::{directions_to_geojson, places_to_geojson};
use mapbridge::domain::passenger_survey::{TimeSlot, join, weigh};
use mapbridge::domain::ports::{
    DirectionsPayload, DirectionsRequest, GeocodePayload, GeocodeRequest, GoogleMapsSource,
    GoogleMapsSourceError, PlaceSearchRequest, PlacesPayload, StationQuery, SurveyQuery,
    TransitDataSource, TransitDataSourceError, TravelMode,
};
use mapbridge::domain::{
    ErrorCode, GoogleMapsGeoJsonService, PassengerSurveyQuery, PassengerSurveyService,
};
use polyline_codec::DecodeError;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const PLACES: &str = include_str!("fixtures/places.json");
const DIRECTIONS: &str = include_str!("fixtures/directions.json");
const STATIONS: &str = include_str!("fixtures/stations.json");
const SURVEYS: &str = include_str!("fixtures/surveys.json");

const SHIBUYA: &str = "odpt.Station:JR-East.Yamanote.Shibuya";
const SHIBUYA_URN: &str = "urn:ucode:_00001C000000000000010000030C3BE7";
const SHINJUKU: &str = "odpt.Station:JR-East.Yamanote.Shinjuku";
const HARAJUKU: &str = "odpt.Station:JR-East.Yamanote.Harajuku";

fn records(raw: &str) -> Vec<Value> {
    serde_json::from_str(raw).expect("fixture is a JSON array")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// Replays the recorded maps payloads regardless of the request.
struct RecordedMaps;

#[async_trait]
impl GoogleMapsSource for RecordedMaps {
    async fn search_places(
        &self,
        _request: &PlaceSearchRequest,
    ) -> Result<PlacesPayload, GoogleMapsSourceError> {
        serde_json::from_str(PLACES).map_err(|e| GoogleMapsSourceError::decode(e.to_string()))
    }

    async fn directions(
        &self,
        _request: &DirectionsRequest,
    ) -> Result<DirectionsPayload, GoogleMapsSourceError> {
        serde_json::from_str(DIRECTIONS).map_err(|e| GoogleMapsSourceError::decode(e.to_string()))
    }

    async fn geocode(
        &self,
        _request: &GeocodeRequest,
    ) -> Result<GeocodePayload, GoogleMapsSourceError> {
        serde_json::from_str(PLACES).map_err(|e| GoogleMapsSourceError::decode(e.to_string()))
    }
}

/// Replays the recorded station and survey listings.
struct RecordedTransit;

#[async_trait]
impl TransitDataSource for RecordedTransit {
    async fn fetch_stations(
        &self,
        _query: &StationQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        Ok(records(STATIONS))
    }

    async fn fetch_surveys(
        &self,
        _query: &SurveyQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        Ok(records(SURVEYS))
    }
}

/// Always fails as if the upstream were throttling.
struct ThrottledTransit;

#[async_trait]
impl TransitDataSource for ThrottledTransit {
    async fn fetch_stations(
        &self,
        _query: &StationQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        Err(TransitDataSourceError::rate_limited("status 429"))
    }

    async fn fetch_surveys(
        &self,
        _query: &SurveyQuery,
    ) -> Result<Vec<Value>, TransitDataSourceError> {
        Ok(Vec::new())
    }
}

#[fixture]
fn maps_service() -> GoogleMapsGeoJsonService<RecordedMaps> {
    GoogleMapsGeoJsonService::new(Arc::new(RecordedMaps))
}

#[fixture]
fn survey_service() -> PassengerSurveyService<RecordedTransit> {
    PassengerSurveyService::new(Arc::new(RecordedTransit))
}

#[rstest]
fn recorded_places_become_point_features() {
    let payload: PlacesPayload = serde_json::from_str(PLACES).expect("places payload");

    let collection = places_to_geojson(&payload);

    assert_eq!(collection.len(), 2);
    let first = collection.iter().next().expect("first feature");
    assert_eq!(
        first.geometry,
        Geometry::Point(mapbridge::domain::geojson::Coordinate::new(139.7005, 35.6595))
    );
    assert_eq!(first.properties["name"], json!("Shibuya Scramble Crossing"));
    assert!(!first.properties.contains_key("photos"));
    assert!(!first.properties.contains_key("geometry"));

    let stats = collection.statistics();
    assert_eq!(stats.total_features, 2);
    assert_eq!(stats.geometry_types, vec!["Point"]);
    let bounds = stats.bounds.expect("bounds");
    assert_close(bounds.min_lat, 35.659);
    assert_close(bounds.max_lat, 35.6595);
    assert_close(bounds.min_lng, 139.7005);
    assert_close(bounds.max_lng, 139.7006);
}

#[rstest]
fn recorded_directions_keep_decodable_routes() {
    let payload: DirectionsPayload = serde_json::from_str(DIRECTIONS).expect("directions payload");

    let output = directions_to_geojson(&payload);

    let route_indices: Vec<Value> = output
        .collection
        .iter()
        .map(|feature| feature.properties["route_index"].clone())
        .collect();
    assert_eq!(route_indices, vec![json!(0), json!(2)]);

    let first = output.collection.iter().next().expect("first route");
    let Geometry::LineString(line) = &first.geometry else {
        panic!("expected a LineString, got {:?}", first.geometry);
    };
    assert_eq!(line.len(), 4);
    assert_close(line[0].lat, 35.65858);
    assert_close(line[0].lng, 139.70164);
    assert_close(line[3].lat, 35.68959);
    assert_close(line[3].lng, 139.70052);
    assert_eq!(first.properties["summary"], json!("Meiji-dori"));
    assert_eq!(
        first.properties["legs"][0]["distance"],
        json!({"text": "3.6 km", "value": 3600})
    );

    assert_eq!(output.failures.len(), 1);
    let failure = &output.failures[0];
    assert_eq!(
        (failure.route_index, failure.leg_index, failure.step_index),
        (1, 0, 0)
    );
    assert_eq!(failure.error, DecodeError::Truncated { offset: 5 });
}

#[rstest]
fn recorded_surveys_join_onto_stations() {
    let joined = join(&records(STATIONS), &records(SURVEYS));

    assert_eq!(joined.len(), 3);

    let shibuya = joined.get(SHIBUYA).expect("shibuya");
    assert_eq!(shibuya.aliases, vec![SHIBUYA_URN.to_owned()]);
    let survey = shibuya.survey.expect("shibuya survey");
    assert_eq!((survey.year, survey.value), (Some(2022), 150_000));
    assert!(std::ptr::eq(
        shibuya,
        joined.get(SHIBUYA_URN).expect("alias lookup")
    ));

    let shinjuku = joined.get(SHINJUKU).expect("shinjuku");
    let coordinate = shinjuku.coordinate.expect("region coordinate");
    assert_close(coordinate.lat, 35.689_729);
    assert_close(coordinate.lng, 139.700_464);
    let survey = shinjuku.survey.expect("shinjuku survey");
    assert_eq!((survey.year, survey.value), (Some(2023), 250_000));

    let harajuku = joined.get(HARAJUKU).expect("harajuku");
    assert_eq!(harajuku.coordinate, None);
    assert_eq!(harajuku.survey.map(|s| s.value), Some(70_000));
}

#[rstest]
#[case::morning(TimeSlot::Morning, 150_000.0, 250_000.0)]
#[case::evening(TimeSlot::Evening, 135_000.0, 225_000.0)]
#[case::late_night("late-night".parse().expect("infallible"), 105_000.0, 175_000.0)]
fn recorded_surveys_weigh_into_heatmap(
    #[case] slot: TimeSlot,
    #[case] shibuya: f64,
    #[case] shinjuku: f64,
) {
    let joined = join(&records(STATIONS), &records(SURVEYS));

    let points = weigh(&joined, &slot);

    let values: Vec<(&str, f64)> = points
        .iter()
        .map(|point| (point.id.as_str(), point.value))
        .collect();
    assert_eq!(values.len(), 2, "stations without coordinates are skipped");
    assert_eq!(values[0].0, SHIBUYA);
    assert_close(values[0].1, shibuya);
    assert_eq!(values[1].0, SHINJUKU);
    assert_close(values[1].1, shinjuku);
}

#[rstest]
#[tokio::test]
async fn places_service_serialises_feature_collection(
    maps_service: GoogleMapsGeoJsonService<RecordedMaps>,
) {
    let request = PlaceSearchRequest {
        query: "shibuya crossing".to_owned(),
        location: None,
        radius_m: None,
        place_type: None,
    };

    let collection = maps_service.places(&request).await.expect("places");
    let json = serde_json::to_value(&collection).expect("serialise");

    assert_eq!(json["type"], json!("FeatureCollection"));
    assert_eq!(json["features"][0]["type"], json!("Feature"));
    assert_eq!(
        json["features"][0]["geometry"],
        json!({"type": "Point", "coordinates": [139.7005, 35.6595]})
    );
}

#[rstest]
#[tokio::test]
async fn directions_service_reports_failed_routes(
    maps_service: GoogleMapsGeoJsonService<RecordedMaps>,
) {
    let request = DirectionsRequest {
        origin: "Shibuya Station".to_owned(),
        destination: "Shinjuku Station".to_owned(),
        mode: TravelMode::Walking,
        alternatives: true,
    };

    let output = maps_service.directions(&request).await.expect("directions");

    assert_eq!(output.collection.len(), 2);
    assert_eq!(output.failures.len(), 1);
}

#[rstest]
#[tokio::test]
async fn places_service_rejects_blank_query(
    maps_service: GoogleMapsGeoJsonService<RecordedMaps>,
) {
    let request = PlaceSearchRequest {
        query: "   ".to_owned(),
        location: None,
        radius_m: None,
        place_type: None,
    };

    let error = maps_service.places(&request).await.expect_err("blank query");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn survey_service_serialises_joined_records(
    survey_service: PassengerSurveyService<RecordedTransit>,
) {
    let joined = survey_service
        .joined_stations(&PassengerSurveyQuery::default())
        .await
        .expect("joined stations");
    let json = serde_json::to_value(&joined).expect("serialise");

    let Value::Array(items) = json else {
        panic!("expected an array of station records");
    };
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["id"], json!(SHIBUYA));
    assert_eq!(items[0]["survey"], json!({"year": 2022, "value": 150_000}));
    assert!(items[2]["geo"].is_null());
}

#[rstest]
#[tokio::test]
async fn survey_service_fails_when_either_listing_fails() {
    let service = PassengerSurveyService::new(Arc::new(ThrottledTransit));

    let error = service
        .heatmap(&PassengerSurveyQuery::default(), &TimeSlot::Noon)
        .await
        .expect_err("throttled");

    assert_eq!(error.code(), ErrorCode::UpstreamUnavailable);
}
