//! Tests for the GeoJSON maps service.

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{
    DirectionsPayload, FixtureGoogleMapsSource, MockGoogleMapsSource, PlacesPayload,
    SearchResultsPayload, TravelMode,
};

fn place_request(query: &str) -> PlaceSearchRequest {
    PlaceSearchRequest {
        query: query.to_owned(),
        location: None,
        radius_m: None,
        place_type: None,
    }
}

fn directions_request(origin: &str, destination: &str) -> DirectionsRequest {
    DirectionsRequest {
        origin: origin.to_owned(),
        destination: destination.to_owned(),
        mode: TravelMode::Walking,
        alternatives: true,
    }
}

#[tokio::test]
async fn places_maps_payload_to_points() {
    let mut source = MockGoogleMapsSource::new();
    source
        .expect_search_places()
        .withf(|request| request.query == "ramen" && request.radius_m == Some(500))
        .times(1)
        .return_once(|_| {
            Ok(serde_json::from_value::<PlacesPayload>(json!({
                "status": "OK",
                "results": [
                    {"name": "Ichiran", "geometry": {"location": {"lat": 35.66, "lng": 139.70}}},
                    {"name": "Unlocated"}
                ]
            }))
            .expect("payload parses"))
        });
    let service = GoogleMapsGeoJsonService::new(Arc::new(source));
    let mut request = place_request("ramen");
    request.location = Some(Coordinate::new(139.7, 35.66));
    request.radius_m = Some(500);

    let collection = service.places(&request).await.expect("places succeed");

    assert_eq!(collection.len(), 1);
    assert_eq!(collection.features[0].properties["name"], "Ichiran");
}

#[rstest]
#[case::blank_query(place_request("  "))]
#[case::zero_radius(PlaceSearchRequest { radius_m: Some(0), ..place_request("cafe") })]
#[case::radius_too_large(PlaceSearchRequest { radius_m: Some(50_001), ..place_request("cafe") })]
#[case::latitude_out_of_range(PlaceSearchRequest {
    location: Some(Coordinate::new(139.0, 91.0)),
    ..place_request("cafe")
})]
#[case::non_finite_location(PlaceSearchRequest {
    location: Some(Coordinate::new(f64::NAN, 35.0)),
    ..place_request("cafe")
})]
#[case::blank_place_type(PlaceSearchRequest {
    place_type: Some(String::new()),
    ..place_request("cafe")
})]
#[tokio::test]
async fn places_rejects_invalid_input_without_calling_source(#[case] request: PlaceSearchRequest) {
    let mut source = MockGoogleMapsSource::new();
    source.expect_search_places().times(0);
    let service = GoogleMapsGeoJsonService::new(Arc::new(source));

    let error = service.places(&request).await.expect_err("invalid input");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[case::boundary_radius(Some(MAX_SEARCH_RADIUS_M))]
#[case::minimum_radius(Some(1))]
#[case::no_radius(None)]
#[tokio::test]
async fn places_accepts_radius_within_bounds(#[case] radius_m: Option<u32>) {
    let service = GoogleMapsGeoJsonService::new(Arc::new(FixtureGoogleMapsSource));
    let request = PlaceSearchRequest {
        radius_m,
        ..place_request("cafe")
    };

    let collection = service.places(&request).await.expect("valid input");

    assert!(collection.is_empty());
}

#[rstest]
#[case::transport(GoogleMapsSourceError::transport("reset"), ErrorCode::UpstreamUnavailable)]
#[case::timeout(GoogleMapsSourceError::timeout("slow"), ErrorCode::UpstreamUnavailable)]
#[case::rate_limited(GoogleMapsSourceError::rate_limited("429"), ErrorCode::UpstreamUnavailable)]
#[case::rejected(GoogleMapsSourceError::invalid_request("REQUEST_DENIED"), ErrorCode::UpstreamRejected)]
#[case::decode(GoogleMapsSourceError::decode("not json"), ErrorCode::InternalError)]
#[tokio::test]
async fn geocode_maps_source_errors(
    #[case] source_error: GoogleMapsSourceError,
    #[case] expected: ErrorCode,
) {
    let mut source = MockGoogleMapsSource::new();
    source
        .expect_geocode()
        .times(1)
        .return_once(move |_| Err(source_error));
    let service = GoogleMapsGeoJsonService::new(Arc::new(source));
    let request = GeocodeRequest {
        address: "Tokyo Station".to_owned(),
    };

    let error = service.geocode(&request).await.expect_err("source fails");

    assert_eq!(error.code(), expected);
    assert!(error.message().contains("geocode"));
}

#[tokio::test]
async fn geocode_rejects_blank_address() {
    let service = GoogleMapsGeoJsonService::new(Arc::new(FixtureGoogleMapsSource));
    let request = GeocodeRequest {
        address: "\t".to_owned(),
    };

    let error = service.geocode(&request).await.expect_err("blank address");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn geocode_maps_results() {
    let mut source = MockGoogleMapsSource::new();
    source.expect_geocode().times(1).return_once(|_| {
        Ok(SearchResultsPayload {
            results: vec![json!({
                "formatted_address": "Marunouchi, Tokyo",
                "geometry": {"location": {"lat": 35.681, "lng": 139.767}}
            })],
            ..SearchResultsPayload::default()
        })
    });
    let service = GoogleMapsGeoJsonService::new(Arc::new(source));
    let request = GeocodeRequest {
        address: "Tokyo Station".to_owned(),
    };

    let collection = service.geocode(&request).await.expect("geocode succeeds");

    assert_eq!(collection.len(), 1);
    assert_eq!(
        collection.features[0].properties["formatted_address"],
        "Marunouchi, Tokyo"
    );
}

#[rstest]
#[case::blank_origin("", "Shinjuku")]
#[case::blank_destination("Shibuya", "   ")]
#[tokio::test]
async fn directions_rejects_blank_endpoints(#[case] origin: &str, #[case] destination: &str) {
    let mut source = MockGoogleMapsSource::new();
    source.expect_directions().times(0);
    let service = GoogleMapsGeoJsonService::new(Arc::new(source));

    let error = service
        .directions(&directions_request(origin, destination))
        .await
        .expect_err("blank endpoint");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn directions_keeps_valid_routes_and_reports_failures() {
    let mut source = MockGoogleMapsSource::new();
    source
        .expect_directions()
        .withf(|request| request.mode == TravelMode::Walking && request.alternatives)
        .times(1)
        .return_once(|_| {
            Ok(DirectionsPayload {
                routes: vec![
                    json!({"legs": [{"steps": [{"polyline": {"points": "_p~iF~ps|U"}}]}]}),
                    json!({"legs": [{"steps": [
                        {"polyline": {"points": "_p~iF~ps|U"}},
                        {"polyline": {"points": "_p~iF"}}
                    ]}]}),
                    json!({"legs": [{"steps": [{"polyline": {"points": "_p~iF"}}]}]}),
                ],
                ..DirectionsPayload::default()
            })
        });
    let service = GoogleMapsGeoJsonService::new(Arc::new(source));

    let output = service
        .directions(&directions_request("Shibuya", "Shinjuku"))
        .await
        .expect("directions succeed");

    assert_eq!(output.collection.len(), 2);
    let failed_routes: Vec<_> = output
        .failures
        .iter()
        .map(|failure| failure.route_index)
        .collect();
    assert_eq!(failed_routes, vec![1, 2]);
}
