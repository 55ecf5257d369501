//! Domain ports for the upstream data collaborators.

mod macros;
pub(crate) use macros::define_source_error;

mod google_maps_source;
mod transit_data_source;

#[cfg(test)]
pub use google_maps_source::MockGoogleMapsSource;
pub use google_maps_source::{
    DirectionsPayload, DirectionsRequest, FixtureGoogleMapsSource, GeocodePayload,
    GeocodeRequest, GoogleMapsSource, GoogleMapsSourceError, PlaceSearchRequest, PlacesPayload,
    SearchResultsPayload, TravelMode, UnknownTravelMode,
};
#[cfg(test)]
pub use transit_data_source::MockTransitDataSource;
pub use transit_data_source::{
    FixtureTransitDataSource, StationQuery, SurveyQuery, TransitDataSource,
    TransitDataSourceError,
};
