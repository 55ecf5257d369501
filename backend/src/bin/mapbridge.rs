//! Fetch upstream places, routes, geocodes or transit surveys and print them as
//! JSON: GeoJSON feature collections, joined stations or heatmap points.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use mapbridge::TraceId;
use mapbridge::config::MapbridgeSettings;
use mapbridge::domain::geojson::Coordinate;
use mapbridge::domain::passenger_survey::TimeSlot;
use mapbridge::domain::ports::{
    DirectionsRequest, GeocodeRequest, PlaceSearchRequest, TravelMode,
};
use mapbridge::domain::{
    Error, GoogleMapsGeoJsonService, PassengerSurveyQuery, PassengerSurveyService,
};
use mapbridge::outbound::google_maps::GoogleMapsHttpSource;
use mapbridge::outbound::odpt::OdptHttpSource;
use ortho_config::OrthoConfig;
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Builder;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// `mapbridge` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mapbridge",
    about = "Normalise places, routing and transit survey data into JSON",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Text-search places and print them as `Point` features.
    Places(PlacesArgs),
    /// Compute routes and print them as `LineString` features.
    Directions(DirectionsArgs),
    /// Geocode an address and print candidates as `Point` features.
    Geocode(GeocodeArgs),
    /// Join stations with passenger surveys and print the joined records.
    Stations(SurveyArgs),
    /// Join stations with passenger surveys and print weighted heatmap points.
    Heatmap(HeatmapArgs),
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Places(_) => "places",
            Self::Directions(_) => "directions",
            Self::Geocode(_) => "geocode",
            Self::Stations(_) => "stations",
            Self::Heatmap(_) => "heatmap",
        }
    }
}

#[derive(Debug, Clone, Args)]
struct PlacesArgs {
    /// Free-text query.
    #[arg(long)]
    query: String,
    /// Bias location as `lat,lng`.
    #[arg(long, value_name = "lat,lng", value_parser = parse_lat_lng)]
    location: Option<Coordinate>,
    /// Bias radius in metres.
    #[arg(long, value_name = "metres")]
    radius: Option<u32>,
    /// Upstream place type filter, for example `restaurant`.
    #[arg(long = "type", value_name = "type")]
    place_type: Option<String>,
}

#[derive(Debug, Clone, Args)]
struct DirectionsArgs {
    /// Route origin: an address or `lat,lng`.
    #[arg(long)]
    origin: String,
    /// Route destination: an address or `lat,lng`.
    #[arg(long)]
    destination: String,
    /// Travel mode: driving, walking, bicycling or transit.
    #[arg(long, default_value = "driving")]
    mode: TravelMode,
    /// Request alternative routes.
    #[arg(long)]
    alternatives: bool,
}

#[derive(Debug, Clone, Args)]
struct GeocodeArgs {
    /// Address to resolve.
    #[arg(long)]
    address: String,
}

#[derive(Debug, Clone, Args)]
struct SurveyArgs {
    /// Restrict stations to one operator, for example `odpt.Operator:TokyoMetro`.
    #[arg(long)]
    operator: Option<String>,
    /// Restrict surveys to one year.
    #[arg(long)]
    year: Option<i32>,
}

impl SurveyArgs {
    fn query(&self) -> PassengerSurveyQuery {
        PassengerSurveyQuery {
            operator: self.operator.clone(),
            survey_year: self.year,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct HeatmapArgs {
    #[command(flatten)]
    survey: SurveyArgs,
    /// Time slot: morning, noon, evening; anything else uses the default weight.
    #[arg(long, default_value = "morning")]
    slot: TimeSlot,
}

fn main() -> ExitCode {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let runtime = match Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "create Tokio runtime failed");
            return ExitCode::FAILURE;
        }
    };

    let trace_id = TraceId::generate();
    match runtime.block_on(TraceId::scope(trace_id, run(args.command))) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            error!(
                trace_id = %trace_id,
                code = ?failure.code(),
                error_message = failure.message(),
                "command failed"
            );
            match serde_json::to_string(&failure) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("{}", failure.message()),
            }
            ExitCode::from(failure.code().exit_code())
        }
    }
}

async fn run(command: Command) -> Result<Value, Error> {
    if let Some(trace_id) = TraceId::current() {
        info!(trace_id = %trace_id, command = command.name(), "running command");
    }
    let settings = MapbridgeSettings::load_from_iter([OsString::from("mapbridge")])
        .map_err(|e| Error::misconfigured(format!("failed to load settings: {e}")))?;

    match command {
        Command::Places(args) => {
            let service = maps_service(&settings)?;
            let request = PlaceSearchRequest {
                query: args.query,
                location: args.location,
                radius_m: args.radius,
                place_type: args.place_type,
            };
            to_json(&service.places(&request).await?)
        }
        Command::Directions(args) => {
            let service = maps_service(&settings)?;
            let request = DirectionsRequest {
                origin: args.origin,
                destination: args.destination,
                mode: args.mode,
                alternatives: args.alternatives,
            };
            let output = service.directions(&request).await?;
            to_json(&output.collection)
        }
        Command::Geocode(args) => {
            let service = maps_service(&settings)?;
            let request = GeocodeRequest {
                address: args.address,
            };
            to_json(&service.geocode(&request).await?)
        }
        Command::Stations(args) => {
            let service = survey_service(&settings)?;
            to_json(&service.joined_stations(&args.query()).await?)
        }
        Command::Heatmap(args) => {
            let service = survey_service(&settings)?;
            to_json(&service.heatmap(&args.survey.query(), &args.slot).await?)
        }
    }
}

fn maps_service(
    settings: &MapbridgeSettings,
) -> Result<GoogleMapsGeoJsonService<GoogleMapsHttpSource>, Error> {
    let source = GoogleMapsHttpSource::from_settings(settings)?;
    Ok(GoogleMapsGeoJsonService::new(Arc::new(source)))
}

fn survey_service(
    settings: &MapbridgeSettings,
) -> Result<PassengerSurveyService<OdptHttpSource>, Error> {
    let source = OdptHttpSource::from_settings(settings)?;
    Ok(PassengerSurveyService::new(Arc::new(source)))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, Error> {
    serde_json::to_value(value)
        .map_err(|e| Error::internal(format!("failed to serialise output: {e}")))
}

fn parse_lat_lng(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| "location must be `lat,lng`".to_owned())?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("failed to parse latitude: {e}"))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("failed to parse longitude: {e}"))?;
    Ok(Coordinate::from_lat_lng(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("35.6812,139.7671", (139.7671, 35.6812))]
    #[case::spaced(" 35.5 , 139.5 ", (139.5, 35.5))]
    fn parses_lat_lng_into_longitude_first(#[case] raw: &str, #[case] expected: (f64, f64)) {
        let coordinate = parse_lat_lng(raw).expect("valid location");
        assert_eq!((coordinate.lng, coordinate.lat), expected);
    }

    #[rstest]
    #[case::missing_comma("35.6812")]
    #[case::not_numeric("north,east")]
    fn rejects_malformed_lat_lng(#[case] raw: &str) {
        assert!(parse_lat_lng(raw).is_err());
    }

    #[test]
    fn heatmap_defaults_to_morning() {
        let args = CliArgs::try_parse_from(["mapbridge", "heatmap", "--year", "2022"])
            .expect("arguments parse");
        let Command::Heatmap(heatmap) = args.command else {
            panic!("expected heatmap command");
        };
        assert_eq!(heatmap.slot, TimeSlot::Morning);
        assert_eq!(heatmap.survey.query().survey_year, Some(2022));
    }

    #[test]
    fn directions_parses_travel_mode() {
        let args = CliArgs::try_parse_from([
            "mapbridge",
            "directions",
            "--origin",
            "Shibuya",
            "--destination",
            "Shinjuku",
            "--mode",
            "Transit",
            "--alternatives",
        ])
        .expect("arguments parse");
        let Command::Directions(directions) = args.command else {
            panic!("expected directions command");
        };
        assert_eq!(directions.mode, TravelMode::Transit);
        assert!(directions.alternatives);
    }

    #[test]
    fn directions_rejects_unknown_mode() {
        let result = CliArgs::try_parse_from([
            "mapbridge",
            "directions",
            "--origin",
            "a",
            "--destination",
            "b",
            "--mode",
            "teleport",
        ]);
        assert!(result.is_err());
    }
}
