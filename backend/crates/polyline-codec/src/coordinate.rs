//! Longitude-first coordinate value shared by the codec and GeoJSON output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 position in `(longitude, latitude)` order.
///
/// Serialises as the GeoJSON position array `[lng, lat]`. Deserialisation
/// accepts any array with at least two numbers and ignores trailing members
/// such as altitude.
///
/// # Examples
///
/// ```
/// use polyline_codec::Coordinate;
///
/// let tokyo = Coordinate::new(139.767, 35.681);
/// let json = serde_json::to_string(&tokyo).expect("serialise");
/// assert_eq!(json, "[139.767,35.681]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Coordinate {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl Coordinate {
    /// Build a coordinate from longitude and latitude.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Build a coordinate from the latitude-first pair used by most upstream
    /// APIs.
    #[must_use]
    pub const fn from_lat_lng(lat: f64, lng: f64) -> Self {
        Self { lng, lat }
    }

    /// Return whether both axes are within `tolerance` of `other`.
    #[must_use]
    pub fn approx_eq(self, other: Self, tolerance: f64) -> bool {
        (self.lng - other.lng).abs() <= tolerance && (self.lat - other.lat).abs() <= tolerance
    }

    /// Return whether both axes are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.lng, value.lat]
    }
}

/// Raised when a position array carries fewer than two members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("position must contain longitude and latitude, found {found} value(s)")]
pub struct CoordinateShapeError {
    /// Number of values present in the rejected array.
    pub found: usize,
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = CoordinateShapeError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        match value.as_slice() {
            [lng, lat, ..] => Ok(Self::new(*lng, *lat)),
            _ => Err(CoordinateShapeError { found: value.len() }),
        }
    }
}
