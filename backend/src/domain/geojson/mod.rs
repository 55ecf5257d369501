//! Canonical GeoJSON value objects emitted by every mapper.
//!
//! Positions are always longitude-first. Feature order follows upstream
//! iteration order.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub use polyline_codec::Coordinate;

mod statistics;

pub use statistics::{BoundingBox, CollectionStatistics};

/// Pass-through feature metadata.
pub type Properties = Map<String, Value>;

/// Minimum positions in a closed linear ring.
const MIN_RING_POSITIONS: usize = 4;

/// Geometry variants produced by the normalisation layer.
///
/// Serialises as `{"type": ..., "coordinates": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// A single position.
    Point(Coordinate),
    /// An ordered path of positions.
    LineString(Vec<Coordinate>),
    /// Closed linear rings; the first is the exterior ring.
    Polygon(Vec<Vec<Coordinate>>),
}

/// Raised when polygon rings are not closed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// A ring has fewer than four positions.
    #[error("ring {index} has {found} positions; at least {MIN_RING_POSITIONS} are required")]
    RingTooShort {
        /// Ring index within the polygon.
        index: usize,
        /// Number of positions supplied.
        found: usize,
    },
    /// A ring's last position differs from its first.
    #[error("ring {index} is not closed")]
    RingNotClosed {
        /// Ring index within the polygon.
        index: usize,
    },
}

impl Geometry {
    /// Build a polygon after checking every ring is closed.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] for short or open rings.
    ///
    /// # Examples
    ///
    /// ```
    /// use mapbridge::domain::geojson::{Coordinate, Geometry};
    ///
    /// let ring = vec![
    ///     Coordinate::new(139.0, 35.0),
    ///     Coordinate::new(139.1, 35.0),
    ///     Coordinate::new(139.1, 35.1),
    ///     Coordinate::new(139.0, 35.0),
    /// ];
    /// assert!(Geometry::polygon(vec![ring]).is_ok());
    /// ```
    pub fn polygon(rings: Vec<Vec<Coordinate>>) -> Result<Self, GeometryError> {
        for (index, ring) in rings.iter().enumerate() {
            if ring.len() < MIN_RING_POSITIONS {
                return Err(GeometryError::RingTooShort {
                    index,
                    found: ring.len(),
                });
            }
            if ring.first() != ring.last() {
                return Err(GeometryError::RingNotClosed { index });
            }
        }
        Ok(Self::Polygon(rings))
    }

    /// GeoJSON type name of this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::LineString(_) => "LineString",
            Self::Polygon(_) => "Polygon",
        }
    }

    /// Iterate every position in the geometry.
    pub fn positions(&self) -> Box<dyn Iterator<Item = Coordinate> + '_> {
        match self {
            Self::Point(point) => Box::new(std::iter::once(*point)),
            Self::LineString(line) => Box::new(line.iter().copied()),
            Self::Polygon(rings) => Box::new(rings.iter().flatten().copied()),
        }
    }
}

/// A geometry with pass-through properties.
///
/// Deserialisation requires `"type": "Feature"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "FeatureDto")]
pub struct Feature {
    /// Feature geometry.
    pub geometry: Geometry,
    /// Uninterpreted metadata copied from the upstream payload.
    pub properties: Properties,
}

impl Feature {
    /// Build a feature.
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            geometry,
            properties,
        }
    }
}

/// An ordered collection of features.
///
/// # Examples
///
/// ```
/// use mapbridge::domain::geojson::FeatureCollection;
///
/// let json = serde_json::to_value(FeatureCollection::empty()).expect("serialise");
/// assert_eq!(json, serde_json::json!({"type": "FeatureCollection", "features": []}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "FeatureCollectionDto")]
pub struct FeatureCollection {
    /// Features in upstream order.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// A collection without features.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate features in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

/// `type` member of a feature object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum FeatureTag {
    Feature,
}

/// `type` member of a feature collection object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum CollectionTag {
    FeatureCollection,
}

#[derive(Serialize)]
struct FeatureRef<'a> {
    #[serde(rename = "type")]
    kind: FeatureTag,
    geometry: &'a Geometry,
    properties: &'a Properties,
}

#[derive(Deserialize)]
struct FeatureDto {
    #[serde(rename = "type")]
    _kind: FeatureTag,
    geometry: Geometry,
    #[serde(default)]
    properties: Properties,
}

impl From<FeatureDto> for Feature {
    fn from(value: FeatureDto) -> Self {
        Self::new(value.geometry, value.properties)
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FeatureRef {
            kind: FeatureTag::Feature,
            geometry: &self.geometry,
            properties: &self.properties,
        }
        .serialize(serializer)
    }
}

#[derive(Serialize)]
struct FeatureCollectionRef<'a> {
    #[serde(rename = "type")]
    kind: CollectionTag,
    features: &'a [Feature],
}

#[derive(Deserialize)]
struct FeatureCollectionDto {
    #[serde(rename = "type")]
    _kind: CollectionTag,
    #[serde(default)]
    features: Vec<Feature>,
}

impl From<FeatureCollectionDto> for FeatureCollection {
    fn from(value: FeatureCollectionDto) -> Self {
        Self {
            features: value.features,
        }
    }
}

impl Serialize for FeatureCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FeatureCollectionRef {
            kind: CollectionTag::FeatureCollection,
            features: &self.features,
        }
        .serialize(serializer)
    }
}
