//! Summary statistics over a feature collection.

use serde::Serialize;

use super::{Coordinate, FeatureCollection};

/// Axis-aligned bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    /// Westernmost longitude.
    pub min_lng: f64,
    /// Easternmost longitude.
    pub max_lng: f64,
    /// Southernmost latitude.
    pub min_lat: f64,
    /// Northernmost latitude.
    pub max_lat: f64,
}

impl BoundingBox {
    fn from_point(point: Coordinate) -> Self {
        Self {
            min_lng: point.lng,
            max_lng: point.lng,
            min_lat: point.lat,
            max_lat: point.lat,
        }
    }

    fn include(mut self, point: Coordinate) -> Self {
        self.min_lng = self.min_lng.min(point.lng);
        self.max_lng = self.max_lng.max(point.lng);
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self
    }

    /// Returns bounds as `[min_lng, min_lat, max_lng, max_lat]`.
    pub fn as_array(self) -> [f64; 4] {
        [self.min_lng, self.min_lat, self.max_lng, self.max_lat]
    }
}

/// Overview of a collection for logging and presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStatistics {
    /// Number of features.
    pub total_features: usize,
    /// Distinct geometry type names in first-seen order.
    pub geometry_types: Vec<&'static str>,
    /// Distinct property keys in first-seen order.
    pub property_keys: Vec<String>,
    /// Bounds over every position, if any.
    pub bounds: Option<BoundingBox>,
}

impl FeatureCollection {
    /// Bounds over every position of every geometry.
    ///
    /// Returns `None` when the collection holds no positions.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.iter()
            .flat_map(|feature| feature.geometry.positions())
            .fold(None, |bounds: Option<BoundingBox>, point| {
                Some(bounds.map_or_else(|| BoundingBox::from_point(point), |b| b.include(point)))
            })
    }

    /// Feature count, geometry types, property keys and bounds.
    pub fn statistics(&self) -> CollectionStatistics {
        let mut geometry_types: Vec<&'static str> = Vec::new();
        let mut property_keys: Vec<String> = Vec::new();
        for feature in self {
            let type_name = feature.geometry.type_name();
            if !geometry_types.contains(&type_name) {
                geometry_types.push(type_name);
            }
            for key in feature.properties.keys() {
                if !property_keys.contains(key) {
                    property_keys.push(key.clone());
                }
            }
        }

        CollectionStatistics {
            total_features: self.len(),
            geometry_types,
            property_keys,
            bounds: self.bounds(),
        }
    }
}
