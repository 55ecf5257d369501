//! Normalisation of third-party geospatial data into GeoJSON and joined
//! station records.

pub mod config;
pub mod domain;
pub mod outbound;

/// Task-local correlation identifier used across log lines.
pub use domain::TraceId;
