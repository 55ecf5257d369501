//! Places/routing/geocoding outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `GoogleMapsSource` port.

mod http_source;

pub use http_source::GoogleMapsHttpSource;
