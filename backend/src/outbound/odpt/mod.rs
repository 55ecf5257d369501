//! Transit linked-data outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `TransitDataSource` port.

mod http_source;

pub use http_source::OdptHttpSource;
