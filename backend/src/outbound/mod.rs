//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of domain port traits:
//!
//! - **google_maps**: reqwest-backed places, directions and geocoding source
//! - **odpt**: reqwest-backed transit station and passenger-survey source
//!
//! Adapters are thin translators that convert between wire payloads and
//! domain types. They contain no business logic.

pub mod google_maps;
mod http_support;
pub mod odpt;
