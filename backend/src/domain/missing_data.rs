//! Soft per-entry failures.
//!
//! A [`MissingData`] value explains why one upstream entry was skipped. It is
//! logged at debug level and never surfaced as a batch failure.

use thiserror::Error;

/// Reason an upstream entry was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MissingData {
    /// The entry has no `geometry.location`.
    #[error("entry has no location")]
    Location,
    /// The entry has neither a canonical nor a raw identifier.
    #[error("entry has no identifier")]
    Identity,
    /// The entry does not match the expected shape.
    #[error("entry is malformed: {reason}")]
    Malformed {
        /// Decoder message.
        reason: String,
    },
}

impl MissingData {
    /// Build a [`MissingData::Malformed`] from any displayable decoder error.
    pub fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::Malformed {
            reason: reason.to_string(),
        }
    }
}
