//! Station and passenger-survey join plus heatmap weighting.
//!
//! Both inputs are raw linked-data record lists. [`join`] is pure and
//! synchronous: it registers stations under every identity they are known by,
//! then folds survey contributions onto the shared records. [`weigh`] turns
//! the joined records into weighted heatmap points for one time slot.

mod heatmap;
mod join;
mod payload;

pub use heatmap::{HeatmapPoint, TimeSlot, weigh};
pub use join::{JoinedStations, StationRecord, SurveyAggregate, join};
