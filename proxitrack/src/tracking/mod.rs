//! Per-entity tracking primitives.
//!
//! - [`HistoryBuffer`] - bounded FIFO for samples and distances
//! - [`PositionSample`] - one timestamped position report
//! - [`estimate`] - speed from a sample history
//! - [`classify`] - approaching / receding / stationary from distances
//! - [`eta`] - time to arrival

mod classifier;
mod eta;
mod history;
mod sample;
mod velocity;

pub use classifier::{classify, ProximityClassifier, TrackingState, DEFAULT_STATIONARY_THRESHOLD_M};
pub use eta::eta;
pub use history::{HistoryBuffer, DEFAULT_DISTANCE_CAPACITY, DEFAULT_POSITION_CAPACITY};
pub use sample::{EntityId, PositionSample, SampleSource};
pub use velocity::{estimate, estimate_with_source, SpeedSource, VelocityEstimate};
