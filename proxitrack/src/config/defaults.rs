//! Default values for every configuration key.

use crate::acquisition::{DEFAULT_MAX_CACHED_AGE_MS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TIMEOUT_MS};
use crate::simulation::{
    DEFAULT_SIMULATION_THRESHOLD_M, DEFAULT_SMOOTHING_WINDOW, DEFAULT_STEP_M, DEFAULT_TICK_MS,
};
use crate::tracking::{
    DEFAULT_DISTANCE_CAPACITY, DEFAULT_POSITION_CAPACITY, DEFAULT_STATIONARY_THRESHOLD_M,
};

// [tracking]
pub const DEFAULT_HISTORY_CAPACITY: usize = DEFAULT_POSITION_CAPACITY;
pub const DEFAULT_DISTANCE_HISTORY_CAPACITY: usize = DEFAULT_DISTANCE_CAPACITY;
pub const DEFAULT_TRACKING_THRESHOLD_M: f64 = DEFAULT_STATIONARY_THRESHOLD_M;

// [acquisition]
pub const DEFAULT_HIGH_ACCURACY: bool = true;
pub const DEFAULT_ACQUISITION_MAX_CACHED_AGE_MS: u64 = DEFAULT_MAX_CACHED_AGE_MS;
pub const DEFAULT_ACQUISITION_TIMEOUT_MS: u64 = DEFAULT_TIMEOUT_MS;
pub const DEFAULT_ACQUISITION_POLL_INTERVAL_SECS: u64 = DEFAULT_POLL_INTERVAL_SECS;

// [simulation]
pub const DEFAULT_SIMULATION_STEP_M: f64 = DEFAULT_STEP_M;
pub const DEFAULT_SIMULATION_TICK_MS: u64 = DEFAULT_TICK_MS;
pub const DEFAULT_SIMULATION_SMOOTHING_WINDOW: usize = DEFAULT_SMOOTHING_WINDOW;
pub const DEFAULT_SIMULATION_STATIONARY_THRESHOLD_M: f64 = DEFAULT_SIMULATION_THRESHOLD_M;

// [logging]
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "proxitrack.log";
