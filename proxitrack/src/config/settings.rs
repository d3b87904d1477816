//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;
use crate::acquisition::{AcquisitionConfig, AcquisitionOptions};
use crate::session::SessionConfig;
use crate::simulation::SimulationConfig;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub tracking: TrackingSettings,
    pub acquisition: AcquisitionSettings,
    pub simulation: SimulationSettings,
    pub logging: LoggingSettings,
}

/// Live tracking configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSettings {
    /// Remote samples kept per tracked entity
    pub history_capacity: usize,
    /// Distances kept for trend classification
    pub distance_history_capacity: usize,
    /// Noise band for the stationary state (meters)
    pub stationary_threshold_m: f64,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            distance_history_capacity: DEFAULT_DISTANCE_HISTORY_CAPACITY,
            stationary_threshold_m: DEFAULT_TRACKING_THRESHOLD_M,
        }
    }
}

/// Device position acquisition configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionSettings {
    pub high_accuracy: bool,
    pub max_cached_age_ms: u64,
    pub timeout_ms: u64,
    /// Polling interval when continuous updates are unavailable
    pub poll_interval_secs: u64,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            high_accuracy: DEFAULT_HIGH_ACCURACY,
            max_cached_age_ms: DEFAULT_ACQUISITION_MAX_CACHED_AGE_MS,
            timeout_ms: DEFAULT_ACQUISITION_TIMEOUT_MS,
            poll_interval_secs: DEFAULT_ACQUISITION_POLL_INTERVAL_SECS,
        }
    }
}

/// Demo simulation configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub step_m: f64,
    pub tick_ms: u64,
    pub smoothing_window: usize,
    pub stationary_threshold_m: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            step_m: DEFAULT_SIMULATION_STEP_M,
            tick_ms: DEFAULT_SIMULATION_TICK_MS,
            smoothing_window: DEFAULT_SIMULATION_SMOOTHING_WINDOW,
            stationary_threshold_m: DEFAULT_SIMULATION_STATIONARY_THRESHOLD_M,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: PathBuf,
    /// Log file name inside `directory`
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl ConfigFile {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            history_capacity: self.tracking.history_capacity,
            distance_history_capacity: self.tracking.distance_history_capacity,
            stationary_threshold_m: self.tracking.stationary_threshold_m,
        }
    }

    pub fn to_acquisition_config(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            options: AcquisitionOptions {
                high_accuracy: self.acquisition.high_accuracy,
                max_cached_age: Duration::from_millis(self.acquisition.max_cached_age_ms),
                timeout: Duration::from_millis(self.acquisition.timeout_ms),
            },
            poll_interval: Duration::from_secs(self.acquisition.poll_interval_secs),
        }
    }

    pub fn to_simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            step_m: self.simulation.step_m,
            tick: Duration::from_millis(self.simulation.tick_ms),
            smoothing_window: self.simulation.smoothing_window,
            stationary_threshold_m: self.simulation.stationary_threshold_m,
        }
    }
}
