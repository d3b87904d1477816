//! Configuration for device position acquisition.

use std::time::Duration;

/// Default maximum age of a cached fix the platform may hand back.
pub const DEFAULT_MAX_CACHED_AGE_MS: u64 = 5_000;

/// Default platform timeout for a single fix.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Default interval between single reads in polling mode.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Options passed through to the location provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionOptions {
    /// Request the most accurate fix the platform can produce.
    pub high_accuracy: bool,

    /// Oldest cached fix the platform may return instead of a fresh one.
    pub max_cached_age: Duration,

    /// How long the platform may take to produce a fix. Enforced by the
    /// provider, which reports expiry as a `Timeout` error.
    pub timeout: Duration,
}

impl Default for AcquisitionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            max_cached_age: Duration::from_millis(DEFAULT_MAX_CACHED_AGE_MS),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Configuration for [`PositionAcquisition`](super::PositionAcquisition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionConfig {
    pub options: AcquisitionOptions,

    /// Interval between single reads when falling back to polling.
    pub poll_interval: Duration,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            options: AcquisitionOptions::default(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AcquisitionConfig::default();
        assert!(config.options.high_accuracy);
        assert_eq!(config.options.max_cached_age, Duration::from_secs(5));
        assert_eq!(config.options.timeout, Duration::from_secs(10));
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }
}
