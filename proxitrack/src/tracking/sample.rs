//! Position samples and tracked-entity identity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geodesy::{self, Coordinate};

/// Identifier of a tracked remote entity (a vehicle, typically).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if the id is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where a sample came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleSource {
    /// Telemetry feed for a tracked entity.
    RemoteTelemetry,
    /// The observer's own device.
    LocalDevice,
    /// Demo producer.
    Simulated,
}

impl fmt::Display for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteTelemetry => write!(f, "Remote Telemetry"),
            Self::LocalDevice => write!(f, "Local Device"),
            Self::Simulated => write!(f, "Simulated"),
        }
    }
}

/// One timestamped position report.
///
/// Speed is meters/second and never negative; heading is degrees true in
/// [0, 360). Both are optional: a missing value means "not reported", never 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    coordinate: Coordinate,
    speed: Option<f64>,
    heading: Option<f64>,
    observed_at: DateTime<Utc>,
    source: SampleSource,
}

impl PositionSample {
    /// Create a sample with no speed or heading.
    pub fn new(coordinate: Coordinate, observed_at: DateTime<Utc>, source: SampleSource) -> Self {
        Self {
            coordinate,
            speed: None,
            heading: None,
            observed_at,
            source,
        }
    }

    /// Set the reported speed. Negative or non-finite values become `None`.
    pub fn with_speed(mut self, speed: Option<f64>) -> Self {
        self.speed = speed.filter(|s| s.is_finite() && *s >= 0.0);
        self
    }

    /// Set the reported heading, normalized into [0, 360).
    pub fn with_heading(mut self, heading: Option<f64>) -> Self {
        self.heading = heading
            .filter(|h| h.is_finite())
            .map(geodesy::normalize_bearing);
        self
    }

    #[inline]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[inline]
    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    #[inline]
    pub fn heading(&self) -> Option<f64> {
        self.heading
    }

    #[inline]
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    #[inline]
    pub fn source(&self) -> SampleSource {
        self.source
    }
}
