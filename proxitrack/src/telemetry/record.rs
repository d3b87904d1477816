//! Telemetry wire records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::geodesy::Coordinate;
use crate::tracking::{PositionSample, SampleSource};

/// Key in `extra` marking records produced by the simulator.
pub const SIMULATED_KEY: &str = "simulated";

/// One stored position report for a tracked entity ("ping").
///
/// A missing `speed` deserializes to `None`, never 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    /// Server-assigned timestamp.
    pub observed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl TelemetryRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// True if the producer flagged this record as simulated.
    pub fn is_simulated(&self) -> bool {
        self.extra
            .get(SIMULATED_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn to_sample(&self) -> PositionSample {
        let source = if self.is_simulated() {
            SampleSource::Simulated
        } else {
            SampleSource::RemoteTelemetry
        };
        PositionSample::new(self.coordinate(), self.observed_at, source)
            .with_speed(self.speed)
            .with_heading(self.heading)
    }
}

/// A position report submitted to a [`PublishSink`](super::PublishSink).
///
/// The sink adds the timestamp.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionReport {
    pub latitude: f64,
    pub longitude: f64,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub extra: Map<String, Value>,
}

impl PositionReport {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
            ..Default::default()
        }
    }

    pub fn with_speed(mut self, speed: Option<f64>) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_heading(mut self, heading: Option<f64>) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Stamp the report into a stored record.
    pub fn into_record(self, observed_at: DateTime<Utc>) -> TelemetryRecord {
        TelemetryRecord {
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            heading: self.heading,
            observed_at,
            extra: self.extra,
        }
    }
}
