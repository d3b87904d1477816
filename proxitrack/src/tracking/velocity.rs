//! Speed estimation from a position history.

use std::fmt;

use super::history::HistoryBuffer;
use super::sample::PositionSample;
use crate::geodesy;

/// How a speed value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedSource {
    /// Reported by the source device on the latest sample.
    Reported,
    /// Derived from the displacement between the two latest samples.
    Derived,
}

impl fmt::Display for SpeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reported => write!(f, "reported"),
            Self::Derived => write!(f, "derived"),
        }
    }
}

/// A speed in meters/second together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityEstimate {
    pub meters_per_second: f64,
    pub source: SpeedSource,
}

/// Current speed of the entity in meters/second.
///
/// See [`estimate_with_source`].
pub fn estimate(history: &HistoryBuffer<PositionSample>) -> Option<f64> {
    estimate_with_source(history).map(|v| v.meters_per_second)
}

/// Current speed of the entity, tagged with where it came from.
///
/// A speed reported on the latest sample wins over any displacement. Without
/// one, the two latest samples (by arrival) give `distance / Δt`; a
/// non-positive Δt yields `None`.
pub fn estimate_with_source(history: &HistoryBuffer<PositionSample>) -> Option<VelocityEstimate> {
    let latest = history.latest()?;

    if let Some(speed) = latest.speed() {
        return Some(VelocityEstimate {
            meters_per_second: speed,
            source: SpeedSource::Reported,
        });
    }

    let previous = history.previous()?;
    let elapsed = latest
        .observed_at()
        .signed_duration_since(previous.observed_at())
        .num_microseconds()? as f64
        / 1_000_000.0;
    if elapsed <= 0.0 {
        return None;
    }

    let meters = geodesy::distance(previous.coordinate(), latest.coordinate());
    Some(VelocityEstimate {
        meters_per_second: meters / elapsed,
        source: SpeedSource::Derived,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::Coordinate;
    use crate::tracking::SampleSource;
    use chrono::{DateTime, Duration, Utc};

    fn at(lat: f64, lon: f64, t: DateTime<Utc>) -> PositionSample {
        PositionSample::new(Coordinate::new(lat, lon), t, SampleSource::RemoteTelemetry)
    }

    #[test]
    fn test_empty_history_has_no_speed() {
        let history = HistoryBuffer::new(5);
        assert_eq!(estimate(&history), None);
    }

    #[test]
    fn test_single_sample_without_speed() {
        let mut history = HistoryBuffer::new(5);
        history.push(at(0.0, 0.0, Utc::now()));
        assert_eq!(estimate(&history), None);
    }

    #[test]
    fn test_reported_speed_wins_over_displacement() {
        let t0 = Utc::now();
        let mut history = HistoryBuffer::new(5);
        history.push(at(0.0, 0.0, t0));
        // ~50 m in 10 s implies 5 m/s
        let moved = geodesy::destination(Coordinate::new(0.0, 0.0), 90.0, 50.0);
        history.push(
            PositionSample::new(moved, t0 + Duration::seconds(10), SampleSource::RemoteTelemetry)
                .with_speed(Some(12.0)),
        );

        let v = estimate_with_source(&history).unwrap();
        assert_eq!(v.meters_per_second, 12.0);
        assert_eq!(v.source, SpeedSource::Reported);
    }

    #[test]
    fn test_derived_speed_from_displacement() {
        let t0 = Utc::now();
        let start = Coordinate::new(0.0, 0.0);
        let mut history = HistoryBuffer::new(5);
        history.push(PositionSample::new(start, t0, SampleSource::RemoteTelemetry));
        history.push(PositionSample::new(
            geodesy::destination(start, 0.0, 100.0),
            t0 + Duration::seconds(20),
            SampleSource::RemoteTelemetry,
        ));

        let v = estimate_with_source(&history).unwrap();
        assert!((v.meters_per_second - 5.0).abs() < 1e-6);
        assert_eq!(v.source, SpeedSource::Derived);
    }

    #[test]
    fn test_sub_millisecond_elapsed_time_keeps_precision() {
        let t0 = Utc::now();
        let start = Coordinate::new(0.0, 0.0);
        let mut history = HistoryBuffer::new(5);
        history.push(PositionSample::new(start, t0, SampleSource::RemoteTelemetry));
        history.push(PositionSample::new(
            geodesy::destination(start, 0.0, 1.0),
            t0 + Duration::microseconds(1_999),
            SampleSource::RemoteTelemetry,
        ));
        let v = estimate(&history).unwrap();
        assert!((v - 1.0 / 0.001_999).abs() < 0.01, "got {v}");

        history.push(PositionSample::new(
            geodesy::destination(start, 0.0, 1.5),
            t0 + Duration::microseconds(2_499),
            SampleSource::RemoteTelemetry,
        ));
        let v = estimate(&history).unwrap();
        assert!((v - 1_000.0).abs() < 0.01, "got {v}");
    }

    #[test]
    fn test_non_positive_elapsed_time_is_unknown() {
        let t0 = Utc::now();
        let mut history = HistoryBuffer::new(5);
        history.push(at(0.0, 0.0, t0));
        history.push(at(0.001, 0.0, t0));
        assert_eq!(estimate(&history), None);

        history.push(at(0.002, 0.0, t0 - Duration::seconds(3)));
        assert_eq!(estimate(&history), None);
    }
}
