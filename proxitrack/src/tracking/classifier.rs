//! Approaching / receding / stationary classification of a distance trend.

use std::fmt;

use tracing::debug;

/// Default noise band for live GPS tracking, in meters.
pub const DEFAULT_STATIONARY_THRESHOLD_M: f64 = 1.0;

/// Relative motion of a tracked entity with respect to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackingState {
    /// Fewer than two distances recorded.
    #[default]
    Unknown,
    /// Distance is shrinking.
    Approaching,
    /// Distance is growing.
    Receding,
    /// Change within the noise band.
    Stationary,
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Approaching => write!(f, "Approaching"),
            Self::Receding => write!(f, "Receding"),
            Self::Stationary => write!(f, "Stationary"),
        }
    }
}

/// Classify a chronological distance sequence (latest last).
///
/// Only the last two values matter: `delta = latest - second_latest`.
/// `|delta| <= threshold_m` is stationary.
///
/// # Example
///
/// ```
/// use proxitrack::tracking::{classify, TrackingState};
///
/// assert_eq!(classify(&[100.0, 80.0], 1.0), TrackingState::Approaching);
/// assert_eq!(classify(&[100.0, 100.3], 1.0), TrackingState::Stationary);
/// ```
pub fn classify<'a, I>(distances: I, threshold_m: f64) -> TrackingState
where
    I: IntoIterator<Item = &'a f64>,
    I::IntoIter: DoubleEndedIterator,
{
    let mut newest_first = distances.into_iter().rev();
    let (Some(latest), Some(second)) = (newest_first.next(), newest_first.next()) else {
        return TrackingState::Unknown;
    };

    let delta = latest - second;
    if !delta.is_finite() {
        return TrackingState::Unknown;
    }

    if delta.abs() <= threshold_m {
        TrackingState::Stationary
    } else if delta < 0.0 {
        TrackingState::Approaching
    } else {
        TrackingState::Receding
    }
}

/// Classifier holding its threshold and the last state it produced.
#[derive(Debug, Clone)]
pub struct ProximityClassifier {
    threshold_m: f64,
    state: TrackingState,
}

impl ProximityClassifier {
    pub fn new(threshold_m: f64) -> Self {
        Self {
            threshold_m,
            state: TrackingState::Unknown,
        }
    }

    /// Reclassify and remember the result.
    pub fn update<'a, I>(&mut self, distances: I) -> TrackingState
    where
        I: IntoIterator<Item = &'a f64>,
        I::IntoIter: DoubleEndedIterator,
    {
        let next = classify(distances, self.threshold_m);
        if next != self.state {
            debug!(from = %self.state, to = %next, "Tracking state changed");
            self.state = next;
        }
        next
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    pub fn reset(&mut self) {
        self.state = TrackingState::Unknown;
    }
}

impl Default for ProximityClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_STATIONARY_THRESHOLD_M)
    }
}
