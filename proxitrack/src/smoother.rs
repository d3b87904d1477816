//! Moving-average smoothing for noisy scalar signals (speed, mostly).

use std::collections::VecDeque;

/// Average of the last `window` samples, or of all of them if fewer.
///
/// Returns `None` for empty input. A window of 0 is treated as 1.
///
/// # Example
///
/// ```
/// use proxitrack::smoother::moving_average;
///
/// assert_eq!(moving_average(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
/// assert_eq!(moving_average(&[], 3), None);
/// ```
pub fn moving_average(samples: &[f64], window: usize) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let window = window.max(1).min(samples.len());
    let tail = &samples[samples.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Stateful moving average over a bounded window.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    samples: VecDeque<f64>,
}

impl MovingAverage {
    /// Create an empty average over `window` samples (0 is treated as 1).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            samples: VecDeque::with_capacity(window),
        }
    }

    /// Add a sample and return the updated average.
    pub fn push(&mut self, value: f64) -> f64 {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Current average, `None` before the first sample.
    pub fn value(&self) -> Option<f64> {
        if self.samples.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}
