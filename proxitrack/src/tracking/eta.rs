//! Time-to-arrival estimation.

/// Seconds to cover `distance_m` at `velocity_mps`.
///
/// `None` when the velocity is unknown, zero, negative or non-finite, or the
/// distance is negative or non-finite. Never negative or infinite.
///
/// # Example
///
/// ```
/// use proxitrack::tracking::eta;
///
/// assert_eq!(eta(1000.0, Some(20.0)), Some(50.0));
/// assert_eq!(eta(1000.0, Some(0.0)), None);
/// assert_eq!(eta(1000.0, None), None);
/// ```
pub fn eta(distance_m: f64, velocity_mps: Option<f64>) -> Option<f64> {
    let velocity = velocity_mps.filter(|v| v.is_finite() && *v > 0.0)?;
    if !distance_m.is_finite() || distance_m < 0.0 {
        return None;
    }
    let seconds = distance_m / velocity;
    seconds.is_finite().then_some(seconds)
}
