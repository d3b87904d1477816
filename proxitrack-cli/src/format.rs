//! Human-readable formatting for distances, ETAs and speeds.

/// Shown wherever an ETA cannot be computed.
pub const ETA_UNAVAILABLE: &str = "— (speed unavailable)";

/// Format an ETA in seconds as `"{min} min ({sec} s)"`.
///
/// Minutes are rounded to the nearest whole minute, seconds to the nearest
/// whole second.
pub fn format_eta(eta_s: Option<f64>) -> String {
    match eta_s {
        Some(secs) if secs.is_finite() && secs >= 0.0 => {
            format!("{:.0} min ({:.0} s)", (secs / 60.0).round(), secs.round())
        }
        _ => ETA_UNAVAILABLE.to_string(),
    }
}

/// Format a distance as meters with a kilometer hint above 1 km.
pub fn format_distance(distance_m: Option<f64>) -> String {
    match distance_m {
        Some(m) if m >= 1_000.0 => format!("{:.1} m ({:.2} km)", m, m / 1_000.0),
        Some(m) => format!("{:.1} m", m),
        None => "—".to_string(),
    }
}

/// Format a speed in meters per second.
pub fn format_speed(speed_mps: Option<f64>) -> String {
    match speed_mps {
        Some(v) => format!("{:.2} m/s", v),
        None => "—".to_string(),
    }
}
