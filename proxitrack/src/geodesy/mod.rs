//! Great-circle navigation maths on a spherical Earth.
//!
//! All functions are pure and never fail: degenerate or out-of-range input
//! still produces a number. Validate with [`Coordinate::try_new`] when the
//! input is untrusted.
//!
//! # Conventions
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Bearing: degrees true (0-360, 0=north, 90=east)
//! - Distance: meters

mod types;

pub use types::{CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

use std::f64::consts::PI;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const DEG_TO_RAD: f64 = PI / 180.0;
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Great-circle distance between two coordinates in meters (haversine).
///
/// Symmetric, and zero when both points are equal.
///
/// # Example
///
/// ```
/// use proxitrack::geodesy::{distance, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.0, 1.0);
/// assert!((distance(a, b) - 111_194.9).abs() < 1.0);
/// ```
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude() * DEG_TO_RAD;
    let lat2 = b.latitude() * DEG_TO_RAD;
    let d_lat = (b.latitude() - a.latitude()) * DEG_TO_RAD;
    let d_lon = (b.longitude() - a.longitude()) * DEG_TO_RAD;

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing (forward azimuth) from `a` to `b` in degrees [0, 360).
///
/// Returns 0 when the points coincide.
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude() * DEG_TO_RAD;
    let lat2 = b.latitude() * DEG_TO_RAD;
    let d_lon = (b.longitude() - a.longitude()) * DEG_TO_RAD;

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_bearing(y.atan2(x) * RAD_TO_DEG)
}

/// Signed shortest rotation from bearing `from` to bearing `to`, in (-180, 180].
///
/// Positive values are clockwise turns.
pub fn angular_difference(from: f64, to: f64) -> f64 {
    let diff = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    if diff <= -180.0 {
        diff + 360.0
    } else {
        diff
    }
}

/// Normalize any bearing into [0, 360).
#[inline]
pub fn normalize_bearing(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Project a coordinate along a bearing for `distance_m` meters.
///
/// Longitude is wrapped back into -180..180; latitude is not clamped.
pub fn destination(origin: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let lat1 = origin.latitude() * DEG_TO_RAD;
    let lon1 = origin.longitude() * DEG_TO_RAD;
    let theta = bearing_deg * DEG_TO_RAD;
    let delta = distance_m / EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 =
        lon1 + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    let mut lon2 = lon2 * RAD_TO_DEG;
    if lon2 > 180.0 {
        lon2 -= 360.0;
    } else if lon2 < -180.0 {
        lon2 += 360.0;
    }

    Coordinate::new(lat2 * RAD_TO_DEG, lon2)
}

#[cfg(test)]
mod tests;
