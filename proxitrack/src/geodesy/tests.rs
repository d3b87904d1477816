//! Tests for great-circle navigation maths

use super::*;
use proptest::prelude::*;

const ONE_DEGREE_M: f64 = 111_194.926_644_558_7;

#[test]
fn test_distance_one_degree_on_equator() {
    let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0));
    assert!((d - ONE_DEGREE_M).abs() < 0.01, "got {}", d);
}

#[test]
fn test_distance_one_degree_of_latitude() {
    let d = distance(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
    assert!((d - ONE_DEGREE_M).abs() < 0.01, "got {}", d);
}

#[test]
fn test_distance_london_paris() {
    let london = Coordinate::new(51.5074, -0.1278);
    let paris = Coordinate::new(48.8566, 2.3522);
    let d = distance(london, paris);
    assert!((d - 343_556.0).abs() < 10.0, "got {}", d);
}

#[test]
fn test_distance_zero_for_same_point() {
    let p = Coordinate::new(14.95, -89.53);
    assert_eq!(distance(p, p), 0.0);
}

#[test]
fn test_distance_bus_stop_scenario() {
    let bus = Coordinate::new(14.9500, -89.5300);
    let student = Coordinate::new(14.9520, -89.5310);
    let d = distance(bus, student);
    assert!((d - 246.98).abs() < 0.05, "got {}", d);
}

#[test]
fn test_distance_out_of_range_input_still_numeric() {
    let d = distance(Coordinate::new(120.0, 400.0), Coordinate::new(-95.0, -200.0));
    assert!(d.is_finite());
}

#[test]
fn test_bearing_cardinal_directions() {
    let origin = Coordinate::new(0.0, 0.0);
    assert!((bearing(origin, Coordinate::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
    assert!((bearing(origin, Coordinate::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
    assert!((bearing(origin, Coordinate::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
    assert!((bearing(origin, Coordinate::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
}

#[test]
fn test_bearing_same_point_defaults_to_zero() {
    let p = Coordinate::new(43.6, 1.4);
    assert_eq!(bearing(p, p), 0.0);
}

#[test]
fn test_bearing_london_paris() {
    let london = Coordinate::new(51.5074, -0.1278);
    let paris = Coordinate::new(48.8566, 2.3522);
    assert!((bearing(london, paris) - 148.1156).abs() < 0.01);
}

#[test]
fn test_angular_difference_basic() {
    assert!((angular_difference(10.0, 20.0) - 10.0).abs() < 1e-9);
    assert!((angular_difference(20.0, 10.0) + 10.0).abs() < 1e-9);
}

#[test]
fn test_angular_difference_wraps_through_north() {
    assert!((angular_difference(350.0, 10.0) - 20.0).abs() < 1e-9);
    assert!((angular_difference(10.0, 350.0) + 20.0).abs() < 1e-9);
}

#[test]
fn test_angular_difference_half_turn_is_positive() {
    assert_eq!(angular_difference(0.0, 180.0), 180.0);
    assert_eq!(angular_difference(180.0, 0.0), 180.0);
    assert_eq!(angular_difference(90.0, 270.0), 180.0);
}

#[test]
fn test_normalize_bearing() {
    assert!((normalize_bearing(-90.0) - 270.0).abs() < 1e-9);
    assert!((normalize_bearing(450.0) - 90.0).abs() < 1e-9);
    assert_eq!(normalize_bearing(360.0), 0.0);
    assert_eq!(normalize_bearing(0.0), 0.0);
}

#[test]
fn test_destination_north() {
    let origin = Coordinate::new(0.0, 0.0);
    let p = destination(origin, 0.0, ONE_DEGREE_M);
    assert!((p.latitude() - 1.0).abs() < 1e-6);
    assert!(p.longitude().abs() < 1e-6);
}

#[test]
fn test_destination_wraps_antimeridian() {
    let origin = Coordinate::new(0.0, 179.5);
    let p = destination(origin, 90.0, ONE_DEGREE_M);
    assert!((p.longitude() - (-179.5)).abs() < 1e-6, "got {}", p.longitude());
}

#[test]
fn test_try_new_rejects_out_of_range() {
    assert_eq!(
        Coordinate::try_new(91.0, 0.0),
        Err(CoordError::InvalidLatitude(91.0))
    );
    assert_eq!(
        Coordinate::try_new(0.0, -181.0),
        Err(CoordError::InvalidLongitude(-181.0))
    );
    assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
    assert!(Coordinate::try_new(90.0, 180.0).is_ok());
}

#[test]
fn test_parse_coordinate() {
    let c: Coordinate = "14.95, -89.53".parse().unwrap();
    assert_eq!(c, Coordinate::new(14.95, -89.53));

    assert!(matches!(
        "14.95".parse::<Coordinate>(),
        Err(CoordError::Malformed(_))
    ));
    assert!(matches!(
        "north,west".parse::<Coordinate>(),
        Err(CoordError::Malformed(_))
    ));
    assert!(matches!(
        "95,0".parse::<Coordinate>(),
        Err(CoordError::InvalidLatitude(_))
    ));
}

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| Coordinate::new(lat, lon))
}

proptest! {
    /// Property: distance is symmetric.
    #[test]
    fn prop_distance_symmetric(a in coordinate(), b in coordinate()) {
        let ab = distance(a, b);
        let ba = distance(b, a);
        prop_assert!((ab - ba).abs() < 1e-6, "{} vs {}", ab, ba);
    }

    /// Property: distance from a point to itself is zero.
    #[test]
    fn prop_distance_to_self_is_zero(a in coordinate()) {
        prop_assert_eq!(distance(a, a), 0.0);
    }

    /// Property: distinct points are a positive distance apart.
    #[test]
    fn prop_distinct_points_positive(a in coordinate(), dlat in 0.001f64..1.0, dlon in 0.001f64..1.0) {
        let b = Coordinate::new((a.latitude() - dlat).max(-90.0), a.longitude() + dlon);
        prop_assert!(distance(a, b) > 0.0);
    }

    /// Property: bearing is always within [0, 360).
    #[test]
    fn prop_bearing_in_range(a in coordinate(), b in coordinate()) {
        let brg = bearing(a, b);
        prop_assert!((0.0..360.0).contains(&brg), "bearing {} out of range", brg);
    }

    /// Property: angular difference is always within (-180, 180].
    #[test]
    fn prop_angular_difference_in_range(from in -720.0f64..720.0, to in -720.0f64..720.0) {
        let diff = angular_difference(from, to);
        prop_assert!(diff > -180.0 && diff <= 180.0, "diff {} out of range", diff);
    }
}
