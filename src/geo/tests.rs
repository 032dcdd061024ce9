use super::*;
use crate::constants::test_constants::*;

fn coord(lat: f64, lon: f64) -> GeoCoordinate {
    GeoCoordinate::new(lat, lon).unwrap()
}

/// Coordinate validation happens at construction.
#[test]
fn test_coordinate_validation() {
    assert!(GeoCoordinate::new(40.7128, -74.0060).is_ok());
    assert!(GeoCoordinate::new(90.0, 180.0).is_ok());
    assert!(GeoCoordinate::new(-90.0, -180.0).is_ok());

    assert!(GeoCoordinate::new(91.0, 0.0).is_err());
    assert!(GeoCoordinate::new(-90.5, 0.0).is_err());
    assert!(GeoCoordinate::new(0.0, 181.0).is_err());
    assert!(GeoCoordinate::new(0.0, -360.0).is_err());
    assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
    assert!(GeoCoordinate::new(0.0, f64::INFINITY).is_err());
}

#[test]
fn test_coordinate_display() {
    let pos = coord(48.057440, -123.119625);
    assert_eq!(format!("{pos}"), "(48.0574°, -123.1196°)");
}

#[test]
fn test_normalize_angle() {
    assert_eq!(normalize_angle(0.0), 0.0);
    assert_eq!(normalize_angle(360.0), 0.0);
    assert_eq!(normalize_angle(370.0), 10.0);
    assert_eq!(normalize_angle(-10.0), 350.0);
    assert_eq!(normalize_angle(-720.0), 0.0);
    assert!(normalize_angle(-1e-18) < 360.0);
}

#[test]
fn test_angular_difference() {
    assert_eq!(angular_difference(10.0, 12.0), 2.0);
    assert_eq!(angular_difference(350.0, 10.0), 20.0);
    assert_eq!(angular_difference(10.0, 350.0), 20.0);
    assert_eq!(angular_difference(0.0, 180.0), 180.0);
    assert_eq!(angular_difference(90.0, 90.0), 0.0);
}

#[test]
fn test_signed_difference_keeps_direction() {
    assert_eq!(signed_difference(350.0, 5.0), 15.0);
    assert_eq!(signed_difference(5.0, 350.0), -15.0);
    assert_eq!(signed_difference(10.0, 210.0), -160.0);
    assert_eq!(signed_difference(10.0, 100.0), 90.0);
}

#[test]
fn test_bearing_coincident_points_is_zero() {
    let p = coord(TEST_NYC_LATITUDE, TEST_NYC_LONGITUDE);
    assert_eq!(bearing(p, p), 0.0);
    assert_eq!(bearing(KAABA, KAABA), 0.0);
}

#[test]
fn test_bearing_cardinal_directions() {
    let origin = coord(0.0, 0.0);
    assert!((bearing(origin, coord(10.0, 0.0)) - 0.0).abs() < 1e-9);
    assert!((bearing(origin, coord(0.0, 10.0)) - 90.0).abs() < 1e-9);
    assert!((bearing(origin, coord(-10.0, 0.0)) - 180.0).abs() < 1e-9);
    assert!((bearing(origin, coord(0.0, -10.0)) - 270.0).abs() < 1e-9);
}

/// Well-known qibla directions for major cities.
#[test]
fn test_qibla_bearing_known_cities() {
    let nyc = qibla_bearing(coord(TEST_NYC_LATITUDE, TEST_NYC_LONGITUDE));
    assert!((nyc - 58.5).abs() < 0.5, "NYC qibla was {nyc}");

    let london = qibla_bearing(coord(TEST_LONDON_LATITUDE, TEST_LONDON_LONGITUDE));
    assert!((london - 119.0).abs() < 0.5, "London qibla was {london}");

    let jakarta = qibla_bearing(coord(TEST_JAKARTA_LATITUDE, TEST_JAKARTA_LONGITUDE));
    assert!((jakarta - 295.1).abs() < 0.5, "Jakarta qibla was {jakarta}");
}

#[test]
fn test_near_target_is_close_and_stable() {
    let near = coord(TEST_NEAR_LATITUDE, TEST_NEAR_LONGITUDE);
    let distance = distance_km(near, KAABA);
    assert!(distance < 5.0, "distance was {distance}");

    // The Kaaba lies north-west of this point.
    let b = qibla_bearing(near);
    assert!(b > 270.0 && b < 360.0, "bearing was {b}");

    // A few metres of jitter must not flip the direction.
    let jittered = coord(TEST_NEAR_LATITUDE + 0.0001, TEST_NEAR_LONGITUDE - 0.0001);
    assert!(angular_difference(b, qibla_bearing(jittered)) < 1.0);
}

#[test]
fn test_distance_known_values() {
    let nyc = coord(TEST_NYC_LATITUDE, TEST_NYC_LONGITUDE);
    let london = coord(TEST_LONDON_LATITUDE, TEST_LONDON_LONGITUDE);
    let d = distance_km(nyc, london);
    assert!((d - 5570.0).abs() < 15.0, "NYC-London was {d}");

    let nyc_to_kaaba = distance_km(nyc, KAABA);
    assert!((nyc_to_kaaba - 10300.0).abs() < 100.0, "NYC-Kaaba was {nyc_to_kaaba}");
}

#[test]
fn test_distance_coincident_and_antipodal() {
    let p = coord(12.5, -45.0);
    assert_eq!(distance_km(p, p), 0.0);

    let antipode = coord(-12.5, 135.0);
    let d = distance_km(p, antipode);
    assert!(d.is_finite());
    assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
}

#[test]
fn test_distance_is_symmetric() {
    let a = coord(TEST_JAKARTA_LATITUDE, TEST_JAKARTA_LONGITUDE);
    let b = coord(TEST_LONDON_LATITUDE, TEST_LONDON_LONGITUDE);
    assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
}
