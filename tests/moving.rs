//! Tests for moving point retention

use trackthin::geo_utils::haversine_distance;
use trackthin::{TrajectoryPoint, is_turning_point, should_keep_moving_point};

const METERS_PER_DEG: f64 = 111_194.926_644_558_73;

fn north(meters: f64) -> TrajectoryPoint {
    TrajectoryPoint::new(51.5 + meters / METERS_PER_DEG, -0.12)
}

fn straight_line(n: usize, spacing: f64) -> Vec<TrajectoryPoint> {
    (0..n).map(|i| north(i as f64 * spacing)).collect()
}

#[test]
fn test_first_point_always_kept() {
    let points = straight_line(20, 1.0);
    for index in 0..points.len() {
        assert!(should_keep_moving_point(&points, index, None, 1e9));
    }
}

#[test]
fn test_distance_threshold_inclusive() {
    let points = straight_line(20, 30.0);
    let last_kept = points[2];
    let d = haversine_distance(&points[10], &last_kept);

    assert!(should_keep_moving_point(&points, 10, Some(&last_kept), d));
    // Interior point on a straight line: only distance can keep it.
    assert!(!should_keep_moving_point(
        &points,
        10,
        Some(&last_kept),
        d + 1.0
    ));
}

#[test]
fn test_window_ends_are_turning_points() {
    let points = straight_line(20, 30.0);
    for index in (0..5).chain(15..20) {
        assert!(is_turning_point(&points, index), "index {index}");
    }
    for index in 5..15 {
        assert!(!is_turning_point(&points, index), "index {index}");
    }
}

#[test]
fn test_short_sequence_is_all_turns() {
    let points = straight_line(8, 30.0);
    assert!((0..8).all(|i| is_turning_point(&points, i)));
}

#[test]
fn test_out_of_range_index_is_not_turning() {
    let points = straight_line(12, 30.0);
    assert!(!is_turning_point(&points, 12));
    assert!(!is_turning_point(&points, 100));
    assert!(!is_turning_point(&[], 0));
}

#[test]
fn test_u_turn_detected() {
    // Out 50 m and straight back.
    let offsets = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 40.0, 30.0, 20.0, 10.0, 0.0];
    let points: Vec<TrajectoryPoint> = offsets.iter().map(|&m| north(m)).collect();

    assert!(is_turning_point(&points, 5));
    // A turn keeps the point even right next to the last kept one.
    assert!(should_keep_moving_point(
        &points,
        5,
        Some(&points[4]),
        200.0
    ));
}

#[test]
fn test_gentle_bend_below_threshold() {
    // Heading swings by roughly 20 degrees at index 10.
    let mut points = straight_line(11, 30.0);
    let corner = points[10];
    let east_per_step = 30.0 * 20f64.to_radians().sin();
    let north_per_step = 30.0 * 20f64.to_radians().cos();
    let lon_scale = METERS_PER_DEG * corner.latitude.to_radians().cos();
    for k in 1..=10 {
        points.push(TrajectoryPoint::new(
            corner.latitude + k as f64 * north_per_step / METERS_PER_DEG,
            corner.longitude + k as f64 * east_per_step / lon_scale,
        ));
    }

    assert!(!is_turning_point(&points, 10));
}
