//! Tests for the override zone pre-pass

use chrono::{DateTime, Utc};
use trackthin::{Bounds, TrajectoryPoint, ZoneOverride, filter_zone, select_zone_points};

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
}

/// A point inside the built-in campus zone, offset by `i` ten-thousandths of a degree.
fn campus_point(i: usize, secs: Option<i64>) -> TrajectoryPoint {
    let lat = 39.9590 + i as f64 * 0.0001;
    let lon = 116.3560 + (i % 7) as f64 * 0.0001;
    match secs {
        Some(s) => TrajectoryPoint::with_time(lat, lon, at(s)),
        None => TrajectoryPoint::new(lat, lon),
    }
}

fn outside_point(i: usize, secs: i64) -> TrajectoryPoint {
    TrajectoryPoint::with_time(39.90 + i as f64 * 0.001, 116.30, at(secs))
}

fn square_zone(target_count: usize) -> ZoneOverride {
    ZoneOverride {
        bounds: Bounds::new(0.0, 1.0, 0.0, 1.0),
        target_count,
    }
}

#[test]
fn test_default_zone_contains_campus() {
    let zone = ZoneOverride::default();
    assert_eq!(zone.target_count, 2);
    assert!(zone.bounds.contains(&campus_point(0, None)));
    assert!(!zone.bounds.contains(&outside_point(0, 0)));
}

#[test]
fn test_bounds_are_inclusive() {
    let bounds = Bounds::new(0.0, 1.0, 0.0, 1.0);
    assert!(bounds.contains(&TrajectoryPoint::new(0.0, 0.0)));
    assert!(bounds.contains(&TrajectoryPoint::new(1.0, 1.0)));
    assert!(!bounds.contains(&TrajectoryPoint::new(1.0000001, 0.5)));
}

#[test]
fn test_empty_input() {
    assert!(filter_zone(&[], &ZoneOverride::default()).is_empty());
}

#[test]
fn test_points_outside_zone_untouched() {
    let points: Vec<TrajectoryPoint> = (0..10).map(|i| outside_point(i, i as i64)).collect();
    assert_eq!(filter_zone(&points, &ZoneOverride::default()), points);
}

#[test]
fn test_run_within_budget_returned_unchanged() {
    let run = vec![campus_point(0, Some(0)), campus_point(1, Some(5))];
    assert_eq!(select_zone_points(&run, 2), vec![0, 1]);
    assert_eq!(select_zone_points(&run, 5), vec![0, 1]);
}

#[test]
fn test_timed_run_keeps_earliest_and_latest() {
    let run: Vec<TrajectoryPoint> = (0..30)
        .map(|i| campus_point(i, Some(i as i64 * 10)))
        .collect();

    let filtered = filter_zone(&run, &ZoneOverride::default());
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0], run[0]);
    assert_eq!(filtered[1], run[29]);
}

#[test]
fn test_unordered_times_still_keep_extremes() {
    let times = [50, 10, 90, 30, 70, 20];
    let run: Vec<TrajectoryPoint> = times
        .iter()
        .enumerate()
        .map(|(i, &t)| campus_point(i, Some(t)))
        .collect();

    let selected = select_zone_points(&run, 2);
    assert_eq!(selected, vec![1, 2]);

    // The third slot goes to the point nearest the mean; the first point
    // still yields. Output is in time order.
    let selected = select_zone_points(&run, 3);
    assert_eq!(selected, vec![1, 3, 2]);
}

#[test]
fn test_untimed_run_keeps_first_and_last() {
    let run: Vec<TrajectoryPoint> = (0..8).map(|i| campus_point(i, None)).collect();
    assert_eq!(select_zone_points(&run, 2), vec![0, 7]);
}

#[test]
fn test_untimed_interior_point_is_not_latest() {
    let run = vec![
        campus_point(0, Some(0)),
        campus_point(1, None),
        campus_point(2, Some(100)),
    ];
    assert_eq!(select_zone_points(&run, 2), vec![0, 2]);

    let filtered = filter_zone(&run, &ZoneOverride::default());
    assert_eq!(filtered, vec![run[0], run[2]]);
}

#[test]
fn test_latest_timed_point_kept_among_untimed() {
    let run = vec![
        campus_point(0, Some(40)),
        campus_point(1, Some(90)),
        campus_point(2, None),
        campus_point(3, None),
        campus_point(4, Some(10)),
        campus_point(5, Some(60)),
    ];
    // Earliest is index 4, latest index 1; the first point yields.
    assert_eq!(select_zone_points(&run, 2), vec![4, 1]);
}

#[test]
fn test_budget_three_adds_point_nearest_mean() {
    // Straight line of 9 points: the mean sits on the middle one.
    let run: Vec<TrajectoryPoint> = (0..9)
        .map(|i| TrajectoryPoint::new(0.1 + i as f64 * 0.01, 0.5))
        .collect();
    assert_eq!(select_zone_points(&run, 3), vec![0, 8, 4]);
}

#[test]
fn test_padding_uses_chronological_order() {
    // Timestamped endpoints; interior has one untimed point that pads last.
    let run = vec![
        campus_point(0, Some(0)),
        campus_point(1, None),
        campus_point(2, Some(30)),
        campus_point(3, Some(20)),
        campus_point(4, Some(40)),
        campus_point(5, Some(100)),
    ];

    let selected = select_zone_points(&run, 5);
    assert_eq!(selected.len(), 5);
    assert!(!selected.contains(&1), "untimed point padded before timed ones");
    // Final ordering is chronological.
    let times: Vec<_> = selected.iter().map(|&i| run[i].time).collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);
}

#[test]
fn test_run_never_exceeds_target() {
    let run: Vec<TrajectoryPoint> = (0..20)
        .map(|i| campus_point(i, Some(((i * 37) % 20) as i64)))
        .collect();
    for target in 0..=run.len() {
        assert!(select_zone_points(&run, target).len() <= target);
    }
}

#[test]
fn test_target_zero_drops_run() {
    let points = vec![
        TrajectoryPoint::new(2.0, 2.0),
        TrajectoryPoint::new(0.5, 0.5),
        TrajectoryPoint::new(0.6, 0.6),
        TrajectoryPoint::new(3.0, 3.0),
    ];
    let filtered = filter_zone(&points, &square_zone(0));
    assert_eq!(filtered, vec![points[0], points[3]]);
}

#[test]
fn test_each_run_reduced_separately() {
    let points = vec![
        TrajectoryPoint::new(0.1, 0.1),
        TrajectoryPoint::new(0.2, 0.1),
        TrajectoryPoint::new(0.3, 0.1),
        TrajectoryPoint::new(5.0, 5.0),
        TrajectoryPoint::new(0.4, 0.1),
        TrajectoryPoint::new(0.5, 0.1),
        TrajectoryPoint::new(0.6, 0.1),
    ];

    let filtered = filter_zone(&points, &square_zone(1));
    assert_eq!(filtered, vec![points[0], points[3], points[4]]);
}

#[test]
fn test_zone_run_inside_track_keeps_surrounding_order() {
    let mut points = vec![outside_point(0, 0), outside_point(1, 10)];
    points.extend((0..12).map(|i| campus_point(i, Some(20 + i as i64 * 10))));
    points.push(outside_point(2, 200));

    let filtered = filter_zone(&points, &ZoneOverride::default());
    assert_eq!(filtered.len(), 5);
    assert_eq!(filtered[0], points[0]);
    assert_eq!(filtered[1], points[1]);
    assert_eq!(filtered[2], points[2]);
    assert_eq!(filtered[3], points[13]);
    assert_eq!(filtered[4], points[14]);
}
