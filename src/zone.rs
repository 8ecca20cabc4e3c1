//! Override zone pre-pass.
//!
//! Every maximal run of consecutive points inside the zone rectangle is
//! reduced to at most `target_count` points before stay detection sees the
//! trajectory. Points outside the zone pass through untouched and in order.

use log::debug;

use crate::geo_utils::{compute_center, nearest_to_center};
use crate::{TrajectoryPoint, ZoneOverride};

/// Apply the override zone to a trajectory.
///
/// # Example
/// ```
/// use trackthin::{Bounds, TrajectoryPoint, ZoneOverride, filter_zone};
///
/// let zone = ZoneOverride {
///     bounds: Bounds::new(0.0, 1.0, 0.0, 1.0),
///     target_count: 1,
/// };
/// let points = vec![
///     TrajectoryPoint::new(0.5, 0.5),
///     TrajectoryPoint::new(0.6, 0.6),
///     TrajectoryPoint::new(2.0, 2.0),
/// ];
///
/// let filtered = filter_zone(&points, &zone);
/// assert_eq!(filtered, vec![points[0], points[2]]);
/// ```
pub fn filter_zone(points: &[TrajectoryPoint], zone: &ZoneOverride) -> Vec<TrajectoryPoint> {
    let mut output = Vec::with_capacity(points.len());
    let mut run_start: Option<usize> = None;

    for (i, point) in points.iter().enumerate() {
        if zone.bounds.contains(point) {
            run_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = run_start.take() {
            append_reduced_run(&points[start..i], zone.target_count, &mut output);
        }
        output.push(*point);
    }

    if let Some(start) = run_start {
        append_reduced_run(&points[start..], zone.target_count, &mut output);
    }

    output
}

fn append_reduced_run(run: &[TrajectoryPoint], target: usize, output: &mut Vec<TrajectoryPoint>) {
    let selected = select_zone_points(run, target);
    debug!(
        "[Zone] run of {} points reduced to {}",
        run.len(),
        selected.len()
    );
    output.extend(selected.into_iter().map(|i| run[i]));
}

/// Choose which points of a single in-zone run survive.
///
/// Returns positions within `run`, never more than `target` of them. A run
/// already within budget is returned whole. Otherwise the selection is built
/// in priority order:
///
/// 1. the first point;
/// 2. the earliest and latest timestamped points when the run's first and
///    last points are both timestamped, else the last point;
/// 3. the point nearest the run's mean position not yet selected;
/// 4. remaining points in chronological order, untimed points last.
///
/// If the first point is neither the earliest nor the latest sample, step 2
/// can overshoot the budget; the first point then yields its slot. The result
/// is sorted by time when the leading selected point carries a timestamp.
pub fn select_zone_points(run: &[TrajectoryPoint], target: usize) -> Vec<usize> {
    if run.len() <= target {
        return (0..run.len()).collect();
    }

    let last = run.len() - 1;
    let mut selected: Vec<usize> = Vec::with_capacity(target.min(4));

    if target >= 1 {
        selected.push(0);
    }

    if target >= 2 {
        if run[0].has_time() && run[last].has_time() {
            // Both endpoints are timed, so the timed prefix is never empty.
            let order = chronological_order(run);
            let timed = order.partition_point(|&i| run[i].has_time());
            push_unique(&mut selected, order[0]);
            push_unique(&mut selected, order[timed - 1]);
        } else {
            push_unique(&mut selected, last);
        }
    }

    if target >= 3 {
        if let Some(center) = compute_center(run) {
            if let Some(central) = nearest_to_center(run, &center, |i| selected.contains(&i)) {
                selected.push(central);
            }
        }
    }

    if selected.len() > target {
        debug_assert_eq!(selected.len(), target + 1);
        selected.remove(0);
    }

    if selected.len() < target {
        let missing = target - selected.len();
        let padding: Vec<usize> = chronological_order(run)
            .into_iter()
            .filter(|i| !selected.contains(i))
            .take(missing)
            .collect();
        selected.extend(padding);
    }

    if selected.first().is_some_and(|&i| run[i].has_time()) {
        // Stable; untimed points sort ahead of every timestamp.
        selected.sort_by_key(|&i| run[i].time);
    }

    selected
}

/// Positions of `run` ordered by time, untimed points last, ties kept stable.
fn chronological_order(run: &[TrajectoryPoint]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..run.len()).collect();
    order.sort_by_key(|&i| (run[i].time.is_none(), run[i].time));
    order
}

fn push_unique(selected: &mut Vec<usize>, index: usize) {
    if !selected.contains(&index) {
        selected.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn timed(lat: f64, secs: i64) -> TrajectoryPoint {
        TrajectoryPoint::with_time(lat, 0.0, DateTime::from_timestamp(secs, 0).unwrap())
    }

    #[test]
    fn chronological_order_puts_untimed_last() {
        let run = vec![
            TrajectoryPoint::new(0.0, 0.0),
            timed(0.1, 20),
            timed(0.2, 10),
        ];
        assert_eq!(chronological_order(&run), vec![2, 1, 0]);
    }

    #[test]
    fn overshoot_drops_first_point() {
        // First sample is neither earliest nor latest.
        let run = vec![timed(0.0, 50), timed(0.1, 10), timed(0.2, 90), timed(0.3, 60)];
        let selected = select_zone_points(&run, 2);
        assert_eq!(selected, vec![1, 2]);
    }
}
