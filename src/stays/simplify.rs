//! Budgeted reduction of a single stay area.

use crate::TrajectoryPoint;
use crate::geo_utils::{compute_center, nearest_to_center};

/// Choose which points of a stay area survive, as positions within `area`.
///
/// - Within budget: every point.
/// - Budget 1: the point nearest the mean of the whole area.
/// - Budget 2: first and last.
/// - Budget 3 or more: first, the point at `len / 2`, and last. Only one
///   interior point is ever kept, however large the budget; larger budgets
///   are not yet spread across the area.
///
/// A budget of 0 behaves like 2.
pub fn select_stay_points(area: &[TrajectoryPoint], max_points: usize) -> Vec<usize> {
    let len = area.len();
    if len <= max_points {
        return (0..len).collect();
    }

    if max_points == 1 {
        let central = compute_center(area)
            .and_then(|center| nearest_to_center(area, &center, |_| false))
            .unwrap_or(0);
        return vec![central];
    }

    let last = len - 1;
    let mut selected = if max_points >= 3 {
        vec![0, len / 2, last]
    } else {
        vec![0, last]
    };
    // Positions are ascending, so this removes every repeat.
    selected.dedup();
    selected
}

/// Reduce a stay area to at most `max_points` of its own points, in order.
pub fn simplify_stay_area(area: &[TrajectoryPoint], max_points: usize) -> Vec<TrajectoryPoint> {
    select_stay_points(area, max_points)
        .into_iter()
        .map(|i| area[i])
        .collect()
}
