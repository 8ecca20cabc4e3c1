//! Retention rules for points outside every stay area.
//!
//! A moving point survives when it is the first output point, when it has
//! travelled far enough from the last kept point, or when the track turns
//! sharply at it.

use crate::geo_utils::{bearing, bearing_difference, haversine_distance};
use crate::{TURN_ANGLE_THRESHOLD, TURN_WINDOW, TrajectoryPoint};

/// Whether the track changes direction sharply at `index`.
///
/// Compares the bearing from `index - TURN_WINDOW` to `index` with the bearing
/// from `index` to `index + TURN_WINDOW`. Points within the window of either
/// end of the sequence always count as turns. Out-of-range indices never do.
pub fn is_turning_point(points: &[TrajectoryPoint], index: usize) -> bool {
    let n = points.len();
    if index >= n {
        return false;
    }
    if index < TURN_WINDOW || index >= n.saturating_sub(TURN_WINDOW) {
        return true;
    }

    let point = &points[index];
    let incoming = bearing(&points[index - TURN_WINDOW], point);
    let outgoing = bearing(point, &points[index + TURN_WINDOW]);

    bearing_difference(incoming, outgoing) > TURN_ANGLE_THRESHOLD
}

/// Decide whether the moving point at `index` is retained.
///
/// `last_kept` is the most recent point already in the output, whatever stage
/// produced it; `None` means the output is still empty.
pub fn should_keep_moving_point(
    points: &[TrajectoryPoint],
    index: usize,
    last_kept: Option<&TrajectoryPoint>,
    moving_threshold: f64,
) -> bool {
    let Some(last_kept) = last_kept else {
        return true;
    };

    if haversine_distance(&points[index], last_kept) >= moving_threshold {
        return true;
    }

    is_turning_point(points, index)
}
