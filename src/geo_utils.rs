//! # Geographic Utilities
//!
//! Great-circle distance, initial bearing and center computations shared by
//! every stage of the pipeline.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two points |
//! | [`bearing`] | Initial bearing from one point to another |
//! | [`compute_center`] | Arithmetic mean of a point set |
//! | [`nearest_to_center`] | First point with the smallest distance to a reference |
//!
//! ## Example
//!
//! ```rust
//! use trackthin::{TrajectoryPoint, geo_utils};
//!
//! let london = TrajectoryPoint::new(51.5074, -0.1278);
//! let paris = TrajectoryPoint::new(48.8566, 2.3522);
//!
//! let distance = geo_utils::haversine_distance(&london, &paris);
//! assert!((distance - 343_500.0).abs() < 1_000.0);
//! ```

use crate::{EARTH_RADIUS_METERS, TrajectoryPoint};

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two points using the Haversine
/// formula on a sphere of radius [`EARTH_RADIUS_METERS`].
///
/// Returns exactly `0.0` when both points share latitude and longitude.
#[inline]
pub fn haversine_distance(p1: &TrajectoryPoint, p2: &TrajectoryPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = p2.longitude.to_radians() - p1.longitude.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    c * EARTH_RADIUS_METERS
}

/// Initial bearing from `from` to `to`, in degrees.
///
/// The result is the raw `atan2` angle in `(-180, 180]`, not normalized to a
/// compass heading. Coincident points have no defined direction and yield `0.0`.
pub fn bearing(from: &TrajectoryPoint, to: &TrajectoryPoint) -> f64 {
    if from.latitude == to.latitude && from.longitude == to.longitude {
        return 0.0;
    }

    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = to.longitude.to_radians() - from.longitude.to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    y.atan2(x).to_degrees()
}

/// Absolute difference between two bearings folded into `[0, 180]`.
pub fn bearing_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    if diff > 180.0 { 360.0 - diff } else { diff }
}

// =============================================================================
// Center Functions
// =============================================================================

/// Arithmetic mean of the given points' coordinates.
///
/// Coordinates are summed left to right, so feeding the same points in the
/// same order always yields the same bits. The result is a reference position
/// for distance comparisons, never a point to emit. Returns `None` when empty.
pub fn compute_center<'a, I>(points: I) -> Option<TrajectoryPoint>
where
    I: IntoIterator<Item = &'a TrajectoryPoint>,
{
    let (lat_sum, lon_sum, count) = points
        .into_iter()
        .fold((0.0, 0.0, 0usize), |(lat, lon, n), p| {
            (lat + p.latitude, lon + p.longitude, n + 1)
        });

    if count == 0 {
        return None;
    }

    Some(TrajectoryPoint::new(
        lat_sum / count as f64,
        lon_sum / count as f64,
    ))
}

/// Position of the first point with the strictly smallest distance to `center`.
///
/// Candidates for which `skip` returns true are ignored. Returns `None` when no
/// candidate remains.
pub fn nearest_to_center(
    points: &[TrajectoryPoint],
    center: &TrajectoryPoint,
    skip: impl Fn(usize) -> bool,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, p) in points.iter().enumerate() {
        if skip(i) {
            continue;
        }
        let d = haversine_distance(p, center);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }

    best.map(|(i, _)| i)
}
