//! End-to-end trajectory simplification.
//!
//! Stages run strictly forward:
//! raw points → zone filter → stay segmentation →
//! (stay simplification ∥ moving point selection) → chronological merge.
//!
//! Every point of the zone-filtered sequence is routed exactly once: either as
//! a member of one stay area (simplified together with its area, once) or as a
//! moving point (kept or dropped on its own).

use std::collections::HashSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimplifyError};
use crate::moving::should_keep_moving_point;
use crate::stays::{MovingSegment, segment_stays, simplify_stay_area};
use crate::zone::filter_zone;
use crate::{SimplifyConfig, TrajectoryPoint};

/// Per-stage point counts for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyStats {
    /// Points handed to the pipeline
    pub input_points: usize,
    /// Points left after the override zone pass
    pub zone_filtered_points: usize,
    pub stay_areas: usize,
    pub moving_segments: usize,
    /// Points inside stay areas, before stay simplification
    pub stay_member_points: usize,
    /// Points covered by moving segments
    pub moving_segment_points: usize,
    /// Output points contributed by stay areas
    pub stay_points_kept: usize,
    /// Output points contributed by moving points
    pub moving_points_kept: usize,
    pub output_points: usize,
}

impl SimplifyStats {
    /// Output size as a fraction of input size; 0.0 for empty input.
    pub fn reduction_ratio(&self) -> f64 {
        if self.input_points == 0 {
            return 0.0;
        }
        self.output_points as f64 / self.input_points as f64
    }
}

/// Simplified points plus the counts that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplifyResult {
    pub points: Vec<TrajectoryPoint>,
    pub stats: SimplifyStats,
}

/// A validated configuration, ready to simplify any number of trajectories.
///
/// # Example
/// ```
/// use trackthin::{SimplifyConfig, Simplifier};
///
/// let config = SimplifyConfig {
///     stay_radius: 50.0,
///     min_stay_time: 300.0,
///     max_stay_points: 3,
///     ..SimplifyConfig::default()
/// };
/// let simplifier = Simplifier::new(config).unwrap();
/// assert!(simplifier.simplify(&[]).points.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Simplifier {
    config: SimplifyConfig,
}

impl Simplifier {
    /// Validate `config` and wrap it.
    pub fn new(config: SimplifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimplifyConfig {
        &self.config
    }

    /// Simplify a trajectory from a trusted source.
    pub fn simplify(&self, points: &[TrajectoryPoint]) -> SimplifyResult {
        simplify_trajectory(points, &self.config)
    }

    /// Simplify after rejecting points with unusable coordinates.
    pub fn simplify_checked(&self, points: &[TrajectoryPoint]) -> Result<SimplifyResult> {
        validate_points(points)?;
        Ok(self.simplify(points))
    }
}

/// Fail on the first point with non-finite or out-of-range coordinates.
pub fn validate_points(points: &[TrajectoryPoint]) -> Result<()> {
    match points.iter().position(|p| !p.is_valid()) {
        Some(index) => Err(SimplifyError::InvalidPoint {
            index,
            latitude: points[index].latitude,
            longitude: points[index].longitude,
        }),
        None => Ok(()),
    }
}

/// Run the full pipeline over one trajectory.
///
/// The config is used as given; see [`Simplifier`] for a validating wrapper.
/// The output is sorted by time when its first point is timestamped, and is
/// otherwise in the order of the zone-filtered sequence.
pub fn simplify_trajectory(points: &[TrajectoryPoint], config: &SimplifyConfig) -> SimplifyResult {
    let filtered = match &config.zone {
        Some(zone) => filter_zone(points, zone),
        None => points.to_vec(),
    };

    let segmentation = segment_stays(&filtered, config);
    let stay_members: HashSet<usize> = segmentation
        .stay_areas
        .iter()
        .flat_map(|area| area.indices())
        .collect();

    let mut output: Vec<TrajectoryPoint> = Vec::new();
    let mut processed_areas: HashSet<usize> = HashSet::new();
    let mut stay_points_kept = 0;
    let mut moving_points_kept = 0;

    for (index, point) in filtered.iter().enumerate() {
        if !stay_members.contains(&index) {
            if should_keep_moving_point(&filtered, index, output.last(), config.moving_threshold) {
                output.push(*point);
                moving_points_kept += 1;
            }
            continue;
        }

        let Some(area_idx) = segmentation.area_containing(index) else {
            panic!("point {index} is marked as a stay member but no stay area contains it");
        };
        if !processed_areas.insert(area_idx) {
            continue;
        }

        let area = &segmentation.stay_areas[area_idx];
        let kept = simplify_stay_area(area.points(&filtered), config.max_stay_points);
        debug!(
            "[Stays] stay area {}..{} of {} points reduced to {}",
            area.start,
            area.end,
            area.len(),
            kept.len()
        );
        stay_points_kept += kept.len();
        output.extend(kept);
    }

    debug_assert_eq!(processed_areas.len(), segmentation.stay_areas.len());

    if output.first().is_some_and(TrajectoryPoint::has_time) {
        // Stable; untimed points sort ahead of every timestamp.
        output.sort_by_key(|p| p.time);
    }

    let stats = SimplifyStats {
        input_points: points.len(),
        zone_filtered_points: filtered.len(),
        stay_areas: segmentation.stay_areas.len(),
        moving_segments: segmentation.moving_segments.len(),
        stay_member_points: segmentation.stay_point_count(),
        moving_segment_points: segmentation
            .moving_segments
            .iter()
            .map(MovingSegment::len)
            .sum(),
        stay_points_kept,
        moving_points_kept,
        output_points: output.len(),
    };

    info!(
        "[Simplify] {} -> {} points (zone pass: {}, {} stay areas, {} moving segments)",
        stats.input_points,
        stats.output_points,
        stats.zone_filtered_points,
        stats.stay_areas,
        stats.moving_segments
    );

    SimplifyResult {
        points: output,
        stats,
    }
}

/// Simplify several independent trajectories with the same config.
pub fn simplify_batch(
    tracks: &[Vec<TrajectoryPoint>],
    config: &SimplifyConfig,
) -> Vec<SimplifyResult> {
    tracks
        .iter()
        .map(|track| simplify_trajectory(track, config))
        .collect()
}

/// Simplify several independent trajectories in parallel.
///
/// Produces the same results, in the same order, as [`simplify_batch`]; runs
/// share no state, so each track is handed to its own rayon task.
#[cfg(feature = "parallel")]
pub fn simplify_batch_parallel(
    tracks: &[Vec<TrajectoryPoint>],
    config: &SimplifyConfig,
) -> Vec<SimplifyResult> {
    use rayon::prelude::*;

    tracks
        .par_iter()
        .map(|track| simplify_trajectory(track, config))
        .collect()
}
