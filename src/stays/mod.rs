//! # Stay Area Segmentation
//!
//! Partitions a trajectory into stay areas (rest periods) and moving segments
//! in one forward pass.
//!
//! ## Algorithm
//! 1. Open a candidate cluster at the cursor
//! 2. Absorb the next point while it lies within `stay_radius` of the
//!    candidate's running mean
//! 3. On the first departure, probe up to [`EXCURSION_LOOKAHEAD`] points for a
//!    return to the mean as it stood when the excursion began; a return
//!    absorbs the whole excursion, otherwise the candidate closes
//! 4. A closed candidate is a stay if it spans `min_stay_time` (timestamped)
//!    or holds [`MIN_UNTIMED_STAY_POINTS`] points (untimed)
//! 5. A rejected candidate is replaced by a moving segment running from its
//!    start to the first adjacent pair closer than [`MICRO_STEP_METERS`]
//!
//! The running mean is path dependent: it is the mean of whatever the
//! candidate held at the time of each comparison, not of the final cluster.
//! Candidates only ever grow by the next unvisited index, so every stay area
//! and moving segment is a contiguous index range.

mod simplify;

pub use simplify::{select_stay_points, simplify_stay_area};

use std::ops::Range;

use chrono::TimeDelta;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::geo_utils::haversine_distance;
use crate::{
    EXCURSION_LOOKAHEAD, MICRO_STEP_METERS, MIN_UNTIMED_STAY_POINTS, SimplifyConfig,
    TrajectoryPoint,
};

/// A run of points judged to be a rest period.
///
/// Indices refer to the sequence passed to [`segment_stays`]; `end` is
/// exclusive and the range is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayArea {
    pub start: usize,
    pub end: usize,
}

impl StayArea {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }

    /// The area's points within the segmented sequence.
    pub fn points<'a>(&self, sequence: &'a [TrajectoryPoint]) -> &'a [TrajectoryPoint] {
        &sequence[self.indices()]
    }
}

/// A run of points between stay areas, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingSegment {
    pub start: usize,
    pub end: usize,
}

impl MovingSegment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Output of [`segment_stays`], both lists in sequence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    pub stay_areas: Vec<StayArea>,
    pub moving_segments: Vec<MovingSegment>,
}

impl Segmentation {
    /// Index of the stay area containing `index`, if any.
    pub fn area_containing(&self, index: usize) -> Option<usize> {
        let pos = self.stay_areas.partition_point(|area| area.end <= index);
        self.stay_areas
            .get(pos)
            .filter(|area| area.contains(index))
            .map(|_| pos)
    }

    /// Total number of points inside stay areas.
    pub fn stay_point_count(&self) -> usize {
        self.stay_areas.iter().map(StayArea::len).sum()
    }
}

/// Partition `points` into stay areas and moving segments.
///
/// Uses `stay_radius` and `min_stay_time` from the config. Empty input yields
/// an empty segmentation.
pub fn segment_stays(points: &[TrajectoryPoint], config: &SimplifyConfig) -> Segmentation {
    let n = points.len();
    let mut segmentation = Segmentation::default();
    let mut i = 0;

    while i < n {
        let candidate = grow_candidate(points, i, config.stay_radius);

        if is_valid_stay(&points[candidate.range()], config.min_stay_time) {
            segmentation.stay_areas.push(StayArea {
                start: candidate.start,
                end: candidate.end,
            });
            i = candidate.end;
            continue;
        }

        let start = i;
        while i + 1 < n {
            if haversine_distance(&points[i], &points[i + 1]) < MICRO_STEP_METERS {
                break;
            }
            i += 1;
        }
        if i > start {
            segmentation
                .moving_segments
                .push(MovingSegment { start, end: i + 1 });
        }
        i += 1;
    }

    debug!(
        "[Stays] {} points segmented into {} stay areas and {} moving segments",
        n,
        segmentation.stay_areas.len(),
        segmentation.moving_segments.len()
    );

    segmentation
}

/// Whether a closed cluster qualifies as a stay area.
///
/// With timestamps on both endpoints the cluster must span at least
/// `min_stay_time` seconds (inclusive); otherwise it must hold at least
/// [`MIN_UNTIMED_STAY_POINTS`] points. A single point never qualifies.
pub fn is_valid_stay(cluster: &[TrajectoryPoint], min_stay_time: f64) -> bool {
    if cluster.len() < 2 {
        return false;
    }

    match (cluster[0].time, cluster[cluster.len() - 1].time) {
        (Some(t0), Some(t1)) => {
            dwell_seconds(t1 - t0) >= min_stay_time
        }
        _ => cluster.len() >= MIN_UNTIMED_STAY_POINTS,
    }
}

/// Signed duration in seconds, microsecond precision where it fits.
fn dwell_seconds(delta: TimeDelta) -> f64 {
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

// ============================================================================
// Candidate growth
// ============================================================================

/// A contiguous candidate cluster with running coordinate sums.
///
/// Sums accumulate in index order, which reproduces re-summing the candidate
/// from scratch bit for bit.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    end: usize,
    lat_sum: f64,
    lon_sum: f64,
}

impl Candidate {
    fn open(points: &[TrajectoryPoint], start: usize) -> Self {
        let mut candidate = Self {
            start,
            end: start,
            lat_sum: 0.0,
            lon_sum: 0.0,
        };
        candidate.absorb_through(points, start);
        candidate
    }

    fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    fn mean(&self) -> TrajectoryPoint {
        let count = (self.end - self.start) as f64;
        TrajectoryPoint::new(self.lat_sum / count, self.lon_sum / count)
    }

    /// Absorb every point from the current end up to and including `last`.
    fn absorb_through(&mut self, points: &[TrajectoryPoint], last: usize) {
        for p in &points[self.end..=last] {
            self.lat_sum += p.latitude;
            self.lon_sum += p.longitude;
        }
        self.end = last + 1;
    }
}

/// Segmenter states while growing one candidate.
#[derive(Debug, Clone, Copy)]
enum SegmenterState {
    /// Testing the next point against the live running mean.
    Scanning,
    /// The next point departed; probing ahead against the frozen mean.
    Excursion { frozen_mean: TrajectoryPoint },
    /// No further point can join the candidate.
    Closed,
}

fn grow_candidate(points: &[TrajectoryPoint], start: usize, stay_radius: f64) -> Candidate {
    let n = points.len();
    let mut candidate = Candidate::open(points, start);
    let mut state = SegmenterState::Scanning;

    loop {
        state = match state {
            SegmenterState::Scanning => {
                let next = candidate.end;
                if next >= n {
                    SegmenterState::Closed
                } else {
                    let mean = candidate.mean();
                    if haversine_distance(&points[next], &mean) <= stay_radius {
                        candidate.absorb_through(points, next);
                        SegmenterState::Scanning
                    } else {
                        SegmenterState::Excursion { frozen_mean: mean }
                    }
                }
            }
            SegmenterState::Excursion { frozen_mean } => {
                let probe_end = (candidate.end + EXCURSION_LOOKAHEAD).min(n);
                let returned = (candidate.end..probe_end)
                    .find(|&k| haversine_distance(&points[k], &frozen_mean) <= stay_radius);
                match returned {
                    Some(k) => {
                        candidate.absorb_through(points, k);
                        SegmenterState::Scanning
                    }
                    None => SegmenterState::Closed,
                }
            }
            SegmenterState::Closed => return candidate,
        };
    }
}
