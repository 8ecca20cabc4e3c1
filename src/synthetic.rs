//! Synthetic trajectory generator for stress testing and benchmarking.
//!
//! Generates timestamped trajectories that alternate dwell clusters with
//! straight travel legs, so the number of stay areas is known up front.
//!
//! Feature-gated behind `synthetic`; not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use trackthin::synthetic::SyntheticTrack;
//!
//! let track = SyntheticTrack::commute().generate();
//! assert_eq!(track.expected_stays.len(), 3);
//! ```

use std::f64::consts::PI;
use std::ops::Range;

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::TrajectoryPoint;

/// Origin well away from the built-in override zone.
pub const LONDON: TrajectoryPoint = TrajectoryPoint {
    latitude: 51.5074,
    longitude: -0.1278,
    time: None,
};

/// Meters per degree of latitude (approximately constant).
const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Parameters for one synthetic trajectory.
#[derive(Debug, Clone)]
pub struct SyntheticTrack {
    /// Center of the first dwell cluster.
    pub origin: TrajectoryPoint,
    /// Number of dwell clusters; travel legs run between consecutive ones.
    pub stays: usize,
    /// Samples recorded during each dwell.
    pub points_per_stay: usize,
    /// Samples on each travel leg.
    pub leg_points: usize,
    /// Distance between consecutive leg samples in meters.
    pub leg_spacing_m: f64,
    /// Seconds between consecutive samples.
    pub sample_interval_s: i64,
    /// Gaussian noise standard deviation in meters.
    pub noise_m: f64,
    /// RNG seed for deterministic reproduction.
    pub seed: u64,
}

/// A generated trajectory with the index ranges of its dwell clusters.
#[derive(Debug, Clone)]
pub struct SyntheticTrajectory {
    pub points: Vec<TrajectoryPoint>,
    pub expected_stays: Vec<Range<usize>>,
}

// ============================================================================
// Coordinate Helpers
// ============================================================================

fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / METERS_PER_DEG_LAT
}

fn meters_to_deg_lon(meters: f64, latitude: f64) -> f64 {
    let meters_per_deg_lon = METERS_PER_DEG_LAT * latitude.to_radians().cos();
    if meters_per_deg_lon.abs() < 1e-10 {
        return 0.0;
    }
    meters / meters_per_deg_lon
}

fn offset(point: &TrajectoryPoint, north_m: f64, east_m: f64) -> TrajectoryPoint {
    TrajectoryPoint::new(
        point.latitude + meters_to_deg_lat(north_m),
        point.longitude + meters_to_deg_lon(east_m, point.latitude),
    )
}

/// Box-Muller Gaussian pair scaled to `sigma`.
fn gaussian_pair(rng: &mut StdRng, sigma: f64) -> (f64, f64) {
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.r#gen();
    let r = (-2.0 * u1.ln()).sqrt() * sigma;
    (r * (2.0 * PI * u2).cos(), r * (2.0 * PI * u2).sin())
}

// ============================================================================
// Generation
// ============================================================================

impl SyntheticTrack {
    /// Generate the trajectory described by these parameters.
    pub fn generate(&self) -> SyntheticTrajectory {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let total = self.stays * self.points_per_stay
            + self.stays.saturating_sub(1) * self.leg_points;
        let mut points = Vec::with_capacity(total);
        let mut expected_stays = Vec::with_capacity(self.stays);
        let mut center = TrajectoryPoint::new(self.origin.latitude, self.origin.longitude);

        for stay in 0..self.stays {
            let start = points.len();
            for _ in 0..self.points_per_stay {
                let (dn, de) = gaussian_pair(&mut rng, self.noise_m.max(0.0));
                points.push(offset(&center, dn, de));
            }
            expected_stays.push(start..points.len());

            if stay + 1 == self.stays {
                break;
            }

            let heading: f64 = rng.gen_range(0.0..(2.0 * PI));
            let (step_n, step_e) = (
                self.leg_spacing_m * heading.cos(),
                self.leg_spacing_m * heading.sin(),
            );
            let mut cursor = center;
            for _ in 0..self.leg_points {
                cursor = offset(&cursor, step_n, step_e);
                points.push(cursor);
            }
            center = offset(&cursor, step_n, step_e);
        }

        let epoch = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap_or_default();
        for (i, p) in points.iter_mut().enumerate() {
            p.time = Some(epoch + TimeDelta::seconds(i as i64 * self.sample_interval_s));
        }

        SyntheticTrajectory {
            points,
            expected_stays,
        }
    }

    /// Three twenty-minute stops joined by two 3 km legs.
    pub fn commute() -> Self {
        Self {
            origin: LONDON,
            stays: 3,
            points_per_stay: 120,
            leg_points: 60,
            leg_spacing_m: 50.0,
            sample_interval_s: 10,
            noise_m: 2.0,
            seed: 42,
        }
    }

    /// A full day of one-second sampling with many stops.
    pub fn dense_day() -> Self {
        Self {
            origin: LONDON,
            stays: 12,
            points_per_stay: 1_800,
            leg_points: 1_200,
            leg_spacing_m: 12.0,
            sample_interval_s: 1,
            noise_m: 2.0,
            seed: 7,
        }
    }

    /// Roughly `point_count` points with the commute shape scaled up.
    pub fn with_point_count(point_count: usize) -> Self {
        let stays = (point_count / 180).max(1);
        Self {
            stays,
            ..Self::commute()
        }
    }
}
