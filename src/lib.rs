//! # Track Thin
//!
//! Stay-area aware thinning of GPS trajectories.
//!
//! This library provides:
//! - A bounding-box override pass that collapses runs inside a designated zone
//! - Stay area detection with bounded excursion lookahead
//! - Budgeted simplification of each stay area
//! - Distance and turning-point based retention for moving points
//! - A single pipeline wiring the above together
//!
//! ## Features
//!
//! - **`parallel`** - Simplify many independent trajectories with rayon
//! - **`synthetic`** - Deterministic synthetic trajectories for benchmarks
//!
//! ## Quick Start
//!
//! ```rust
//! use trackthin::{SimplifyConfig, Simplifier, TrajectoryPoint};
//!
//! let points = vec![
//!     TrajectoryPoint::new(51.5074, -0.1278),
//!     TrajectoryPoint::new(51.5080, -0.1290),
//!     TrajectoryPoint::new(51.5090, -0.1300),
//! ];
//!
//! let simplifier = Simplifier::new(SimplifyConfig::default()).unwrap();
//! let result = simplifier.simplify(&points);
//! assert!(result.points.len() <= points.len());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, SimplifyError};

// Great-circle distance, bearing and center helpers
pub mod geo_utils;

// Override zone pre-pass
pub mod zone;
pub use zone::{filter_zone, select_zone_points};

// Stay area segmentation and simplification
pub mod stays;
pub use stays::{
    MovingSegment, Segmentation, StayArea, is_valid_stay, segment_stays, select_stay_points,
    simplify_stay_area,
};

// Retention rules for points outside stay areas
pub mod moving;
pub use moving::{is_turning_point, should_keep_moving_point};

// End-to-end pipeline
pub mod pipeline;
#[cfg(feature = "parallel")]
pub use pipeline::simplify_batch_parallel;
pub use pipeline::{
    SimplifyResult, SimplifyStats, Simplifier, simplify_batch, simplify_trajectory,
    validate_points,
};

#[cfg(feature = "synthetic")]
pub mod synthetic;

// ============================================================================
// Algorithm Constants
// ============================================================================

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Maximum number of points probed when a stay candidate is left.
pub const EXCURSION_LOOKAHEAD: usize = 10;

/// Adjacent points closer than this may start a new stay attempt.
pub const MICRO_STEP_METERS: f64 = 10.0;

/// Minimum cluster size for a stay when timestamps are unavailable.
pub const MIN_UNTIMED_STAY_POINTS: usize = 10;

/// Sample offset used for turning point bearings.
pub const TURN_WINDOW: usize = 5;

/// Heading change, in degrees, above which a point counts as a turn.
pub const TURN_ANGLE_THRESHOLD: f64 = 30.0;

// ============================================================================
// Core Types
// ============================================================================

/// A geotagged trajectory sample.
///
/// Points carry no identity of their own: wherever a slice of points is
/// handed to this crate, a point is identified by its index in that slice.
///
/// # Example
/// ```
/// use trackthin::TrajectoryPoint;
/// let point = TrajectoryPoint::new(51.5074, -0.1278); // London
/// assert!(point.time.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Sample time, if the source recorded one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

impl TrajectoryPoint {
    /// Create a point without a timestamp.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            time: None,
        }
    }

    /// Create a timestamped point.
    pub fn with_time(latitude: f64, longitude: f64, time: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            time: Some(time),
        }
    }

    pub fn has_time(&self) -> bool {
        self.time.is_some()
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Geographic rectangle, inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Whether the point lies inside or on the edge of the rectangle.
    pub fn contains(&self, point: &TrajectoryPoint) -> bool {
        self.min_lat <= point.latitude
            && point.latitude <= self.max_lat
            && self.min_lon <= point.longitude
            && point.longitude <= self.max_lon
    }

    fn is_well_formed(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|v| v.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
    }
}

/// A rectangle inside which every contiguous run of points is collapsed to
/// at most `target_count` points, before stay detection runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneOverride {
    pub bounds: Bounds,
    pub target_count: usize,
}

impl Default for ZoneOverride {
    /// The built-in campus zone, thinned to two points per visit.
    fn default() -> Self {
        Self {
            bounds: Bounds::new(39.95822855, 39.96502929, 116.35502636, 116.36105597),
            target_count: 2,
        }
    }
}

/// Configuration for trajectory simplification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    /// Radius around the running cluster mean within which a point belongs
    /// to the same stay area.
    /// Default: 100.0 meters
    pub stay_radius: f64,

    /// Minimum dwell time for a timestamped cluster to count as a stay.
    /// Default: 600.0 seconds
    pub min_stay_time: f64,

    /// Point budget for each stay area.
    /// Default: 2
    pub max_stay_points: usize,

    /// Distance from the last kept point at which a moving point is kept.
    /// Default: 200.0 meters
    pub moving_threshold: f64,

    /// Override zone applied before segmentation. `None` disables it.
    pub zone: Option<ZoneOverride>,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            stay_radius: 100.0,
            min_stay_time: 600.0,
            max_stay_points: 2,
            moving_threshold: 200.0,
            zone: Some(ZoneOverride::default()),
        }
    }
}

impl SimplifyConfig {
    /// Check that every field holds a usable value.
    pub fn validate(&self) -> Result<()> {
        check_non_negative("stay_radius", self.stay_radius)?;
        check_non_negative("min_stay_time", self.min_stay_time)?;
        check_non_negative("moving_threshold", self.moving_threshold)?;

        if self.max_stay_points == 0 {
            return Err(SimplifyError::config(
                "max_stay_points",
                "must keep at least one point per stay area",
            ));
        }

        if let Some(zone) = &self.zone {
            if !zone.bounds.is_well_formed() {
                return Err(SimplifyError::config(
                    "zone.bounds",
                    format!("malformed rectangle {:?}", zone.bounds),
                ));
            }
        }

        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimplifyError::config(
            field,
            format!("expected a finite non-negative value, got {value}"),
        ));
    }
    Ok(())
}
