//! Automatic resolution selection for paths.
//!
//! Two independent heuristics pick a resolution and install it through
//! [`Path::set_resolution`], which leaves the length cache consistent:
//!
//! - [`Path::optimize`] estimates from corner sharpness and neighbour spacing
//!   in a single pass over the control points.
//! - [`Path::optimize_by_angle`] searches resolutions upward until no two
//!   consecutive sampled directions turn by more than a threshold.

use serde::{Deserialize, Serialize};

use super::core::Point3;
use super::frame::CoordinateFrame;
use super::metrics::{PathMetrics, TimingBucket};
use super::path::{MAX_RESOLUTION, MIN_RESOLUTION, Path, clamp_resolution};
use super::sampling::max_turn_angle_at;
use super::topology::wrap_index;

/// Lowest resolution `optimize` will install for three or more points.
pub const MIN_CORNER_RESOLUTION: usize = 4;

// Corner heuristic tuning.
const CORNER_RESOLUTION_SPAN: f64 = 15.0;
const ASPECT_DIVISOR: f64 = 2.5;
const ASPECT_DAMPING: f64 = 0.1;

/// Options for [`Path::optimize_by_angle_with`].
///
/// # Example
///
/// ```
/// use spline_path::geom::AngleOptimizerOptions;
///
/// let options = AngleOptimizerOptions::new(4.0).with_min_resolution(10);
/// assert_eq!(options.max_angle_degrees, 4.0);
/// assert_eq!(options.min_resolution, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleOptimizerOptions {
    /// Largest accepted turn between consecutive sub-steps, in degrees.
    pub max_angle_degrees: f64,
    /// First resolution tried.
    pub min_resolution: usize,
}

impl Default for AngleOptimizerOptions {
    fn default() -> Self {
        Self {
            max_angle_degrees: 8.0,
            min_resolution: 3,
        }
    }
}

impl AngleOptimizerOptions {
    #[must_use]
    pub const fn new(max_angle_degrees: f64) -> Self {
        Self {
            max_angle_degrees,
            min_resolution: 3,
        }
    }

    #[must_use]
    pub const fn with_min_resolution(mut self, min_resolution: usize) -> Self {
        self.min_resolution = min_resolution;
        self
    }
}

/// Outcome of an angle-driven resolution search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleOptimization {
    /// Resolution installed on the path.
    pub resolution: usize,
    /// `false` when the search hit the maximum resolution without meeting
    /// the threshold.
    pub converged: bool,
    /// Largest turn at the installed resolution, in degrees.
    pub worst_angle_degrees: f64,
    /// Number of resolutions tried.
    pub trials: usize,
}

impl<F: CoordinateFrame> Path<F> {
    /// Installs a resolution estimated from corner sharpness and returns it.
    ///
    /// Paths with fewer than three points get resolution `1`.
    pub fn optimize(&mut self) -> usize {
        let resolution = corner_resolution(&self.points, self.looped());
        self.install_resolution(resolution);
        self.resolution()
    }

    /// [`optimize`](Self::optimize) with the estimate and the recompute timed.
    pub fn optimize_with_metrics(&mut self, metrics: &mut PathMetrics) -> usize {
        let resolution = metrics.time(TimingBucket::Optimize, || {
            corner_resolution(&self.points, self.looped())
        });
        metrics.time(TimingBucket::LengthRecompute, || {
            self.install_resolution(resolution);
        });
        self.resolution()
    }

    /// Installs the smallest resolution whose sampled directions never turn
    /// by more than `max_angle_degrees`.
    pub fn optimize_by_angle(&mut self, max_angle_degrees: f64) -> AngleOptimization {
        self.optimize_by_angle_with(AngleOptimizerOptions::new(max_angle_degrees))
    }

    pub fn optimize_by_angle_with(&mut self, options: AngleOptimizerOptions) -> AngleOptimization {
        let outcome = search_angle_resolution(&self.points, self.looped(), options);
        self.install_resolution(outcome.resolution);
        outcome
    }

    /// [`optimize_by_angle_with`](Self::optimize_by_angle_with) with the
    /// search and the final recompute timed.
    pub fn optimize_by_angle_with_metrics(
        &mut self,
        options: AngleOptimizerOptions,
        metrics: &mut PathMetrics,
    ) -> AngleOptimization {
        let outcome = metrics.time(TimingBucket::AngleSearch, || {
            search_angle_resolution(&self.points, self.looped(), options)
        });
        metrics.time(TimingBucket::LengthRecompute, || {
            self.install_resolution(outcome.resolution);
        });
        outcome
    }

    fn install_resolution(&mut self, resolution: usize) {
        log::debug!(
            "installing optimized resolution {resolution} for {} points",
            self.point_count()
        );
        self.set_resolution(resolution);
    }
}

/// Resolution the corner heuristic picks for `points`.
///
/// Each candidate corner maps the cosine between its neighbour directions
/// onto `1..=16` and inflates that by the spacing imbalance of the two
/// neighbours. The largest estimate wins, floored to at least
/// [`MIN_CORNER_RESOLUTION`].
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
pub fn corner_resolution(points: &[Point3], looped: bool) -> usize {
    let n = points.len();
    if n < 3 {
        return MIN_RESOLUTION;
    }

    let candidates = if looped {
        0..n
    } else if n == 3 {
        1..3
    } else {
        1..n - 1
    };

    let mut best = 0.0_f64;
    for index in candidates {
        let i = index as isize;
        let previous = points[wrap_index(i - 1, n)];
        let next = points[wrap_index(i + 1, n)];
        best = best.max(corner_estimate(previous, points[index], next));
    }

    let floored = best.floor().max(0.0) as usize;
    clamp_resolution(floored.max(MIN_CORNER_RESOLUTION))
}

/// Resolution estimate for one corner at `current`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn corner_estimate(previous: Point3, current: Point3, next: Point3) -> f64 {
    let back = previous - current;
    let forward = next - current;

    let back_dir = back.normalized_or_zero();
    let forward_dir = forward.normalized_or_zero();
    let cosine = back_dir.dot(forward_dir).max((-back_dir).dot(forward_dir));

    let mut estimate = (cosine + 1.0) / 2.0 * CORNER_RESOLUTION_SPAN + 1.0;

    let back_len = back.length();
    let forward_len = forward.length();
    let aspect = if back_len == 0.0 || forward_len == 0.0 {
        1.0
    } else {
        back_len.max(forward_len) / back_len.min(forward_len)
    };
    let aspect = (aspect / ASPECT_DIVISOR).max(1.0);

    estimate += estimate * (aspect - 1.0) * ASPECT_DAMPING;
    estimate
}

/// Searches resolutions upward from `options.min_resolution` and returns the
/// first that keeps every turn within `options.max_angle_degrees`, or the
/// maximum resolution as a best effort.
#[must_use]
pub fn search_angle_resolution(
    points: &[Point3],
    looped: bool,
    options: AngleOptimizerOptions,
) -> AngleOptimization {
    if points.len() < 3 {
        return AngleOptimization {
            resolution: MIN_RESOLUTION,
            converged: true,
            worst_angle_degrees: 0.0,
            trials: 0,
        };
    }

    let start = clamp_resolution(options.min_resolution);
    let mut trials = 0;
    let mut worst = 0.0;
    for resolution in start..=MAX_RESOLUTION {
        trials += 1;
        worst = max_turn_angle_at(points, looped, resolution);
        if worst <= options.max_angle_degrees {
            return AngleOptimization {
                resolution,
                converged: true,
                worst_angle_degrees: worst,
                trials,
            };
        }
    }

    log::warn!(
        "no resolution up to {MAX_RESOLUTION} keeps turns under {} degrees (worst {worst:.3})",
        options.max_angle_degrees
    );
    AngleOptimization {
        resolution: MAX_RESOLUTION,
        converged: false,
        worst_angle_degrees: worst,
        trials,
    }
}
