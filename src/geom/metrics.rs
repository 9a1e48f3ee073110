//! Opt-in timing hooks for path operations.
//!
//! Timing is only collected when the `path_metrics` feature is enabled and the
//! target is not WASM (`std::time::Instant` is unavailable there). Otherwise
//! every call compiles down to running the closure.
//!
//! # Usage
//!
//! ```ignore
//! use spline_path::geom::{PathMetrics, TimingBucket};
//!
//! let mut metrics = PathMetrics::default();
//! metrics.begin();
//!
//! let report = path.optimize_by_angle_with_metrics(options, &mut metrics);
//!
//! if let Some(timing) = metrics.end() {
//!     println!("angle search: {} ns", timing.angle_search_ns);
//! }
//! ```

/// Categories for timing path operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Full or windowed segment length recomputation.
    LengthRecompute,
    /// Distance queries and polyline sampling.
    Sampling,
    /// The corner heuristic in `optimize`.
    Optimize,
    /// Resolution trials in `optimize_by_angle`.
    AngleSearch,
}

/// Timing report with nanosecond precision for each bucket.
///
/// All fields are cumulative across calls to the same bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathTimingReport {
    pub length_recompute_ns: u64,
    pub sampling_ns: u64,
    pub optimize_ns: u64,
    pub angle_search_ns: u64,
}

impl PathTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.length_recompute_ns
            .saturating_add(self.sampling_ns)
            .saturating_add(self.optimize_ns)
            .saturating_add(self.angle_search_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing path operations.
///
/// Call [`begin`](Self::begin) to reset, wrap work with [`time`](Self::time),
/// and read the report with [`end`](Self::end). With metrics disabled every
/// method is a no-op and [`end`](Self::end) returns `None`.
#[derive(Debug, Default)]
pub struct PathMetrics {
    #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
    report: PathTimingReport,
}

impl PathMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
        {
            self.report = PathTimingReport::default();
        }
    }

    /// Returns the accumulated report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<PathTimingReport> {
        #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "path_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f` and adds its elapsed time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            #[allow(clippy::cast_possible_truncation)]
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "path_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::LengthRecompute => &mut self.report.length_recompute_ns,
            TimingBucket::Sampling => &mut self.report.sampling_ns,
            TimingBucket::Optimize => &mut self.report.optimize_ns,
            TimingBucket::AngleSearch => &mut self.report.angle_search_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
