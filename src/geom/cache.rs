//! Incrementally maintained arc-length cache for spline paths.
//!
//! The cache keeps one length per control point, parallel to the point list.
//! Entry `i` holds the length of the span that starts at raw point `i`; the
//! drawable subset of those entries sums to the path length.
//!
//! # Features
//! - Full recompute for small paths and after global parameter changes
//! - Windowed recompute around a single mutated point for larger paths
//! - Recompute statistics for diagnostics
//!
//! # Example
//! ```ignore
//! let mut cache = SegmentLengthCache::new();
//! cache.push_slot();
//! cache.recompute_window(&points, 10, false, n as isize - 3, n as isize);
//! let stats = cache.stats();
//! println!("window recomputes: {}", stats.window_recomputes);
//! ```

use super::core::Point3;
use super::strategy::SegmentLengthStrategy;
use super::topology::{drawable_raw_indices, wrapped_window};

/// Below this many points every mutation recomputes the whole cache.
pub const INCREMENTAL_MIN_POINTS: usize = 5;

/// Cached per-segment lengths plus the drawable total.
#[derive(Debug, Clone, Default)]
pub struct SegmentLengthCache {
    lengths: Vec<f64>,
    total: f64,

    // Recompute counters for diagnostics
    full_recomputes: usize,
    window_recomputes: usize,
    segments_recomputed: usize,
}

/// Cache statistics for diagnostics and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthCacheStats {
    /// Number of cached entries (equals the point count).
    pub cached_segments: usize,
    /// Times every entry was recomputed.
    pub full_recomputes: usize,
    /// Times only a window around a mutation was recomputed.
    pub window_recomputes: usize,
    /// Total number of individual segment evaluations.
    pub segments_recomputed: usize,
}

impl LengthCacheStats {
    /// Returns the number of recompute passes of either kind.
    #[must_use]
    pub const fn total_recomputes(&self) -> usize {
        self.full_recomputes + self.window_recomputes
    }
}

impl SegmentLengthCache {
    /// Creates a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw per-point lengths, including tangent-only entries of open paths.
    #[must_use]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Sum of the drawable entries.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Returns recompute statistics.
    #[must_use]
    pub fn stats(&self) -> LengthCacheStats {
        LengthCacheStats {
            cached_segments: self.lengths.len(),
            full_recomputes: self.full_recomputes,
            window_recomputes: self.window_recomputes,
            segments_recomputed: self.segments_recomputed,
        }
    }

    /// Resets the recompute counters without touching cached lengths.
    pub fn reset_stats(&mut self) {
        self.full_recomputes = 0;
        self.window_recomputes = 0;
        self.segments_recomputed = 0;
    }

    pub(crate) fn push_slot(&mut self) {
        self.lengths.push(0.0);
    }

    pub(crate) fn insert_slot(&mut self, index: usize) {
        self.lengths.insert(index, 0.0);
    }

    pub(crate) fn remove_slot(&mut self, index: usize) {
        self.lengths.remove(index);
    }

    /// Drops every entry and zeroes the total.
    pub(crate) fn clear(&mut self) {
        self.lengths.clear();
        self.total = 0.0;
    }

    /// Recomputes every entry, then the total.
    pub fn recompute_all(&mut self, points: &[Point3], resolution: usize, looped: bool) {
        debug_assert_eq!(self.lengths.len(), points.len());
        let strategy = SegmentLengthStrategy::for_point_count(points.len());
        for (index, slot) in self.lengths.iter_mut().enumerate() {
            *slot = strategy.segment_length(points, index, resolution);
        }
        self.full_recomputes += 1;
        self.segments_recomputed += points.len();
        self.refresh_total(points.len(), looped);
    }

    /// Recomputes the raw entries `start..=end` (wrapped), then the total.
    ///
    /// Falls back to [`recompute_all`](Self::recompute_all) for paths with
    /// fewer than [`INCREMENTAL_MIN_POINTS`] points.
    pub fn recompute_window(
        &mut self,
        points: &[Point3],
        resolution: usize,
        looped: bool,
        start: isize,
        end: isize,
    ) {
        debug_assert_eq!(self.lengths.len(), points.len());
        if points.len() < INCREMENTAL_MIN_POINTS {
            self.recompute_all(points, resolution, looped);
            return;
        }

        let window = wrapped_window(start, end, points.len());
        log::trace!("recomputing segment lengths at {window:?}");

        let strategy = SegmentLengthStrategy::for_point_count(points.len());
        for &index in &window {
            self.lengths[index] = strategy.segment_length(points, index, resolution);
        }
        self.window_recomputes += 1;
        self.segments_recomputed += window.len();
        self.refresh_total(points.len(), looped);
    }

    fn refresh_total(&mut self, point_count: usize, looped: bool) {
        self.total = drawable_raw_indices(point_count, looped)
            .map(|index| self.lengths[index])
            .sum();
    }
}
