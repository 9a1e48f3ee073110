//! Catmull-Rom spline path with an incrementally maintained length cache.
//!
//! A [`Path`] owns an ordered list of local-space control points. Each point
//! mutation recomputes only the cached segment lengths whose control window
//! contains the mutated point, so `length()` and `segment_length()` are always
//! current when a mutation returns. Changing the resolution or loop flag
//! recomputes everything.
//!
//! Sampling by distance lives in [`sampling`](super::sampling); resolution
//! heuristics live in [`optimize`](super::optimize).

use serde::{Deserialize, Serialize};

use super::cache::{LengthCacheStats, SegmentLengthCache};
use super::core::{BBox, Point3};
use super::frame::{CoordinateFrame, LocalFrame};
use super::topology::{raw_segment_index, segment_count, segment_shift};

/// Smallest accepted resolution.
pub const MIN_RESOLUTION: usize = 1;
/// Largest accepted resolution.
pub const MAX_RESOLUTION: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("segment {segment} is out of range (path has {segment_count} drawable segments)")]
    InvalidSegment { segment: usize, segment_count: usize },
    #[error("path has no points")]
    EmptyPath,
    #[error("coordinate transform is not invertible")]
    SingularTransform,
}

/// Options controlling how a path is walked.
///
/// # Example
///
/// ```
/// use spline_path::geom::PathOptions;
///
/// let options = PathOptions::default().with_resolution(12).with_looped(true);
/// assert_eq!(options.resolution, 12);
/// assert!(options.looped);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOptions {
    /// Sub-steps per segment, clamped to `1..=100` when applied.
    pub resolution: usize,
    /// Connect the last point back to the first.
    pub looped: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self::new(MIN_RESOLUTION, false)
    }
}

impl PathOptions {
    #[must_use]
    pub const fn new(resolution: usize, looped: bool) -> Self {
        Self { resolution, looped }
    }

    #[must_use]
    pub const fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub const fn with_looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }
}

/// Clamps a requested resolution into `MIN_RESOLUTION..=MAX_RESOLUTION`.
#[must_use]
pub const fn clamp_resolution(resolution: usize) -> usize {
    if resolution < MIN_RESOLUTION {
        MIN_RESOLUTION
    } else if resolution > MAX_RESOLUTION {
        MAX_RESOLUTION
    } else {
        resolution
    }
}

/// Ordered control points of a uniform Catmull-Rom path.
///
/// Points are stored in the local space of `frame`. Every operation taking a
/// `global` flag converts through the frame when the flag is set.
#[derive(Debug, Clone)]
pub struct Path<F = LocalFrame> {
    frame: F,
    pub(super) points: Vec<Point3>,
    pub(super) cache: SegmentLengthCache,
    resolution: usize,
    looped: bool,
}

impl Default for Path<LocalFrame> {
    fn default() -> Self {
        Self::new(LocalFrame::identity())
    }
}

impl Path<LocalFrame> {
    /// Empty path whose local origin sits at `pivot` in world space.
    #[must_use]
    pub fn at_pivot(pivot: Point3) -> Self {
        Self::new(LocalFrame::at_pivot(pivot))
    }
}

impl<F: CoordinateFrame> Path<F> {
    #[must_use]
    pub fn new(frame: F) -> Self {
        Self::with_options(frame, PathOptions::default())
    }

    #[must_use]
    pub fn with_options(frame: F, options: PathOptions) -> Self {
        Self {
            frame,
            points: Vec::new(),
            cache: SegmentLengthCache::new(),
            resolution: clamp_resolution(options.resolution),
            looped: options.looped,
        }
    }

    /// Builds a path from initial points with a single full recompute.
    ///
    /// `global` marks `points` as world-space positions.
    pub fn from_points(frame: F, global: bool, points: impl IntoIterator<Item = Point3>) -> Self {
        Self::from_points_with_options(frame, PathOptions::default(), global, points)
    }

    pub fn from_points_with_options(
        frame: F,
        options: PathOptions,
        global: bool,
        points: impl IntoIterator<Item = Point3>,
    ) -> Self {
        let mut path = Self::with_options(frame, options);
        for point in points {
            let local = path.input_space(point, global);
            path.points.push(local);
            path.cache.push_slot();
        }
        path.recompute_all();
        path
    }

    // ─────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────

    pub const fn frame(&self) -> &F {
        &self.frame
    }

    /// Replaces the coordinate frame. Local points and lengths are kept.
    pub fn set_frame(&mut self, frame: F) {
        self.frame = frame;
    }

    #[must_use]
    pub const fn options(&self) -> PathOptions {
        PathOptions::new(self.resolution, self.looped)
    }

    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Sets the resolution (clamped to `1..=100`) and recomputes every length.
    pub fn set_resolution(&mut self, resolution: usize) {
        let clamped = clamp_resolution(resolution);
        if clamped != self.resolution {
            log::debug!("path resolution {} -> {clamped}", self.resolution);
        }
        self.resolution = clamped;
        self.recompute_all();
    }

    #[must_use]
    pub const fn looped(&self) -> bool {
        self.looped
    }

    /// Sets the loop flag and recomputes every length.
    pub fn set_looped(&mut self, looped: bool) {
        if looped != self.looped {
            log::debug!("path looped {} -> {looped}", self.looped);
        }
        self.looped = looped;
        self.recompute_all();
    }

    /// Total length of the drawable segments.
    #[must_use]
    pub const fn length(&self) -> f64 {
        self.cache.total()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of drawable segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        segment_count(self.points.len(), self.looped)
    }

    /// Control points in local space.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Raw cached lengths, one per point, including tangent-only entries.
    #[must_use]
    pub fn raw_segment_lengths(&self) -> &[f64] {
        self.cache.lengths()
    }

    #[must_use]
    pub fn cache_stats(&self) -> LengthCacheStats {
        self.cache.stats()
    }

    pub fn reset_cache_stats(&mut self) {
        self.cache.reset_stats();
    }

    /// Length of drawable segment `segment`.
    ///
    /// # Errors
    /// Returns [`PathError::InvalidSegment`] if `segment` is not drawable for
    /// the current point count and loop flag.
    pub fn segment_length(&self, segment: usize) -> Result<f64, PathError> {
        let raw = self.raw_index(segment)?;
        Ok(self.cache.lengths()[raw])
    }

    pub(super) fn raw_index(&self, segment: usize) -> Result<usize, PathError> {
        raw_segment_index(segment, self.points.len(), self.looped).ok_or(
            PathError::InvalidSegment {
                segment,
                segment_count: self.segment_count(),
            },
        )
    }

    pub(super) fn shift(&self) -> usize {
        segment_shift(self.points.len(), self.looped)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Point access
    // ─────────────────────────────────────────────────────────────────────

    /// Control point `index`, in world space when `global` is set.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn point(&self, index: usize, global: bool) -> Point3 {
        let len = self.points.len();
        assert!(index < len, "point index {index} out of bounds for path with {len} points");
        self.output_space(self.points[index], global)
    }

    #[must_use]
    pub fn contains_point(&self, point: Point3, global: bool) -> bool {
        self.index_of_point(point, global).is_some()
    }

    /// Index of the first control point exactly equal to `point`.
    #[must_use]
    pub fn index_of_point(&self, point: Point3, global: bool) -> Option<usize> {
        let local = self.input_space(point, global);
        self.points.iter().position(|p| *p == local)
    }

    /// Axis-aligned bounds of the control points.
    #[must_use]
    pub fn bounds(&self, global: bool) -> Option<BBox> {
        BBox::from_points(self.points.iter().map(|p| self.output_space(*p, global)))
    }

    /// Local-space position for a new point placed after `index`.
    ///
    /// A one-point path suggests the point itself, an interior index suggests
    /// the midpoint to the next point, and the last point extrapolates the
    /// final span. Returns `None` if `index` is out of bounds.
    #[must_use]
    pub fn suggest_point_after(&self, index: usize) -> Option<Point3> {
        let current = *self.points.get(index)?;
        if self.points.len() == 1 {
            return Some(current);
        }
        if let Some(next) = self.points.get(index + 1) {
            return Some(current.lerp(*next, 0.5));
        }
        let previous = self.points[index - 1];
        Some(current + (current - previous))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_point(&mut self, point: Point3, global: bool) {
        let local = self.input_space(point, global);
        self.points.push(local);
        self.cache.push_slot();

        let last = self.signed_len();
        self.recompute_window(last - 3, last);
    }

    /// Inserts `point` before `index`; `index == point_count()` appends.
    ///
    /// # Panics
    /// Panics if `index > point_count()`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn insert_point(&mut self, index: usize, point: Point3, global: bool) {
        let len = self.points.len();
        assert!(index <= len, "insert index {index} out of bounds for path with {len} points");
        let local = self.input_space(point, global);
        self.points.insert(index, local);
        self.cache.insert_slot(index);

        let i = index as isize;
        self.recompute_window(i - 2, i + 1);
    }

    /// Removes and returns the point at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[allow(clippy::cast_possible_wrap)]
    pub fn remove_point_at(&mut self, index: usize) -> Point3 {
        let len = self.points.len();
        assert!(index < len, "remove index {index} out of bounds for path with {len} points");
        let removed = self.points.remove(index);
        self.cache.remove_slot(index);

        if self.points.is_empty() {
            self.cache.clear();
            return removed;
        }

        let i = index as isize;
        self.recompute_window(i - 2, i);
        removed
    }

    /// Removes the first control point exactly equal to `point`.
    pub fn remove_point(&mut self, point: Point3, global: bool) -> bool {
        match self.index_of_point(point, global) {
            Some(index) => {
                self.remove_point_at(index);
                true
            }
            None => false,
        }
    }

    /// Moves the point at `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[allow(clippy::cast_possible_wrap)]
    pub fn set_point(&mut self, index: usize, point: Point3, global: bool) {
        let len = self.points.len();
        assert!(index < len, "point index {index} out of bounds for path with {len} points");
        self.points[index] = self.input_space(point, global);

        let i = index as isize;
        self.recompute_window(i - 2, i + 1);
    }

    pub fn clear_points(&mut self) {
        self.points.clear();
        self.cache.clear();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────

    pub(super) fn input_space(&self, point: Point3, global: bool) -> Point3 {
        if global { self.frame.to_local(point) } else { point }
    }

    pub(super) fn output_space(&self, point: Point3, global: bool) -> Point3 {
        if global { self.frame.to_world(point) } else { point }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn signed_len(&self) -> isize {
        self.points.len() as isize
    }

    fn recompute_all(&mut self) {
        self.cache
            .recompute_all(&self.points, self.resolution, self.looped);
    }

    fn recompute_window(&mut self, start: isize, end: isize) {
        self.cache
            .recompute_window(&self.points, self.resolution, self.looped, start, end);
    }
}
