//! Per-segment arc-length rules, selected by point count.

use super::catmull_rom::CatmullRomSegment;
use super::core::Point3;
use super::topology::wrap_index;

/// How one cached segment length is computed for the current point count.
///
/// Re-selected with [`SegmentLengthStrategy::for_point_count`] whenever the
/// path is recomputed, so crossing a size threshold switches the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentLengthStrategy {
    /// No points; nothing is cached.
    Empty,
    /// One point; every length is zero.
    Single,
    /// Two points; every length is the straight distance between them.
    Straight,
    /// Three or more points; chord-length walk over the Catmull-Rom span.
    Spline,
}

impl SegmentLengthStrategy {
    #[must_use]
    pub const fn for_point_count(point_count: usize) -> Self {
        match point_count {
            0 => Self::Empty,
            1 => Self::Single,
            2 => Self::Straight,
            _ => Self::Spline,
        }
    }

    /// Length of the segment starting at raw index `index`.
    #[must_use]
    pub fn segment_length(self, points: &[Point3], index: usize, resolution: usize) -> f64 {
        match self {
            Self::Empty | Self::Single => 0.0,
            Self::Straight => points[0].distance_to(points[1]),
            Self::Spline => spline_segment(points, index).chord_length(resolution),
        }
    }
}

/// Control points of the span that starts at raw index `index`.
///
/// Neighbours are looked up with wrapping, so this is valid for every raw
/// index of a path with at least one point.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn spline_segment(points: &[Point3], index: usize) -> CatmullRomSegment {
    let len = points.len();
    let i = index as isize;
    CatmullRomSegment::new(
        points[wrap_index(i - 1, len)],
        points[wrap_index(i, len)],
        points[wrap_index(i + 1, len)],
        points[wrap_index(i + 2, len)],
    )
}
