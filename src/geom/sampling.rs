//! Distance-to-position queries and sampled polylines.
//!
//! Every walk here reuses the sub-step parameters of the length cache, so the
//! point reached at a segment's full cached length is that segment's end
//! point.

use super::catmull_rom::sub_step_parameters;
use super::core::{Point3, Tolerance, Vec3};
use super::frame::CoordinateFrame;
use super::metrics::{PathMetrics, TimingBucket};
use super::path::{Path, PathError};
use super::strategy::spline_segment;
use super::topology::{drawable_raw_indices, wrap_index};

impl<F: CoordinateFrame> Path<F> {
    /// Position at `distance` along drawable segment `segment`.
    ///
    /// With `normalized`, `distance` is a fraction of the segment length.
    /// The distance is clamped into the segment. A one-point path returns its
    /// point for any input.
    ///
    /// # Errors
    /// - [`PathError::EmptyPath`] if the path has no points.
    /// - [`PathError::InvalidSegment`] if `segment` is not drawable.
    pub fn position_at_segment_distance(
        &self,
        segment: usize,
        distance: f64,
        normalized: bool,
        global: bool,
    ) -> Result<Point3, PathError> {
        let local = match self.points.len() {
            0 => return Err(PathError::EmptyPath),
            1 => self.points[0],
            2 => self.straight_position(segment, distance, normalized)?,
            _ => self.spline_position(segment, distance, normalized)?,
        };
        Ok(self.output_space(local, global))
    }

    /// Position at `distance` along the whole path.
    ///
    /// With `normalized`, `distance` is a fraction of [`length`](Self::length).
    /// The distance is clamped into the path.
    ///
    /// # Errors
    /// Returns [`PathError::EmptyPath`] if the path has no points.
    pub fn position_at_distance(
        &self,
        distance: f64,
        normalized: bool,
        global: bool,
    ) -> Result<Point3, PathError> {
        match self.points.len() {
            0 => return Err(PathError::EmptyPath),
            1 => return Ok(self.output_space(self.points[0], global)),
            _ => {}
        }

        let total = self.length();
        let mut remaining = if normalized { distance * total } else { distance };
        remaining = clamp_distance(remaining, total);

        let count = self.segment_count();
        for segment in 0..count {
            let segment_length = self.segment_length(segment)?;
            if remaining <= segment_length {
                return self.position_at_segment_distance(segment, remaining, false, global);
            }
            remaining -= segment_length;
        }

        // Round-off ran past the final segment.
        let last = count.saturating_sub(1);
        let last_length = self.segment_length(last)?;
        self.position_at_segment_distance(last, last_length, false, global)
    }

    /// `count` positions evenly spaced by arc length from start to end.
    ///
    /// # Errors
    /// Returns [`PathError::EmptyPath`] if the path has no points.
    pub fn sample_evenly(&self, count: usize, global: bool) -> Result<Vec<Point3>, PathError> {
        if self.points.is_empty() {
            return Err(PathError::EmptyPath);
        }
        match count {
            0 => Ok(Vec::new()),
            1 => Ok(vec![self.position_at_distance(0.0, true, global)?]),
            _ => {
                #[allow(clippy::cast_precision_loss)]
                let denom = (count - 1) as f64;
                (0..count)
                    .map(|i| {
                        #[allow(clippy::cast_precision_loss)]
                        let fraction = i as f64 / denom;
                        self.position_at_distance(fraction, true, global)
                    })
                    .collect()
            }
        }
    }

    /// [`sample_evenly`](Self::sample_evenly) timed under [`TimingBucket::Sampling`].
    ///
    /// # Errors
    /// Returns [`PathError::EmptyPath`] if the path has no points.
    pub fn sample_evenly_with_metrics(
        &self,
        count: usize,
        global: bool,
        metrics: &mut PathMetrics,
    ) -> Result<Vec<Point3>, PathError> {
        metrics.time(TimingBucket::Sampling, || self.sample_evenly(count, global))
    }

    /// Sampled vertices of one drawable segment at the current resolution.
    ///
    /// # Errors
    /// - [`PathError::EmptyPath`] if the path has no points.
    /// - [`PathError::InvalidSegment`] if `segment` is not drawable.
    pub fn segment_polyline(&self, segment: usize, global: bool) -> Result<Vec<Point3>, PathError> {
        if self.points.is_empty() {
            return Err(PathError::EmptyPath);
        }
        let raw = self.raw_index(segment)?;
        let local: Vec<Point3> = if self.points.len() == 2 {
            let (start, end) = self.straight_endpoints(segment);
            vec![start, end]
        } else {
            spline_segment(&self.points, raw)
                .sample_points(self.resolution())
                .collect()
        };
        Ok(local
            .into_iter()
            .map(|p| self.output_space(p, global))
            .collect())
    }

    /// Sampled vertices of every drawable segment, joined end to start.
    ///
    /// A one-point path yields that point; an empty path yields nothing.
    #[must_use]
    pub fn polyline(&self, global: bool) -> Vec<Point3> {
        let mut local: Vec<Point3> = Vec::new();
        match self.points.len() {
            0 => {}
            1 => local.push(self.points[0]),
            2 => {
                for segment in 0..self.segment_count() {
                    let (start, end) = self.straight_endpoints(segment);
                    if local.is_empty() {
                        local.push(start);
                    }
                    local.push(end);
                }
            }
            n => {
                for raw in drawable_raw_indices(n, self.looped()) {
                    let skip = usize::from(!local.is_empty());
                    let span = spline_segment(&self.points, raw);
                    local.extend(span.sample_points(self.resolution()).skip(skip));
                }
            }
        }
        local
            .into_iter()
            .map(|p| self.output_space(p, global))
            .collect()
    }

    /// Largest angle in degrees between consecutive sampled directions at the
    /// current resolution.
    #[must_use]
    pub fn max_turn_angle(&self) -> f64 {
        max_turn_angle_at(&self.points, self.looped(), self.resolution())
    }

    fn straight_endpoints(&self, segment: usize) -> (Point3, Point3) {
        if segment == 0 {
            (self.points[0], self.points[1])
        } else {
            (self.points[1], self.points[0])
        }
    }

    fn straight_position(
        &self,
        segment: usize,
        distance: f64,
        normalized: bool,
    ) -> Result<Point3, PathError> {
        let segment_length = self.segment_length(segment)?;
        let distance = scaled_distance(distance, normalized, segment_length);
        let (start, end) = self.straight_endpoints(segment);
        let direction = (end - start).normalized_or_zero();
        Ok(start + direction * distance)
    }

    #[allow(clippy::float_cmp, clippy::cast_possible_wrap)]
    fn spline_position(
        &self,
        segment: usize,
        distance: f64,
        normalized: bool,
    ) -> Result<Point3, PathError> {
        let segment_length = self.segment_length(segment)?;
        let distance = scaled_distance(distance, normalized, segment_length);
        let raw = segment + self.shift();

        // Exact endpoints at the boundaries.
        if distance == 0.0 {
            return Ok(self.points[raw]);
        }
        if distance == segment_length {
            return Ok(self.points[wrap_index(raw as isize + 1, self.points.len())]);
        }

        let span = spline_segment(&self.points, raw);
        let mut previous = span.p1;
        let mut walked = 0.0;
        for t in sub_step_parameters(self.resolution()).skip(1) {
            let next = span.point_at(t);
            let step = previous.distance_to(next);
            if distance <= walked + step {
                let ratio = if step > 0.0 { (distance - walked) / step } else { 0.0 };
                return Ok(previous.lerp(next, ratio));
            }
            walked += step;
            previous = next;
        }
        Ok(span.point_at(1.0))
    }
}

fn scaled_distance(distance: f64, normalized: bool, segment_length: f64) -> f64 {
    let distance = if normalized { distance * segment_length } else { distance };
    clamp_distance(distance, segment_length)
}

/// Clamps `distance` into `0..=limit`.
///
/// A NaN `distance` becomes `0.0` and a NaN `limit` leaves the lower bound
/// only, so overflowed lengths never panic a query.
fn clamp_distance(distance: f64, limit: f64) -> f64 {
    distance.max(0.0).min(limit)
}

/// Largest turn between consecutive sub-step directions when `points` are
/// walked at `resolution`.
///
/// The directions are the edges of the polyline itself, sampled at spline
/// parameters `i / resolution`, not at even arc-length fractions, so the
/// angle measured is the one [`Path::polyline`] actually draws.
///
/// Zero-length sub-steps are skipped. Looped paths also compare the last
/// direction with the first one across the seam. Paths with fewer than three
/// points are straight and report `0.0`.
#[must_use]
pub fn max_turn_angle_at(points: &[Point3], looped: bool, resolution: usize) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let tol = Tolerance::ZERO_LENGTH;
    let mut first: Option<Vec3> = None;
    let mut previous: Option<Vec3> = None;
    let mut worst = 0.0_f64;

    for raw in drawable_raw_indices(points.len(), looped) {
        let span = spline_segment(points, raw);
        let mut last_point = span.p1;
        for point in span.sample_points(resolution).skip(1) {
            let direction = point - last_point;
            last_point = point;
            if tol.is_zero_length(direction.length()) {
                continue;
            }
            if let Some(prev) = previous {
                worst = worst.max(prev.angle_degrees(direction));
            }
            first.get_or_insert(direction);
            previous = Some(direction);
        }
    }

    if looped {
        if let (Some(last), Some(first)) = (previous, first) {
            worst = worst.max(last.angle_degrees(first));
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{LocalFrame, PathOptions};

    fn zigzag(resolution: usize, looped: bool) -> Path {
        Path::from_points_with_options(
            LocalFrame::identity(),
            PathOptions::new(resolution, looped),
            false,
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
                Point3::new(4.0, -1.0, 0.5),
                Point3::new(6.0, 1.0, 0.0),
                Point3::new(8.0, 0.0, -0.5),
                Point3::new(10.0, 2.0, 0.0),
            ],
        )
    }

    #[test]
    fn empty_path_queries_fail() {
        let path: Path = Path::default();
        assert_eq!(path.position_at_distance(0.5, true, false), Err(PathError::EmptyPath));
        assert_eq!(
            path.position_at_segment_distance(0, 0.0, false, false),
            Err(PathError::EmptyPath)
        );
        assert!(path.polyline(false).is_empty());
        assert!(path.sample_evenly(4, false).is_err());
    }

    #[test]
    fn single_point_answers_every_query() {
        let mut path: Path = Path::default();
        path.add_point(Point3::new(3.0, 3.0, 3.0), false);
        assert_eq!(path.position_at_distance(12.0, false, false), Ok(Point3::new(3.0, 3.0, 3.0)));
        assert_eq!(
            path.position_at_segment_distance(7, 0.5, true, false),
            Ok(Point3::new(3.0, 3.0, 3.0))
        );
        assert_eq!(path.polyline(false), vec![Point3::new(3.0, 3.0, 3.0)]);
    }

    #[test]
    fn straight_segment_reverses_for_nonzero_segment() {
        let mut path: Path = Path::default();
        path.add_point(Point3::new(0.0, 0.0, 0.0), false);
        path.add_point(Point3::new(4.0, 0.0, 0.0), false);
        path.set_looped(true);

        let forward = path.position_at_segment_distance(0, 1.0, false, false).unwrap();
        let backward = path.position_at_segment_distance(1, 1.0, false, false).unwrap();
        assert_eq!(forward, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(backward, Point3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn segment_endpoints_are_exact() {
        let path = zigzag(7, false);
        for segment in 0..path.segment_count() {
            let length = path.segment_length(segment).unwrap();
            let raw = segment + 1;
            let start = path.position_at_segment_distance(segment, 0.0, false, false).unwrap();
            let end = path.position_at_segment_distance(segment, length, false, false).unwrap();
            assert_eq!(start, path.points()[raw]);
            assert_eq!(end, path.points()[raw + 1]);
        }
    }

    #[test]
    fn distance_is_clamped() {
        let path = zigzag(5, false);
        let before = path.position_at_distance(-3.0, false, false).unwrap();
        let after = path.position_at_distance(path.length() * 2.0, false, false).unwrap();
        assert_eq!(before, path.points()[1]);
        assert!(Tolerance::LOOSE.approx_eq_point3(after, path.points()[4]));
    }

    #[test]
    fn segment_polyline_matches_resolution() {
        let path = zigzag(9, false);
        let vertices = path.segment_polyline(1, false).unwrap();
        assert_eq!(vertices.len(), 10);
        assert_eq!(vertices[0], path.points()[2]);

        let chord: f64 = vertices.windows(2).map(|w| w[0].distance_to(w[1])).sum();
        assert!((chord - path.segment_length(1).unwrap()).abs() < 1e-12);
        assert!(path.segment_polyline(3, false).is_err());
    }

    #[test]
    fn polyline_joins_segments() {
        let path = zigzag(4, false);
        let vertices = path.polyline(false);
        assert_eq!(vertices.len(), 3 * 4 + 1);
        let chord: f64 = vertices.windows(2).map(|w| w[0].distance_to(w[1])).sum();
        assert!((chord - path.length()).abs() < 1e-9);
    }

    #[test]
    fn straight_path_has_no_turn() {
        let path: Path = Path::from_points(
            LocalFrame::identity(),
            false,
            (0..5).map(|i| Point3::new(f64::from(i), 0.0, 0.0)),
        );
        assert!(path.max_turn_angle() < 1e-9);
    }

    #[test]
    fn finer_resolution_turns_less() {
        let coarse = zigzag(3, true).max_turn_angle();
        let fine = zigzag(40, true).max_turn_angle();
        assert!(fine < coarse, "fine {fine} should be below coarse {coarse}");
    }

    #[test]
    fn overflowed_lengths_do_not_panic_queries() {
        let path: Path = Path::from_points_with_options(
            LocalFrame::identity(),
            PathOptions::new(10, false),
            false,
            [
                Point3::new(-1e308, -1e308, 0.0),
                Point3::new(1e308, -1e308, 0.0),
                Point3::new(1e308, 1e308, 0.0),
                Point3::new(-1e308, 1e308, 0.0),
            ],
        );
        assert!(!path.length().is_finite());

        assert!(path.position_at_distance(0.5, true, false).is_ok());
        assert!(path.position_at_distance(1.0, false, false).is_ok());
        assert!(path.position_at_segment_distance(0, 0.25, true, false).is_ok());
        assert_eq!(path.sample_evenly(3, false).map(|s| s.len()), Ok(3));
    }

    #[test]
    fn nan_distance_is_treated_as_start() {
        let path = zigzag(6, false);
        assert_eq!(path.position_at_distance(f64::NAN, false, false), Ok(path.points()[1]));
        assert_eq!(
            path.position_at_segment_distance(2, f64::NAN, true, false),
            Ok(path.points()[3])
        );
    }

    #[test]
    fn two_point_polyline_walks_both_directions_when_looped() {
        let mut path: Path = Path::default();
        path.add_point(Point3::new(0.0, 0.0, 0.0), false);
        path.add_point(Point3::new(4.0, 0.0, 0.0), false);
        assert_eq!(
            path.polyline(false),
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0)]
        );

        path.set_looped(true);
        assert_eq!(
            path.polyline(false),
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn polyline_matches_segment_polylines() {
        let path = zigzag(5, true);
        let mut joined: Vec<Point3> = Vec::new();
        for segment in 0..path.segment_count() {
            let vertices = path.segment_polyline(segment, false).unwrap();
            let skip = usize::from(!joined.is_empty());
            joined.extend(vertices.into_iter().skip(skip));
        }
        assert_eq!(path.polyline(false), joined);
    }

    #[test]
    fn sample_evenly_spans_the_path() {
        let path = zigzag(12, false);
        let samples = path.sample_evenly(25, false).unwrap();
        assert_eq!(samples.len(), 25);
        assert_eq!(samples[0], path.points()[1]);
        assert!(Tolerance::LOOSE.approx_eq_point3(samples[24], path.points()[4]));

        let mut metrics = PathMetrics::default();
        metrics.begin();
        let timed = path.sample_evenly_with_metrics(25, false, &mut metrics).unwrap();
        assert_eq!(timed, samples);
    }
}
