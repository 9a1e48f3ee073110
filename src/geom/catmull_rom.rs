//! Uniform Catmull-Rom evaluation.

use super::core::Point3;

/// Evaluates the uniform Catmull-Rom span between `p1` and `p2` at `t`.
///
/// `p0` and `p3` only shape the tangents. `t` is not clamped; callers keep it
/// inside `[0, 1]`. At `t = 0` the result is `p1` and at `t = 1` it is `p2`.
#[must_use]
pub fn catmull_rom_point(t: f64, p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Point3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let axis = |a: f64, b: f64, c: f64, d: f64| {
        0.5 * ((2.0 * b)
            + (-a + c) * t
            + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
            + (-a + 3.0 * b - 3.0 * c + d) * t3)
    };

    Point3::new(
        axis(p0.x, p1.x, p2.x, p3.x),
        axis(p0.y, p1.y, p2.y, p3.y),
        axis(p0.z, p1.z, p2.z, p3.z),
    )
}

/// The four control points of one span, ready for repeated evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatmullRomSegment {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CatmullRomSegment {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        catmull_rom_point(t, self.p0, self.p1, self.p2, self.p3)
    }

    /// Sampled vertices at `t = i / resolution` for `i = 0..=resolution`.
    pub fn sample_points(&self, resolution: usize) -> impl Iterator<Item = Point3> + '_ {
        sub_step_parameters(resolution).map(move |t| self.point_at(t))
    }

    /// Chord-length approximation of the span's arc length.
    #[must_use]
    pub fn chord_length(&self, resolution: usize) -> f64 {
        let mut previous = self.p1;
        let mut total = 0.0;
        for point in self.sample_points(resolution).skip(1) {
            total += previous.distance_to(point);
            previous = point;
        }
        total
    }
}

/// Parameters `i / resolution` for `i = 0..=resolution`.
///
/// Generated from an integer counter so every walk over a span visits the
/// exact same parameters and ends exactly on `1.0`. A resolution of zero is
/// treated as one.
#[allow(clippy::cast_precision_loss)]
pub fn sub_step_parameters(resolution: usize) -> impl Iterator<Item = f64> + Clone {
    let steps = resolution.max(1);
    let denom = steps as f64;
    (0..=steps).map(move |i| i as f64 / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> CatmullRomSegment {
        CatmullRomSegment::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn endpoints_are_interpolated() {
        let seg = square();
        assert_eq!(seg.point_at(0.0), seg.p1);
        assert_eq!(seg.point_at(1.0), seg.p2);
    }

    #[test]
    fn collinear_controls_give_straight_line() {
        let seg = CatmullRomSegment::new(
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        );
        let mid = seg.point_at(0.5);
        assert!((mid.x - 0.5).abs() < 1e-12);
        assert!(mid.y.abs() < 1e-12);
        assert!((seg.chord_length(7) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn square_span_bows_outward() {
        let seg = square();
        let mid = seg.point_at(0.5);
        assert!(mid.x > 1.0, "expected bulge past x = 1, got {mid:?}");
        assert!(seg.chord_length(10) > 1.0);
    }

    #[test]
    fn sub_steps_end_exactly_on_one() {
        let params: Vec<f64> = sub_step_parameters(3).collect();
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], 0.0);
        assert_eq!(params[3], 1.0);
        assert_eq!(sub_step_parameters(0).count(), 2);
    }

    #[test]
    fn chord_length_grows_with_resolution() {
        let seg = square();
        assert!(seg.chord_length(1) <= seg.chord_length(4));
        assert!(seg.chord_length(4) <= seg.chord_length(32) + 1e-12);
    }
}
