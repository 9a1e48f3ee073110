use approx::{assert_abs_diff_eq, assert_relative_eq};
use spline_path::geom::{
    AngleOptimizerOptions, LocalFrame, Path, PathError, PathOptions, Point3, Tolerance, Vec3,
    max_turn_angle_at,
};

fn square_open(resolution: usize) -> Path {
    Path::from_points_with_options(
        LocalFrame::identity(),
        PathOptions::new(resolution, false),
        false,
        [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
    )
}

fn helix(count: u32, looped: bool) -> Path {
    let points = (0..count).map(|i| {
        let angle = f64::from(i) * 0.8;
        Point3::new(angle.cos() * 3.0, angle.sin() * 3.0, f64::from(i) * 0.5)
    });
    Path::from_points_with_options(
        LocalFrame::at_pivot(Point3::new(-5.0, 2.0, 0.0)),
        PathOptions::new(10, looped),
        false,
        points,
    )
}

#[test]
fn four_point_square_bows_outward() {
    let path = square_open(10);
    assert_eq!(path.segment_count(), 1);

    let straight = Point3::new(1.0, 0.0, 0.0).distance_to(Point3::new(1.0, 1.0, 0.0));
    let segment = path.segment_length(0).expect("one drawable segment");
    assert!(segment > straight);
    assert_abs_diff_eq!(path.length(), segment);

    let mid = path
        .position_at_segment_distance(0, 0.5, true, false)
        .expect("segment 0");
    assert!(mid.y > 0.0 && mid.y < 1.0);
    assert!(mid.x > 1.0, "curve should bulge outward, got {mid:?}");
}

#[test]
fn two_point_path_is_linear() {
    let mut path: Path = Path::default();
    path.add_point(Point3::new(0.0, 0.0, 0.0), false);
    path.add_point(Point3::new(2.0, 0.0, 0.0), false);

    assert_eq!(path.length(), 2.0);
    assert_eq!(
        path.position_at_distance(0.25, true, false),
        Ok(Point3::new(0.5, 0.0, 0.0))
    );
    for step in 0..=8 {
        let fraction = f64::from(step) / 8.0;
        let p = path.position_at_distance(fraction, true, false).expect("two points");
        assert_abs_diff_eq!(p.x, fraction * 2.0, epsilon = 1e-12);
        assert_eq!(p.y, 0.0);
    }
}

#[test]
fn one_point_path_returns_the_point() {
    let mut path = Path::at_pivot(Point3::new(1.0, 1.0, 1.0));
    path.add_point(Point3::new(2.0, 0.0, 0.0), false);
    for distance in [-1.0, 0.0, 0.5, 1.0, 99.0] {
        assert_eq!(
            path.position_at_distance(distance, true, true),
            Ok(Point3::new(3.0, 1.0, 1.0))
        );
    }
    assert_eq!(path.length(), 0.0);
}

#[test]
fn endpoints_are_exact_on_every_segment() {
    for looped in [false, true] {
        let path = helix(9, looped);
        for segment in 0..path.segment_count() {
            let length = path.segment_length(segment).expect("drawable");
            let start = path
                .position_at_segment_distance(segment, 0.0, false, false)
                .expect("drawable");
            let end = path
                .position_at_segment_distance(segment, length, false, false)
                .expect("drawable");

            let raw = if looped { segment } else { segment + 1 };
            assert_eq!(start, path.points()[raw]);
            assert_eq!(end, path.points()[(raw + 1) % path.point_count()]);
        }
    }
}

#[test]
fn cache_stays_consistent_through_edits() {
    let mut path = helix(12, false);
    let check = |path: &Path| {
        let sum: f64 = (0..path.segment_count())
            .map(|s| path.segment_length(s).expect("drawable"))
            .sum();
        assert_relative_eq!(path.length(), sum, max_relative = 1e-12);
    };

    check(&path);
    path.insert_point(4, Point3::new(0.0, 0.0, 9.0), true);
    check(&path);
    path.set_point(0, Point3::new(1.0, 1.0, 1.0), false);
    check(&path);
    path.remove_point_at(7);
    check(&path);
    path.set_looped(true);
    check(&path);
    path.set_resolution(3);
    check(&path);
    path.add_point(Point3::new(-3.0, 0.0, 2.0), true);
    check(&path);
    while path.point_count() > 0 {
        path.remove_point_at(path.point_count() / 2);
        check(&path);
    }
    assert_eq!(path.length(), 0.0);
}

#[test]
fn normalized_sweep_ends_at_length() {
    let path = helix(10, false);
    let mut walked = 0.0;
    let mut previous = path.position_at_distance(0.0, true, false).expect("non-empty");
    for step in 1..=1000 {
        let next = path
            .position_at_distance(f64::from(step) / 1000.0, true, false)
            .expect("non-empty");
        walked += previous.distance_to(next);
        previous = next;
    }
    assert_relative_eq!(walked, path.length(), max_relative = 1e-3);
    assert!(walked <= path.length() + 1e-9);
}

#[test]
fn looped_path_has_no_gap_at_seam() {
    let path = helix(6, true);
    let last = path.segment_count() - 1;
    assert!(path.segment_length(last).is_ok());
    assert!(path.segment_length(0).is_ok());
    assert_eq!(
        path.segment_length(last + 1),
        Err(PathError::InvalidSegment { segment: last + 1, segment_count: 6 })
    );

    let before = path
        .position_at_segment_distance(last, 0.999, true, true)
        .expect("seam segment");
    let after = path
        .position_at_segment_distance(0, 0.001, true, true)
        .expect("segment 0");
    let seam = path.point(0, true);
    assert!(before.distance_to(seam) < 0.05);
    assert!(after.distance_to(seam) < 0.05);

    let incoming: Vec3 = seam - before;
    let outgoing: Vec3 = after - seam;
    // The seam turns no more than the sharpest sampled turn elsewhere.
    assert!(incoming.angle_degrees(outgoing) <= path.max_turn_angle() + 1e-6);
}

#[test]
fn angle_optimizer_converges_or_saturates() {
    let mut path = helix(8, true);
    let options = AngleOptimizerOptions::default();
    let outcome = path.optimize_by_angle_with(options);

    assert!((3..=100).contains(&path.resolution()));
    if outcome.converged {
        let worst = max_turn_angle_at(path.points(), true, path.resolution());
        assert!(worst <= options.max_angle_degrees);
    } else {
        assert_eq!(path.resolution(), 100);
    }
}

#[test]
fn global_points_survive_frame_changes() {
    let mut path = helix(5, false);
    let world_before = path.point(2, true);
    path.set_frame(LocalFrame::at_pivot(Point3::ORIGIN));
    let world_after = path.point(2, true);
    assert!(!Tolerance::default_geom().approx_eq_point3(world_before, world_after));
    assert_eq!(world_after, path.points()[2]);
}
