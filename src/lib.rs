#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Catmull-Rom spline paths with cached arc lengths.
//!
//! The [`geom`] module holds the path engine: control-point storage with an
//! incrementally maintained length cache, distance-to-position sampling, and
//! automatic resolution selection.
//!
//! ```
//! use spline_path::{Path, Point3};
//!
//! let mut path: Path = Path::default();
//! path.add_point(Point3::new(0.0, 0.0, 0.0), false);
//! path.add_point(Point3::new(2.0, 0.0, 0.0), false);
//!
//! assert_eq!(path.length(), 2.0);
//! let quarter = path.position_at_distance(0.25, true, false).unwrap();
//! assert_eq!(quarter, Point3::new(0.5, 0.0, 0.0));
//! ```

pub mod geom;

pub use geom::{
    AngleOptimization, AngleOptimizerOptions, CoordinateFrame, LocalFrame, Path, PathError,
    PathOptions, Point3, Vec3,
};
