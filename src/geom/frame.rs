//! Local/world coordinate conversion for paths.
//!
//! A [`Path`](super::Path) stores its control points in local space. Whatever
//! owns the path supplies a [`CoordinateFrame`] that maps those points into
//! world space and back. [`LocalFrame`] is the stock implementation backed by
//! an affine [`Transform`] and its precomputed inverse.

use super::core::{Point3, Transform, Vec3};
use super::path::PathError;

/// Converts points between a path's local space and world space.
///
/// Implementations must be an inverse pair: `to_local(to_world(p))` is `p`
/// up to floating round-off.
pub trait CoordinateFrame {
    fn to_world(&self, point: Point3) -> Point3;
    fn to_local(&self, point: Point3) -> Point3;
}

/// Affine frame with a cached inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    transform: Transform,
    inverse: Transform,
}

impl LocalFrame {
    /// Builds a frame from `transform`.
    ///
    /// # Errors
    /// Returns [`PathError::SingularTransform`] if `transform` cannot be inverted.
    pub fn new(transform: Transform) -> Result<Self, PathError> {
        let inverse = transform.inverse().ok_or(PathError::SingularTransform)?;
        Ok(Self { transform, inverse })
    }

    #[must_use]
    pub const fn identity() -> Self {
        Self {
            transform: Transform::identity(),
            inverse: Transform::identity(),
        }
    }

    /// Pure translation frame with its origin at `pivot`.
    #[must_use]
    pub fn at_pivot(pivot: Point3) -> Self {
        let offset = pivot.to_vec3();
        Self {
            transform: Transform::translate(offset),
            inverse: Transform::translate(-offset),
        }
    }

    #[must_use]
    pub const fn transform(&self) -> Transform {
        self.transform
    }

    /// World-space position of the local origin.
    #[must_use]
    pub fn origin(&self) -> Point3 {
        Point3::ORIGIN.add_vec(self.transform.translation())
    }

    /// Moves the frame origin by `offset` in world space.
    #[must_use]
    pub fn translated(self, offset: Vec3) -> Self {
        Self {
            transform: Transform::translate(offset) * self.transform,
            inverse: self.inverse * Transform::translate(-offset),
        }
    }
}

impl Default for LocalFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl CoordinateFrame for LocalFrame {
    fn to_world(&self, point: Point3) -> Point3 {
        self.transform.apply_point(point)
    }

    fn to_local(&self, point: Point3) -> Point3 {
        self.inverse.apply_point(point)
    }
}

impl<F: CoordinateFrame + ?Sized> CoordinateFrame for &F {
    fn to_world(&self, point: Point3) -> Point3 {
        (**self).to_world(point)
    }

    fn to_local(&self, point: Point3) -> Point3 {
        (**self).to_local(point)
    }
}
