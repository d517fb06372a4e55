//! Geometry types for spatial indexing.
//!
//! This module provides the shapes that can be stored in and queried against
//! an [`RTree`](crate::RTree):
//! - [`Cuboid`]: axis-aligned box, also the bounding volume of every node
//! - [`Point`]: a single location, bounded by a degenerate cuboid
//! - [`Sphere`]: a centre plus a radius, bounded by its enclosing cube
//!
//! Every shape implements [`Geometry`], which is all the tree needs to know
//! about a stored value's location.

mod cuboid;
mod point;
mod sphere;

use std::fmt::Debug;

pub use cuboid::Cuboid;
pub use point::Point;
pub use sphere::Sphere;

/// A shape that can be indexed by the tree.
///
/// The trait is object safe; search predicates receive a `&dyn Geometry`
/// for both node bounding volumes and entry geometries.
pub trait Geometry: Debug + Send + Sync {
    /// Returns the minimum bounding cuboid of this geometry.
    fn mbc(&self) -> Cuboid;

    /// Returns the minimum distance from this geometry to `cuboid`, 0 if
    /// they intersect.
    fn distance(&self, cuboid: &Cuboid) -> f64;

    /// Checks if this geometry intersects `cuboid`.
    fn intersects(&self, cuboid: &Cuboid) -> bool;

    /// Checks if this geometry touches or overlaps `sphere`.
    ///
    /// The default tests the sphere against [`mbc`](Geometry::mbc), which is
    /// exact for cuboids.
    fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        sphere.intersects(&self.mbc())
    }
}

/// Short constructors for the built-in shapes.
pub mod geometries {
    use super::{Cuboid, Point, Sphere};
    use crate::errors::SpatialResult;

    /// Creates a point.
    pub fn point(x: f64, y: f64, z: f64) -> Point {
        Point::new(x, y, z)
    }

    /// Creates a cuboid, see [`Cuboid::new`].
    pub fn cuboid(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> SpatialResult<Cuboid> {
        Cuboid::new(x1, y1, z1, x2, y2, z2)
    }

    /// Creates a sphere, see [`Sphere::new`].
    pub fn sphere(x: f64, y: f64, z: f64, radius: f64) -> SpatialResult<Sphere> {
        Sphere::new(x, y, z, radius)
    }
}
