//! Search predicates.
//!
//! A [`Condition`] is evaluated against the bounding cuboid of every node
//! the search considers and against the geometry of every entry in the
//! leaves it reaches. A subtree is skipped as soon as its bounding cuboid
//! fails the condition, so a condition must hold for a node's cuboid
//! whenever it holds for anything inside it.

use std::sync::Arc;

use crate::geometry::{Cuboid, Geometry, Point, Sphere};

/// Predicate guiding a search.
pub type Condition = Arc<dyn Fn(&dyn Geometry) -> bool + Send + Sync>;

/// Matches everything.
pub fn always() -> Condition {
    Arc::new(|_: &dyn Geometry| true)
}

/// Matches geometries intersecting `region`.
pub fn intersects(region: Cuboid) -> Condition {
    Arc::new(move |g: &dyn Geometry| g.intersects(&region))
}

/// Matches geometries containing the point.
pub fn intersects_point(point: Point) -> Condition {
    intersects(point.mbc())
}

/// Matches geometries touching or overlapping the sphere.
pub fn intersects_sphere(sphere: Sphere) -> Condition {
    Arc::new(move |g: &dyn Geometry| g.intersects_sphere(&sphere))
}

/// Matches geometries strictly closer than `max_distance` to `region`.
pub fn within_distance(region: Cuboid, max_distance: f64) -> Condition {
    Arc::new(move |g: &dyn Geometry| g.distance(&region) < max_distance)
}

/// Wraps a closure.
pub fn from_fn<F>(f: F) -> Condition
where
    F: Fn(&dyn Geometry) -> bool + Send + Sync + 'static,
{
    Arc::new(f)
}
