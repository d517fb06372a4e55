use serde::{Deserialize, Serialize};

use crate::errors::{SpatialError, SpatialResult};
use crate::geometry::{Cuboid, Geometry, Point};

/// A sphere given by its centre and radius.
///
/// The bounding volume is the axis-aligned cube enclosing the sphere, while
/// `distance` and `intersects` are computed against the true sphere surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SphereRepr")]
pub struct Sphere {
    centre: Point,
    radius: f64,
}

#[derive(Deserialize)]
struct SphereRepr {
    centre: Point,
    radius: f64,
}

impl TryFrom<SphereRepr> for Sphere {
    type Error = SpatialError;

    fn try_from(r: SphereRepr) -> Result<Self, Self::Error> {
        Sphere::new(r.centre.x(), r.centre.y(), r.centre.z(), r.radius)
    }
}

impl Sphere {
    /// Creates a sphere centred at `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] if a centre coordinate is
    /// NaN or the radius is negative or NaN, since the enclosing cuboid would
    /// be malformed.
    pub fn new(x: f64, y: f64, z: f64, radius: f64) -> SpatialResult<Sphere> {
        let centre = Point::try_new(x, y, z)?;
        if !(radius >= 0.0) {
            return Err(SpatialError::invalid_argument(format!(
                "sphere radius must be non-negative (got {radius})"
            )));
        }
        Ok(Sphere { centre, radius })
    }

    pub fn centre(&self) -> &Point {
        &self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Checks if the two spheres touch or overlap.
    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        let total = self.radius + other.radius;
        self.centre.distance_squared(&other.centre) <= total * total
    }

    /// Checks if the point lies inside or on the sphere.
    pub fn intersects_point(&self, point: &Point) -> bool {
        self.centre.distance_to_point(point) <= self.radius
    }

    /// Returns the distance from the sphere surface to the point, 0 if the
    /// point is inside.
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        (self.centre.distance_to_point(point) - self.radius).max(0.0)
    }

    /// Returns the distance between the two sphere surfaces, 0 if they
    /// intersect.
    pub fn distance_to_sphere(&self, other: &Sphere) -> f64 {
        (self.centre.distance_to_point(&other.centre) - self.radius - other.radius).max(0.0)
    }
}

impl Geometry for Sphere {
    fn mbc(&self) -> Cuboid {
        let (x, y, z, r) = (self.centre.x(), self.centre.y(), self.centre.z(), self.radius);
        // radius is non-negative so every axis is ordered
        Cuboid::from_bounds(x - r, y - r, z - r, x + r, y + r, z + r)
    }

    fn distance(&self, cuboid: &Cuboid) -> f64 {
        (self.centre.distance(cuboid) - self.radius).max(0.0)
    }

    fn intersects(&self, cuboid: &Cuboid) -> bool {
        self.distance(cuboid) == 0.0
    }

    fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        Sphere::intersects_sphere(self, sphere)
    }
}
