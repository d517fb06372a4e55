use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::{SpatialError, SpatialResult};
use crate::geometry::{Cuboid, Geometry, Sphere};

/// A 3D point geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
    z: f64,
}

impl Point {
    /// Creates a new point at the given coordinates.
    ///
    /// Coordinates are not checked. A NaN coordinate yields a point that
    /// intersects nothing; use [`Point::try_new`] to reject it instead.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Creates a new point, rejecting NaN coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] if any coordinate is NaN.
    pub fn try_new(x: f64, y: f64, z: f64) -> SpatialResult<Self> {
        if x.is_nan() || y.is_nan() || z.is_nan() {
            return Err(SpatialError::invalid_argument(format!(
                "point coordinates must not be NaN (got {x}, {y}, {z})"
            )));
        }
        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Calculates the Euclidean distance to another point.
    pub fn distance_to_point(&self, other: &Point) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Calculates the squared Euclidean distance to another point.
    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }
}

impl Geometry for Point {
    fn mbc(&self) -> Cuboid {
        Cuboid::from_point(self.x, self.y, self.z)
    }

    fn distance(&self, cuboid: &Cuboid) -> f64 {
        self.mbc().distance(cuboid)
    }

    fn intersects(&self, cuboid: &Cuboid) -> bool {
        cuboid.contains(self.x, self.y, self.z)
    }

    fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        sphere.intersects_point(self)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT({} {} {})", self.x, self.y, self.z)
    }
}
