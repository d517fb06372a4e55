use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::errors::{SpatialError, SpatialResult};
use crate::geometry::Geometry;

/// An axis-aligned cuboid in 3D space, represented by its minimum corner
/// `(x1, y1, z1)` and maximum corner `(x2, y2, z2)`.
///
/// `Cuboid` is both a geometry that can be stored in the tree and the
/// bounding volume (MBC) that every node caches. A cuboid can only be built
/// through [`Cuboid::new`], which rejects any axis whose minimum exceeds its
/// maximum, so every value of this type is well formed.
///
/// # Examples
///
/// ```rust
/// use rtree3d::Cuboid;
///
/// let a = Cuboid::new(0.0, 0.0, 0.0, 2.0, 2.0, 2.0).unwrap();
/// let b = Cuboid::new(1.0, 1.0, 1.0, 3.0, 3.0, 3.0).unwrap();
///
/// assert!(a.intersects(&b));
/// assert_eq!(a.intersection_volume(&b), 1.0);
/// assert_eq!(a.union(&b).volume(), 27.0);
/// assert!(Cuboid::new(2.0, 0.0, 0.0, 1.0, 1.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "CuboidRepr")]
pub struct Cuboid {
    x1: f64,
    y1: f64,
    z1: f64,
    x2: f64,
    y2: f64,
    z2: f64,
}

/// Unchecked wire shape, validated through `Cuboid::new` on deserialization.
#[derive(Deserialize)]
struct CuboidRepr {
    x1: f64,
    y1: f64,
    z1: f64,
    x2: f64,
    y2: f64,
    z2: f64,
}

impl TryFrom<CuboidRepr> for Cuboid {
    type Error = SpatialError;

    fn try_from(r: CuboidRepr) -> Result<Self, Self::Error> {
        Cuboid::new(r.x1, r.y1, r.z1, r.x2, r.y2, r.z2)
    }
}

impl Cuboid {
    /// Creates a new cuboid from its minimum and maximum corners.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] if `x1 > x2`, `y1 > y2` or
    /// `z1 > z2`, or if any coordinate is NaN.
    pub fn new(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> SpatialResult<Cuboid> {
        check_axis("x", x1, x2)?;
        check_axis("y", y1, y2)?;
        check_axis("z", z1, z2)?;
        Ok(Cuboid {
            x1,
            y1,
            z1,
            x2,
            y2,
            z2,
        })
    }

    /// Creates the degenerate cuboid occupying a single point.
    pub(crate) fn from_point(x: f64, y: f64, z: f64) -> Cuboid {
        Cuboid {
            x1: x,
            y1: y,
            z1: z,
            x2: x,
            y2: y,
            z2: z,
        }
    }

    /// Creates a cuboid from bounds the caller already knows to be ordered.
    pub(crate) fn from_bounds(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Cuboid {
        debug_assert!(x1 <= x2 && y1 <= y2 && z1 <= z2);
        Cuboid {
            x1,
            y1,
            z1,
            x2,
            y2,
            z2,
        }
    }

    /// Returns the minimum bounding cuboid of all the given cuboids, or `None`
    /// if the sequence is empty.
    pub fn mbc_of<'a, I>(cuboids: I) -> Option<Cuboid>
    where
        I: IntoIterator<Item = &'a Cuboid>,
    {
        let mut iter = cuboids.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, c| acc.union(c)))
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn z1(&self) -> f64 {
        self.z1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    pub fn z2(&self) -> f64 {
        self.z2
    }

    /// Returns the lower bound on the given axis (0 = x, 1 = y, 2 = z).
    pub(crate) fn min_on(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x1,
            1 => self.y1,
            _ => self.z1,
        }
    }

    /// Returns the upper bound on the given axis (0 = x, 1 = y, 2 = z).
    pub(crate) fn max_on(&self, axis: usize) -> f64 {
        match axis {
            0 => self.x2,
            1 => self.y2,
            _ => self.z2,
        }
    }

    /// Returns the volume of the cuboid.
    pub fn volume(&self) -> f64 {
        (self.x2 - self.x1) * (self.y2 - self.y1) * (self.z2 - self.z1)
    }

    /// Returns the total area of the six faces. Used as the margin measure by
    /// the R*-style splitter.
    pub fn surface_area(&self) -> f64 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let dz = self.z2 - self.z1;
        2.0 * (dx * dy + dy * dz + dz * dx)
    }

    /// Returns the center point of the cuboid.
    pub fn center(&self) -> (f64, f64, f64) {
        (
            (self.x1 + self.x2) / 2.0,
            (self.y1 + self.y2) / 2.0,
            (self.z1 + self.z2) / 2.0,
        )
    }

    /// Returns the smallest cuboid containing both `self` and `other`.
    pub fn union(&self, other: &Cuboid) -> Cuboid {
        Cuboid {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            z1: self.z1.min(other.z1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
            z2: self.z2.max(other.z2),
        }
    }

    /// Checks if this cuboid intersects another. Touching faces, edges or
    /// corners count as an intersection.
    pub fn intersects(&self, other: &Cuboid) -> bool {
        self.x1 <= other.x2
            && self.x2 >= other.x1
            && self.y1 <= other.y2
            && self.y2 >= other.y1
            && self.z1 <= other.z2
            && self.z2 >= other.z1
    }

    /// Returns the volume shared by the two cuboids, 0 if they are disjoint.
    pub fn intersection_volume(&self, other: &Cuboid) -> f64 {
        if !self.intersects(other) {
            return 0.0;
        }
        let dx = self.x2.min(other.x2) - self.x1.max(other.x1);
        let dy = self.y2.min(other.y2) - self.y1.max(other.y1);
        let dz = self.z2.min(other.z2) - self.z1.max(other.z1);
        dx * dy * dz
    }

    /// Returns the minimum Euclidean distance between the two cuboids.
    ///
    /// The gap along each axis is clamped at zero and the three gaps are
    /// combined, so the result is 0 exactly when the cuboids intersect and is
    /// symmetric in its arguments.
    pub fn distance(&self, other: &Cuboid) -> f64 {
        let dx = axis_gap(self.x1, self.x2, other.x1, other.x2);
        let dy = axis_gap(self.y1, self.y2, other.y1, other.y2);
        let dz = axis_gap(self.z1, self.z2, other.z1, other.z2);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Checks if this cuboid contains the point, boundary included.
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2 && z >= self.z1 && z <= self.z2
    }

    /// Checks if this cuboid fully contains another one.
    pub fn contains_cuboid(&self, other: &Cuboid) -> bool {
        other.x1 >= self.x1
            && other.x2 <= self.x2
            && other.y1 >= self.y1
            && other.y2 <= self.y2
            && other.z1 >= self.z1
            && other.z2 <= self.z2
    }
}

fn check_axis(axis: &str, min: f64, max: f64) -> SpatialResult<()> {
    // written as a negation so that NaN is rejected too
    if !(min <= max) {
        return Err(SpatialError::invalid_argument(format!(
            "{axis}2 must not be less than {axis}1 (got {axis}1={min}, {axis}2={max})"
        )));
    }
    Ok(())
}

fn axis_gap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> f64 {
    (a_min.max(b_min) - a_max.min(b_max)).max(0.0)
}

impl Geometry for Cuboid {
    fn mbc(&self) -> Cuboid {
        *self
    }

    fn distance(&self, cuboid: &Cuboid) -> f64 {
        Cuboid::distance(self, cuboid)
    }

    fn intersects(&self, cuboid: &Cuboid) -> bool {
        Cuboid::intersects(self, cuboid)
    }
}

impl Eq for Cuboid {}

impl Hash for Cuboid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x1.to_bits().hash(state);
        self.y1.to_bits().hash(state);
        self.z1.to_bits().hash(state);
        self.x2.to_bits().hash(state);
        self.y2.to_bits().hash(state);
        self.z2.to_bits().hash(state);
    }
}

impl Display for Cuboid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cuboid({}, {}, {}, {}, {}, {})",
            self.x1, self.y1, self.z1, self.x2, self.y2, self.z2
        )
    }
}
