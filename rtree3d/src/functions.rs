//! Cost functions shared by the built-in selectors and splitters.
//!
//! All functions are pure and work on plain bounding cuboids, so custom
//! [`Selector`](crate::Selector) and [`Splitter`](crate::Splitter)
//! implementations can reuse them.

use crate::geometry::Cuboid;

/// Returns how much the volume of `mbc` grows when it is enlarged to
/// include `r`.
pub fn volume_increase(mbc: &Cuboid, r: &Cuboid) -> f64 {
    mbc.union(r).volume() - mbc.volume()
}

/// Returns the total volume shared between `siblings[index]` enlarged by `r`
/// and every other sibling.
///
/// Siblings are compared by position, so identical cuboids at different
/// positions still count against each other.
pub fn overlap_volume(index: usize, r: &Cuboid, siblings: &[Cuboid]) -> f64 {
    let enlarged = siblings[index].union(r);
    sum_overlap(index, &enlarged, siblings)
}

/// Returns how much [`overlap_volume`] grows compared to the overlap
/// `siblings[index]` already has before being enlarged.
pub fn overlap_increase(index: usize, r: &Cuboid, siblings: &[Cuboid]) -> f64 {
    overlap_volume(index, r, siblings) - sum_overlap(index, &siblings[index], siblings)
}

/// Returns the volume wasted by covering `a` and `b` with one cuboid.
///
/// Can be negative when the two overlap.
pub fn waste(a: &Cuboid, b: &Cuboid) -> f64 {
    a.union(b).volume() - a.volume() - b.volume()
}

/// Returns the bounding cuboid of the selected positions of `mbcs`.
///
/// `indices` must not be empty.
pub fn group_mbc(mbcs: &[Cuboid], indices: &[usize]) -> Cuboid {
    debug_assert!(!indices.is_empty());
    let first = mbcs[indices[0]];
    indices[1..]
        .iter()
        .fold(first, |acc, &i| acc.union(&mbcs[i]))
}

fn sum_overlap(index: usize, cuboid: &Cuboid, siblings: &[Cuboid]) -> f64 {
    siblings
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, other)| cuboid.intersection_volume(other))
        .sum()
}
