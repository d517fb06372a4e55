//! Child selection during insertion.

use std::fmt::Debug;

use crate::functions::{overlap_increase, volume_increase};
use crate::geometry::Cuboid;

/// Decides which child of an internal node an insertion descends into.
///
/// Implementations must be pure functions of their arguments. `children`
/// holds the bounding cuboids of the candidate children and is never empty.
/// The returned value is a position in `children`.
pub trait Selector: Debug + Send + Sync {
    fn select(&self, mbc: &Cuboid, children: &[Cuboid]) -> usize;
}

/// Picks the child whose volume grows least, then the one with the smallest
/// resulting volume. Remaining ties go to the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalAreaIncreaseSelector;

impl Selector for MinimalAreaIncreaseSelector {
    fn select(&self, mbc: &Cuboid, children: &[Cuboid]) -> usize {
        debug_assert!(!children.is_empty());
        let mut best = 0;
        let mut best_cost = (f64::INFINITY, f64::INFINITY);
        for (index, child) in children.iter().enumerate() {
            let cost = area_cost(mbc, child);
            if cost < best_cost {
                best = index;
                best_cost = cost;
            }
        }
        best
    }
}

/// Picks the child whose overlap with its siblings grows least once it is
/// enlarged to include the new geometry. Ties fall back to the
/// [`MinimalAreaIncreaseSelector`] criteria.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalOverlapIncreaseSelector;

impl Selector for MinimalOverlapIncreaseSelector {
    fn select(&self, mbc: &Cuboid, children: &[Cuboid]) -> usize {
        debug_assert!(!children.is_empty());
        let mut best = 0;
        let mut best_cost = (f64::INFINITY, f64::INFINITY, f64::INFINITY);
        for (index, child) in children.iter().enumerate() {
            let (increase, volume) = area_cost(mbc, child);
            let cost = (overlap_increase(index, mbc, children), increase, volume);
            if cost < best_cost {
                best = index;
                best_cost = cost;
            }
        }
        best
    }
}

// (volume increase, resulting volume)
fn area_cost(mbc: &Cuboid, child: &Cuboid) -> (f64, f64) {
    (volume_increase(child, mbc), child.union(mbc).volume())
}
