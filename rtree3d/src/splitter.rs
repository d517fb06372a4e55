//! Node splitting on overflow.

use std::fmt::Debug;

use itertools::Itertools;

use crate::functions::{volume_increase, waste};
use crate::geometry::Cuboid;

/// A partition of an overflowing node's items into two groups, given as
/// positions in the slice handed to [`Splitter::split`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitGroups {
    pub first: Vec<usize>,
    pub second: Vec<usize>,
}

impl SplitGroups {
    /// Checks that the groups are a partition of `0..len` and that neither is
    /// smaller than `min_children`.
    pub fn is_valid(&self, len: usize, min_children: usize) -> bool {
        if self.first.len() < min_children
            || self.second.len() < min_children
            || self.first.len() + self.second.len() != len
        {
            return false;
        }
        let mut seen = vec![false; len];
        for &i in self.first.iter().chain(self.second.iter()) {
            if i >= len || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        true
    }
}

/// Partitions the items of an overflowing node into two groups.
///
/// `mbcs` holds the bounding cuboids of the node's entries or children,
/// `max_children + 1` of them. Both returned groups must hold at least
/// `min_children` positions. The tree does not re-check the result outside
/// of debug builds.
pub trait Splitter: Debug + Send + Sync {
    fn split(&self, mbcs: &[Cuboid], min_children: usize) -> SplitGroups;
}

/// Guttman's quadratic split.
///
/// Seeds the two groups with the pair wasting the most volume, then assigns
/// the item with the strongest preference next. Ties go to the group with
/// fewer members, then to the one with the smaller resulting volume, then to
/// the first group.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticSplitter;

impl Splitter for QuadraticSplitter {
    fn split(&self, mbcs: &[Cuboid], min_children: usize) -> SplitGroups {
        debug_assert!(mbcs.len() >= 2 && mbcs.len() >= 2 * min_children);

        let (seed1, seed2) = pick_seeds(mbcs);
        let mut first = vec![seed1];
        let mut second = vec![seed2];
        let mut mbc1 = mbcs[seed1];
        let mut mbc2 = mbcs[seed2];
        let mut remaining: Vec<usize> = (0..mbcs.len())
            .filter(|&i| i != seed1 && i != seed2)
            .collect();

        while !remaining.is_empty() {
            // one group can only reach the minimum if it takes everything left
            if first.len() + remaining.len() == min_children {
                first.append(&mut remaining);
                break;
            }
            if second.len() + remaining.len() == min_children {
                second.append(&mut remaining);
                break;
            }

            let (position, increase1, increase2) = pick_next(mbcs, &remaining, &mbc1, &mbc2);
            let item = remaining.remove(position);
            let r = &mbcs[item];

            let to_first = if increase1 != increase2 {
                increase1 < increase2
            } else if first.len() != second.len() {
                first.len() < second.len()
            } else {
                mbc1.union(r).volume() <= mbc2.union(r).volume()
            };

            if to_first {
                first.push(item);
                mbc1 = mbc1.union(r);
            } else {
                second.push(item);
                mbc2 = mbc2.union(r);
            }
        }

        SplitGroups { first, second }
    }
}

// The pair covering the most dead space, first pair wins ties.
fn pick_seeds(mbcs: &[Cuboid]) -> (usize, usize) {
    let mut seeds = (0, 1);
    let mut max_waste = f64::NEG_INFINITY;
    for (i, j) in (0..mbcs.len()).tuple_combinations() {
        let w = waste(&mbcs[i], &mbcs[j]);
        if w > max_waste {
            max_waste = w;
            seeds = (i, j);
        }
    }
    seeds
}

// Returns the position in `remaining` of the item with the largest difference
// between its two volume increases, along with both increases.
fn pick_next(
    mbcs: &[Cuboid],
    remaining: &[usize],
    mbc1: &Cuboid,
    mbc2: &Cuboid,
) -> (usize, f64, f64) {
    let mut best = (0, 0.0, 0.0);
    let mut max_difference = f64::NEG_INFINITY;
    for (position, &item) in remaining.iter().enumerate() {
        let increase1 = volume_increase(mbc1, &mbcs[item]);
        let increase2 = volume_increase(mbc2, &mbcs[item]);
        let difference = (increase1 - increase2).abs();
        if difference > max_difference {
            max_difference = difference;
            best = (position, increase1, increase2);
        }
    }
    best
}

/// The axis-sorted split of the R*-tree.
///
/// Items are sorted along each axis by lower and by upper bound. The axis
/// whose candidate distributions have the smallest total surface area is
/// chosen, then the distribution on that axis with the least overlap between
/// the two groups, then the one with the least combined volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct RStarSplitter;

impl Splitter for RStarSplitter {
    fn split(&self, mbcs: &[Cuboid], min_children: usize) -> SplitGroups {
        debug_assert!(mbcs.len() >= 2 && mbcs.len() >= 2 * min_children);
        let min_children = min_children.max(1);

        let mut best_sorts = axis_sorts(mbcs, 0);
        let mut best_margin = total_margin(mbcs, &best_sorts, min_children);
        for axis in 1..3 {
            let sorts = axis_sorts(mbcs, axis);
            let margin = total_margin(mbcs, &sorts, min_children);
            if margin < best_margin {
                best_margin = margin;
                best_sorts = sorts;
            }
        }

        let mut chosen = (0, min_children);
        let mut best_cost = (f64::INFINITY, f64::INFINITY);
        for (sort, sorted) in best_sorts.iter().enumerate() {
            let (prefix, suffix) = running_mbcs(mbcs, sorted);
            for split_at in min_children..=(mbcs.len() - min_children) {
                let left = &prefix[split_at - 1];
                let right = &suffix[split_at];
                let cost = (left.intersection_volume(right), left.volume() + right.volume());
                if cost < best_cost {
                    best_cost = cost;
                    chosen = (sort, split_at);
                }
            }
        }

        let (sort, split_at) = chosen;
        let sorted = &best_sorts[sort];
        SplitGroups {
            first: sorted[..split_at].to_vec(),
            second: sorted[split_at..].to_vec(),
        }
    }
}

// Positions sorted by lower bound and by upper bound on one axis.
fn axis_sorts(mbcs: &[Cuboid], axis: usize) -> [Vec<usize>; 2] {
    let by_lower = (0..mbcs.len())
        .sorted_by(|&a, &b| {
            let (a, b) = (&mbcs[a], &mbcs[b]);
            a.min_on(axis)
                .total_cmp(&b.min_on(axis))
                .then(a.max_on(axis).total_cmp(&b.max_on(axis)))
        })
        .collect();
    let by_upper = (0..mbcs.len())
        .sorted_by(|&a, &b| {
            let (a, b) = (&mbcs[a], &mbcs[b]);
            a.max_on(axis)
                .total_cmp(&b.max_on(axis))
                .then(a.min_on(axis).total_cmp(&b.min_on(axis)))
        })
        .collect();
    [by_lower, by_upper]
}

// Sum of both groups' surface areas over every distribution of both sorts.
fn total_margin(mbcs: &[Cuboid], sorts: &[Vec<usize>; 2], min_children: usize) -> f64 {
    let mut margin = 0.0;
    for sorted in sorts {
        let (prefix, suffix) = running_mbcs(mbcs, sorted);
        for split_at in min_children..=(mbcs.len() - min_children) {
            margin += prefix[split_at - 1].surface_area() + suffix[split_at].surface_area();
        }
    }
    margin
}

// prefix[i] bounds sorted[..=i], suffix[i] bounds sorted[i..].
fn running_mbcs(mbcs: &[Cuboid], sorted: &[usize]) -> (Vec<Cuboid>, Vec<Cuboid>) {
    let mut prefix = Vec::with_capacity(sorted.len());
    for &i in sorted {
        let next = match prefix.last() {
            Some(acc) => mbcs[i].union(acc),
            None => mbcs[i],
        };
        prefix.push(next);
    }
    let mut suffix = Vec::with_capacity(sorted.len());
    for &i in sorted.iter().rev() {
        let next = match suffix.last() {
            Some(acc) => mbcs[i].union(acc),
            None => mbcs[i],
        };
        suffix.push(next);
    }
    suffix.reverse();
    (prefix, suffix)
}
