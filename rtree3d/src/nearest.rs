//! Branch-and-bound nearest neighbour search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

use crate::entry::Entry;
use crate::geometry::{Cuboid, Geometry};
use crate::node::Node;

enum Item<V, G> {
    Node(Arc<Node<V, G>>),
    Entry(Entry<V, G>),
}

// Heap slot ordered so that BinaryHeap pops the smallest distance first,
// then the earliest discovered.
struct Candidate<V, G> {
    distance: f64,
    sequence: u64,
    item: Item<V, G>,
}

impl<V, G> PartialEq for Candidate<V, G> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<V, G> Eq for Candidate<V, G> {}

impl<V, G> PartialOrd for Candidate<V, G> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V, G> Ord for Candidate<V, G> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

// Entry distance in the bound heap, largest on top.
#[derive(Clone, Copy)]
struct Bound(f64);

impl PartialEq for Bound {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Bound {}

impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bound {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Lazily yields the entries closest to a query cuboid.
///
/// Entries come out in non-decreasing distance order together with their
/// distance. At most `k` are produced and none farther than `max_distance`.
/// Nodes are expanded in order of their distance to the query, so a subtree
/// is never opened while a closer candidate is waiting.
///
/// Entries at equal distance come out in the order they were discovered.
pub struct NearestCursor<V, G> {
    query: Cuboid,
    max_distance: f64,
    remaining: usize,
    heap: BinaryHeap<Candidate<V, G>>,
    sequence: u64,
    k: usize,
    // the k smallest entry distances discovered so far
    bounds: BinaryHeap<Bound>,
}

impl<V, G: Geometry> NearestCursor<V, G> {
    pub(crate) fn new(
        root: Option<Arc<Node<V, G>>>,
        query: Cuboid,
        max_distance: f64,
        k: usize,
    ) -> Self {
        let mut cursor = NearestCursor {
            query,
            max_distance,
            remaining: k,
            heap: BinaryHeap::new(),
            sequence: 0,
            k,
            bounds: BinaryHeap::new(),
        };
        if let Some(root) = root {
            if k > 0 {
                let distance = root.mbc().distance(&query);
                cursor.push(distance, Item::Node(root));
            }
        }
        cursor
    }

    /// Number of entries still allowed by `k`.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Distance beyond which nothing can be among the first `k` results.
    ///
    /// Once `k` entries are known, every later candidate farther than the
    /// k-th of them would be emitted after all `k`.
    fn cutoff(&self) -> f64 {
        match self.bounds.peek() {
            Some(&Bound(distance)) if self.bounds.len() == self.k => {
                distance.min(self.max_distance)
            }
            _ => self.max_distance,
        }
    }

    fn push(&mut self, distance: f64, item: Item<V, G>) {
        // NaN never compares <= so it is dropped here too
        if distance <= self.cutoff() {
            if let Item::Entry(_) = item {
                self.bounds.push(Bound(distance));
                if self.bounds.len() > self.k {
                    self.bounds.pop();
                }
            }
            self.heap.push(Candidate {
                distance,
                sequence: self.sequence,
                item,
            });
            self.sequence += 1;
        }
    }

    fn expand(&mut self, node: &Node<V, G>) {
        match node {
            Node::Leaf(leaf) => {
                for entry in leaf.entries() {
                    let distance = entry.geometry().distance(&self.query);
                    self.push(distance, Item::Entry(entry.clone()));
                }
            }
            Node::Internal(internal) => {
                for child in internal.children() {
                    let distance = child.mbc().distance(&self.query);
                    self.push(distance, Item::Node(Arc::clone(child)));
                }
            }
        }
    }
}

impl<V, G: Geometry> Iterator for NearestCursor<V, G> {
    type Item = (Entry<V, G>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        while let Some(candidate) = self.heap.pop() {
            match candidate.item {
                Item::Entry(entry) => {
                    self.remaining -= 1;
                    if self.remaining == 0 {
                        self.heap.clear();
                        self.bounds.clear();
                    }
                    return Some((entry, candidate.distance));
                }
                Item::Node(node) => self.expand(&node),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl<V, G: Geometry> FusedIterator for NearestCursor<V, G> {}

impl<V, G> fmt::Debug for NearestCursor<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NearestCursor")
            .field("query", &self.query)
            .field("max_distance", &self.max_distance)
            .field("remaining", &self.remaining)
            .field("candidates", &self.heap.len())
            .finish()
    }
}
