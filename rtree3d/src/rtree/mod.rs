//! The tree facade.
//!
//! An [`RTree`] is an immutable handle on one version of the tree. Every
//! mutator returns a new handle and leaves `self` untouched; the two versions
//! share every subtree the operation did not rebuild.

mod delete;
mod insert;
mod integrity;

use std::fmt::{self, Debug};
use std::sync::Arc;

use log::debug;

use crate::condition::{self, Condition};
use crate::config::{RTreeBuilder, RTreeConfig};
use crate::entry::Entry;
use crate::geometry::{Cuboid, Geometry, Point, Sphere};
use crate::nearest::NearestCursor;
use crate::node::Node;
use crate::traversal::SearchCursor;

use insert::Inserted;
pub use integrity::{IntegrityReport, RTreeStats};

/// A persistent 3D R-tree.
///
/// Cloning a tree is O(1). Handles can be shared across threads and queried
/// concurrently without locking since no version is ever modified.
///
/// # Examples
///
/// ```rust
/// use rtree3d::{entry, geometries, Cuboid, RTree};
///
/// let empty: RTree<&str, Cuboid> = RTree::builder().max_children(3).create().unwrap();
/// let tree = empty
///     .insert(entry("a", geometries::cuboid(1.0, 1.0, 0.0, 2.0, 2.0, 0.0).unwrap()))
///     .insert(entry("b", geometries::cuboid(3.0, 3.0, 0.0, 4.0, 4.0, 0.0).unwrap()));
///
/// let region = geometries::cuboid(0.0, 0.0, 0.0, 2.5, 2.5, 0.0).unwrap();
/// let found: Vec<&str> = tree.search(&region).map(|e| *e.value()).collect();
/// assert_eq!(found, vec!["a"]);
/// assert!(empty.is_empty());
/// ```
pub struct RTree<V, G> {
    root: Option<Arc<Node<V, G>>>,
    size: usize,
    config: RTreeConfig,
}

impl<V, G: Geometry> RTree<V, G> {
    /// Creates an empty tree with the given configuration.
    pub fn empty(config: RTreeConfig) -> Self {
        RTree {
            root: None,
            size: 0,
            config,
        }
    }

    /// Returns a builder with the default settings.
    pub fn builder() -> RTreeBuilder<V, G> {
        RTreeBuilder::new()
    }

    /// Returns a builder preset to the R*-tree heuristics.
    pub fn star() -> RTreeBuilder<V, G> {
        RTreeBuilder::new().star()
    }

    /// Returns a new tree with `entry` added.
    pub fn insert(&self, entry: Entry<V, G>) -> Self {
        let mut tree = self.clone();
        tree.push(entry);
        tree
    }

    /// Creates an entry from `value` and `geometry` and inserts it.
    pub fn add(&self, value: V, geometry: G) -> Self {
        self.insert(Entry::new(value, geometry))
    }

    /// Returns a new tree with every entry of `entries` added, in order.
    pub fn insert_all<I>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = Entry<V, G>>,
    {
        let mut tree = self.clone();
        for entry in entries {
            tree.push(entry);
        }
        tree
    }

    fn push(&mut self, entry: Entry<V, G>) {
        let root = match &self.root {
            None => Arc::new(Node::rebuilt_leaf(vec![entry])),
            Some(root) => match insert::insert(root, entry, &self.config) {
                Inserted::One(node) => node,
                Inserted::Split(first, second) => {
                    debug!("Root split, tree height grows to {}", first.depth() + 1);
                    Arc::new(Node::rebuilt_internal(vec![first, second]))
                }
            },
        };
        self.root = Some(root);
        self.size += 1;
    }

    /// Returns a new tree without `entry`, or without every equal entry when
    /// `all` is set.
    ///
    /// Deleting an entry that is not in the tree returns an unchanged tree.
    pub fn delete(&self, entry: &Entry<V, G>, all: bool) -> Self
    where
        V: PartialEq,
        G: PartialEq,
    {
        self.delete_where(&entry.mbc(), |candidate| candidate == entry, all)
    }

    /// Deletes every entry of `entries`, in order.
    pub fn delete_all<I>(&self, entries: I, all: bool) -> Self
    where
        I: IntoIterator<Item = Entry<V, G>>,
        V: PartialEq,
        G: PartialEq,
    {
        entries
            .into_iter()
            .fold(self.clone(), |tree, entry| tree.delete(&entry, all))
    }

    /// Deletes the entry made of `value` and `geometry`.
    pub fn delete_value(&self, value: V, geometry: G, all: bool) -> Self
    where
        V: PartialEq,
        G: PartialEq,
    {
        self.delete(&Entry::new(value, geometry), all)
    }

    /// Deletes entries whose bounding cuboid intersects `region` and that
    /// satisfy `predicate`. Only the first one found is deleted unless `all`
    /// is set.
    ///
    /// Nodes left with fewer than `min_children` items are dissolved and
    /// their entries inserted again.
    pub fn delete_where<F>(&self, region: &Cuboid, predicate: F, all: bool) -> Self
    where
        F: Fn(&Entry<V, G>) -> bool,
    {
        let Some(root) = &self.root else {
            return self.clone();
        };
        let Some(deletion) =
            delete::delete(root, region, &predicate, all, self.config.min_children())
        else {
            return self.clone();
        };

        let mut root = deletion.root;
        while let Some(only) = root.as_ref().and_then(single_child) {
            debug!("Collapsing root with a single child");
            root = Some(only);
        }

        let mut tree = RTree {
            root,
            size: self.size - deletion.deleted - deletion.orphans.len(),
            config: self.config.clone(),
        };
        if !deletion.orphans.is_empty() {
            debug!("Reinserting {} orphaned entries", deletion.orphans.len());
            for orphan in deletion.orphans {
                tree.push(orphan);
            }
        }
        tree
    }

    /// Returns a cursor over every entry.
    pub fn entries(&self) -> SearchCursor<V, G> {
        self.search_with(condition::always())
    }

    /// Returns a cursor over the entries intersecting `region`.
    pub fn search(&self, region: &Cuboid) -> SearchCursor<V, G> {
        self.search_with(condition::intersects(*region))
    }

    /// Returns a cursor over the entries accepted by `condition`.
    ///
    /// See [`condition`](crate::condition) for the contract a condition must
    /// follow.
    pub fn search_with(&self, condition: Condition) -> SearchCursor<V, G> {
        SearchCursor::new(self.root.clone(), condition)
    }

    /// Returns a cursor over the entries containing `point`.
    pub fn search_point(&self, point: &Point) -> SearchCursor<V, G> {
        self.search_with(condition::intersects_point(*point))
    }

    /// Returns a cursor over the entries touching or overlapping `sphere`.
    pub fn search_sphere(&self, sphere: &Sphere) -> SearchCursor<V, G> {
        self.search_with(condition::intersects_sphere(*sphere))
    }

    /// Returns a cursor over the entries strictly closer than
    /// `max_distance` to `region`.
    pub fn search_within(&self, region: &Cuboid, max_distance: f64) -> SearchCursor<V, G> {
        self.search_with(condition::within_distance(*region, max_distance))
    }

    /// Returns up to `k` entries no farther than `max_distance` from
    /// `region`, closest first.
    pub fn nearest(&self, region: &Cuboid, max_distance: f64, k: usize) -> NearestCursor<V, G> {
        NearestCursor::new(self.root.clone(), *region, max_distance, k)
    }

    /// Like [`nearest`](RTree::nearest) with a point as the query.
    pub fn nearest_to_point(&self, point: &Point, max_distance: f64, k: usize) -> NearestCursor<V, G> {
        self.nearest(&point.mbc(), max_distance, k)
    }

    /// Returns the number of entries.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of levels, 0 for an empty tree.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.depth())
    }

    /// Returns the root node, `None` for an empty tree.
    pub fn root(&self) -> Option<&Arc<Node<V, G>>> {
        self.root.as_ref()
    }

    /// Returns the bounding cuboid of every entry, `None` for an empty tree.
    pub fn mbc(&self) -> Option<Cuboid> {
        self.root.as_ref().map(|root| root.mbc())
    }

    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// Counts nodes and measures how full the leaves are.
    pub fn stats(&self) -> RTreeStats {
        integrity::stats(self.root.as_ref(), &self.config)
    }

    /// Re-checks the structure of the tree: cached bounding cuboids, node
    /// fill, leaf depth and size.
    pub fn check_integrity(&self) -> IntegrityReport {
        integrity::check(self.root.as_ref(), self.size, &self.config)
    }
}

fn single_child<V, G: Geometry>(node: &Arc<Node<V, G>>) -> Option<Arc<Node<V, G>>> {
    match node.as_ref() {
        Node::Internal(internal) if internal.len() == 1 => Some(Arc::clone(&internal.children()[0])),
        _ => None,
    }
}

impl<V, G> Clone for RTree<V, G> {
    fn clone(&self) -> Self {
        RTree {
            root: self.root.clone(),
            size: self.size,
            config: self.config.clone(),
        }
    }
}

impl<V, G: Geometry> Default for RTree<V, G> {
    fn default() -> Self {
        RTree::empty(RTreeConfig::default())
    }
}

impl<V, G> Debug for RTree<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTree")
            .field("size", &self.size)
            .field("config", &self.config)
            .finish()
    }
}
