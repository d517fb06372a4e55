//! Copy-on-write insertion.
//!
//! Only the nodes on the path from the root to the chosen leaf are rebuilt.
//! Every other subtree is shared with the previous version of the tree.

use std::sync::Arc;

use log::trace;

use crate::config::RTreeConfig;
use crate::entry::Entry;
use crate::geometry::{Cuboid, Geometry};
use crate::node::Node;

/// What replaces a node after an insertion below it.
pub(crate) enum Inserted<V, G> {
    One(Arc<Node<V, G>>),
    Split(Arc<Node<V, G>>, Arc<Node<V, G>>),
}

/// Inserts `entry` below `node` and returns the rebuilt node, or the two
/// halves it was split into.
pub(crate) fn insert<V, G: Geometry>(
    node: &Node<V, G>,
    entry: Entry<V, G>,
    config: &RTreeConfig,
) -> Inserted<V, G> {
    let mbc = entry.mbc();
    insert_into(node, entry, &mbc, config)
}

fn insert_into<V, G: Geometry>(
    node: &Node<V, G>,
    entry: Entry<V, G>,
    mbc: &Cuboid,
    config: &RTreeConfig,
) -> Inserted<V, G> {
    match node {
        Node::Leaf(leaf) => {
            let mut entries = Vec::with_capacity(leaf.len() + 1);
            entries.extend_from_slice(leaf.entries());
            entries.push(entry);
            if entries.len() > config.max_children() {
                split_leaf(entries, config)
            } else {
                Inserted::One(Arc::new(Node::rebuilt_leaf(entries)))
            }
        }
        Node::Internal(internal) => {
            let current = internal.children();
            let mbcs: Vec<Cuboid> = current.iter().map(|c| c.mbc()).collect();
            let index = config.selector().select(mbc, &mbcs);
            debug_assert!(index < current.len());

            let mut children = Vec::with_capacity(current.len() + 1);
            children.extend_from_slice(&current[..index]);
            match insert_into(&current[index], entry, mbc, config) {
                Inserted::One(child) => children.push(child),
                Inserted::Split(first, second) => {
                    children.push(first);
                    children.push(second);
                }
            }
            children.extend_from_slice(&current[index + 1..]);

            if children.len() > config.max_children() {
                split_internal(children, config)
            } else {
                Inserted::One(Arc::new(Node::rebuilt_internal(children)))
            }
        }
    }
}

fn split_leaf<V, G: Geometry>(entries: Vec<Entry<V, G>>, config: &RTreeConfig) -> Inserted<V, G> {
    let mbcs: Vec<Cuboid> = entries.iter().map(|e| e.mbc()).collect();
    let (first, second) = partition(&entries, &mbcs, config);
    trace!(
        "Split leaf of {} entries into {} and {}",
        entries.len(),
        first.len(),
        second.len()
    );
    Inserted::Split(
        Arc::new(Node::rebuilt_leaf(first)),
        Arc::new(Node::rebuilt_leaf(second)),
    )
}

fn split_internal<V, G: Geometry>(
    children: Vec<Arc<Node<V, G>>>,
    config: &RTreeConfig,
) -> Inserted<V, G> {
    let mbcs: Vec<Cuboid> = children.iter().map(|c| c.mbc()).collect();
    let (first, second) = partition(&children, &mbcs, config);
    trace!(
        "Split internal node of {} children into {} and {}",
        children.len(),
        first.len(),
        second.len()
    );
    Inserted::Split(
        Arc::new(Node::rebuilt_internal(first)),
        Arc::new(Node::rebuilt_internal(second)),
    )
}

fn partition<T: Clone>(items: &[T], mbcs: &[Cuboid], config: &RTreeConfig) -> (Vec<T>, Vec<T>) {
    let groups = config.splitter().split(mbcs, config.min_children());
    debug_assert!(
        groups.is_valid(items.len(), config.min_children()),
        "{:?} returned an invalid split: {:?}",
        config.splitter(),
        groups
    );
    let pick = |indices: &[usize]| -> Vec<T> { indices.iter().map(|&i| items[i].clone()).collect() };
    (pick(&groups.first), pick(&groups.second))
}
