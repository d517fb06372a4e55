//! Tree nodes.
//!
//! A node is either a [`LeafNode`] holding entries or an [`InternalNode`]
//! holding child nodes. Children are shared through `Arc`, so a rebuilt
//! node only copies the pointers of the siblings it keeps.

use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::entry::Entry;
use crate::errors::{SpatialError, SpatialResult};
use crate::geometry::{Cuboid, Geometry};

/// A node of the tree.
pub enum Node<V, G> {
    Leaf(LeafNode<V, G>),
    Internal(InternalNode<V, G>),
}

/// A node holding entries directly.
pub struct LeafNode<V, G> {
    entries: Vec<Entry<V, G>>,
    mbc: Cuboid,
}

/// A node holding child nodes.
pub struct InternalNode<V, G> {
    children: Vec<Arc<Node<V, G>>>,
    mbc: Cuboid,
}

impl<V, G: Geometry> LeafNode<V, G> {
    /// Creates a leaf and computes its bounding cuboid.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] if `entries` is empty.
    pub fn new(entries: Vec<Entry<V, G>>) -> SpatialResult<Self> {
        let mbc = entries
            .iter()
            .map(|e| e.mbc())
            .reduce(|acc, c| acc.union(&c))
            .ok_or_else(|| SpatialError::invalid_argument("a leaf node needs at least one entry"))?;
        Ok(LeafNode { entries, mbc })
    }

    pub fn entries(&self) -> &[Entry<V, G>] {
        &self.entries
    }

    pub fn mbc(&self) -> Cuboid {
        self.mbc
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V, G: Geometry> InternalNode<V, G> {
    /// Creates an internal node and computes its bounding cuboid.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] if `children` is empty.
    pub fn new(children: Vec<Arc<Node<V, G>>>) -> SpatialResult<Self> {
        let mbc = children
            .iter()
            .map(|c| c.mbc())
            .reduce(|acc, c| acc.union(&c))
            .ok_or_else(|| {
                SpatialError::invalid_argument("an internal node needs at least one child")
            })?;
        Ok(InternalNode { children, mbc })
    }

    pub fn children(&self) -> &[Arc<Node<V, G>>] {
        &self.children
    }

    pub fn mbc(&self) -> Cuboid {
        self.mbc
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<V, G: Geometry> Node<V, G> {
    /// Creates a leaf node, see [`LeafNode::new`].
    pub fn leaf(entries: Vec<Entry<V, G>>) -> SpatialResult<Self> {
        Ok(Node::Leaf(LeafNode::new(entries)?))
    }

    /// Creates an internal node, see [`InternalNode::new`].
    pub fn internal(children: Vec<Arc<Node<V, G>>>) -> SpatialResult<Self> {
        Ok(Node::Internal(InternalNode::new(children)?))
    }

    /// Creates a leaf from a list known to be non-empty, as produced while
    /// rebuilding the path of an insertion or deletion.
    pub(crate) fn rebuilt_leaf(entries: Vec<Entry<V, G>>) -> Self {
        debug_assert!(!entries.is_empty());
        let mbc = entries[1..]
            .iter()
            .fold(entries[0].mbc(), |acc, e| acc.union(&e.mbc()));
        Node::Leaf(LeafNode { entries, mbc })
    }

    /// Creates an internal node from a list known to be non-empty.
    pub(crate) fn rebuilt_internal(children: Vec<Arc<Node<V, G>>>) -> Self {
        debug_assert!(!children.is_empty());
        let mbc = children[1..]
            .iter()
            .fold(children[0].mbc(), |acc, c| acc.union(&c.mbc()));
        Node::Internal(InternalNode { children, mbc })
    }

    /// Returns the cached bounding cuboid of everything below this node.
    pub fn mbc(&self) -> Cuboid {
        match self {
            Node::Leaf(leaf) => leaf.mbc,
            Node::Internal(internal) => internal.mbc,
        }
    }

    /// Returns the number of entries (leaf) or children (internal).
    pub fn len(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.entries.len(),
            Node::Internal(internal) => internal.children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Returns the entries of a leaf, an empty slice for internal nodes.
    pub fn entries(&self) -> &[Entry<V, G>] {
        match self {
            Node::Leaf(leaf) => &leaf.entries,
            Node::Internal(_) => &[],
        }
    }

    /// Returns the children of an internal node, an empty slice for leaves.
    pub fn children(&self) -> &[Arc<Node<V, G>>] {
        match self {
            Node::Leaf(_) => &[],
            Node::Internal(internal) => &internal.children,
        }
    }

    /// Returns the number of levels from this node down to the leaves,
    /// 1 for a leaf.
    ///
    /// Only the first child of each level is followed, which is enough for a
    /// height-balanced tree.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut node = self;
        while let Some(first) = node.children().first() {
            node = first;
            depth += 1;
        }
        depth
    }

    /// Returns the number of entries stored below this node.
    pub fn count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(leaf) => count += leaf.entries.len(),
                Node::Internal(internal) => stack.extend(internal.children.iter().map(|c| c.as_ref())),
            }
        }
        count
    }

    /// Returns the bounding cuboids of the node's entries or children, in
    /// order.
    pub(crate) fn item_mbcs(&self) -> Vec<Cuboid> {
        match self {
            Node::Leaf(leaf) => leaf.entries.iter().map(|e| e.mbc()).collect(),
            Node::Internal(internal) => internal.children.iter().map(|c| c.mbc()).collect(),
        }
    }
}

/// Collects every entry below `node` without recursion.
pub(crate) fn collect_entries<V, G: Geometry>(node: &Node<V, G>, out: &mut Vec<Entry<V, G>>) {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        match node {
            Node::Leaf(leaf) => out.extend(leaf.entries.iter().cloned()),
            Node::Internal(internal) => {
                // reversed so entries come out in left-to-right order
                stack.extend(internal.children.iter().rev().map(|c| c.as_ref()))
            }
        }
    }
}

impl<V, G> Clone for LeafNode<V, G> {
    fn clone(&self) -> Self {
        LeafNode {
            entries: self.entries.clone(),
            mbc: self.mbc,
        }
    }
}

impl<V, G> Clone for InternalNode<V, G> {
    fn clone(&self) -> Self {
        InternalNode {
            children: self.children.clone(),
            mbc: self.mbc,
        }
    }
}

impl<V, G> Clone for Node<V, G> {
    fn clone(&self) -> Self {
        match self {
            Node::Leaf(leaf) => Node::Leaf(leaf.clone()),
            Node::Internal(internal) => Node::Internal(internal.clone()),
        }
    }
}

impl<V: Debug, G: Debug> Debug for Node<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => f
                .debug_struct("Leaf")
                .field("mbc", &leaf.mbc)
                .field("entries", &leaf.entries)
                .finish(),
            Node::Internal(internal) => f
                .debug_struct("Internal")
                .field("mbc", &internal.mbc)
                .field("children", &internal.children)
                .finish(),
        }
    }
}
