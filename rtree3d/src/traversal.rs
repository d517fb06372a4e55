//! Lazy depth-first search with demand control.
//!
//! A [`SearchCursor`] keeps its position as an explicit stack of
//! [`NodePosition`] frames, one per level between the root and the node
//! being scanned. Nothing is buffered: each call to
//! [`request`](SearchCursor::request) walks the tree just far enough to emit
//! the number of matches asked for and then stops, leaving the stack exactly
//! where the next call has to resume.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use smallvec::SmallVec;

use crate::condition::Condition;
use crate::entry::Entry;
use crate::geometry::Geometry;
use crate::node::Node;

/// A node together with the index of the next entry or child to visit.
pub struct NodePosition<V, G> {
    node: Arc<Node<V, G>>,
    position: usize,
}

enum Step<V, G> {
    Entry(Entry<V, G>),
    Child(Arc<Node<V, G>>),
    Exhausted,
}

impl<V, G: Geometry> NodePosition<V, G> {
    pub(crate) fn new(node: Arc<Node<V, G>>) -> Self {
        NodePosition { node, position: 0 }
    }

    pub fn node(&self) -> &Arc<Node<V, G>> {
        &self.node
    }

    /// Index of the next entry or child to visit.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves past the next entry or child accepted by `condition`.
    fn advance(&mut self, condition: &Condition) -> Step<V, G> {
        match self.node.as_ref() {
            Node::Leaf(leaf) => {
                let entries = leaf.entries();
                while self.position < entries.len() {
                    let entry = &entries[self.position];
                    self.position += 1;
                    if condition(entry.geometry()) {
                        return Step::Entry(entry.clone());
                    }
                }
            }
            Node::Internal(internal) => {
                let children = internal.children();
                while self.position < children.len() {
                    let child = &children[self.position];
                    self.position += 1;
                    if condition(&child.mbc()) {
                        return Step::Child(Arc::clone(child));
                    }
                }
            }
        }
        Step::Exhausted
    }
}

impl<V, G> Clone for NodePosition<V, G> {
    fn clone(&self) -> Self {
        NodePosition {
            node: Arc::clone(&self.node),
            position: self.position,
        }
    }
}

/// Shared cancellation flag of a [`SearchCursor`].
///
/// Handles are cheap to clone and can be moved to other threads or into
/// the `on_next` callback of the cursor they belong to.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the search. Calling it again has no effect.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A resumable search over one version of a tree.
///
/// Memory use is bounded by the height of the tree, whatever the number of
/// matches. The cursor owns references to the nodes it is visiting, so the
/// tree it came from can be dropped or replaced while the search runs.
///
/// # Examples
///
/// ```rust
/// use rtree3d::{geometries, RTree};
///
/// let tree = (0..10).fold(RTree::default(), |tree, i| {
///     tree.add(i, geometries::point(i as f64, 0.0, 0.0))
/// });
/// let mut cursor = tree.entries();
///
/// assert_eq!(cursor.next_batch(4).len(), 4);
/// assert_eq!(cursor.next_batch(0).len(), 0);
/// assert_eq!(cursor.next_batch(100).len(), 6);
/// assert!(cursor.is_finished());
/// ```
pub struct SearchCursor<V, G> {
    stack: SmallVec<[NodePosition<V, G>; 8]>,
    condition: Condition,
    cancel: CancelHandle,
    emitted: usize,
}

impl<V, G: Geometry> SearchCursor<V, G> {
    /// Creates a cursor over the tree rooted at `root`. The root is always
    /// visited, `condition` only decides which of its children and entries
    /// are.
    pub(crate) fn new(root: Option<Arc<Node<V, G>>>, condition: Condition) -> Self {
        let mut stack = SmallVec::new();
        if let Some(root) = root {
            stack.push(NodePosition::new(root));
        }
        SearchCursor {
            stack,
            condition,
            cancel: CancelHandle::new(),
            emitted: 0,
        }
    }

    /// Emits up to `n` further matches to `on_next` and returns how many were
    /// emitted.
    ///
    /// Fewer than `n` are emitted only when the search runs out of matches or
    /// is cancelled, from `on_next` or elsewhere, during the batch.
    /// `request(0, ..)` does nothing.
    pub fn request<F>(&mut self, n: usize, mut on_next: F) -> usize
    where
        F: FnMut(Entry<V, G>),
    {
        let mut count = 0;
        while count < n {
            if self.check_cancelled() {
                break;
            }
            let Some(entry) = self.next_match() else {
                break;
            };
            if self.check_cancelled() {
                break;
            }
            on_next(entry);
            count += 1;
            self.emitted += 1;
        }
        count
    }

    /// Collects up to `n` further matches.
    pub fn next_batch(&mut self, n: usize) -> Vec<Entry<V, G>> {
        let mut batch = Vec::new();
        self.request(n, |entry| batch.push(entry));
        batch
    }

    /// Stops the search and drops its position.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        self.stack.clear();
    }

    /// Returns a handle that cancels this cursor.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Checks if the cursor will never emit again.
    ///
    /// A cursor that has emitted its last match but not yet looked further
    /// is not finished until the next request finds nothing.
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty() || self.cancel.is_cancelled()
    }

    /// Total number of matches emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Number of frames on the stack, at most the height of the tree.
    pub fn frames(&self) -> usize {
        self.stack.len()
    }

    fn check_cancelled(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            self.stack.clear();
            return true;
        }
        false
    }

    fn next_match(&mut self) -> Option<Entry<V, G>> {
        loop {
            let top = self.stack.last_mut()?;
            match top.advance(&self.condition) {
                Step::Entry(entry) => return Some(entry),
                Step::Child(child) => self.stack.push(NodePosition::new(child)),
                Step::Exhausted => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl<V, G: Geometry> Iterator for SearchCursor<V, G> {
    type Item = Entry<V, G>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut next = None;
        self.request(1, |entry| next = Some(entry));
        next
    }
}

impl<V, G: Geometry> FusedIterator for SearchCursor<V, G> {}

impl<V, G> fmt::Debug for SearchCursor<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCursor")
            .field("frames", &self.stack.len())
            .field("emitted", &self.emitted)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
