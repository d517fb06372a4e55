//! Copy-on-write deletion with condensation.
//!
//! Matching entries are removed from their leaves. A non-root node left
//! with fewer than `min_children` items is dropped from its parent and the
//! entries below it are handed back as orphans, to be inserted again once
//! the walk is over.

use std::sync::Arc;

use crate::entry::Entry;
use crate::geometry::{Cuboid, Geometry};
use crate::node::{collect_entries, Node};

/// Result of a deletion walk over the whole tree.
pub(crate) struct Deletion<V, G> {
    /// The rebuilt root, `None` if nothing is left.
    pub(crate) root: Option<Arc<Node<V, G>>>,
    pub(crate) deleted: usize,
    pub(crate) orphans: Vec<Entry<V, G>>,
}

enum Outcome<V, G> {
    Unchanged,
    Replaced(Arc<Node<V, G>>),
    Removed,
}

struct Walk<'a, V, G> {
    region: &'a Cuboid,
    matcher: &'a dyn Fn(&Entry<V, G>) -> bool,
    all: bool,
    min_children: usize,
    deleted: usize,
    orphans: Vec<Entry<V, G>>,
}

impl<V, G> Walk<'_, V, G> {
    fn done(&self) -> bool {
        !self.all && self.deleted > 0
    }
}

/// Removes the entries below `root` whose bounding cuboid intersects
/// `region` and that satisfy `matcher`. Only the first match is removed
/// unless `all` is set.
///
/// Returns `None` when nothing matched.
pub(crate) fn delete<V, G: Geometry>(
    root: &Arc<Node<V, G>>,
    region: &Cuboid,
    matcher: &dyn Fn(&Entry<V, G>) -> bool,
    all: bool,
    min_children: usize,
) -> Option<Deletion<V, G>> {
    let mut walk = Walk {
        region,
        matcher,
        all,
        min_children,
        deleted: 0,
        orphans: Vec::new(),
    };
    let root = match delete_from(root, true, &mut walk) {
        Outcome::Unchanged => return None,
        Outcome::Replaced(node) => Some(node),
        Outcome::Removed => None,
    };
    Some(Deletion {
        root,
        deleted: walk.deleted,
        orphans: walk.orphans,
    })
}

fn delete_from<V, G: Geometry>(
    node: &Arc<Node<V, G>>,
    is_root: bool,
    walk: &mut Walk<'_, V, G>,
) -> Outcome<V, G> {
    match node.as_ref() {
        Node::Leaf(leaf) => {
            let mut kept = Vec::with_capacity(leaf.len());
            let before = walk.deleted;
            for entry in leaf.entries() {
                if !walk.done() && entry.mbc().intersects(walk.region) && (walk.matcher)(entry) {
                    walk.deleted += 1;
                } else {
                    kept.push(entry.clone());
                }
            }
            if walk.deleted == before {
                return Outcome::Unchanged;
            }
            if kept.is_empty() {
                return Outcome::Removed;
            }
            if !is_root && kept.len() < walk.min_children {
                walk.orphans.extend(kept);
                return Outcome::Removed;
            }
            Outcome::Replaced(Arc::new(Node::rebuilt_leaf(kept)))
        }
        Node::Internal(internal) => {
            let mut changed = false;
            let mut kept = Vec::with_capacity(internal.len());
            for child in internal.children() {
                if walk.done() || !child.mbc().intersects(walk.region) {
                    kept.push(Arc::clone(child));
                    continue;
                }
                match delete_from(child, false, walk) {
                    Outcome::Unchanged => kept.push(Arc::clone(child)),
                    Outcome::Replaced(replacement) => {
                        changed = true;
                        kept.push(replacement);
                    }
                    Outcome::Removed => changed = true,
                }
            }
            if !changed {
                return Outcome::Unchanged;
            }
            if kept.is_empty() {
                return Outcome::Removed;
            }
            if !is_root && kept.len() < walk.min_children {
                for child in &kept {
                    collect_entries(child, &mut walk.orphans);
                }
                return Outcome::Removed;
            }
            Outcome::Replaced(Arc::new(Node::rebuilt_internal(kept)))
        }
    }
}
