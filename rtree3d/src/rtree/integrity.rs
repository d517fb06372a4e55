use std::sync::Arc;

use crate::config::RTreeConfig;
use crate::geometry::{Cuboid, Geometry};
use crate::node::Node;

// ============================================================================
// Statistics
// ============================================================================

/// Shape of one version of a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct RTreeStats {
    /// Number of entries
    pub size: usize,
    /// Number of levels, 0 for an empty tree
    pub depth: usize,
    pub leaf_nodes: usize,
    pub internal_nodes: usize,
    /// Mean entries per leaf as a fraction of `max_children` (0-1)
    pub average_leaf_fill: f64,
}

pub(crate) fn stats<V, G: Geometry>(
    root: Option<&Arc<Node<V, G>>>,
    config: &RTreeConfig,
) -> RTreeStats {
    let mut stats = RTreeStats {
        size: 0,
        depth: root.map_or(0, |r| r.depth()),
        leaf_nodes: 0,
        internal_nodes: 0,
        average_leaf_fill: 0.0,
    };
    let mut stack: Vec<&Node<V, G>> = root.map(|r| r.as_ref()).into_iter().collect();
    while let Some(node) = stack.pop() {
        match node {
            Node::Leaf(leaf) => {
                stats.leaf_nodes += 1;
                stats.size += leaf.len();
            }
            Node::Internal(internal) => {
                stats.internal_nodes += 1;
                stack.extend(internal.children().iter().map(|c| c.as_ref()));
            }
        }
    }
    if stats.leaf_nodes > 0 {
        stats.average_leaf_fill =
            stats.size as f64 / stats.leaf_nodes as f64 / config.max_children() as f64;
    }
    stats
}

// ============================================================================
// Integrity Checking
// ============================================================================

/// Result of an integrity check
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Total nodes checked
    pub nodes_checked: usize,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, error: String) {
        self.is_valid = false;
        self.errors.push(error);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

struct Visit<'a, V, G> {
    node: &'a Node<V, G>,
    level: usize,
    path: String,
}

/// Walks every node below `root` and re-checks the structural invariants.
pub(crate) fn check<V, G: Geometry>(
    root: Option<&Arc<Node<V, G>>>,
    size: usize,
    config: &RTreeConfig,
) -> IntegrityReport {
    let mut report = IntegrityReport::new();
    let Some(root) = root else {
        if size != 0 {
            report.fail(format!("empty tree reports size {}", size));
        }
        return report;
    };

    let mut entries = 0;
    let mut leaf_level = None;
    let mut stack = vec![Visit {
        node: root.as_ref(),
        level: 1,
        path: "root".to_string(),
    }];

    while let Some(Visit { node, level, path }) = stack.pop() {
        report.nodes_checked += 1;

        let exact = Cuboid::mbc_of(node.item_mbcs().iter());
        if exact != Some(node.mbc()) {
            report.fail(format!(
                "{}: cached mbc {} does not match its contents ({:?})",
                path,
                node.mbc(),
                exact
            ));
        }

        let (low, kind) = match (level, node.is_leaf()) {
            (1, true) => (1, "root leaf"),
            (1, false) => (2, "root"),
            (_, true) => (config.min_children(), "leaf"),
            (_, false) => (config.min_children(), "internal node"),
        };
        if node.len() < low || node.len() > config.max_children() {
            report.fail(format!(
                "{}: {} holds {} items, expected {}..={}",
                path,
                kind,
                node.len(),
                low,
                config.max_children()
            ));
        }

        match node {
            Node::Leaf(leaf) => {
                entries += leaf.len();
                match leaf_level {
                    None => leaf_level = Some(level),
                    Some(expected) if expected != level => report.fail(format!(
                        "{}: leaf at level {}, other leaves are at level {}",
                        path, level, expected
                    )),
                    Some(_) => {}
                }
            }
            Node::Internal(internal) => {
                for (i, child) in internal.children().iter().enumerate() {
                    stack.push(Visit {
                        node: child.as_ref(),
                        level: level + 1,
                        path: format!("{}/{}", path, i),
                    });
                }
            }
        }
    }

    if entries != size {
        report.fail(format!("tree holds {} entries but reports size {}", entries, size));
    }
    report
}
