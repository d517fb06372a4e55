//! # rtree3d - Persistent 3D R-Tree
//!
//! An immutable, copy-on-write R-tree over three-dimensional geometries.
//!
//! ## Features
//!
//! - **Persistent**: every insert or delete returns a new tree, older
//!   versions stay valid and share all untouched subtrees with newer ones
//! - **Pluggable Heuristics**: [`Selector`] and [`Splitter`] strategies, with
//!   the classic quadratic R-tree and an R*-style preset built in
//! - **Demand-Driven Search**: [`SearchCursor`] emits exactly as many matches
//!   as requested, can be cancelled at any time and never recurses
//! - **Nearest Neighbours**: branch-and-bound [`NearestCursor`]
//! - **Thread Safe**: trees are `Send + Sync` and need no locking
//!
//! ## Quick Start
//!
//! ```rust
//! use rtree3d::{entry, geometries, Geometry, RTree};
//!
//! # fn main() -> Result<(), rtree3d::SpatialError> {
//! let tree = RTree::builder().max_children(8).create()?;
//! let tree = tree
//!     .insert(entry(1, geometries::point(1.0, 1.0, 1.0)))
//!     .insert(entry(2, geometries::point(5.0, 5.0, 5.0)))
//!     .add(3, geometries::point(9.0, 9.0, 9.0));
//!
//! // pull results in batches
//! let region = geometries::cuboid(0.0, 0.0, 0.0, 6.0, 6.0, 6.0)?;
//! let mut cursor = tree.search(&region);
//! assert_eq!(cursor.next_batch(1).len(), 1);
//! assert_eq!(cursor.next_batch(10).len(), 1);
//!
//! // closest first
//! let query = geometries::point(8.0, 8.0, 8.0);
//! let (closest, distance) = tree.nearest(&query.mbc(), f64::INFINITY, 1).next().unwrap();
//! assert_eq!(*closest.value(), 3);
//! assert!(distance < 2.0);
//!
//! // the previous version is untouched
//! let smaller = tree.delete_value(2, geometries::point(5.0, 5.0, 5.0), false);
//! assert_eq!(smaller.size(), 2);
//! assert_eq!(tree.size(), 3);
//! # Ok(())
//! # }
//! ```

mod config;
mod entry;
mod errors;
mod geometry;
mod nearest;
mod node;
mod rtree;
mod selector;
mod splitter;
mod traversal;

pub mod condition;
pub mod functions;

// Re-export tree types
pub use config::{RTreeBuilder, RTreeConfig, DEFAULT_FILLING_FACTOR, DEFAULT_MAX_CHILDREN};
pub use rtree::{IntegrityReport, RTree, RTreeStats};

// Re-export entry and node types
pub use entry::{entry, Entry};
pub use node::{InternalNode, LeafNode, Node};

// Re-export geometry types
pub use geometry::{geometries, Cuboid, Geometry, Point, Sphere};

// Re-export strategies
pub use selector::{MinimalAreaIncreaseSelector, MinimalOverlapIncreaseSelector, Selector};
pub use splitter::{QuadraticSplitter, RStarSplitter, SplitGroups, Splitter};

// Re-export search types
pub use condition::Condition;
pub use nearest::NearestCursor;
pub use traversal::{CancelHandle, NodePosition, SearchCursor};

pub use errors::{SpatialError, SpatialResult};
