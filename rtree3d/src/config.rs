//! Tree configuration.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::errors::{SpatialError, SpatialResult};
use crate::geometry::Geometry;
use crate::rtree::RTree;
use crate::selector::{MinimalAreaIncreaseSelector, MinimalOverlapIncreaseSelector, Selector};
use crate::splitter::{QuadraticSplitter, RStarSplitter, Splitter};

/// Default maximum number of children per node.
pub const DEFAULT_MAX_CHILDREN: usize = 4;

/// Fraction of `max_children` used as `min_children` when none is given.
pub const DEFAULT_FILLING_FACTOR: f64 = 0.4;

/// Immutable parameters shared by every node of a tree and every version
/// derived from it.
///
/// Cloning is cheap, the configuration lives behind an `Arc`.
#[derive(Clone)]
pub struct RTreeConfig {
    inner: Arc<RTreeConfigInner>,
}

struct RTreeConfigInner {
    min_children: usize,
    max_children: usize,
    selector: Arc<dyn Selector>,
    splitter: Arc<dyn Splitter>,
}

impl RTreeConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidArgument`] unless
    /// `1 <= min_children <= max_children / 2`.
    pub fn new(
        min_children: usize,
        max_children: usize,
        selector: Arc<dyn Selector>,
        splitter: Arc<dyn Splitter>,
    ) -> SpatialResult<RTreeConfig> {
        if min_children < 1 {
            return Err(SpatialError::invalid_argument(
                "min_children must be at least 1",
            ));
        }
        if min_children > max_children / 2 {
            return Err(SpatialError::invalid_argument(format!(
                "min_children ({}) must not exceed max_children / 2 (max_children = {})",
                min_children, max_children
            )));
        }
        Ok(RTreeConfig {
            inner: Arc::new(RTreeConfigInner {
                min_children,
                max_children,
                selector,
                splitter,
            }),
        })
    }

    pub fn min_children(&self) -> usize {
        self.inner.min_children
    }

    pub fn max_children(&self) -> usize {
        self.inner.max_children
    }

    pub fn selector(&self) -> &dyn Selector {
        self.inner.selector.as_ref()
    }

    pub fn splitter(&self) -> &dyn Splitter {
        self.inner.splitter.as_ref()
    }
}

impl Default for RTreeConfig {
    fn default() -> Self {
        RTreeConfig {
            inner: Arc::new(RTreeConfigInner {
                min_children: default_min_children(DEFAULT_MAX_CHILDREN),
                max_children: DEFAULT_MAX_CHILDREN,
                selector: Arc::new(MinimalAreaIncreaseSelector),
                splitter: Arc::new(QuadraticSplitter),
            }),
        }
    }
}

impl fmt::Debug for RTreeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTreeConfig")
            .field("min_children", &self.inner.min_children)
            .field("max_children", &self.inner.max_children)
            .field("selector", &self.inner.selector)
            .field("splitter", &self.inner.splitter)
            .finish()
    }
}

fn default_min_children(max_children: usize) -> usize {
    (max_children as f64 * DEFAULT_FILLING_FACTOR).round() as usize
}

/// Fluent builder for [`RTreeConfig`] and empty [`RTree`]s.
///
/// Validation happens once, in [`config`](RTreeBuilder::config) or
/// [`create`](RTreeBuilder::create), since the default `min_children`
/// depends on `max_children`.
///
/// # Examples
///
/// ```rust
/// use rtree3d::{Cuboid, RTree};
///
/// let tree: RTree<u32, Cuboid> = RTree::builder().max_children(8).create().unwrap();
/// assert_eq!(tree.config().min_children(), 3);
///
/// let star = RTree::<u32, Cuboid>::star().max_children(6).config().unwrap();
/// assert_eq!(star.max_children(), 6);
/// ```
pub struct RTreeBuilder<V, G> {
    min_children: Option<usize>,
    max_children: usize,
    selector: Arc<dyn Selector>,
    splitter: Arc<dyn Splitter>,
    _marker: PhantomData<fn() -> (V, G)>,
}

impl<V, G: Geometry> Default for RTreeBuilder<V, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, G> Clone for RTreeBuilder<V, G> {
    fn clone(&self) -> Self {
        RTreeBuilder {
            min_children: self.min_children,
            max_children: self.max_children,
            selector: Arc::clone(&self.selector),
            splitter: Arc::clone(&self.splitter),
            _marker: PhantomData,
        }
    }
}

impl<V, G> fmt::Debug for RTreeBuilder<V, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RTreeBuilder")
            .field("min_children", &self.min_children)
            .field("max_children", &self.max_children)
            .field("selector", &self.selector)
            .field("splitter", &self.splitter)
            .finish()
    }
}

impl<V, G: Geometry> RTreeBuilder<V, G> {
    /// Creates a builder with the default settings: at most 4 children,
    /// minimal area increase selection and quadratic splits.
    pub fn new() -> Self {
        RTreeBuilder {
            min_children: None,
            max_children: DEFAULT_MAX_CHILDREN,
            selector: Arc::new(MinimalAreaIncreaseSelector),
            splitter: Arc::new(QuadraticSplitter),
            _marker: PhantomData,
        }
    }

    /// Sets the minimum number of children of every non-root node.
    ///
    /// When unset it is `max_children * 0.4`, rounded.
    pub fn min_children(mut self, min_children: usize) -> Self {
        self.min_children = Some(min_children);
        self
    }

    /// Sets the maximum number of children before a node splits.
    pub fn max_children(mut self, max_children: usize) -> Self {
        self.max_children = max_children;
        self
    }

    pub fn selector<S: Selector + 'static>(mut self, selector: S) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    pub fn splitter<S: Splitter + 'static>(mut self, splitter: S) -> Self {
        self.splitter = Arc::new(splitter);
        self
    }

    /// Switches to the R*-tree heuristics: minimal overlap increase
    /// selection and axis-sorted splits.
    pub fn star(self) -> Self {
        self.selector(MinimalOverlapIncreaseSelector)
            .splitter(RStarSplitter)
    }

    /// Validates the settings and returns the configuration.
    pub fn config(self) -> SpatialResult<RTreeConfig> {
        let min_children = self
            .min_children
            .unwrap_or_else(|| default_min_children(self.max_children));
        RTreeConfig::new(min_children, self.max_children, self.selector, self.splitter)
    }

    /// Validates the settings and returns an empty tree.
    pub fn create(self) -> SpatialResult<RTree<V, G>> {
        Ok(RTree::empty(self.config()?))
    }
}
