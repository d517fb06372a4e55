//! Error and result types for R-tree operations.

use thiserror::Error;

/// Errors that can occur while building geometries, nodes or trees.
///
/// Every error is reported synchronously by the call that violated a
/// precondition. Nothing in this crate performs I/O, so there is no transient
/// failure class and nothing is ever retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    /// A constructor received arguments that break one of its preconditions,
    /// e.g. a cuboid with `x1 > x2`, a node with no children or a
    /// configuration with `min_children > max_children / 2`.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SpatialError {
    /// Logs `message` at error level and wraps it in
    /// [`SpatialError::InvalidArgument`].
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        let message = message.into();
        log::error!("{}", message);
        SpatialError::InvalidArgument(message)
    }

    /// Returns true if this is an [`SpatialError::InvalidArgument`].
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SpatialError::InvalidArgument(_))
    }
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;
