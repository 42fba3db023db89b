//! Error types for the Galaxy3D quad tree
//!
//! Most quad tree operations degrade gracefully (duplicates and non-finite
//! positions are ignored, lookups on an empty tree find nothing). Only
//! arguments that make an operation meaningless are surfaced as errors.

use std::fmt;

/// Result type for quad tree operations
pub type Galaxy3dResult<T> = Result<T, Galaxy3dError>;

/// Quad tree errors
#[derive(Debug, Clone, PartialEq)]
pub enum Galaxy3dError {
    /// An argument was out of its valid domain
    /// (non-positive viewing distance, infinite bounds edge, bad config)
    InvalidArgument(String),

    /// A node handle does not belong to the tree (stale after `clear`,
    /// or taken from another tree)
    InvalidNode(String),
}

impl fmt::Display for Galaxy3dError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Galaxy3dError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Galaxy3dError::InvalidNode(msg) => write!(f, "Invalid node: {}", msg),
        }
    }
}

impl std::error::Error for Galaxy3dError {}

/// Log an error (with file:line) and build a `Galaxy3dError::InvalidArgument`.
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_quadtree::quadtree_err;
/// let err = quadtree_err!("galaxy3d::QuadTree", "Viewing distance must be positive, got {}", -1.0);
/// ```
#[macro_export]
macro_rules! quadtree_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::quadtree_error!($source, "{}", message);
        $crate::galaxy3d::Galaxy3dError::InvalidArgument(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
