//! Error types for fragment loading.

use thiserror::Error;

/// Error types for asset loading.
///
/// Each variant represents a specific failure mode in the load pipeline.
#[derive(Error, Debug)]
pub enum AssetError {
    /// Fragment does not exist under the asset root.
    #[error("Fragment not found: {0}")]
    NotFound(String),

    /// Resolved path escapes the asset root; the read is refused.
    #[error("Path resolves outside the asset root: {0}")]
    OutsideRoot(String),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    System(#[from] std::io::Error),
}
