//! Error types for the directory crate.
//!
//! Ordinary unsatisfiable conditions (unknown identity, nothing to prune)
//! are no-ops or `None`, never errors; only snapshot decoding can fail.

use thiserror::Error;

/// Result alias for directory operations that can fail.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Errors surfaced by the directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A snapshot blob could not be decoded.
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}
