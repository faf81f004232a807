//! Error types for value-table operations.

use thiserror::Error;

/// Result type for value-table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while exporting a value table.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
