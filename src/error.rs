//! Error types for acadgraph

use std::io;
use thiserror::Error;

use crate::types::Handle;

/// Main error type for acadgraph operations.
///
/// Only conditions that make the current load or write meaningless end up
/// here. Recoverable problems (dangling handles, known-but-unsupported
/// objects) are reported through [`crate::notification::DiagnosticsSink`].
#[derive(Debug, Error)]
pub enum DxfError {
    /// IO error occurred during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing the DXF stream
    #[error("Parse error: {0}")]
    Parse(String),

    /// Group code outside of any known value range
    #[error("Invalid group code: {0}")]
    InvalidGroupCode(i32),

    /// Handle value that cannot be parsed or is not allowed in context
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    /// Two records claim the same handle within one load
    #[error("Duplicate handle: {0}")]
    DuplicateHandle(Handle),

    /// Object variant that has no serialization routine at all
    #[error("Unsupported object {object_name} with handle {handle}")]
    UnsupportedObject {
        handle: Handle,
        object_name: String,
    },

    /// Invalid sentinel in a binary file
    #[error("Invalid sentinel: {0}")]
    InvalidSentinel(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias for acadgraph operations
pub type Result<T> = std::result::Result<T, DxfError>;

impl From<String> for DxfError {
    fn from(s: String) -> Self {
        DxfError::Custom(s)
    }
}

impl From<&str> for DxfError {
    fn from(s: &str) -> Self {
        DxfError::Custom(s.to_string())
    }
}
