//! Error types for the docmatch library.
//!
//! Extraction itself does not fail: unfound documents, absent bindings,
//! empty field mappers and plan nodes without element capability all
//! produce well-formed (possibly empty) results. The errors below originate
//! in collaborators such as feature program compilation, tensor encoding or
//! on-summary tasks, and are propagated unchanged.
//!
//! # Examples
//!
//! ```
//! use docmatch::error::{DocMatchError, Result};
//!
//! fn compile_feature(name: &str) -> Result<()> {
//!     Err(DocMatchError::feature(format!("unknown feature '{name}'")))
//! }
//!
//! match compile_feature("fieldMatch(title)") {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for docmatch operations.
#[derive(Error, Debug)]
pub enum DocMatchError {
    /// I/O errors (encoding buffers, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Feature program errors (unknown feature names, etc.)
    #[error("Feature error: {0}")]
    Feature(String),

    /// Tensor encoding/decoding errors
    #[error("Tensor error: {0}")]
    Tensor(String),

    /// Attribute related errors
    #[error("Attribute error: {0}")]
    Attribute(String),

    /// Task executor errors
    #[error("Executor error: {0}")]
    Executor(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with DocMatchError.
pub type Result<T> = std::result::Result<T, DocMatchError>;

impl DocMatchError {
    /// Create a new feature error.
    pub fn feature<S: Into<String>>(msg: S) -> Self {
        DocMatchError::Feature(msg.into())
    }

    /// Create a new tensor error.
    pub fn tensor<S: Into<String>>(msg: S) -> Self {
        DocMatchError::Tensor(msg.into())
    }

    /// Create a new attribute error.
    pub fn attribute<S: Into<String>>(msg: S) -> Self {
        DocMatchError::Attribute(msg.into())
    }

    /// Create a new executor error.
    pub fn executor<S: Into<String>>(msg: S) -> Self {
        DocMatchError::Executor(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        DocMatchError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        DocMatchError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = DocMatchError::feature("unknown feature 'foo'");
        assert_eq!(error.to_string(), "Feature error: unknown feature 'foo'");

        let error = DocMatchError::tensor("bad format tag 7");
        assert_eq!(error.to_string(), "Tensor error: bad format tag 7");

        let error = DocMatchError::invalid_config("num_executors must be > 0");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: num_executors must be > 0"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::UnexpectedEof, "short buffer");
        let error = DocMatchError::from(io_error);

        match error {
            DocMatchError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
