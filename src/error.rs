//! Error types for docoutline library.
//!
//! Analysis itself never fails: degraded or malformed input is absorbed and
//! reported through [`Diagnostics`](crate::render::Diagnostics). These errors
//! only surface from the I/O edges (loading span files, writing JSON).

use std::io;
use thiserror::Error;

/// Result type alias for docoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading input or rendering output.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON or does not match any accepted layout.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The span input is structurally unusable.
    #[error("Invalid span input: {0}")]
    InvalidInput(String),

    /// The persona configuration cannot be read.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// A document named in the configuration has no span file.
    #[error("Document not found: {0}")]
    MissingDocument(String),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A result could not be serialized.
    #[error("Rendering error: {0}")]
    Render(String),
}
