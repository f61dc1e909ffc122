//! Error types for the generator

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Generator errors
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("unknown type name: {0}")]
    UnknownType(String),

    #[error("duplicate type name: {0}")]
    DuplicateType(String),

    #[error("invalid type graph: {0}")]
    InvalidGraph(String),

    #[error("internal error: {0}")]
    Internal(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
