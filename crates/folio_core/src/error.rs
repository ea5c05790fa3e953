//! Core error types

use thiserror::Error;

/// Errors raised by the host model
///
/// None of these are fatal to a page: callers log them and fall back.
#[derive(Error, Debug)]
pub enum FolioError {
    /// An element handle no longer refers to a live element
    #[error("element not found: {0}")]
    MissingElement(String),

    /// The persistent store rejected a read or write
    #[error("store error: {0}")]
    Store(String),

    /// A host capability (clipboard, navigator) refused the request
    #[error("host refused request: {0}")]
    HostDenied(String),

    /// Filesystem failure while persisting state
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted state could not be (de)serialized
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, FolioError>;
