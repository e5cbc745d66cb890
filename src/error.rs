//! Error types for the Sieve library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`SieveError`] enum.
//!
//! # Examples
//!
//! ```
//! use sieve::error::{Result, SieveError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SieveError::invalid_argument("label must not be empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Sieve operations.
///
/// Uses `thiserror` for the `Error` implementation and provides constructor
/// helpers for the string-carrying variants.
#[derive(Error, Debug)]
pub enum SieveError {
    /// I/O errors (snapshot files, corpus files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors outside of snapshot decoding
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Analysis-related errors (tokenizer construction, filtering)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// A snapshot could not be decoded into a valid model
    #[error("Decode error: {0}")]
    Decode(String),

    /// The model has no labels or no vocabulary for the requested query
    #[error("Model not trained: {0}")]
    UntrainedModel(String),

    /// The caller broke an input contract (empty label, bad key, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Snapshot store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SieveError.
pub type Result<T> = std::result::Result<T, SieveError>;

impl SieveError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        SieveError::Analysis(msg.into())
    }

    /// Create a new decode error.
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        SieveError::Decode(msg.into())
    }

    /// Create a new untrained model error.
    pub fn untrained<S: Into<String>>(msg: S) -> Self {
        SieveError::UntrainedModel(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SieveError::InvalidArgument(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SieveError::Storage(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SieveError::Other(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SieveError::InvalidArgument(format!("Invalid configuration: {}", msg.into()))
    }

    /// Whether this error means a persisted snapshot was unusable.
    ///
    /// These are the errors an embedding layer may recover from by starting
    /// over with an empty model.
    pub fn is_recoverable_snapshot_error(&self) -> bool {
        matches!(
            self,
            SieveError::Decode(_) | SieveError::Io(_) | SieveError::Storage(_)
        )
    }
}
