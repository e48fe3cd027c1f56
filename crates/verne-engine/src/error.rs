//! Error types for the engine.
//!
//! Nothing here is fatal: persistence failures are reported to the player
//! as narrative text and the session carries on.

use thiserror::Error;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Failures of the underlying key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while saving or restoring a session.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The saved blob is not valid JSON of the expected shape.
    #[error("corrupted save data: {0}")]
    Parse(#[from] serde_json::Error),

    /// The saved room no longer exists in the world.
    #[error("saved room \"{0}\" does not exist")]
    UnknownRoom(String),

    /// The blob parsed but holds values the session cannot use.
    #[error("invalid save data: {0}")]
    Invalid(String),
}
