//! Error types for the swipe-to-playlist core
//!
//! Every fallible operation in the crate returns [`Result`]. The UI layer
//! decides presentation; nothing in here retries on its own.

use thiserror::Error;

/// Crate-wide result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the session manager, materializer, and their
/// collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Session store read failed or returned a malformed row
    #[error("store read failed: {0}")]
    StoreRead(String),

    /// Session store write failed or was lost to a concurrent writer
    #[error("store write failed: {0}")]
    StoreWrite(String),

    /// Completion attempted before every candidate was swiped
    #[error("deck not exhausted: {recorded} of {expected} decisions recorded")]
    IncompleteDeck { recorded: usize, expected: usize },

    /// Recommendation service returned non-2xx or a malformed payload
    #[error("recommendation service error: {0}")]
    Recommendation(String),

    /// External platform returned non-2xx or a malformed payload
    #[error("platform api error: {0}")]
    PlatformApi(String),

    /// Requested row or active session does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid caller input (empty playlist name, wrong lifecycle state)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a store read failure
    pub fn store_read(err: impl std::fmt::Display) -> Self {
        Error::StoreRead(err.to_string())
    }

    /// Wrap a store write failure
    pub fn store_write(err: impl std::fmt::Display) -> Self {
        Error::StoreWrite(err.to_string())
    }

    /// Wrap a recommendation service failure
    pub fn recommendation(err: impl std::fmt::Display) -> Self {
        Error::Recommendation(err.to_string())
    }

    /// Wrap an external platform failure
    pub fn platform(err: impl std::fmt::Display) -> Self {
        Error::PlatformApi(err.to_string())
    }
}
