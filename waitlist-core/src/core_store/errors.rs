/*
    errors.rs - Error types for the store subsystem

    Covers failures talking to the backing key-value service:
    - Transport (connect, timeout, TLS)
    - Service-reported command errors
    - Replies that do not match the expected shape
*/

use thiserror::Error;

/// Errors that can occur in the store subsystem
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a reply
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status
    #[error("Store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service rejected the command
    #[error("Command failed: {0}")]
    Command(String),

    /// The reply did not have the expected shape
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    /// Store is not usable (misconfiguration, injected fault)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
