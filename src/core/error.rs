//! Error types for the synchronization engine
//!
//! Network, server and decode failures all collapse into the same transient
//! notice at the operation boundary; the variants exist for logging and tests.

use thiserror::Error;

/// Failure of a point operation
#[derive(Error, Debug)]
pub enum SyncError {
    /// The request could not complete (connect, DNS, body stream)
    #[error("Request failed: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Server returned {status}")]
    Server { status: reqwest::StatusCode },

    /// A success response carried a body outside the contract
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// A local precondition was not met; nothing was sent
    #[error("{0}")]
    Validation(String),

    /// The operation is not available in the current editor state
    #[error("Not allowed while {0}")]
    InvalidState(&'static str),
}

pub type SyncResult<T> = Result<T, SyncError>;
