// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <j.d.a.jewell@open.ac.uk>

//! Error types for the Chroma data-access client.
//!
//! Only write operations (create, delete, rename, add, update) surface these
//! errors to callers. Read operations absorb failures and hand back an empty
//! or default value instead, so a [`ChromaError`] reaching application code
//! always means an intentional mutation did not go through.

use thiserror::Error;

/// Error type for data-access operations.
#[derive(Error, Debug)]
pub enum ChromaError {
    /// The tenant, database, collection or record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The remote service rejected the credentials (HTTP 401 / 403).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The entity being created already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An underlying HTTP / network transport error from `reqwest`.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote service returned an HTTP error status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Client-side validation failed before the request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request exceeded the configured timeout.
    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl ChromaError {
    /// HTTP status carried by this error, if it came from a remote reply.
    pub fn status(&self) -> Option<u16> {
        match self {
            ChromaError::NotFound(_) => Some(404),
            ChromaError::Conflict(_) => Some(409),
            ChromaError::Server { status, .. } => Some(*status),
            ChromaError::Network(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Crate-level result alias using [`ChromaError`].
pub type Result<T> = std::result::Result<T, ChromaError>;
