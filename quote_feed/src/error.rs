//! Error types used across the local feed.
//!
//! Most functions return `crate::error::Result<T>`, whose error defaults to `FeedError`.
//! A blanket `From<PoisonError<T>>` turns a poisoned price-book lock into
//! `FeedError::MutexLock`.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type for the feed server.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Socket or listener I/O.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while serializing a response body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The client sent something that is not an HTTP request line.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The shared price book lock was poisoned by a panicking worker.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for FeedError {
    fn from(err: PoisonError<T>) -> Self {
        FeedError::MutexLock(err.to_string())
    }
}

/// Result alias with `FeedError` as the default error.
pub type Result<T, E = FeedError> = std::result::Result<T, E>;
