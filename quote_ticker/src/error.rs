//! Error types used across the Quote Ticker.
//!
//! `FetchError` covers everything that can go wrong before a payload reaches the parser;
//! it is deliberately distinct from an empty but successful response. `TickerError`
//! unifies fetch, parse, and I/O failures so they can be propagated with `?`.
use std::io;

use quote_parser::{ParseError, QuoteError};
use thiserror::Error;

/// Failure to obtain a payload from the upstream API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS handshake (including an enforced pin mismatch), timeout, or body
    /// read failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success HTTP status.
    #[error("Upstream returned HTTP status {0}")]
    Status(u16),

    /// The pinned TLS configuration could not be built.
    #[error("TLS setup failed: {0}")]
    Tls(String),

    /// An enforced pin was configured for a URL that does not use TLS.
    #[error("Certificate pin cannot be enforced for non-HTTPS URL {0}")]
    PinRequiresHttps(String),

    /// The configured fingerprint is not 32 bytes of hex.
    #[error("Invalid certificate fingerprint: {0}")]
    InvalidFingerprint(String),
}

/// Unified error type for the ticker.
#[derive(Error, Debug)]
pub enum TickerError {
    /// I/O error from files or the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The payload could not be fetched.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// The payload could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Symbol configuration or other library error.
    #[error(transparent)]
    Quote(#[from] QuoteError),
}

/// Result alias with `TickerError` as the default error.
pub type Result<T, E = TickerError> = std::result::Result<T, E>;
