//! Error types shared by the parser core, the ticker and the feed.
//!
//! `ParseError` is the closed set of outcomes the field extractor can report for an
//! untrusted payload. `QuoteError` unifies it with the I/O and validation failures of
//! the surrounding code (symbol files, symbol validation), so callers can propagate a
//! single error type with `?`.
use std::io;

use thiserror::Error;

use crate::field::Field;

/// Why a payload could not be turned into a `QuoteRecord`.
///
/// Every variant is an expected outcome of external input; none of them is fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The payload produced no tokens at all (no bytes, or nothing recognizable).
    #[error("payload is empty")]
    EmptyPayload,

    /// The payload ends inside a quoted run or right after a key.
    #[error("payload is truncated")]
    Truncated,

    /// A required key never appears in the payload.
    #[error("missing key: {0}")]
    MissingKey(Field),

    /// A required key is present but its value is not a valid number.
    /// Carries the text found next to the key (empty when there was none).
    #[error("malformed number for {0}: {1:?}")]
    MalformedNumber(Field, String),
}

/// Unified error type for the library and its callers.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing a symbols file into `Symbol` values.
    #[error("Parse symbols file error: {0}")]
    ParseSymbolsFile(String),

    /// A ticker symbol failed validation.
    #[error("Invalid symbol {symbol:?}: {reason}")]
    InvalidSymbol {
        /// The rejected input, trimmed.
        symbol: String,
        /// Which rule it broke.
        reason: &'static str,
    },

    /// The quote payload could not be parsed.
    #[error("Quote parse error: {0}")]
    Parse(#[from] ParseError),
}
