//!
//! Quote payload parsing core plus the types shared by the ticker and the feed.
//!
//! This crate aggregates:
//! - `token`: lazy tokenizer over a borrowed payload.
//! - `number`: numeric literal grammar and typed conversions.
//! - `extractor`: single-pass field extraction into a `QuoteRecord`.
//! - `record`: the validated `QuoteRecord`.
//! - `field`: the five required fields.
//! - `error`: `ParseError` for payloads and the unified `QuoteError`.
//! - `result`: handy `Result<T, QuoteError>` alias.
//! - `symbol`: ticker symbols and symbol-file parsing.
//! - `api`: constants and slicing helpers for the upstream daily-series API.
//!
//! The parsing path is pure: no I/O, no logging, no shared state.
#![warn(missing_docs)]
pub mod api;
pub mod error;
pub mod extractor;
pub mod field;
pub mod number;
pub mod record;
pub mod result;
pub mod symbol;
pub mod token;

pub use error::{ParseError, QuoteError};
pub use extractor::{extract, parse_quote, parse_quote_bytes};
pub use field::Field;
pub use record::QuoteRecord;
pub use result::Result;
pub use symbol::{Symbol, SymbolParser};
pub use token::{Token, Tokenizer, tokenize};
