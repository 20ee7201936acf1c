//! Field extraction: token stream in, validated `QuoteRecord` out.
//!
//! The walk is single-pass and order-independent. Each required field takes the first
//! `Number` that follows its first `Key` and precedes the next `Key`. A later duplicate
//! of a key only closes the previous window; it never replaces the first occurrence,
//! because the most recent daily entry comes first in the payload.
//!
//! A payload that does not end on a closing `}` or `]` may have been cut between two
//! pairs; if a required key is then missing, the result is `Truncated`, not `MissingKey`.
use std::borrow::Cow;

use crate::error::ParseError;
use crate::field::Field;
use crate::number::{parse_price, parse_volume};
use crate::record::QuoteRecord;
use crate::token::{Token, tokenize};

/// Progress of one required field during the walk.
#[derive(Debug, Clone, Copy)]
enum Slot<'a> {
    Unseen,
    /// The key was seen; `nearby` is the first string literal found in its window so far.
    Searching { nearby: Option<&'a str> },
    Found(&'a str),
}

/// Builds a `QuoteRecord` for `symbol` from a token stream.
pub fn extract<'a, I>(tokens: I, symbol: &str) -> Result<QuoteRecord, ParseError>
where
    I: IntoIterator<Item = Token<'a>>,
{
    let mut slots = [Slot::Unseen; 5];
    let mut window: Option<Field> = None;
    let mut seen_any = false;
    let mut truncated = false;
    let mut closed = false;

    for token in tokens {
        seen_any = true;
        closed = matches!(token, Token::Punctuation('}' | ']'));
        match token {
            Token::Key(name) => {
                window = Field::from_key(name)
                    .filter(|field| matches!(slots[field.index()], Slot::Unseen));
                if let Some(field) = window {
                    slots[field.index()] = Slot::Searching { nearby: None };
                }
            }
            Token::Number(text) => {
                if let Some(field) = window.take() {
                    slots[field.index()] = Slot::Found(text);
                }
            }
            Token::StringLiteral(text) => {
                if let Some(field) = window {
                    if let Slot::Searching { nearby } = &mut slots[field.index()] {
                        nearby.get_or_insert(text);
                    }
                }
            }
            Token::Truncated(_) => truncated = true,
            Token::Punctuation(_) => {}
        }
    }

    if !seen_any {
        return Err(ParseError::EmptyPayload);
    }
    if truncated {
        return Err(ParseError::Truncated);
    }
    if !closed && slots.iter().any(|slot| matches!(slot, Slot::Unseen)) {
        return Err(ParseError::Truncated);
    }

    let mut values = [""; 5];
    for field in Field::ALL {
        values[field.index()] = match slots[field.index()] {
            Slot::Unseen => return Err(ParseError::MissingKey(field)),
            Slot::Searching { nearby } => {
                return Err(ParseError::MalformedNumber(field, nearby.unwrap_or_default().to_string()));
            }
            Slot::Found(text) => text,
        };
    }

    let price = |field: Field| parse_price(field, values[field.index()]);
    Ok(QuoteRecord::new(
        symbol,
        price(Field::Open)?,
        price(Field::High)?,
        price(Field::Low)?,
        price(Field::Close)?,
        parse_volume(Field::Volume, values[Field::Volume.index()])?,
    ))
}

/// Tokenizes and extracts `payload` in one call.
pub fn parse_quote(payload: &str, symbol: &str) -> Result<QuoteRecord, ParseError> {
    extract(tokenize(payload), symbol)
}

/// Like [`parse_quote`] for raw bytes; invalid UTF-8 is replaced, not rejected.
pub fn parse_quote_bytes(payload: &[u8], symbol: &str) -> Result<QuoteRecord, ParseError> {
    let text: Cow<'_, str> = String::from_utf8_lossy(payload);
    parse_quote(&text, symbol)
}
