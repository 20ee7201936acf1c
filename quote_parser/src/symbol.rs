//! Ticker symbols and helpers shared between the ticker and the feed.

use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

const MAX_SYMBOL_LEN: usize = 15;

/// Trait providing file parsing for symbols.
pub trait SymbolParser: Sized {
    /// Parses symbols from a buffered reader.
    ///
    /// Entries may be separated by commas, spaces, or new lines; empty entries are
    /// ignored. Returns an error naming the line if any entry is not a valid symbol.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, QuoteError>;
}

/// Normalized (upper-case) market symbol, e.g. `AMD` or `BRK.B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parse and normalize a symbol to uppercase.
    pub fn parse(input: &str) -> Result<Self, QuoteError> {
        let trimmed = input.trim();
        let invalid = |reason| QuoteError::InvalidSymbol {
            symbol: trimmed.to_string(),
            reason,
        };
        if trimmed.is_empty() {
            return Err(invalid("empty"));
        }
        if trimmed.len() > MAX_SYMBOL_LEN {
            return Err(invalid("too long"));
        }
        if !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(invalid("must start with a letter"));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(invalid("unexpected character"));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits a comma/whitespace separated list into symbols.
    pub fn parse_list(text: &str) -> Result<Vec<Self>, QuoteError> {
        text.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|entry| !entry.is_empty())
            .map(Self::parse)
            .collect()
    }
}

impl SymbolParser for Symbol {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, QuoteError> {
        let mut symbols = Vec::new();

        for (number, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(QuoteError::Io)?;
            match Self::parse_list(&line) {
                Ok(parsed) => symbols.extend(parsed),
                Err(e) => {
                    return Err(QuoteError::ParseSymbolsFile(format!("line {}: {}", number + 1, e)));
                }
            }
        }
        Ok(symbols)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Symbol {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_and_normalizes_symbol() {
        let parsed = Symbol::parse(" amd ").expect("symbol should parse");
        assert_eq!(parsed.as_str(), "AMD");
        assert_eq!("brk.b".parse::<Symbol>().expect("dotted symbol").to_string(), "BRK.B");
    }

    #[test]
    fn rejects_invalid_symbols() {
        for input in ["", "1AMD", "AM$D", "ABCDEFGHIJKLMNOP"] {
            let err = Symbol::parse(input).expect_err("must fail");
            assert!(matches!(err, QuoteError::InvalidSymbol { .. }), "{input}: {err}");
        }
    }

    #[test]
    fn reads_mixed_separators_from_file() {
        let file = Cursor::new("AMD, amzn\n\nSNAP VTTSX\n");
        let symbols = Symbol::parse_from_file(file).expect("file should parse");
        let names: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        assert_eq!(names, ["AMD", "AMZN", "SNAP", "VTTSX"]);
    }

    #[test]
    fn file_errors_name_the_line() {
        let file = Cursor::new("AMD\nAMZN, 42\n");
        let err = Symbol::parse_from_file(file).expect_err("must fail");
        match err {
            QuoteError::ParseSymbolsFile(message) => assert!(message.starts_with("line 2:"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn serde_round_trips_through_string() {
        let symbol: Symbol = serde_json::from_str("\"snap\"").expect("deserialize");
        assert_eq!(symbol.as_str(), "SNAP");
        assert_eq!(serde_json::to_string(&symbol).expect("serialize"), "\"SNAP\"");
        assert!(serde_json::from_str::<Symbol>("\"$$\"").is_err());
    }
}
