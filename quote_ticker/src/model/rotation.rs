//! Round-robin over the configured symbols.
use quote_parser::{QuoteError, Symbol};

/// Symbols polled by the ticker, the current one first.
#[derive(Debug, Clone)]
pub struct SymbolRotation {
    symbols: Vec<Symbol>,
    index: usize,
}

impl SymbolRotation {
    /// Creates a rotation starting at the first symbol. The list must not be empty.
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, QuoteError> {
        if symbols.is_empty() {
            return Err(QuoteError::Format(String::from("no symbols to poll")));
        }
        Ok(Self { symbols, index: 0 })
    }

    /// Symbol polled in the current cycle.
    pub fn current(&self) -> &Symbol {
        &self.symbols[self.index]
    }

    /// Moves to the next symbol, wrapping around, and returns it.
    pub fn advance(&mut self) -> &Symbol {
        self.index = (self.index + 1) % self.symbols.len();
        self.current()
    }
}
