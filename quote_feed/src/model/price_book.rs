//! Latest close per symbol, shared by all workers.
//!
//! A symbol enters the book on its first request, at a starting price derived from its
//! name, so restarting the feed replays the same opening levels. Every later request
//! moves the price one step along the random walk.
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Mutex;

use quote_parser::Symbol;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::model::bar::{next_price, round_price};

/// FNV-1a over the symbol text; stable across runs and platforms.
pub fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol
        .as_str()
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325, |hash, b| {
            (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        })
}

/// Starting price for a symbol, between 5 and 500.
pub fn opening_price(symbol: &Symbol) -> f64 {
    let mut rng = StdRng::seed_from_u64(symbol_seed(symbol));
    round_price(rng.random_range(5.0..500.0))
}

/// Daily volume range for a symbol; some symbols trade a lot more than others.
pub fn volume_range(symbol: &Symbol) -> Range<u64> {
    let base = 100_000 * (1 + symbol_seed(symbol) % 200);
    base..base * 4
}

#[derive(Default)]
struct BookState {
    prices: HashMap<Symbol, f64>,
    served: u64,
}

/// Thread-safe price state of the feed.
#[derive(Default)]
pub struct PriceBook {
    state: Mutex<BookState>,
}

impl PriceBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `symbol` one step and returns the new close along with how many series
    /// the book has served so far, this one included.
    pub fn advance(&self, symbol: &Symbol) -> Result<(f64, u64)> {
        let mut state = self.state.lock()?;
        state.served += 1;
        let served = state.served;
        let price = state
            .prices
            .entry(symbol.clone())
            .or_insert_with(|| opening_price(symbol));
        *price = next_price(*price, &mut rand::rng());
        Ok((*price, served))
    }

    /// Current close of `symbol`, if it was ever requested.
    #[cfg(test)]
    pub fn price(&self, symbol: &Symbol) -> Result<Option<f64>> {
        let state = self.state.lock()?;
        Ok(state.prices.get(symbol).copied())
    }
}
