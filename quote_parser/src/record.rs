//! The validated result of parsing one payload.
use serde::Serialize;

/// Daily quote values for one symbol.
///
/// Only [`extract`](crate::extractor::extract) builds these, so every record holds five
/// values that were present in the payload and passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteRecord {
    symbol: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl QuoteRecord {
    pub(crate) fn new(symbol: &str, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            symbol: symbol.to_string(),
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Symbol supplied by the caller of the parse.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Opening price.
    pub fn open(&self) -> f64 {
        self.open
    }

    /// Highest price of the day.
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Lowest price of the day.
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Closing (or latest) price.
    pub fn close(&self) -> f64 {
        self.close
    }

    /// Traded volume.
    pub fn volume(&self) -> u64 {
        self.volume
    }

    /// Price move over the day, `close - open`.
    pub fn change(&self) -> f64 {
        self.close - self.open
    }

    /// Formats the numeric fields in the compact payload dialect.
    ///
    /// Feeding the result back through the parser yields an equal record.
    pub fn to_payload(&self) -> String {
        format!(
            r#"{{"open":"{}","high":"{}","low":"{}","close":"{}","volume":"{}"}}"#,
            self.open, self.high, self.low, self.close, self.volume
        )
    }
}
