//! Response documents in the upstream daily-series layout.
//!
//! ```text
//! {
//!   "Meta Data": { "1. Information": ..., "2. Symbol": "AMD", ... },
//!   "Time Series (Daily)": {
//!     "2017-12-01": { "1. open": "10.2900", ..., "5. volume": "36981658" },
//!     ...
//!   }
//! }
//! ```
//!
//! Days are written most recent first; the ticker relies on that order.
use chrono::NaiveDate;
use quote_parser::Field;
use quote_parser::Symbol;
use quote_parser::api::{META_KEY, SERIES_KEY, series_key};
use rand::Rng;
use serde_json::{Map, Value, json};

use crate::model::bar::{DailyBar, next_price, previous_trading_day};

const INFORMATION: &str = "Daily Prices (open, high, low, close) and Volumes";
const TIME_ZONE: &str = "US/Eastern";

/// `days` bars ending with the one for `latest` closing at `close`, most recent first.
///
/// Each older close is one walk step away from the open of the day after it.
pub fn walk_back(
    symbol: &Symbol,
    latest: NaiveDate,
    close: f64,
    days: u32,
    rng: &mut impl Rng,
) -> Vec<DailyBar> {
    let volumes = crate::model::price_book::volume_range(symbol);
    let mut bars: Vec<DailyBar> = Vec::with_capacity(days as usize);
    let mut date = latest;
    let mut close = close;
    for _ in 0..days {
        let bar = DailyBar::closing_at(date, close, volumes.clone(), rng);
        close = next_price(bar.open, rng);
        date = previous_trading_day(date);
        bars.push(bar);
    }
    bars
}

fn price_text(price: f64) -> Value {
    Value::String(format!("{price:.4}"))
}

fn entry(bar: &DailyBar) -> Value {
    let mut fields = Map::new();
    for field in Field::ALL {
        let value = match field {
            Field::Open => price_text(bar.open),
            Field::High => price_text(bar.high),
            Field::Low => price_text(bar.low),
            Field::Close => price_text(bar.close),
            Field::Volume => Value::String(bar.volume.to_string()),
        };
        fields.insert(series_key(field), value);
    }
    Value::Object(fields)
}

/// The full response document for `symbol`.
pub fn daily_series(symbol: &Symbol, bars: &[DailyBar]) -> Value {
    let refreshed = bars
        .first()
        .map(|bar| bar.date.to_string())
        .unwrap_or_default();
    let meta = json!({
        "1. Information": INFORMATION,
        "2. Symbol": symbol.as_str(),
        "3. Last Refreshed": refreshed,
        "4. Output Size": "Compact",
        "5. Time Zone": TIME_ZONE,
    });

    let mut series = Map::new();
    for bar in bars {
        series.insert(bar.date.to_string(), entry(bar));
    }

    let mut document = Map::new();
    document.insert(META_KEY.to_string(), meta);
    document.insert(SERIES_KEY.to_string(), Value::Object(series));
    Value::Object(document)
}

/// The body upstream sends for a request it cannot serve.
pub fn error_body(message: &str) -> Value {
    json!({ "Error Message": message })
}
