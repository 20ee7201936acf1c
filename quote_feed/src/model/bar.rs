//! Synthetic daily bars.
//!
//! Prices move by a small random walk: every step changes the price by a uniform amount
//! in `[-1%, +1%]`, never going below one cent. Prices are kept to four decimals, the
//! precision the upstream API prints, so what the feed serves parses back exactly.
use std::ops::Range;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::Rng;

/// Lowest price the walk can reach.
pub const MIN_PRICE: f64 = 0.01;

/// One trading day for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBar {
    /// Trading day.
    pub date: NaiveDate,
    /// First trade of the day.
    pub open: f64,
    /// Highest trade of the day.
    pub high: f64,
    /// Lowest trade of the day.
    pub low: f64,
    /// Last trade of the day.
    pub close: f64,
    /// Shares traded.
    pub volume: u64,
}

/// Rounds to the four decimals the upstream API prints.
pub fn round_price(price: f64) -> f64 {
    (price * 10_000.0).round() / 10_000.0
}

/// Next price of the walk starting at `current`.
pub fn next_price(current: f64, rng: &mut impl Rng) -> f64 {
    let change: f64 = rng.random_range(-0.01..0.01);
    round_price((current * (1.0 + change)).max(MIN_PRICE))
}

/// `date` itself on a weekday, otherwise the Friday before it.
pub fn latest_trading_day(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Days::new(1),
        Weekday::Sun => date - Days::new(2),
        _ => date,
    }
}

/// The weekday before `date`.
pub fn previous_trading_day(date: NaiveDate) -> NaiveDate {
    latest_trading_day(date - Days::new(1))
}

impl DailyBar {
    /// Builds a bar for `date` that closed at `close`.
    ///
    /// The open is one walk step away from the close; high and low widen the open/close
    /// range by up to half a percent each way.
    pub fn closing_at(date: NaiveDate, close: f64, volumes: Range<u64>, rng: &mut impl Rng) -> Self {
        let close = round_price(close.max(MIN_PRICE));
        let open = next_price(close, rng);
        let high = round_price(open.max(close) * (1.0 + rng.random_range(0.0..0.005)));
        let low = round_price((open.min(close) * (1.0 - rng.random_range(0.0..0.005))).max(MIN_PRICE));
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: rng.random_range(volumes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn walk_stays_within_one_percent() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut price = 100.0;
        for _ in 0..1_000 {
            let next = next_price(price, &mut rng);
            assert!((next - price).abs() <= price * 0.01 + 0.0001, "{price} -> {next}");
            assert!(next >= MIN_PRICE);
            price = next;
        }
    }

    #[test]
    fn walk_never_goes_below_a_cent() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(next_price(MIN_PRICE, &mut rng) >= MIN_PRICE);
        assert_eq!(next_price(0.0, &mut rng), MIN_PRICE);
    }

    #[test]
    fn bar_is_consistent() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let bar = DailyBar::closing_at(day(2017, 12, 1), 10.1, 1_000..5_000, &mut rng);
            assert_eq!(bar.close, 10.1);
            assert!(bar.low <= bar.open.min(bar.close), "{bar:?}");
            assert!(bar.high >= bar.open.max(bar.close), "{bar:?}");
            assert!((1_000..5_000).contains(&bar.volume));
            assert_eq!(round_price(bar.high), bar.high);
        }
    }

    #[test]
    fn trading_days_skip_weekends() {
        // 2017-12-01 was a Friday
        assert_eq!(latest_trading_day(day(2017, 12, 1)), day(2017, 12, 1));
        assert_eq!(latest_trading_day(day(2017, 12, 2)), day(2017, 12, 1));
        assert_eq!(latest_trading_day(day(2017, 12, 3)), day(2017, 12, 1));
        assert_eq!(previous_trading_day(day(2017, 12, 4)), day(2017, 12, 1));
        assert_eq!(previous_trading_day(day(2017, 12, 1)), day(2017, 11, 30));
    }
}
