//! Direction of a quote compared with the previous poll of the same symbol.
use strum_macros::Display;

/// Price direction shown next to a fresh quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Trend {
    /// Close is above the previously seen close.
    Up,
    /// Close is below the previously seen close.
    Down,
    /// Close is unchanged, or the symbol has not been seen before.
    Flat,
}

impl Trend {
    /// Compares `current` with the close from the previous poll, if any.
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(previous) if current > previous => Trend::Up,
            Some(previous) if current < previous => Trend::Down,
            _ => Trend::Flat,
        }
    }

    /// Single-character marker for the display.
    pub fn glyph(self) -> char {
        match self {
            Trend::Up => '▲',
            Trend::Down => '▼',
            Trend::Flat => '=',
        }
    }
}
