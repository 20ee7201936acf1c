//! Rendering quotes to a text display.
//!
//! The poll loop hands the renderer one `Frame` per cycle: a fresh record with its
//! trend, the last good record marked stale, or a placeholder when nothing is cached.
//! Formatting lives here only; records arrive already validated.
use std::io::Write;

use chrono::Local;
use quote_parser::{QuoteRecord, Symbol};

use crate::error::Result;
use crate::model::trend::Trend;

/// What to show for the current cycle.
#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    /// A record parsed in this cycle.
    Fresh {
        /// The new record.
        record: &'a QuoteRecord,
        /// Direction versus the previous poll of the same symbol.
        trend: Trend,
    },
    /// The last good record for the symbol, because this cycle failed.
    Stale {
        /// Cached record.
        record: &'a QuoteRecord,
        /// Why the cycle failed.
        reason: &'a str,
    },
    /// Nothing to show for the symbol yet.
    Placeholder {
        /// Symbol of the failed cycle.
        symbol: &'a Symbol,
        /// Why the cycle failed.
        reason: &'a str,
    },
}

/// Consumer of validated quotes.
pub trait Renderer {
    /// Draws one frame.
    fn render(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// Renders frames as text to any writer (stdout in production).
pub struct TerminalRenderer<W: Write> {
    out: W,
    compact: bool,
}

impl<W: Write> TerminalRenderer<W> {
    /// Creates a renderer; `compact` selects one line per frame.
    pub fn new(out: W, compact: bool) -> Self {
        Self { out, compact }
    }

    /// Gives the writer back.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_compact(&mut self, frame: &Frame<'_>) -> std::io::Result<()> {
        match frame {
            Frame::Fresh { record, trend } => writeln!(
                self.out,
                "{:<6} {:>10.2} {} {:+.2}",
                record.symbol(),
                record.close(),
                trend.glyph(),
                record.change()
            ),
            Frame::Stale { record, reason } => writeln!(
                self.out,
                "{:<6} {:>10.2} ? stale: {}",
                record.symbol(),
                record.close(),
                reason
            ),
            Frame::Placeholder { symbol, reason } => {
                writeln!(self.out, "{:<6} {:>10} ? {}", symbol.as_str(), "--", reason)
            }
        }
    }

    fn write_full(&mut self, frame: &Frame<'_>) -> std::io::Result<()> {
        let stamp = Local::now().format("%H:%M:%S");
        let (record, status) = match frame {
            Frame::Fresh { record, trend } => (*record, format!("{} {}", trend.glyph(), trend)),
            Frame::Stale { record, reason } => (*record, format!("stale: {reason}")),
            Frame::Placeholder { symbol, reason } => {
                writeln!(self.out, "{symbol} [{stamp}]")?;
                writeln!(self.out, "  no data: {reason}")?;
                return writeln!(self.out);
            }
        };
        writeln!(self.out, "{} [{}] {}", record.symbol(), stamp, status)?;
        writeln!(self.out, "  Open   {:>12.2}", record.open())?;
        writeln!(self.out, "  High   {:>12.2}", record.high())?;
        writeln!(self.out, "  Low    {:>12.2}", record.low())?;
        writeln!(self.out, "  Close  {:>12.2}", record.close())?;
        writeln!(self.out, "  Change {:>+12.2}", record.change())?;
        writeln!(self.out, "  Volume {:>12}", record.volume())?;
        writeln!(self.out)
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
        if self.compact {
            self.write_compact(frame)?;
        } else {
            self.write_full(frame)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_parser::parse_quote;

    fn record() -> QuoteRecord {
        parse_quote(
            r#"{"open":"10.29","high":"10.39","low":"9.95","close":"10.10","volume":"36981658"}"#,
            "AMD",
        )
        .expect("fixture parses")
    }

    fn render(compact: bool, frame: Frame<'_>) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new(), compact);
        renderer.render(&frame).expect("writing to a Vec cannot fail");
        String::from_utf8(renderer.into_inner()).expect("utf-8 output")
    }

    #[test]
    fn compact_fresh_is_one_line() {
        let record = record();
        let out = render(true, Frame::Fresh { record: &record, trend: Trend::Down });
        assert_eq!(out, "AMD         10.10 ▼ -0.19\n");
    }

    #[test]
    fn compact_stale_and_placeholder() {
        let record = record();
        let stale = render(true, Frame::Stale { record: &record, reason: "payload is truncated" });
        assert_eq!(stale, "AMD         10.10 ? stale: payload is truncated\n");

        let symbol = Symbol::parse("snap").expect("valid symbol");
        let empty = render(true, Frame::Placeholder { symbol: &symbol, reason: "payload is empty" });
        assert_eq!(empty, "SNAP           -- ? payload is empty\n");
    }

    #[test]
    fn full_frame_lists_every_field() {
        let record = record();
        let out = render(false, Frame::Fresh { record: &record, trend: Trend::Up });
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("AMD ["), "{out}");
        assert!(lines[0].ends_with("▲ Up"), "{out}");
        assert_eq!(lines[1], "  Open          10.29");
        assert_eq!(lines[2], "  High          10.39");
        assert_eq!(lines[3], "  Low            9.95");
        assert_eq!(lines[4], "  Close         10.10");
        assert_eq!(lines[5], "  Change        -0.19");
        assert_eq!(lines[6], "  Volume     36981658");
    }

    #[test]
    fn full_placeholder_names_the_reason() {
        let symbol = Symbol::parse("vttsx").expect("valid symbol");
        let out = render(false, Frame::Placeholder { symbol: &symbol, reason: "missing key: open" });
        assert!(out.starts_with("VTTSX ["), "{out}");
        assert!(out.contains("  no data: missing key: open\n"), "{out}");
    }
}
