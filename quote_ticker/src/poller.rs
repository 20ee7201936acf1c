//! The polling loop: one symbol per cycle, fetch → parse → render.
//!
//! Failure handling per cycle:
//! - transport errors and truncated payloads are retried on the same symbol, up to
//!   `max_retries` times in a row, since the next attempt may well succeed;
//! - empty payloads, missing keys and malformed numbers move on to the next symbol;
//! - either way the display shows the last good record for the symbol, marked stale,
//!   or a placeholder if there is none.
//!
//! The last good record per symbol lives here, never in the parser.
use std::collections::HashMap;
use std::time::Duration;

use crossbeam_channel::{Receiver, select, tick};
use log::{debug, info, warn};
use quote_parser::{ParseError, QuoteRecord, Symbol, parse_quote};

use crate::error::{Result, TickerError};
use crate::fetcher::Fetcher;
use crate::model::rotation::SymbolRotation;
use crate::model::trend::Trend;
use crate::render::{Frame, Renderer};

/// What the loop does after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Poll the next symbol.
    Advance,
    /// Poll the same symbol again.
    Retry,
}

/// What was shown in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    /// A fresh record with its trend.
    Fresh(Trend),
    /// The cached record for the symbol.
    Stale,
    /// No record was available.
    Placeholder,
}

/// Summary of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// Symbol polled in the cycle.
    pub symbol: Symbol,
    /// What the renderer was given.
    pub shown: Shown,
    /// What happens next.
    pub next: NextStep,
}

/// Drives fetcher, parser and renderer over a symbol rotation.
pub struct Poller<F, R> {
    fetcher: F,
    renderer: R,
    rotation: SymbolRotation,
    last_good: HashMap<Symbol, QuoteRecord>,
    retries: u32,
    max_retries: u32,
}

fn is_transient(error: &TickerError) -> bool {
    matches!(
        error,
        TickerError::Fetch(_) | TickerError::Parse(ParseError::Truncated)
    )
}

impl<F: Fetcher, R: Renderer> Poller<F, R> {
    /// Creates a poller starting at the rotation's current symbol.
    pub fn new(fetcher: F, renderer: R, rotation: SymbolRotation, max_retries: u32) -> Self {
        Self {
            fetcher,
            renderer,
            rotation,
            last_good: HashMap::new(),
            retries: 0,
            max_retries,
        }
    }

    /// Gives the renderer back.
    #[cfg(test)]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn poll(&self, symbol: &Symbol) -> Result<QuoteRecord> {
        let payload = self.fetcher.fetch(symbol)?;
        Ok(parse_quote(&payload, symbol.as_str())?)
    }

    /// Runs one cycle. Only rendering failures are returned as errors; fetch and parse
    /// failures are handled here and reported in the `CycleReport`.
    pub fn run_cycle(&mut self) -> Result<CycleReport> {
        let symbol = self.rotation.current().clone();

        match self.poll(&symbol) {
            Ok(record) => {
                let previous = self.last_good.get(&symbol).map(QuoteRecord::close);
                let trend = Trend::between(previous, record.close());
                info!(
                    "{}: open={} high={} low={} close={} volume={} trend={}",
                    symbol,
                    record.open(),
                    record.high(),
                    record.low(),
                    record.close(),
                    record.volume(),
                    trend
                );
                self.renderer.render(&Frame::Fresh { record: &record, trend })?;
                self.last_good.insert(symbol.clone(), record);
                self.retries = 0;
                self.rotation.advance();
                Ok(CycleReport {
                    symbol,
                    shown: Shown::Fresh(trend),
                    next: NextStep::Advance,
                })
            }
            Err(error) => {
                warn!("{}: cycle failed: {}", symbol, error);
                let reason = error.to_string();
                let shown = match self.last_good.get(&symbol) {
                    Some(record) => {
                        self.renderer.render(&Frame::Stale { record, reason: &reason })?;
                        Shown::Stale
                    }
                    None => {
                        self.renderer.render(&Frame::Placeholder { symbol: &symbol, reason: &reason })?;
                        Shown::Placeholder
                    }
                };

                let next = if is_transient(&error) && self.retries < self.max_retries {
                    self.retries += 1;
                    info!("{}: retry {} of {}", symbol, self.retries, self.max_retries);
                    NextStep::Retry
                } else {
                    self.retries = 0;
                    self.rotation.advance();
                    NextStep::Advance
                };
                Ok(CycleReport { symbol, shown, next })
            }
        }
    }

    /// Runs a cycle immediately and then one per `interval` until `max_cycles` cycles
    /// have run (0 means no limit) or a message arrives on `shutdown`.
    ///
    /// Returns the number of cycles run.
    pub fn run(&mut self, interval: Duration, max_cycles: u64, shutdown: &Receiver<()>) -> Result<u64> {
        let ticker = tick(interval);
        let mut cycles = 0;
        loop {
            let report = self.run_cycle()?;
            debug!("{}: shown {:?}, next {:?}", report.symbol, report.shown, report.next);
            cycles += 1;
            if max_cycles != 0 && cycles >= max_cycles {
                break;
            }
            select! {
                recv(shutdown) -> _ => {
                    info!("Poll loop stopping...");
                    break;
                },
                recv(ticker) -> _ => {},
            }
        }
        Ok(cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crossbeam_channel::bounded;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Replays canned responses in order.
    struct ScriptedFetcher {
        responses: RefCell<VecDeque<std::result::Result<String, FetchError>>>,
        requested: RefCell<Vec<String>>,
    }

    impl ScriptedFetcher {
        fn new(responses: Vec<std::result::Result<String, FetchError>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl Fetcher for &ScriptedFetcher {
        fn fetch(&self, symbol: &Symbol) -> std::result::Result<String, FetchError> {
            self.requested.borrow_mut().push(symbol.to_string());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    /// Keeps a one-line description of each frame.
    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, frame: &Frame<'_>) -> Result<()> {
            let line = match frame {
                Frame::Fresh { record, trend } => format!("fresh {} {} {}", record.symbol(), record.close(), trend),
                Frame::Stale { record, reason } => format!("stale {} {} ({})", record.symbol(), record.close(), reason),
                Frame::Placeholder { symbol, reason } => format!("none {} ({})", symbol, reason),
            };
            self.frames.push(line);
            Ok(())
        }
    }

    fn payload(close: &str) -> std::result::Result<String, FetchError> {
        Ok(format!(
            r#"{{"open":"10","high":"12","low":"9","close":"{close}","volume":"1000"}}"#
        ))
    }

    fn poller<'a>(
        fetcher: &'a ScriptedFetcher,
        symbols: &str,
        max_retries: u32,
    ) -> Poller<&'a ScriptedFetcher, RecordingRenderer> {
        let rotation = SymbolRotation::new(Symbol::parse_list(symbols).expect("valid symbols"))
            .expect("non-empty");
        Poller::new(fetcher, RecordingRenderer::default(), rotation, max_retries)
    }

    #[test]
    fn success_renders_and_advances() {
        let fetcher = ScriptedFetcher::new(vec![payload("11"), payload("11.5"), payload("10.5")]);
        let mut poller = poller(&fetcher, "AMD,AMZN", 1);

        let first = poller.run_cycle().expect("cycle");
        assert_eq!(first.shown, Shown::Fresh(Trend::Flat));
        assert_eq!(first.next, NextStep::Advance);
        poller.run_cycle().expect("cycle");
        let third = poller.run_cycle().expect("cycle");
        assert_eq!(third.symbol.as_str(), "AMD");
        assert_eq!(third.shown, Shown::Fresh(Trend::Down));

        assert_eq!(*fetcher.requested.borrow(), ["AMD", "AMZN", "AMD"]);
        assert_eq!(
            poller.into_renderer().frames,
            ["fresh AMD 11 Flat", "fresh AMZN 11.5 Flat", "fresh AMD 10.5 Down"]
        );
    }

    #[test]
    fn transport_error_retries_same_symbol_then_moves_on() {
        let fetcher = ScriptedFetcher::new(vec![
            Err(FetchError::Status(503)),
            Err(FetchError::Status(503)),
            payload("11"),
        ]);
        let mut poller = poller(&fetcher, "AMD,AMZN", 1);

        let first = poller.run_cycle().expect("cycle");
        assert_eq!((first.shown, first.next), (Shown::Placeholder, NextStep::Retry));
        let second = poller.run_cycle().expect("cycle");
        assert_eq!(second.symbol.as_str(), "AMD");
        assert_eq!(second.next, NextStep::Advance);
        let third = poller.run_cycle().expect("cycle");
        assert_eq!(third.symbol.as_str(), "AMZN");

        assert_eq!(*fetcher.requested.borrow(), ["AMD", "AMD", "AMZN"]);
    }

    #[test]
    fn truncated_payload_is_retried_and_shows_stale_record() {
        let fetcher = ScriptedFetcher::new(vec![
            payload("11"),
            Ok(String::from(r#"{"open":"10","clo"#)),
            payload("12"),
        ]);
        let mut poller = poller(&fetcher, "AMD", 2);

        poller.run_cycle().expect("cycle");
        let failed = poller.run_cycle().expect("cycle");
        assert_eq!((failed.shown, failed.next), (Shown::Stale, NextStep::Retry));
        let recovered = poller.run_cycle().expect("cycle");
        assert_eq!(recovered.shown, Shown::Fresh(Trend::Up));

        assert_eq!(
            poller.into_renderer().frames,
            [
                "fresh AMD 11 Flat",
                "stale AMD 11 (Parse error: payload is truncated)",
                "fresh AMD 12 Up",
            ]
        );
    }

    #[test]
    fn bad_payload_skips_to_next_symbol() {
        let fetcher = ScriptedFetcher::new(vec![
            Ok(String::new()),
            Ok(String::from(r#"{"open":"abc"}"#)),
        ]);
        let mut poller = poller(&fetcher, "AMD,AMZN,SNAP", 3);

        let empty = poller.run_cycle().expect("cycle");
        assert_eq!((empty.shown, empty.next), (Shown::Placeholder, NextStep::Advance));
        let malformed = poller.run_cycle().expect("cycle");
        assert_eq!(malformed.symbol.as_str(), "AMZN");
        assert_eq!(malformed.next, NextStep::Advance);

        assert_eq!(
            poller.into_renderer().frames,
            [
                "none AMD (Parse error: payload is empty)",
                "none AMZN (Parse error: malformed number for open: \"abc\")",
            ]
        );
    }

    #[test]
    fn run_stops_after_max_cycles() {
        let fetcher = ScriptedFetcher::new(vec![payload("1"), payload("2"), payload("3")]);
        let mut poller = poller(&fetcher, "AMD", 0);
        let (_shutdown_tx, shutdown_rx) = bounded::<()>(1);

        let cycles = poller
            .run(Duration::from_millis(1), 3, &shutdown_rx)
            .expect("loop runs");
        assert_eq!(cycles, 3);
        assert_eq!(fetcher.requested.borrow().len(), 3);
    }

    #[test]
    fn run_stops_on_shutdown() {
        let fetcher = ScriptedFetcher::new(vec![payload("1")]);
        let mut poller = poller(&fetcher, "AMD", 0);
        let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
        shutdown_tx.send(()).expect("channel open");

        let cycles = poller
            .run(Duration::from_secs(3600), 0, &shutdown_rx)
            .expect("loop runs");
        assert_eq!(cycles, 1);
    }
}
