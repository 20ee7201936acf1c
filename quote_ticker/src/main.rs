//! Quote Ticker: polls the daily-series API for a rotating set of symbols and shows
//! the latest open/high/low/close/volume of each on the terminal.
//!
//! Every cycle takes the next symbol, fetches its most recent daily entry over HTTPS,
//! parses it with `quote_parser`, and renders the result. Failed cycles show the last
//! good quote for the symbol marked as stale; see `poller` for the retry rules.
//!
//! Usage example (CLI):
//! ```bash
//! ALPHAVANTAGE_API_KEY=... quote_ticker --symbols AMD,AMZN,SNAP,VTTSX --interval-secs 15
//! quote_ticker --base-url http://127.0.0.1:8081 --symbols-file ./symbols.txt --compact
//! ```
//!
//! The symbols file should contain symbols separated by commas, spaces, or new lines.
#![warn(missing_docs)]
mod args;
mod error;
mod fetcher;
mod model;
mod pin;
mod poller;
mod render;

use crate::args::Args;
use crate::error::{Result, TickerError};
use crate::fetcher::HttpFetcher;
use crate::model::rotation::SymbolRotation;
use crate::pin::{CertificatePin, PinPolicy};
use crate::poller::Poller;
use crate::render::TerminalRenderer;
use clap::Parser;
use crossbeam_channel::bounded;
use log::info;
use quote_parser::{Symbol, SymbolParser};
use std::fs::File;
use std::io::{self, BufReader};
use std::time::Duration;

/// Symbols polled when none are configured.
const DEFAULT_SYMBOLS: &str = "AMD,AMZN,SNAP,VTTSX";

fn main() -> Result<(), TickerError> {
    init_logger();
    let args = Args::parse();

    let symbols = load_symbols(&args)?;
    info!(
        "Rotating through {} symbols: {}",
        symbols.len(),
        symbols.iter().map(Symbol::as_str).collect::<Vec<_>>().join(", ")
    );
    let rotation = SymbolRotation::new(symbols)?;

    let policy = if args.enforce_pin {
        PinPolicy::Enforce
    } else {
        PinPolicy::Warn
    };
    let pin = args
        .pin_sha256
        .as_deref()
        .map(|fingerprint| CertificatePin::parse(fingerprint, policy))
        .transpose()?;
    if let Some(pin) = &pin {
        info!("Certificate pin configured ({:?})", pin.policy());
    }

    let fetcher = HttpFetcher::new(
        &args.base_url,
        &args.api_key,
        Duration::from_secs(args.timeout_secs),
        pin,
    )?;
    let renderer = TerminalRenderer::new(io::stdout(), args.compact);
    let mut poller = Poller::new(fetcher, renderer, rotation, args.max_retries);

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down ticker...");
        let _ = shutdown_tx.try_send(());
    })
    .expect("Error setting Ctrl+C handler");

    info!(
        "Polling {} every {}s. Press Ctrl+C to exit.",
        args.base_url, args.interval_secs
    );
    let cycles = poller.run(
        Duration::from_secs(args.interval_secs),
        args.max_cycles,
        &shutdown_rx,
    )?;
    info!("Ticker stopped after {} cycles", cycles);
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Symbols from `--symbols` followed by those from `--symbols-file`, or the defaults.
fn load_symbols(args: &Args) -> Result<Vec<Symbol>> {
    let mut symbols = match &args.symbols {
        Some(list) => Symbol::parse_list(list)?,
        None => Vec::new(),
    };
    if let Some(path) = args.symbols_path() {
        let file = File::open(&path)?;
        symbols.extend(Symbol::parse_from_file(BufReader::new(file))?);
    }
    if symbols.is_empty() {
        symbols = Symbol::parse_list(DEFAULT_SYMBOLS)?;
    }
    Ok(symbols)
}
