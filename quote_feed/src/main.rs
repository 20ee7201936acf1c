//! Local daily-series feed.
//!
//! Serves synthetic data in the upstream layout so the ticker can run without network
//! access or an API key:
//!
//! ```bash
//! quote_feed --bind 127.0.0.1:8081 --days 5 --truncate-every 4
//! quote_ticker --base-url http://127.0.0.1:8081
//! ```
//!
//! - `GET /query?function=TIME_SERIES_DAILY&symbol=S&apikey=K` answers with `--days`
//!   entries for `S`, most recent first. Each symbol follows its own random walk that
//!   moves one step per request.
//! - Unknown functions, bad symbols, and a missing key get `200` with an
//!   `"Error Message"` body, as upstream does. Other paths get `404`.
//! - With `--truncate-every N`, every Nth series is cut short inside the newest close.
//!
//! Connections are served by a fixed pool of `--workers` threads fed through a
//! `crossbeam_channel` queue (see `server`).
#![warn(missing_docs)]
mod args;
mod error;
mod http;
mod model;
mod server;

use std::net::TcpListener;
use std::sync::Arc;

use clap::Parser;
use log::info;

use crate::args::Args;
use crate::error::{FeedError, Result};
use crate::server::{Feed, serve};

fn main() -> Result<(), FeedError> {
    init_logger();
    let args = Args::parse();

    let listener = TcpListener::bind(&args.bind)?;
    let feed = Arc::new(Feed::new(args.days, args.truncate_every));
    info!(
        "Starting feed: {} days per series, {} workers, truncate every {}",
        args.days, args.workers, args.truncate_every
    );
    serve(listener, feed, args.workers as usize)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
