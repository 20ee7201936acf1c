//! Request routing and the connection worker pool.
//!
//! The accept loop hands each connection to a bounded `crossbeam_channel` queue; a fixed
//! number of worker threads take connections off the queue and answer one request each.
//! All workers share one `Feed`, whose `PriceBook` keeps every symbol's walk consistent
//! across connections.
use std::io::BufReader;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use crossbeam_channel::{Receiver, bounded};
use log::{debug, error, info, warn};
use quote_parser::api::{DAILY_FUNCTION, QUERY_PATH, series_key};
use quote_parser::{Field, Symbol};

use crate::error::Result;
use crate::http::{Request, Response};
use crate::model::bar::latest_trading_day;
use crate::model::price_book::PriceBook;
use crate::model::series::{daily_series, error_body, walk_back};

const INVALID_CALL: &str = "Invalid API call. Please retry or visit the documentation for TIME_SERIES_DAILY.";
const MISSING_KEY: &str = "the parameter apikey is invalid or missing.";
const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Cuts `body` inside the newest day's close value, the way a dropped connection would.
///
/// Bodies without a close field are cut in the middle.
pub fn truncate_body(body: &str) -> &str {
    let key = format!("\"{}\"", series_key(Field::Close));
    let cut = match body.find(&key) {
        Some(at) => {
            let after_key = at + key.len();
            body[after_key..]
                .find('"')
                .map_or(body.len(), |quote| after_key + quote + 3)
        }
        None => body.len() / 2,
    };
    let mut cut = cut.min(body.len());
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    &body[..cut]
}

/// Shared state and settings of the feed.
pub struct Feed {
    book: PriceBook,
    days: u32,
    truncate_every: u64,
}

impl Feed {
    /// Creates a feed serving `days` entries per series, truncating every
    /// `truncate_every`-th series (0 never).
    pub fn new(days: u32, truncate_every: u64) -> Self {
        Self {
            book: PriceBook::new(),
            days,
            truncate_every,
        }
    }

    /// Answers one request.
    pub fn respond(&self, request: &Request) -> Result<Response> {
        if request.method != "GET" {
            return Ok(Response::empty(405));
        }
        if request.path != QUERY_PATH {
            return Ok(Response::empty(404));
        }
        if request.param("function") != Some(DAILY_FUNCTION) {
            return Ok(Response::ok(error_body(INVALID_CALL).to_string()));
        }
        let symbol = match request.param("symbol").map(Symbol::parse) {
            Some(Ok(symbol)) => symbol,
            Some(Err(e)) => {
                debug!("Rejecting symbol: {}", e);
                return Ok(Response::ok(error_body(INVALID_CALL).to_string()));
            }
            None => return Ok(Response::ok(error_body(INVALID_CALL).to_string())),
        };
        if request.param("apikey").is_none_or(str::is_empty) {
            return Ok(Response::ok(error_body(MISSING_KEY).to_string()));
        }

        let (close, served) = self.book.advance(&symbol)?;
        let latest = latest_trading_day(Local::now().date_naive());
        let bars = walk_back(&symbol, latest, close, self.days, &mut rand::rng());
        let body = serde_json::to_string_pretty(&daily_series(&symbol, &bars))?;
        info!("Serving {} days of {} (close {:.4})", bars.len(), symbol, close);

        if self.truncate_every != 0 && served % self.truncate_every == 0 {
            warn!("Truncating response #{} for {}", served, symbol);
            return Ok(Response::ok(truncate_body(&body).to_string()));
        }
        Ok(Response::ok(body))
    }

    /// Reads one request from `stream`, answers it, and closes the connection.
    ///
    /// A request line that does not parse gets a `400` before the error is returned.
    pub fn handle(&self, stream: TcpStream) -> Result<()> {
        stream.set_read_timeout(Some(READ_TIMEOUT))?;
        let mut reader = BufReader::new(&stream);
        let request = match Request::read_from(&mut reader) {
            Ok(request) => request,
            Err(e) => {
                Response::empty(400).write_to(&mut &stream)?;
                return Err(e);
            }
        };
        debug!("{} {} {:?}", request.method, request.path, request.query);
        let response = self.respond(&request)?;
        response.write_to(&mut &stream)?;
        Ok(())
    }
}

fn worker(id: usize, feed: &Feed, connections: &Receiver<TcpStream>) {
    debug!("Worker {} started", id);
    for stream in connections.iter() {
        let peer = stream.peer_addr().ok();
        if let Err(e) = feed.handle(stream) {
            warn!("Worker {}: request from {:?} failed: {}", id, peer, e);
        }
    }
    debug!("Worker {} stopped", id);
}

/// Accepts connections forever and serves them on `workers` threads.
///
/// Returns only when every worker is gone.
pub fn serve(listener: TcpListener, feed: Arc<Feed>, workers: usize) -> Result<()> {
    let (conn_tx, conn_rx) = bounded::<TcpStream>(workers * 4);
    for id in 0..workers {
        let feed = Arc::clone(&feed);
        let connections = conn_rx.clone();
        thread::spawn(move || worker(id, &feed, &connections));
    }
    drop(conn_rx);

    info!("Feed listening on http://{}{}", listener.local_addr()?, QUERY_PATH);
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = conn_tx.send(stream) {
                    error!("No worker left to serve connections: {}", e);
                    break;
                }
            }
            Err(e) => error!("TCP connection error: {}", e),
        }
    }
    Ok(())
}
