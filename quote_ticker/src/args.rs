//! Command-line arguments for the Quote Ticker.
//!
//! This module defines the CLI interface using `clap`. Connection settings fall back to
//! environment variables so the API key does not have to appear on the command line.
use std::path::PathBuf;

use clap::Parser;
use quote_parser::api::DEFAULT_BASE_URL;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Symbols to rotate through, separated by commas or spaces.
    #[clap(long)]
    pub symbols: Option<String>,

    /// Path to a text file with symbols to rotate through.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub symbols_file: Option<String>,

    /// Base URL of the daily-series API (use `http://127.0.0.1:8081` for the local feed).
    #[clap(long, env = "QUOTE_TICKER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API key sent with every request.
    #[clap(long, env = "ALPHAVANTAGE_API_KEY", default_value = "demo", hide_env_values = true)]
    pub api_key: String,

    /// Seconds between polling cycles.
    #[clap(long, default_value_t = 10)]
    pub interval_secs: u64,

    /// Request timeout in seconds (connect and overall).
    #[clap(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// How many times in a row a symbol is retried after a transport error or a
    /// truncated response before moving on.
    #[clap(long, default_value_t = 1)]
    pub max_retries: u32,

    /// Stop after this many cycles (0 runs until Ctrl+C).
    #[clap(long, default_value_t = 0)]
    pub max_cycles: u64,

    /// Expected SHA-256 fingerprint of the server certificate, as hex.
    /// Bytes may be separated by `:` or spaces.
    #[clap(long)]
    pub pin_sha256: Option<String>,

    /// Refuse the TLS handshake when the certificate does not match the pin, so the
    /// request and API key are never sent (by default a mismatch is only logged).
    #[clap(long, requires = "pin_sha256")]
    pub enforce_pin: bool,

    /// One line per quote instead of the full block.
    #[clap(long)]
    pub compact: bool,
}

impl Args {
    /// Symbols file path with surrounding whitespace and quotes removed.
    pub fn symbols_path(&self) -> Option<PathBuf> {
        self.symbols_file.as_deref().map(normalize_path)
    }
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}
