//! Command-line arguments for the local feed.
use clap::Parser;

/// Loopback address on the port the ticker's docs point at.
pub const DEFAULT_BIND: &str = "127.0.0.1:8081";

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address to listen on.
    #[clap(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Number of daily entries per response, most recent first.
    #[clap(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub days: u32,

    /// Worker threads serving connections.
    #[clap(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..=64))]
    pub workers: u32,

    /// Cut every Nth series response short, inside the newest close (0 never does).
    #[clap(long, default_value_t = 0)]
    pub truncate_every: u64,
}
