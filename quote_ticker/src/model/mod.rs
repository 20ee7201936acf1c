//! Polling state kept by the ticker between cycles.
//!
//! - `rotation`: which symbol is polled next.
//! - `trend`: direction of a symbol's close relative to the previous poll.
pub mod rotation;
pub mod trend;
