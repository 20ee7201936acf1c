//! Domain models of the feed:
//! - `bar`: one synthetic trading day and the random walk behind it.
//! - `price_book`: latest close per symbol, shared by the workers.
//! - `series`: response documents in the upstream layout.

pub mod bar;
pub mod price_book;
pub mod series;
