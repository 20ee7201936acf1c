//! Shared knowledge of the upstream daily-series API.
//!
//! Both the ticker (which requests and slices responses) and the local feed (which
//! serves them) use these constants, so the two sides cannot drift apart.
use crate::field::Field;
use crate::token::{Token, tokenize};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
/// Path of the query endpoint.
pub const QUERY_PATH: &str = "/query";
/// `function` parameter selecting the daily series.
pub const DAILY_FUNCTION: &str = "TIME_SERIES_DAILY";
/// Key of the metadata block.
pub const META_KEY: &str = "Meta Data";
/// Key of the daily series object.
pub const SERIES_KEY: &str = "Time Series (Daily)";
/// Substring that locates the series in a raw body.
pub const DAILY_MARKER: &str = "(Daily)";
/// Keys the API uses for rate-limit and error notices instead of data.
pub const NOTICE_KEYS: [&str; 3] = ["Note", "Information", "Error Message"];
/// Default local port of the feed.
pub const FEED_PORT: u16 = 8081;

/// Key under which a field appears in a series entry, e.g. `1. open` or `5. volume`.
pub fn series_key(field: Field) -> String {
    format!("{}. {}", field.index() + 1, field)
}

/// Slice of `body` holding the most recent daily entry.
///
/// Starts after the last `}` before the series marker and ends at the first `}` after
/// it. Without a closing brace the rest of the body is returned as is; without the
/// marker the result is empty.
pub fn daily_fragment(body: &str) -> &str {
    let Some(marker) = body.find(DAILY_MARKER) else {
        return "";
    };
    let start = body[..marker].rfind('}').map_or(0, |i| i + 1);
    let end = body[marker..]
        .find('}')
        .map_or(body.len(), |i| marker + i + 1);
    &body[start..end]
}

/// Text of an API notice (rate limit, bad key, unknown symbol) if `body` carries no
/// series data.
pub fn upstream_notice(body: &str) -> Option<&str> {
    if body.contains(DAILY_MARKER) {
        return None;
    }
    let mut tokens = tokenize(body).filter(|t| !matches!(t, Token::Punctuation(_)));
    while let Some(token) = tokens.next() {
        if let Token::Key(name) = token {
            if NOTICE_KEYS.contains(&name) {
                if let Some(Token::StringLiteral(text)) = tokens.next() {
                    return Some(text);
                }
            }
        }
    }
    None
}
