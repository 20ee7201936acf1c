//! Just enough HTTP/1.1 for one `GET` per connection.
use std::io::{self, BufRead, Write};

use crate::error::{FeedError, Result};

/// A parsed request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Method, e.g. `GET`.
    pub method: String,
    /// Path without the query string.
    pub path: String,
    /// Query parameters in order of appearance.
    pub query: Vec<(String, String)>,
}

impl Request {
    /// Parses `METHOD TARGET HTTP/x.y`.
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(FeedError::BadRequest(format!("malformed request line {line:?}")));
        };
        if !version.starts_with("HTTP/") {
            return Err(FeedError::BadRequest(format!("unsupported protocol {version:?}")));
        }

        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (name.to_string(), value.to_string())
            })
            .collect();
        Ok(Self {
            method: method.to_string(),
            path: path.to_string(),
            query,
        })
    }

    /// Reads the request line and skips the headers.
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(FeedError::BadRequest("connection closed before the request line".into()));
        }
        let request = Self::parse_line(line.trim_end())?;

        let mut header = String::new();
        loop {
            header.clear();
            if reader.read_line(&mut header)? == 0 || header.trim_end().is_empty() {
                break;
            }
        }
        Ok(request)
    }

    /// First value of the query parameter `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Status plus JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Body, sent as `application/json`.
    pub body: String,
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

impl Response {
    /// `200 OK` with `body`.
    pub fn ok(body: String) -> Self {
        Self { status: 200, body }
    }

    /// An error status with an empty JSON object as body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: "{}".to_string(),
        }
    }

    /// Writes status line, headers and body; the connection is closed afterwards.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(
            out,
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            reason(self.status),
            self.body.len()
        )?;
        out.write_all(self.body.as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_query_parameters() {
        let request = Request::parse_line(
            "GET /query?function=TIME_SERIES_DAILY&symbol=AMD&apikey=demo HTTP/1.1",
        )
        .expect("valid request line");
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/query");
        assert_eq!(request.param("function"), Some("TIME_SERIES_DAILY"));
        assert_eq!(request.param("symbol"), Some("AMD"));
        assert_eq!(request.param("apikey"), Some("demo"));
        assert_eq!(request.param("interval"), None);
    }

    #[test]
    fn path_without_query() {
        let request = Request::parse_line("GET / HTTP/1.0").expect("valid request line");
        assert_eq!(request.path, "/");
        assert!(request.query.is_empty());

        let request = Request::parse_line("GET /query?symbol&&x=1 HTTP/1.1").expect("valid");
        assert_eq!(request.param("symbol"), Some(""));
        assert_eq!(request.param("x"), Some("1"));
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["", "GET", "GET /query", "GET /query SMTP", "GET / HTTP/1.1 extra"] {
            let err = Request::parse_line(line).expect_err("must fail");
            assert!(matches!(err, FeedError::BadRequest(_)), "{line:?}: {err}");
        }
    }

    #[test]
    fn reads_request_and_skips_headers() {
        let raw = "GET /query?symbol=SNAP HTTP/1.1\r\nHost: 127.0.0.1\r\nAccept: */*\r\n\r\n";
        let mut reader = Cursor::new(raw.as_bytes());
        let request = Request::read_from(&mut reader).expect("valid request");
        assert_eq!(request.param("symbol"), Some("SNAP"));
        assert_eq!(reader.position() as usize, raw.len());

        let err = Request::read_from(&mut Cursor::new(&b""[..])).expect_err("no request");
        assert!(matches!(err, FeedError::BadRequest(_)));
    }

    #[test]
    fn writes_content_length() {
        let mut out = Vec::new();
        Response::ok(r#"{"a":1}"#.to_string())
            .write_to(&mut out)
            .expect("write to Vec");
        let text = String::from_utf8(out).expect("utf-8");
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"), "{text}");
        assert!(text.contains("Content-Length: 7\r\n"), "{text}");
        assert!(text.ends_with("\r\n\r\n{\"a\":1}"), "{text}");

        let mut out = Vec::new();
        Response::empty(404).write_to(&mut out).expect("write to Vec");
        assert!(out.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
    }
}
