//! Lexical scanning of quote payloads.
//!
//! The tokenizer walks the payload left to right and classifies runs of characters into
//! [`Token`]s that borrow from the input. It knows just enough about the JSON-like
//! dialect to tell keys from values:
//!
//! - a quoted run whose content is a numeric literal is a `Number` (the upstream API
//!   quotes its numbers);
//! - a quoted, key-like run followed by a value is a `Key`; an ordinal prefix such as
//!   `1. ` in `"1. open"` is not part of the key name;
//! - other quoted runs are `StringLiteral`s;
//! - unquoted numeric literals are `Number`s, unquoted words (`null`, `true`) are
//!   `StringLiteral`s, and structural characters are `Punctuation`;
//! - input that ends inside a quoted or unquoted run, or right after a key-like run,
//!   yields a final `Truncated` token. A run is only complete once its terminator has
//!   been seen.
//!
//! Value lengths are found by scanning to a terminator, never by counting digits.
//! Scanning never fails; bytes that fit none of the rules are skipped.
use crate::number::is_number_literal;

/// A classified span of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Key name with any ordinal prefix removed, e.g. `open` for `"1. open"`.
    Key(&'a str),
    /// Numeric literal, without surrounding quotes.
    Number(&'a str),
    /// Any other quoted run, or a bare word.
    StringLiteral(&'a str),
    /// One of `{ } [ ] : ,`.
    Punctuation(char),
    /// The unfinished tail of a payload that was cut off.
    Truncated(&'a str),
}

/// Lazy token stream over a borrowed payload.
///
/// Cloning forks the scan at the current position; call [`tokenize`] again to start
/// over from the beginning.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
}

/// Starts scanning `payload`.
pub fn tokenize(payload: &str) -> Tokenizer<'_> {
    Tokenizer { src: payload, pos: 0 }
}

/// What follows a quoted run once whitespace and `:` are skipped.
enum Lookahead {
    Value,
    Structure,
    End,
}

fn is_structural(b: u8) -> bool {
    matches!(b, b'{' | b'}' | b'[' | b']' | b':' | b',')
}

fn is_terminator(b: u8) -> bool {
    b == b'"' || b.is_ascii_whitespace() || is_structural(b)
}

/// Key name for a key-like quoted run, with the ordinal prefix stripped.
fn key_name(content: &str) -> Option<&str> {
    let after_digits = content.trim_start_matches(|c: char| c.is_ascii_digit());
    let name = match after_digits.strip_prefix('.') {
        Some(rest) if after_digits.len() < content.len() => rest.trim_start_matches(' '),
        _ => content,
    };
    let starts_with_letter = name.bytes().next().is_some_and(|b| b.is_ascii_alphabetic());
    let valid = name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b' ' || b == b'_');
    (starts_with_letter && valid).then_some(name)
}

impl<'a> Tokenizer<'a> {
    fn quoted(&mut self) -> Token<'a> {
        let bytes = self.src.as_bytes();
        let start = self.pos + 1;
        let mut end = start;
        while end < bytes.len() {
            match bytes[end] {
                b'\\' => end += 2,
                b'"' => break,
                _ => end += 1,
            }
        }
        if end >= bytes.len() {
            self.pos = bytes.len();
            return Token::Truncated(&self.src[start.min(bytes.len())..]);
        }
        let content = &self.src[start..end];
        self.pos = end + 1;

        if is_number_literal(content) {
            return Token::Number(content);
        }
        match key_name(content) {
            Some(name) => match self.lookahead() {
                Lookahead::Value => Token::Key(name),
                Lookahead::End => {
                    self.pos = self.src.len();
                    Token::Truncated(content)
                }
                Lookahead::Structure => Token::StringLiteral(content),
            },
            None => Token::StringLiteral(content),
        }
    }

    fn lookahead(&self) -> Lookahead {
        for &b in &self.src.as_bytes()[self.pos..] {
            match b {
                b if b.is_ascii_whitespace() || b == b':' => continue,
                b'"' | b'-' => return Lookahead::Value,
                b if b.is_ascii_alphanumeric() => return Lookahead::Value,
                _ => return Lookahead::Structure,
            }
        }
        Lookahead::End
    }

    fn bare(&mut self) -> Option<Token<'a>> {
        let bytes = self.src.as_bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && !is_terminator(bytes[end]) {
            end += 1;
        }
        self.pos = end;
        let run = &self.src[start..end];
        if end == bytes.len() {
            return Some(Token::Truncated(run));
        }
        if is_number_literal(run) {
            Some(Token::Number(run))
        } else if run.bytes().all(|b| b.is_ascii_alphabetic()) {
            Some(Token::StringLiteral(run))
        } else {
            None
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b == b'"' {
                return Some(self.quoted());
            }
            if is_structural(b) {
                self.pos += 1;
                return Some(Token::Punctuation(b as char));
            }
            if b.is_ascii_whitespace() {
                self.pos += 1;
                continue;
            }
            if !b.is_ascii() {
                // step over the whole character so later slices stay on char boundaries
                self.pos += self.src[self.pos..].chars().next().map_or(1, char::len_utf8);
                continue;
            }
            if let Some(token) = self.bare() {
                return Some(token);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use Token::*;

    fn tokens(payload: &str) -> Vec<Token<'_>> {
        tokenize(payload).collect()
    }

    #[test]
    fn splits_a_compact_object() {
        assert_eq!(
            tokens(r#"{"open":"5.49","volume":"120"}"#),
            vec![
                Punctuation('{'),
                Key("open"),
                Punctuation(':'),
                Number("5.49"),
                Punctuation(','),
                Key("volume"),
                Punctuation(':'),
                Number("120"),
                Punctuation('}'),
            ]
        );
    }

    #[test]
    fn strips_ordinal_prefix_from_keys() {
        assert_eq!(
            tokens(r#""1. open": "12.50", "5. volume": "26370826""#),
            vec![
                Key("open"),
                Punctuation(':'),
                Number("12.50"),
                Punctuation(','),
                Key("volume"),
                Punctuation(':'),
                Number("26370826"),
            ]
        );
    }

    #[test]
    fn numbers_end_at_their_terminator() {
        assert_eq!(
            tokens(r#""volume":123456789012345}"#),
            vec![Key("volume"), Punctuation(':'), Number("123456789012345"), Punctuation('}')]
        );
        assert_eq!(tokens("-7.25 , 3 "), vec![Number("-7.25"), Punctuation(','), Number("3")]);
    }

    #[test]
    fn unquoted_run_at_end_of_input_is_truncated() {
        assert_eq!(
            tokens(r#""volume":1234"#),
            vec![Key("volume"), Punctuation(':'), Truncated("1234")]
        );
        assert_eq!(tokens("-7.25 , 3"), vec![Number("-7.25"), Punctuation(','), Truncated("3")]);
        assert_eq!(tokens(r#""open": nul"#), vec![Key("open"), Punctuation(':'), Truncated("nul")]);
    }

    #[test]
    fn string_values_and_section_names_are_literals() {
        assert_eq!(
            tokens(r#""Time Series (Daily)": {"2017-12-01": {"open":"abc"}}"#),
            vec![
                StringLiteral("Time Series (Daily)"),
                Punctuation(':'),
                Punctuation('{'),
                StringLiteral("2017-12-01"),
                Punctuation(':'),
                Punctuation('{'),
                Key("open"),
                Punctuation(':'),
                StringLiteral("abc"),
                Punctuation('}'),
                Punctuation('}'),
            ]
        );
    }

    #[test]
    fn bare_words_are_literals_and_junk_is_skipped() {
        assert_eq!(
            tokens(r#""open": null, 12ab x9 "#),
            vec![Key("open"), Punctuation(':'), StringLiteral("null"), Punctuation(',')]
        );
    }

    #[test]
    fn tolerates_http_framing_and_non_ascii() {
        let payload = "HTTP/1.1 200 OK\r\n\r\n« \"low\": \"3.10\" »";
        assert_eq!(
            tokens(payload),
            vec![Number("200"), StringLiteral("OK"), Key("low"), Punctuation(':'), Number("3.10")]
        );
    }

    #[test]
    fn unterminated_quote_is_truncated() {
        assert_eq!(
            tokens(r#"{"open":"5.49","clo"#),
            vec![
                Punctuation('{'),
                Key("open"),
                Punctuation(':'),
                Number("5.49"),
                Punctuation(','),
                Truncated("clo"),
            ]
        );
        assert_eq!(tokens("\""), vec![Truncated("")]);
    }

    #[test]
    fn key_without_value_at_end_is_truncated() {
        assert_eq!(tokens(r#""close": "#), vec![Truncated("close")]);
        assert_eq!(tokens(r#""close""#), vec![Truncated("close")]);
        assert_eq!(tokens(r#""close"}"#), vec![StringLiteral("close"), Punctuation('}')]);
    }

    #[test]
    fn escaped_quotes_stay_inside_the_literal() {
        assert_eq!(
            tokens(r#""Note": "say \"hi\"","#),
            vec![Key("Note"), Punctuation(':'), StringLiteral(r#"say \"hi\""#), Punctuation(',')]
        );
    }

    #[test]
    fn clones_resume_from_the_same_position() {
        let mut scan = tokenize(r#"{"high":"9"}"#);
        assert_eq!(scan.next(), Some(Punctuation('{')));
        let fork = scan.clone();
        assert_eq!(scan.collect::<Vec<_>>(), fork.collect::<Vec<_>>());
        assert_eq!(tokenize("").next(), None);
    }
}
