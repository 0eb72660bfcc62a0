//! Tokenizer
//!
//! Drives the [`TransitionTable`](super::automaton::TransitionTable) over a
//! [`CharStream`] and turns each completed lexeme into a [`Token`]. Literal
//! values are coerced once the lexeme is structurally complete:
//!
//! - decimal integers parse to `i32`; out-of-range text is a recoverable
//!   diagnostic on the token,
//! - `0x` literals of at most 8 hex digits wrap into `i32` (`0xFFFFFFFF` is -1),
//! - floats parse to `f32`; overflow to infinity is a diagnostic, underflow to
//!   zero is accepted,
//! - char and string literals keep their content verbatim (no escapes),
//! - identifiers spelling a keyword are reclassified as [`TokenKind::Keyword`].
//!
//! Malformed literals never stop the stream. Only a symbol outside the ASCII
//! alphabet, or one the language does not use at all, is fatal ([`LexError`]).

use super::automaton::{Scan, ALPHABET_SIZE, END_SYMBOL};
use super::lexicon::Lexicon;
use super::stream::CharStream;
use super::token::{SourceLocation, Token, TokenKind, TokenValue};
use log::{trace, warn};
use std::io::Read;
use thiserror::Error;

/// Fatal tokenizer failure; no further tokens follow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("lexer fatal at {location}: unsupported character '{symbol}'")]
    UnsupportedCharacter {
        symbol: char,
        location: SourceLocation,
    },
    #[error("lexer fatal at {location}: character code {code:#04x} is outside the ASCII alphabet")]
    NonAscii { code: u8, location: SourceLocation },
}

impl LexError {
    pub fn location(&self) -> SourceLocation {
        match self {
            LexError::UnsupportedCharacter { location, .. }
            | LexError::NonAscii { location, .. } => *location,
        }
    }
}

pub struct Tokenizer<'a, R: Read> {
    stream: CharStream<R>,
    lexicon: &'a Lexicon,
    scan: Scan,
    last: Option<Token>,
    failed: bool,
}

impl<'a> Tokenizer<'a, &'a [u8]> {
    /// Tokenizer over an in-memory source string.
    pub fn from_source(source: &'a str, lexicon: &'a Lexicon) -> Self {
        Self::new(source.as_bytes(), lexicon)
    }
}

impl<'a, R: Read> Tokenizer<'a, R> {
    pub fn new(reader: R, lexicon: &'a Lexicon) -> Self {
        Self {
            stream: CharStream::new(reader),
            lexicon,
            scan: Scan::default(),
            last: None,
            failed: false,
        }
    }

    /// Start over on a new input, clearing any earlier fatal failure.
    pub fn reset(&mut self, reader: R) {
        self.stream = CharStream::new(reader);
        self.scan = Scan::default();
        self.last = None;
        self.failed = false;
    }

    /// The token most recently returned by [`Tokenizer::next_token`].
    pub fn peek(&self) -> Option<&Token> {
        self.last.as_ref()
    }

    /// Position of the last symbol read from the input.
    pub fn position(&self) -> SourceLocation {
        self.stream.position()
    }

    pub fn lexicon(&self) -> &'a Lexicon {
        self.lexicon
    }

    /// Scan the next token; `Ok(None)` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if self.failed {
            return Ok(None);
        }
        self.scan.begin_token();

        loop {
            let symbol = self.stream.next();
            let byte = symbol.unwrap_or(END_SYMBOL);
            let location = self.stream.position();
            if usize::from(byte) >= ALPHABET_SIZE {
                self.failed = true;
                return Err(LexError::NonAscii {
                    code: byte,
                    location,
                });
            }

            self.scan.location = location;
            let action = self.lexicon.transitions().action(self.scan.state, byte);
            action(&mut self.scan, byte);

            if let Some(rejected) = self.scan.fatal.take() {
                self.failed = true;
                return Err(LexError::UnsupportedCharacter {
                    symbol: char::from(rejected),
                    location,
                });
            }
            if self.scan.hold {
                self.scan.hold = false;
                self.stream.hold();
            }
            if self.scan.completed || symbol.is_none() {
                break;
            }
        }

        if !self.scan.completed {
            return Ok(None);
        }
        let Some(token) = self.build_token() else {
            return Ok(None);
        };

        if let Some(message) = &token.diagnostic {
            warn!("lexical error at {}: {message} ({:?})", token.location, token.raw);
        } else {
            trace!("{token}");
        }
        self.last = Some(token.clone());
        Ok(Some(token))
    }

    /// Collect every remaining token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn build_token(&mut self) -> Option<Token> {
        let kind = self.scan.kind?;
        let raw = std::mem::take(&mut self.scan.raw);
        let location = self.scan.start;

        if let Some(message) = self.scan.error.take() {
            return Some(Token {
                kind,
                value: None,
                raw,
                location,
                diagnostic: Some(message),
            });
        }

        let (kind, coerced) = match kind {
            TokenKind::Identifier | TokenKind::Keyword => match self.lexicon.keyword(&raw) {
                Some(keyword) => (TokenKind::Keyword, Ok(TokenValue::Keyword(keyword))),
                None => (TokenKind::Identifier, Ok(TokenValue::Identifier(raw.clone()))),
            },
            TokenKind::Operator => (
                kind,
                self.scan
                    .operator
                    .map(TokenValue::Operator)
                    .ok_or_else(|| "malformed operator".to_string()),
            ),
            TokenKind::Int => (kind, coerce_int(&raw).map(TokenValue::Int)),
            TokenKind::Float => (kind, coerce_float(&raw).map(TokenValue::Float)),
            TokenKind::Char => (kind, coerce_char(&raw).map(TokenValue::Char)),
            TokenKind::String => (
                kind,
                strip_quotes(&raw, '"').map(|s| TokenValue::String(s.to_string())),
            ),
        };

        let (value, diagnostic) = match coerced {
            Ok(value) => (Some(value), None),
            Err(message) => (None, Some(message)),
        };
        Some(Token {
            kind,
            value,
            raw,
            location,
            diagnostic,
        })
    }
}

impl<R: Read> Iterator for Tokenizer<'_, R> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn coerce_int(raw: &str) -> Result<i32, String> {
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some("") => Err("malformed hexadecimal literal".to_string()),
        Some(digits) if digits.len() > 8 => Err("hexadecimal literal exceeds 8 digits".to_string()),
        Some(digits) => u32::from_str_radix(digits, 16)
            // two's-complement wraparound
            .map(|bits| bits as i32)
            .map_err(|_| "malformed hexadecimal literal".to_string()),
        None => raw
            .parse::<i32>()
            .map_err(|_| "integer literal out of range".to_string()),
    }
}

fn coerce_float(raw: &str) -> Result<f32, String> {
    let value = raw
        .parse::<f32>()
        .map_err(|_| "malformed float literal".to_string())?;
    if value.is_infinite() {
        return Err("float literal out of range".to_string());
    }
    Ok(value)
}

fn coerce_char(raw: &str) -> Result<char, String> {
    let content = strip_quotes(raw, '\'')?;
    let mut chars = content.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err("character literal must contain exactly one character".to_string()),
    }
}

fn strip_quotes(raw: &str, quote: char) -> Result<&str, String> {
    raw.strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .ok_or_else(|| format!("malformed literal {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::{Keyword, Operator};
    use rstest::rstest;

    fn tokens(source: &str) -> Vec<Token> {
        let lexicon = Lexicon::default();
        Tokenizer::from_source(source, &lexicon)
            .tokenize()
            .expect("tokenize")
    }

    #[test]
    fn test_simple_tokens() {
        let toks = tokens("x = foo(1, 2.5);");
        let kinds: Vec<_> = toks.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Int,
                TokenKind::Operator,
                TokenKind::Float,
                TokenKind::Operator,
                TokenKind::Operator,
            ]
        );
        assert_eq!(toks[6].value, Some(TokenValue::Float(2.5)));
        assert!(toks[8].is_operator(Operator::SemiColon));
    }

    #[rstest]
    #[case("0", 0)]
    #[case("2147483647", i32::MAX)]
    #[case("0xff", 255)]
    #[case("0XFF", 255)]
    #[case("0xFFFFFFFF", -1)]
    #[case("0x80000000", i32::MIN)]
    fn test_int_coercion(#[case] source: &str, #[case] expected: i32) {
        let toks = tokens(source);
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].value, Some(TokenValue::Int(expected)));
    }

    #[rstest]
    #[case("2147483648", "integer literal out of range")]
    #[case("0x100000000", "hexadecimal literal exceeds 8 digits")]
    #[case("0x", "malformed hexadecimal literal")]
    #[case("12ab", "unexpected character 'a' in integer literal")]
    #[case("1.0e1.", "unexpected character '.' in float literal")]
    #[case("1.5e+-3", "unexpected character '-' in float literal")]
    #[case("3.5e39", "float literal out of range")]
    #[case("1.0e", "malformed float literal")]
    fn test_numeric_diagnostics(#[case] source: &str, #[case] message: &str) {
        let toks = tokens(source);
        assert_eq!(toks.len(), 1, "{source}: {toks:?}");
        assert!(toks[0].is_error());
        assert!(toks[0].value.is_none());
        assert_eq!(toks[0].diagnostic.as_deref(), Some(message));
        assert_eq!(toks[0].raw, source);
    }

    #[test]
    fn test_float_underflow_is_zero() {
        let toks = tokens("1.5E-46");
        assert_eq!(toks[0].value, Some(TokenValue::Float(0.0)));
    }

    #[test]
    fn test_keywords_and_operators() {
        let toks = tokens("new int && || == != ! & | =");
        assert_eq!(toks[0].keyword(), Some(Keyword::New));
        assert_eq!(toks[1].kind, TokenKind::Keyword);
        let ops: Vec<_> = toks[2..].iter().filter_map(Token::operator).collect();
        assert_eq!(
            ops,
            [
                Operator::LogicalAnd,
                Operator::LogicalOr,
                Operator::EqualityTest,
                Operator::NotEqualityTest,
                Operator::LogicalNot,
                Operator::BitwiseAnd,
                Operator::BitwiseOr,
                Operator::Assignment,
            ]
        );
    }

    #[test]
    fn test_string_and_char_literals() {
        let toks = tokens(r#""a \n b" 'c'"#);
        assert_eq!(toks[0].value, Some(TokenValue::String(r"a \n b".to_string())));
        assert_eq!(toks[1].value, Some(TokenValue::Char('c')));
    }

    #[test]
    fn test_multi_char_literal_recovers() {
        let toks = tokens("'ab' x");
        assert!(toks[0].is_error());
        assert_eq!(toks[0].raw, "'ab'");
        assert_eq!(toks[1].identifier(), Some("x"));
    }

    #[test]
    fn test_unterminated_string() {
        let toks = tokens("\"abc");
        assert_eq!(toks.len(), 1);
        assert_eq!(toks[0].diagnostic.as_deref(), Some("unterminated string literal"));
    }

    #[test]
    fn test_division_and_comment() {
        let toks = tokens("a / b // trailing\nc/");
        let raws: Vec<_> = toks.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, ["a", "/", "b", "c", "/"]);
        assert!(toks[4].is_operator(Operator::Divide));
    }

    #[test]
    fn test_fatal_character_stops_stream() {
        let lexicon = Lexicon::default();
        let mut tokenizer = Tokenizer::from_source("a # b", &lexicon);
        assert!(tokenizer.next_token().expect("a").is_some());
        let err = tokenizer.next_token().expect_err("fatal");
        assert_eq!(
            err,
            LexError::UnsupportedCharacter {
                symbol: '#',
                location: SourceLocation::new(0, 2),
            }
        );
        assert_eq!(tokenizer.next_token(), Ok(None));
    }

    #[test]
    fn test_non_ascii_is_fatal() {
        let lexicon = Lexicon::default();
        let mut tokenizer = Tokenizer::from_source("x é", &lexicon);
        assert!(tokenizer.next_token().expect("x").is_some());
        assert!(matches!(tokenizer.next_token(), Err(LexError::NonAscii { .. })));
    }

    #[test]
    fn test_peek_and_reset() {
        let lexicon = Lexicon::default();
        let mut tokenizer = Tokenizer::new("a b".as_bytes(), &lexicon);
        assert!(tokenizer.peek().is_none());
        tokenizer.next_token().expect("a");
        assert_eq!(tokenizer.peek().map(|t| t.raw.as_str()), Some("a"));

        tokenizer.reset("zz".as_bytes());
        assert!(tokenizer.peek().is_none());
        let token = tokenizer.next_token().expect("zz").expect("token");
        assert_eq!(token.raw, "zz");
        assert_eq!(token.location, SourceLocation::new(0, 0));
    }
}
