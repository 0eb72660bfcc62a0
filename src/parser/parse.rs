//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, token access helpers, and the parse entry points.
//!
//! # Parser Architecture
//!
//! - This module: Parser struct, the token lookahead buffer and helpers
//! - `expressions`: the expression grammar with precedence climbing
//!
//! Tokens are pulled lazily from the [`Tokenizer`]. Any token already fetched
//! can be handed back with [`Parser::unread`]; unread tokens form a LIFO buffer
//! that is drained before new tokens are pulled, which is what lets the grammar
//! look arbitrarily far ahead and backtrack (casts, array creation).

use super::ast::SyntaxTree;
use super::lexer::{LexError, Tokenizer};
use super::lexicon::Lexicon;
use super::token::{Operator, OperatorClass, SourceLocation, Token, TokenValue};
use std::io::Read;
use thiserror::Error;

/// Deepest sub-expression nesting accepted before parsing fails.
pub const MAX_NESTING: usize = 32;

/// Parser error type; parsing stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("({location}) syntax error: {expected} expected, but {found} found")]
    Expected {
        expected: String,
        found: String,
        location: SourceLocation,
    },
    #[error("({location}) type not found: '{name}'")]
    TypeNotFound {
        name: String,
        location: SourceLocation,
    },
    #[error("({location}) lexical error in {raw:?}: {message}")]
    Lexical {
        message: String,
        raw: String,
        location: SourceLocation,
    },
    #[error("({location}) expression nested deeper than {limit} levels")]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },
    #[error(transparent)]
    Lex(#[from] LexError),
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Expected { location, .. }
            | ParseError::TypeNotFound { location, .. }
            | ParseError::Lexical { location, .. }
            | ParseError::NestingTooDeep { location, .. } => *location,
            ParseError::Lex(err) => err.location(),
        }
    }
}

/// Recursive descent parser over a token stream
pub struct Parser<'a, R: Read> {
    pub(crate) tokenizer: Tokenizer<'a, R>,
    pub(crate) lexicon: &'a Lexicon,
    lookahead: Vec<Token>,
    depth: usize,
}

impl<'a> Parser<'a, &'a [u8]> {
    pub fn from_source(source: &'a str, lexicon: &'a Lexicon) -> Self {
        Self::new(Tokenizer::from_source(source, lexicon))
    }
}

impl<'a, R: Read> Parser<'a, R> {
    pub fn new(tokenizer: Tokenizer<'a, R>) -> Self {
        let lexicon = tokenizer.lexicon();
        Self {
            tokenizer,
            lexicon,
            lookahead: Vec::new(),
            depth: 0,
        }
    }

    /// Parse exactly one expression spanning the whole input.
    pub fn parse(&mut self) -> Result<SyntaxTree, ParseError> {
        let Some(root) = self.parse_expression()? else {
            return Err(self.unexpected("expression"));
        };
        if self.peek()?.is_some() {
            return Err(self.unexpected("end of input"));
        }
        Ok(SyntaxTree::new(root))
    }

    // ===== Token access =====

    /// Next token without consuming it.
    pub fn peek(&mut self) -> Result<Option<&Token>, ParseError> {
        if self.lookahead.is_empty() {
            if let Some(token) = self.pull()? {
                self.lookahead.push(token);
            }
        }
        Ok(self.lookahead.last())
    }

    /// Consume the next token.
    pub fn advance(&mut self) -> Result<Option<Token>, ParseError> {
        match self.lookahead.pop() {
            Some(token) => Ok(Some(token)),
            None => self.pull(),
        }
    }

    /// Push `token` back so the next [`Parser::peek`]/[`Parser::advance`]
    /// sees it again. Tokens come back in the reverse order of unreading.
    pub fn unread(&mut self, token: Token) {
        self.lookahead.push(token);
    }

    fn pull(&mut self) -> Result<Option<Token>, ParseError> {
        let Some(mut token) = self.tokenizer.next_token()? else {
            return Ok(None);
        };
        if let Some(message) = token.diagnostic.take() {
            return Err(ParseError::Lexical {
                message,
                raw: token.raw,
                location: token.location,
            });
        }
        Ok(Some(token))
    }

    // ===== Helper methods =====

    pub(crate) fn check_operator(&mut self, op: Operator) -> Result<bool, ParseError> {
        Ok(self.peek()?.is_some_and(|token| token.is_operator(op)))
    }

    pub(crate) fn match_operator(&mut self, op: Operator) -> Result<Option<Token>, ParseError> {
        if self.check_operator(op)? {
            self.advance()
        } else {
            Ok(None)
        }
    }

    /// Consume the next token if it is an operator of `class`.
    pub(crate) fn match_class(
        &mut self,
        class: OperatorClass,
    ) -> Result<Option<(Operator, SourceLocation)>, ParseError> {
        let found = self.peek()?.and_then(|token| {
            token
                .operator()
                .filter(|op| op.is(class))
                .map(|op| (op, token.location))
        });
        if found.is_some() {
            self.advance()?;
        }
        Ok(found)
    }

    pub(crate) fn expect_operator(&mut self, op: Operator) -> Result<Token, ParseError> {
        match self.match_operator(op)? {
            Some(token) => Ok(token),
            None => Err(self.unexpected(format!("'{op}'"))),
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match self.advance()? {
            Some(Token {
                value: Some(TokenValue::Identifier(name)),
                ..
            }) => Ok(name),
            Some(other) => Err(expected_at("identifier", &other)),
            None => Err(self.unexpected("identifier")),
        }
    }

    /// Run `rule` one sub-expression level deeper, failing past [`MAX_NESTING`].
    pub(crate) fn nested<T>(
        &mut self,
        location: SourceLocation,
        rule: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING,
                location,
            });
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    /// Error naming `expected` and whatever comes next in the input.
    pub(crate) fn unexpected(&mut self, expected: impl Into<String>) -> ParseError {
        let expected = expected.into();
        let end = self.tokenizer.position();
        match self.peek() {
            Ok(Some(token)) => expected_at(&expected, token),
            Ok(None) => ParseError::Expected {
                expected,
                found: "end of input".to_string(),
                location: end,
            },
            Err(err) => err,
        }
    }
}

pub(crate) fn expected_at(expected: &str, token: &Token) -> ParseError {
    ParseError::Expected {
        expected: expected.to_string(),
        found: format!("'{}'", token.raw),
        location: token.location,
    }
}

/// Parse `source` as a single expression.
pub fn parse_source(source: &str, lexicon: &Lexicon) -> Result<SyntaxTree, ParseError> {
    Parser::from_source(source, lexicon).parse()
}
