//! # Introduction
//!
//! cfront tokenizes and parses expressions of a small statically typed,
//! C-like language.
//!
//! ## Pipeline
//!
//! ```text
//! Source → CharStream → Tokenizer → Parser → SyntaxTree
//! ```
//!
//! 1. [`parser::stream`] reads bytes and tracks `(row, col)` positions.
//! 2. [`parser::lexer`] drives a per-state transition table over the
//!    128-symbol ASCII alphabet and yields typed [`parser::token::Token`]s.
//!    Malformed literals become tokens carrying a diagnostic; non-ASCII bytes
//!    and unsupported characters stop tokenization.
//! 3. [`parser::parse`] builds an [`parser::ast::Expression`] tree with
//!    precedence climbing, speculative cast detection and array creation.
//!
//! Keywords and type names live in a [`parser::lexicon::Lexicon`] which is
//! built once and borrowed by every tokenizer and parser.
//!
//! ```
//! use cfront::{parse_source, Lexicon};
//!
//! let lexicon = Lexicon::default();
//! let tree = parse_source("(int)x + a.b[0]", &lexicon).unwrap();
//! assert_eq!(tree.root.to_string(), "(+ (cast int x) ([] (. a b) 0))");
//! ```

pub mod parser;

pub use parser::ast::{Expression, LiteralValue, SyntaxTree};
pub use parser::lexer::{LexError, Tokenizer};
pub use parser::lexicon::Lexicon;
pub use parser::parse::{parse_source, ParseError, Parser};
pub use parser::registry::{Type, TypeInfo, TypeRegistry};
pub use parser::token::{Keyword, Operator, SourceLocation, Token, TokenKind, TokenValue};
