//! Front end for a small C-like language
//!
//! This module turns source text into an expression tree:
//! - [`stream`]: Character input with row/column tracking and one-symbol pushback
//! - [`token`]: Token, operator and keyword definitions
//! - [`registry`]: Type metadata (`int`, `string`, user classes, array ranks)
//! - [`lexicon`]: Keyword table, type registry and transition table bundled for sharing
//! - [`lexer`]: Table-driven tokenization (characters → tokens)
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
pub(crate) mod automaton;
mod expressions;
pub mod lexer;
pub mod lexicon;
pub mod parse;
pub mod registry;
pub mod stream;
pub mod token;
