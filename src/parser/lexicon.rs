//! Immutable lookup context shared by tokenizers and parsers
//!
//! A [`Lexicon`] owns the keyword table, the [`TypeRegistry`] and the
//! tokenizer's transition table. It is built once and borrowed by every
//! [`Tokenizer`](super::lexer::Tokenizer) and [`Parser`](super::parse::Parser),
//! so independent instances never share mutable state.

use super::automaton::TransitionTable;
use super::registry::{Type, TypeRegistry};
use super::token::{Keyword, KeywordClass, Token, TokenValue};
use rustc_hash::FxHashMap;

pub struct Lexicon {
    keywords: FxHashMap<&'static str, Keyword>,
    types: TypeRegistry,
    transitions: Box<TransitionTable>,
}

impl Lexicon {
    pub fn new(types: TypeRegistry) -> Self {
        let keywords = Keyword::ALL.iter().map(|k| (k.text(), *k)).collect();
        Self {
            keywords,
            types,
            transitions: Box::new(TransitionTable::new()),
        }
    }

    /// Keyword spelled exactly by `word`, if any.
    pub fn keyword(&self, word: &str) -> Option<Keyword> {
        self.keywords.get(word).copied()
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Type named by `token`: an identifier or a type keyword whose text is
    /// registered.
    pub fn type_of(&self, token: &Token) -> Option<Type> {
        let named = match &token.value {
            Some(TokenValue::Identifier(_)) => true,
            Some(TokenValue::Keyword(keyword)) => keyword.is(KeywordClass::TYPE),
            _ => false,
        };
        if named {
            self.types.resolve(&token.raw)
        } else {
            None
        }
    }

    pub(crate) fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(TypeRegistry::primitives())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::registry::TypeInfo;
    use crate::parser::token::{SourceLocation, TokenKind};

    fn token(kind: TokenKind, value: TokenValue, raw: &str) -> Token {
        Token {
            kind,
            value: Some(value),
            raw: raw.to_string(),
            location: SourceLocation::default(),
            diagnostic: None,
        }
    }

    #[test]
    fn test_keyword_lookup_is_case_sensitive() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.keyword("while"), Some(Keyword::While));
        assert_eq!(lexicon.keyword("While"), None);
        assert_eq!(lexicon.keyword("static"), Some(Keyword::Static));
    }

    #[test]
    fn test_type_of_keyword_and_identifier() {
        let lexicon = Lexicon::new(TypeRegistry::primitives().with_type(TypeInfo::new("Foo")));
        let int = token(TokenKind::Keyword, TokenValue::Keyword(Keyword::Int), "int");
        let foo = token(TokenKind::Identifier, TokenValue::Identifier("Foo".into()), "Foo");
        let bar = token(TokenKind::Identifier, TokenValue::Identifier("Bar".into()), "Bar");
        let null = token(TokenKind::Keyword, TokenValue::Keyword(Keyword::Null), "null");

        assert_eq!(lexicon.type_of(&int).map(|t| t.to_string()), Some("int".to_string()));
        assert!(lexicon.type_of(&foo).is_some());
        assert!(lexicon.type_of(&bar).is_none());
        assert!(lexicon.type_of(&null).is_none());
    }
}
