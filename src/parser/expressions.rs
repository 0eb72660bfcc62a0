//! Expression parsing implementation
//!
//! Precedence climbing over a table of operator classes, lowest to highest:
//!
//! ```text
//! assignment      := conditional-or ( '=' assignment )?
//! conditional-or  := conditional-and ( '||' conditional-and )*
//! conditional-and := bitwise-or ( '&&' bitwise-or )*
//! bitwise-or      := bitwise-and ( '|' bitwise-and )*
//! bitwise-and     := equality ( '&' equality )*
//! equality        := relational ( ('==' | '!=') relational )*
//! relational      := additive ( ('<' | '>') additive )*
//! additive        := multiplicative ( ('+' | '-') multiplicative )*
//! multiplicative  := unary ( ('*' | '/' | '%') unary )*
//! unary           := ('+' | '-' | '!' | '~') unary | '(' Type ')' unary | array-creation
//! array-creation  := 'new' Type ('[' expr ']')+ ('{' expr (',' expr)* '}')? | primary
//! ```
//!
//! Postfix `()`, `[]` and `.` bind left-to-right to the preceding primary.
//!
//! Every rule returns `Ok(None)` when no expression starts at the current
//! token, so optional operands (an empty argument list) are probed without
//! raising an error. Casts and array creation are recognised speculatively:
//! the tokens read while probing are unread when the probe fails.
//!
//! Every path that re-enters the grammar (operands of unary operators, casts
//! and assignments, parenthesized expressions, indices, sizes and lists) goes
//! through [`Parser::nested`], which bounds the recursion depth.

use crate::parser::ast::{Expression, LiteralValue};
use crate::parser::parse::{expected_at, ParseError, Parser};
use crate::parser::token::{
    Keyword, KeywordClass, Operator, OperatorClass, SourceLocation, Token, TokenValue,
};
use log::debug;
use std::io::Read;

/// Binary precedence levels, lowest first. Assignment sits below them.
const BINARY_LEVELS: [OperatorClass; 8] = [
    OperatorClass::CONDITIONAL_OR,
    OperatorClass::CONDITIONAL_AND,
    OperatorClass::BITWISE_OR,
    OperatorClass::BITWISE_AND,
    OperatorClass::EQUALITY,
    OperatorClass::RELATIONAL,
    OperatorClass::ADDITIVE,
    OperatorClass::MULTIPLICATIVE,
];

type ParseResult = Result<Option<Expression>, ParseError>;

impl<R: Read> Parser<'_, R> {
    /// Parse one expression, or `Ok(None)` if none starts here.
    pub fn parse_expression(&mut self) -> ParseResult {
        self.parse_assignment()
    }

    /// Run `rule` and turn an absent result into an error.
    fn require(
        &mut self,
        rule: impl FnOnce(&mut Self) -> ParseResult,
    ) -> Result<Expression, ParseError> {
        match rule(self)? {
            Some(expr) => Ok(expr),
            None => Err(self.unexpected("expression")),
        }
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> ParseResult {
        let Some(target) = self.parse_binary(0)? else {
            return Ok(None);
        };
        let Some((op, location)) = self.match_class(OperatorClass::ASSIGNMENT)? else {
            return Ok(Some(target));
        };
        let value = self.nested(location, |p| p.require(Self::parse_assignment))?;
        Ok(Some(Expression::BinaryOperation {
            op,
            left: Box::new(target),
            right: Box::new(value),
            location,
        }))
    }

    /// Parse the left-associative binary level `level` of [`BINARY_LEVELS`].
    fn parse_binary(&mut self, level: usize) -> ParseResult {
        let Some(&class) = BINARY_LEVELS.get(level) else {
            return self.parse_unary();
        };
        let Some(mut left) = self.parse_binary(level + 1)? else {
            return Ok(None);
        };

        while let Some((op, location)) = self.match_class(class)? {
            let right = self.require(|p| p.parse_binary(level + 1))?;
            left = Expression::BinaryOperation {
                op,
                left: Box::new(left),
                right: Box::new(right),
                location,
            };
        }

        Ok(Some(left))
    }

    /// Parse unary (+ - ! ~ and casts)
    fn parse_unary(&mut self) -> ParseResult {
        if let Some((op, location)) = self.match_class(OperatorClass::UNARY)? {
            let operand = self.nested(location, |p| p.require(Self::parse_unary))?;
            return Ok(Some(Expression::UnaryOperation {
                op,
                operand: Box::new(operand),
                location,
            }));
        }

        if self.check_operator(Operator::OpenParenthesis)? {
            if let Some(cast) = self.try_parse_cast()? {
                return Ok(Some(cast));
            }
        }

        self.parse_array_creation()
    }

    /// Try `'(' Type ')' unary`; on mismatch every consumed token is unread.
    fn try_parse_cast(&mut self) -> ParseResult {
        let Some(open) = self.advance()? else {
            return Ok(None);
        };
        let Some(name) = self.advance()? else {
            self.unread(open);
            return Ok(None);
        };

        if let Some(ty) = self.lexicon.type_of(&name) {
            if self.check_operator(Operator::CloseParenthesis)? {
                self.advance()?;
                debug!("cast to {ty} at {}", open.location);
                let operand = self.nested(open.location, |p| p.require(Self::parse_unary))?;
                return Ok(Some(Expression::TypeCast {
                    ty,
                    operand: Box::new(operand),
                    location: open.location,
                }));
            }
        }

        debug!("'(' at {} is not a cast, backtracking", open.location);
        self.unread(name);
        self.unread(open);
        Ok(None)
    }

    /// Parse array creation: new Type [size]... {items}
    fn parse_array_creation(&mut self) -> ParseResult {
        let starts_with_new = self
            .peek()?
            .is_some_and(|token| token.keyword() == Some(Keyword::New));
        if !starts_with_new {
            return self.parse_postfix_chain();
        }

        let Some(new) = self.advance()? else {
            return Ok(None);
        };
        let Some(name) = self.advance()? else {
            self.unread(new);
            return self.parse_postfix_chain();
        };
        let element = self.lexicon.type_of(&name);
        let opens_array = self.check_operator(Operator::OpenSquareBracket)?;
        let Some(element) = element.filter(|_| opens_array) else {
            debug!("'new' at {} is not an array creation", new.location);
            self.unread(name);
            self.unread(new);
            return self.parse_postfix_chain();
        };

        let mut sizes = Vec::new();
        while let Some(bracket) = self.match_operator(Operator::OpenSquareBracket)? {
            sizes.push(self.nested(bracket.location, |p| p.require(Self::parse_expression))?);
            self.expect_operator(Operator::CloseSquareBracket)?;
        }

        let initializer = match self.match_operator(Operator::OpenCurlyBrace)? {
            Some(brace) => Some(self.parse_list(brace.location, Operator::CloseCurlyBrace, false)?),
            None => None,
        };

        let rank = u32::try_from(sizes.len()).unwrap_or(u32::MAX);
        let creation = Expression::ArrayCreation {
            ty: element.with_rank(rank),
            sizes,
            initializer,
            location: new.location,
        };
        self.parse_postfix(creation).map(Some)
    }

    fn parse_postfix_chain(&mut self) -> ParseResult {
        match self.parse_primary()? {
            Some(primary) => self.parse_postfix(primary).map(Some),
            None => Ok(None),
        }
    }

    /// Parse postfix ([] . ()) applied to `expr`
    fn parse_postfix(&mut self, mut expr: Expression) -> Result<Expression, ParseError> {
        while let Some((op, location)) = self.match_class(OperatorClass::POSTFIX)? {
            expr = match op {
                Operator::OpenParenthesis => Expression::Invocation {
                    callee: Box::new(expr),
                    args: self.parse_list(location, Operator::CloseParenthesis, true)?,
                    location,
                },
                Operator::OpenSquareBracket => {
                    let index = self.nested(location, |p| p.require(Self::parse_expression))?;
                    self.expect_operator(Operator::CloseSquareBracket)?;
                    Expression::ArrayAccess {
                        array: Box::new(expr),
                        index: Box::new(index),
                        location,
                    }
                }
                _ => Expression::MemberAccess {
                    object: Box::new(expr),
                    member: self.expect_identifier()?,
                    location,
                },
            };
        }
        Ok(expr)
    }

    /// Parse comma-separated expressions up to and including `close`; the
    /// list opened at `open`.
    fn parse_list(
        &mut self,
        open: SourceLocation,
        close: Operator,
        allow_empty: bool,
    ) -> Result<Vec<Expression>, ParseError> {
        self.nested(open, |p| {
            let mut items = Vec::new();
            match p.parse_expression()? {
                Some(first) => items.push(first),
                None if allow_empty => {}
                None => return Err(p.unexpected("expression")),
            }
            if !items.is_empty() {
                while p.match_operator(Operator::Comma)?.is_some() {
                    items.push(p.require(Self::parse_expression)?);
                }
            }
            p.expect_operator(close)?;
            Ok(items)
        })
    }

    /// Parse primary (literals, references, parenthesized expressions, new)
    fn parse_primary(&mut self) -> ParseResult {
        let Some(token) = self.advance()? else {
            return Ok(None);
        };
        let location = token.location;

        let expr = match &token.value {
            Some(TokenValue::Int(n)) => self.literal(LiteralValue::Int(*n), location)?,
            Some(TokenValue::Float(x)) => self.literal(LiteralValue::Float(*x), location)?,
            Some(TokenValue::Char(c)) => self.literal(LiteralValue::Char(*c), location)?,
            Some(TokenValue::String(s)) => {
                self.literal(LiteralValue::String(s.clone()), location)?
            }
            Some(TokenValue::Keyword(Keyword::True)) => {
                self.literal(LiteralValue::Bool(true), location)?
            }
            Some(TokenValue::Keyword(Keyword::False)) => {
                self.literal(LiteralValue::Bool(false), location)?
            }
            Some(TokenValue::Keyword(Keyword::Null)) => self.literal(LiteralValue::Null, location)?,
            Some(TokenValue::Keyword(Keyword::New)) => self.parse_object_creation(&token)?,
            Some(TokenValue::Keyword(keyword)) if keyword.is(KeywordClass::TYPE) => {
                let ty = self.lexicon.type_of(&token).ok_or_else(|| ParseError::TypeNotFound {
                    name: token.raw.clone(),
                    location,
                })?;
                Expression::TypeReference { ty, location }
            }
            Some(TokenValue::Identifier(name)) => Expression::Reference {
                name: name.clone(),
                location,
            },
            Some(TokenValue::Operator(Operator::OpenParenthesis)) => {
                let inner = self.nested(location, |p| p.require(Self::parse_expression))?;
                self.expect_operator(Operator::CloseParenthesis)?;
                Expression::Parenthesis {
                    inner: Box::new(inner),
                    location,
                }
            }
            _ => {
                self.unread(token);
                return Ok(None);
            }
        };

        Ok(Some(expr))
    }

    /// Literal tagged with its registered type.
    fn literal(
        &self,
        value: LiteralValue,
        location: SourceLocation,
    ) -> Result<Expression, ParseError> {
        let name = value.type_name();
        let ty = self
            .lexicon
            .types()
            .resolve(name)
            .ok_or_else(|| ParseError::TypeNotFound {
                name: name.to_string(),
                location,
            })?;
        Ok(Expression::Literal {
            value,
            ty,
            location,
        })
    }

    /// Parse object creation after `new`: Type '(' args ')'
    fn parse_object_creation(&mut self, new: &Token) -> Result<Expression, ParseError> {
        let Some(name) = self.advance()? else {
            return Err(self.unexpected("type name"));
        };
        let names_type = name.identifier().is_some()
            || name.keyword().is_some_and(|k| k.is(KeywordClass::TYPE));
        if !names_type {
            return Err(expected_at("type name", &name));
        }
        let ty = self.lexicon.type_of(&name).ok_or_else(|| ParseError::TypeNotFound {
            name: name.raw.clone(),
            location: name.location,
        })?;

        let open = self.expect_operator(Operator::OpenParenthesis)?;
        let args = self.parse_list(open.location, Operator::CloseParenthesis, true)?;
        Ok(Expression::ObjectCreation {
            ty,
            args,
            location: new.location,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::lexicon::Lexicon;
    use crate::parser::parse::parse_source;
    use rstest::rstest;

    fn sexpr(source: &str) -> String {
        let lexicon = Lexicon::default();
        match parse_source(source, &lexicon) {
            Ok(tree) => tree.root.to_string(),
            Err(err) => panic!("parse of {source:?} failed: {err}"),
        }
    }

    #[rstest]
    #[case("a + b * c", "(+ a (* b c))")]
    #[case("a - b - c", "(- (- a b) c)")]
    #[case("a = b = c", "(= a (= b c))")]
    #[case("a || b && c", "(|| a (&& b c))")]
    #[case("a | b & c == d", "(| a (& b (== c d)))")]
    #[case("a < b != c > d", "(!= (< a b) (> c d))")]
    #[case("x % 2 / y", "(/ (% x 2) y)")]
    #[case("-!~x", "(- (! (~ x)))")]
    #[case("- -1", "(- (- 1))")]
    fn test_precedence(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(sexpr(source), expected);
    }

    #[rstest]
    #[case("(int)(float)x", "(cast int (cast float x))")]
    #[case("(x + 1)", "(paren (+ x 1))")]
    #[case("(int)-x * 2", "(* (cast int (- x)) 2)")]
    #[case("(x)(y)", "(call (paren x) y)")]
    #[case("(string)'c'", "(cast string 'c')")]
    #[case("(null)", "(paren null)")]
    fn test_cast_disambiguation(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(sexpr(source), expected);
    }

    #[rstest]
    #[case("f()", "(call f)")]
    #[case("f(a, b = 1)", "(call f a (= b 1))")]
    #[case("a.b[0](x)", "(call ([] (. a b) 0) x)")]
    #[case("a.b[0](x).c", "(. (call ([] (. a b) 0) x) c)")]
    #[case("int.max", "(. int max)")]
    fn test_postfix_chain(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(sexpr(source), expected);
    }

    #[rstest]
    #[case("new int[3]", "(new int[] 3)")]
    #[case("new float[n][2]", "(new float[][] n 2)")]
    #[case("new char[2]{'a', 'b'}", "(new char[] 2 { 'a' 'b' })")]
    #[case("new string()", "(new string)")]
    #[case("new int[2].size", "(. (new int[] 2) size)")]
    fn test_creation(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(sexpr(source), expected);
    }

    #[rstest]
    #[case("true && false", "(&& true false)")]
    #[case("null == x", "(== null x)")]
    #[case("\"hi\" + 1.5", "(+ \"hi\" 1.5)")]
    fn test_literals(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(sexpr(source), expected);
    }
}
