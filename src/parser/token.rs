//! Token model shared by the tokenizer and the parser
//!
//! A [`Token`] is an immutable record of one lexeme: its [`TokenKind`], the
//! coerced [`TokenValue`], the raw source text and the [`SourceLocation`] of its
//! first character. Operators and keywords carry class flags
//! ([`OperatorClass`], [`KeywordClass`]) so grammar levels can test membership
//! without listing every concrete tag.

use std::fmt;
use std::ops::BitOr;

/// 0-based source position of a character or token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub row: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// Set of operator classes an [`Operator`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperatorClass(u16);

impl OperatorClass {
    pub const NONE: Self = Self(0);
    pub const ASSIGNMENT: Self = Self(1 << 0);
    pub const CONDITIONAL_OR: Self = Self(1 << 1);
    pub const CONDITIONAL_AND: Self = Self(1 << 2);
    pub const BITWISE_OR: Self = Self(1 << 3);
    pub const BITWISE_AND: Self = Self(1 << 4);
    pub const EQUALITY: Self = Self(1 << 5);
    pub const RELATIONAL: Self = Self(1 << 6);
    pub const ADDITIVE: Self = Self(1 << 7);
    pub const MULTIPLICATIVE: Self = Self(1 << 8);
    pub const UNARY: Self = Self(1 << 9);
    pub const POSTFIX: Self = Self(1 << 10);

    /// True when every class in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for OperatorClass {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Set of keyword classes a [`Keyword`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeywordClass(u8);

impl KeywordClass {
    pub const NONE: Self = Self(0);
    pub const TYPE: Self = Self(1 << 0);
    pub const LOGIC: Self = Self(1 << 1);
    pub const MODIFIER: Self = Self(1 << 2);
    pub const BOOL_LITERAL: Self = Self(1 << 3);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for KeywordClass {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Operator and punctuation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Assignment,         // =
    Add,                // +
    Subtract,           // -
    Multiply,           // *
    Divide,             // /
    Remainder,          // %
    LogicalNot,         // !
    BitwiseNot,         // ~
    LogicalAnd,         // &&
    BitwiseAnd,         // &
    LogicalOr,          // ||
    BitwiseOr,          // |
    EqualityTest,       // ==
    NotEqualityTest,    // !=
    LessTest,           // <
    MoreTest,           // >
    OpenParenthesis,    // (
    CloseParenthesis,   // )
    OpenCurlyBrace,     // {
    CloseCurlyBrace,    // }
    OpenSquareBracket,  // [
    CloseSquareBracket, // ]
    Dot,                // .
    Comma,              // ,
    SemiColon,          // ;
}

impl Operator {
    pub fn classes(self) -> OperatorClass {
        use Operator::*;
        match self {
            Assignment => OperatorClass::ASSIGNMENT,
            Add | Subtract => OperatorClass::ADDITIVE | OperatorClass::UNARY,
            Multiply | Divide | Remainder => OperatorClass::MULTIPLICATIVE,
            LogicalNot | BitwiseNot => OperatorClass::UNARY,
            LogicalAnd => OperatorClass::CONDITIONAL_AND,
            BitwiseAnd => OperatorClass::BITWISE_AND,
            LogicalOr => OperatorClass::CONDITIONAL_OR,
            BitwiseOr => OperatorClass::BITWISE_OR,
            EqualityTest | NotEqualityTest => OperatorClass::EQUALITY,
            LessTest | MoreTest => OperatorClass::RELATIONAL,
            OpenParenthesis | OpenSquareBracket | Dot => OperatorClass::POSTFIX,
            CloseParenthesis | OpenCurlyBrace | CloseCurlyBrace | CloseSquareBracket
            | Comma | SemiColon => OperatorClass::NONE,
        }
    }

    pub fn is(self, class: OperatorClass) -> bool {
        self.classes().intersects(class)
    }

    pub fn symbol(self) -> &'static str {
        use Operator::*;
        match self {
            Assignment => "=",
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Remainder => "%",
            LogicalNot => "!",
            BitwiseNot => "~",
            LogicalAnd => "&&",
            BitwiseAnd => "&",
            LogicalOr => "||",
            BitwiseOr => "|",
            EqualityTest => "==",
            NotEqualityTest => "!=",
            LessTest => "<",
            MoreTest => ">",
            OpenParenthesis => "(",
            CloseParenthesis => ")",
            OpenCurlyBrace => "{",
            CloseCurlyBrace => "}",
            OpenSquareBracket => "[",
            CloseSquareBracket => "]",
            Dot => ".",
            Comma => ",",
            SemiColon => ";",
        }
    }

    /// Single-character operator spelled by `symbol`.
    ///
    /// The first character of a two-character operator maps to its
    /// one-character form (`&` to [`Operator::BitwiseAnd`], `!` to
    /// [`Operator::LogicalNot`], ...).
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        use Operator::*;
        let op = match symbol {
            b'=' => Assignment,
            b'+' => Add,
            b'-' => Subtract,
            b'*' => Multiply,
            b'/' => Divide,
            b'%' => Remainder,
            b'!' => LogicalNot,
            b'~' => BitwiseNot,
            b'&' => BitwiseAnd,
            b'|' => BitwiseOr,
            b'<' => LessTest,
            b'>' => MoreTest,
            b'(' => OpenParenthesis,
            b')' => CloseParenthesis,
            b'{' => OpenCurlyBrace,
            b'}' => CloseCurlyBrace,
            b'[' => OpenSquareBracket,
            b']' => CloseSquareBracket,
            b'.' => Dot,
            b',' => Comma,
            b';' => SemiColon,
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Void,
    Int,
    Float,
    Char,
    String,
    Bool,
    Class,
    If,
    For,
    While,
    Return,
    Break,
    Public,
    Static,
    New,
    True,
    False,
    Null,
}

impl Keyword {
    pub const ALL: [Keyword; 18] = [
        Keyword::Void,
        Keyword::Int,
        Keyword::Float,
        Keyword::Char,
        Keyword::String,
        Keyword::Bool,
        Keyword::Class,
        Keyword::If,
        Keyword::For,
        Keyword::While,
        Keyword::Return,
        Keyword::Break,
        Keyword::Public,
        Keyword::Static,
        Keyword::New,
        Keyword::True,
        Keyword::False,
        Keyword::Null,
    ];

    pub fn text(self) -> &'static str {
        match self {
            Keyword::Void => "void",
            Keyword::Int => "int",
            Keyword::Float => "float",
            Keyword::Char => "char",
            Keyword::String => "string",
            Keyword::Bool => "bool",
            Keyword::Class => "class",
            Keyword::If => "if",
            Keyword::For => "for",
            Keyword::While => "while",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Public => "public",
            Keyword::Static => "static",
            Keyword::New => "new",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
        }
    }

    pub fn classes(self) -> KeywordClass {
        match self {
            Keyword::Void
            | Keyword::Int
            | Keyword::Float
            | Keyword::Char
            | Keyword::String
            | Keyword::Bool => KeywordClass::TYPE,
            Keyword::If | Keyword::For | Keyword::While | Keyword::Return | Keyword::Break => {
                KeywordClass::LOGIC
            }
            Keyword::Public | Keyword::Static => KeywordClass::MODIFIER,
            Keyword::True | Keyword::False => KeywordClass::BOOL_LITERAL,
            Keyword::Class | Keyword::New | Keyword::Null => KeywordClass::NONE,
        }
    }

    pub fn is(self, class: KeywordClass) -> bool {
        self.classes().intersects(class)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Operator,
    Int,
    Float,
    Char,
    String,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "Identifier",
            TokenKind::Keyword => "Keyword",
            TokenKind::Operator => "Operator",
            TokenKind::Int => "Int",
            TokenKind::Float => "Float",
            TokenKind::Char => "Char",
            TokenKind::String => "String",
        };
        f.write_str(name)
    }
}

/// Coerced value of a well-formed token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Identifier(String),
    Keyword(Keyword),
    Operator(Operator),
    Int(i32),
    Float(f32),
    Char(char),
    String(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Identifier(name) => f.write_str(name),
            TokenValue::Keyword(keyword) => write!(f, "{keyword}"),
            TokenValue::Operator(op) => write!(f, "{op}"),
            TokenValue::Int(n) => write!(f, "{n}"),
            TokenValue::Float(x) => write!(f, "{x:?}"),
            TokenValue::Char(c) => write!(f, "{c:?}"),
            TokenValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// One lexeme produced by the tokenizer.
///
/// `value` is `None` exactly when `diagnostic` is `Some`: a lexical error was
/// recorded while scanning this token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<TokenValue>,
    pub raw: String,
    pub location: SourceLocation,
    pub diagnostic: Option<String>,
}

impl Token {
    pub fn is_error(&self) -> bool {
        self.diagnostic.is_some()
    }

    pub fn operator(&self) -> Option<Operator> {
        match self.value {
            Some(TokenValue::Operator(op)) => Some(op),
            _ => None,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self.value {
            Some(TokenValue::Keyword(keyword)) => Some(keyword),
            _ => None,
        }
    }

    pub fn is_operator(&self, op: Operator) -> bool {
        self.operator() == Some(op)
    }

    pub fn identifier(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Identifier(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_error() {
            format!("Error-{}", self.kind)
        } else {
            self.kind.to_string()
        };
        let value = match (&self.value, &self.diagnostic) {
            (Some(value), _) => value.to_string(),
            (None, Some(message)) => message.clone(),
            (None, None) => String::new(),
        };
        write!(
            f,
            "r:{:>3} c:{:>3} {:>16} {:<16} raw {}",
            self.location.row, self.location.col, kind, value, self.raw
        )
    }
}
