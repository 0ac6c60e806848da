//! Token kinds and the `Token` value the lexer produces.

use std::fmt;

/// The closed set of token kinds the lexer can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,
    Illegal,

    Ident,
    Int,
    Float,
    Str,
    /// A recognized type name (`int`, `float`, `bool`, `str`, `void`).
    Type,

    Plus,
    Minus,
    Asterisk,
    Slash,
    Power,
    Modulo,

    Eq,
    PlusEq,
    MinusEq,
    MulEq,
    DivEq,

    Lt,
    Gt,
    EqEq,
    NotEq,
    LtEq,
    GtEq,

    Bang,
    PlusPlus,
    MinusMinus,

    Colon,
    Comma,
    Semicolon,
    Arrow,
    LParen,
    RParen,
    LBrace,
    RBrace,

    Let,
    Fn,
    Return,
    If,
    Else,
    True,
    False,
    While,
    Break,
    Continue,
    For,
    Import,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single lexed token.
///
/// `literal` holds the raw lexeme text in every case; callers that need a
/// parsed `i64`/`f64` (the parser, building `IntegerLiteral`/`FloatLiteral`
/// nodes) parse it themselves from the text, since `kind` already tells
/// them which parse to perform.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            literal: literal.into(),
            line,
            column,
        }
    }

    pub fn eof(line: u32, column: u32) -> Self {
        Self::new(TokenKind::Eof, "", line, column)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token({:?}, {:?}, line {}, column {})",
            self.kind, self.literal, self.line, self.column
        )
    }
}

/// Assignment operators, a subset of [`TokenKind`] the parser narrows to
/// when it decides a statement is an `AssignStatement`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Eq,
    PlusEq,
    MinusEq,
    MulEq,
    DivEq,
}

impl AssignOp {
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(AssignOp::Eq),
            TokenKind::PlusEq => Some(AssignOp::PlusEq),
            TokenKind::MinusEq => Some(AssignOp::MinusEq),
            TokenKind::MulEq => Some(AssignOp::MulEq),
            TokenKind::DivEq => Some(AssignOp::DivEq),
            _ => None,
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignOp::Eq => "=",
            AssignOp::PlusEq => "+=",
            AssignOp::MinusEq => "-=",
            AssignOp::MulEq => "*=",
            AssignOp::DivEq => "/=",
        };
        write!(f, "{s}")
    }
}
