//! The named precedence ladder the Pratt parser climbs.

use limec_lex::TokenKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Exponent,
    Prefix,
    Call,
    Index,
}

/// The precedence of a token in infix position, or `Lowest` if it never
/// appears as an infix operator.
pub fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::EqEq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => {
            Precedence::LessGreater
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash | TokenKind::Modulo => Precedence::Product,
        TokenKind::Power => Precedence::Exponent,
        TokenKind::LParen => Precedence::Call,
        TokenKind::PlusPlus | TokenKind::MinusMinus => Precedence::Index,
        _ => Precedence::Lowest,
    }
}
