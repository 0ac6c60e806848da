//! Keyword, alternate-keyword, and type-name lookup tables.
//!
//! An identifier lexeme is looked up in three tables in order: primary
//! keywords, the whimsical alternate-keyword aliases, and the type-name
//! set. The first hit wins; a miss in all three yields `IDENT`.

use crate::token::TokenKind;

/// Primary keyword table.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "let" => Some(TokenKind::Let),
        "fn" => Some(TokenKind::Fn),
        "return" => Some(TokenKind::Return),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "while" => Some(TokenKind::While),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "for" => Some(TokenKind::For),
        "import" => Some(TokenKind::Import),
        _ => None,
    }
}

/// Whimsical alternate spellings for the same keywords above.
pub fn lookup_alternate_keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "lit" => Some(TokenKind::Let),
        "be" => Some(TokenKind::Eq),
        "rn" => Some(TokenKind::Semicolon),
        "bruh" => Some(TokenKind::Fn),
        "pause" => Some(TokenKind::Return),
        "snek" => Some(TokenKind::Arrow),
        "sus" => Some(TokenKind::If),
        "imposter" => Some(TokenKind::Else),
        _ => None,
    }
}

/// Declared source type names.
pub fn is_type_name(ident: &str) -> bool {
    matches!(ident, "int" | "float" | "bool" | "str" | "void")
}

/// Resolves an identifier lexeme to its token kind: keyword, alternate
/// keyword, type name, or plain identifier.
pub fn lookup_ident(ident: &str) -> TokenKind {
    if let Some(kind) = lookup_keyword(ident) {
        return kind;
    }
    if let Some(kind) = lookup_alternate_keyword(ident) {
        return kind;
    }
    if is_type_name(ident) {
        return TokenKind::Type;
    }
    TokenKind::Ident
}
