//! Lexical analysis for the source language.
//!
//! A lexer is a function Σ* → T* from a character stream to a token
//! stream. This one scans left-to-right with a one-character cursor and
//! a one-character peek, producing tokens on demand rather than all at
//! once: `Lexer::next_token` is the only operation callers need.
//!
//! Malformed input never aborts lexing. An unrecognized character, or a
//! number with more than one decimal point, comes back as `Illegal` with
//! a diagnostic recorded on the side; it's up to the parser to decide
//! what an `Illegal` token means for the surrounding grammar.

mod cursor;
mod keywords;
mod lexer;
mod token;

pub use keywords::{is_type_name, lookup_alternate_keyword, lookup_ident, lookup_keyword};
pub use lexer::Lexer;
pub use token::{AssignOp, Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;
    use limec_util::Handler;

    fn lex_all(source: &str) -> (Vec<Token>, Handler) {
        let mut handler = Handler::new();
        let tokens = {
            let mut lexer = Lexer::new(source, &mut handler);
            std::iter::from_fn(|| Some(lexer.next_token()))
                .take_while(|t| t.kind != TokenKind::Eof)
                .collect::<Vec<_>>()
        };
        (tokens, handler)
    }

    #[test]
    fn lexes_single_char_tokens() {
        let (tokens, _) = lex_all("+-*/^%;:,(){}");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Asterisk,
                TokenKind::Slash,
                TokenKind::Power,
                TokenKind::Modulo,
                TokenKind::Semicolon,
                TokenKind::Colon,
                TokenKind::Comma,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn lexes_compound_operators() {
        let (tokens, _) = lex_all("== != <= >= += -= *= /= -> ++ --");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::MulEq,
                TokenKind::DivEq,
                TokenKind::Arrow,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
            ]
        );
    }

    #[test]
    fn single_equals_and_bang_and_comparisons_without_suffix() {
        let (tokens, _) = lex_all("= ! < >");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Eq, TokenKind::Bang, TokenKind::Lt, TokenKind::Gt]
        );
    }

    #[test]
    fn lexes_int_and_float() {
        let (tokens, _) = lex_all("42 3.14");
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[0].literal, "42");
        assert_eq!(tokens[1].kind, TokenKind::Float);
        assert_eq!(tokens[1].literal, "3.14");
    }

    #[test]
    fn too_many_decimal_points_is_illegal_and_reports_a_diagnostic() {
        let (tokens, handler) = lex_all("1.2.3");
        assert_eq!(tokens[0].kind, TokenKind::Illegal);
        assert!(handler.has_errors());
    }

    #[test]
    fn lexes_string_without_escape_processing() {
        let (tokens, _) = lex_all(r#""hello\nworld""#);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].literal, "hello\\nworld");
    }

    #[test]
    fn unterminated_string_reports_a_diagnostic() {
        let (tokens, handler) = lex_all("\"unterminated");
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert!(handler.has_errors());
    }

    #[test]
    fn keywords_alternate_keywords_and_types_resolve() {
        let (tokens, _) = lex_all("let lit fn bruh int x");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Let,
                TokenKind::Let,
                TokenKind::Fn,
                TokenKind::Fn,
                TokenKind::Type,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn line_and_column_advance_across_newlines() {
        let (tokens, _) = lex_all("let x\nlet y");
        assert_eq!(tokens[0].line, 1);
        let second_let = tokens.iter().find(|t| t.literal == "y").unwrap();
        assert_eq!(second_let.line, 2);
    }

    #[test]
    fn unrecognized_character_is_illegal() {
        let (tokens, handler) = lex_all("let x = 1 $ 2;");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Illegal));
        assert!(handler.has_errors());
    }

    #[test]
    fn underscore_prefixed_identifier_lexes_as_ident() {
        let (tokens, _) = lex_all("_private_name");
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].literal, "_private_name");
    }
}
