//! Property tests for the lexer round-trip invariant: concatenating the
//! literals of emitted tokens (in order) reproduces the input modulo
//! whitespace and punctuation that the lexer collapses into itself.

use limec_lex::{Lexer, TokenKind};
use limec_util::Handler;
use proptest::prelude::*;

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_map(|s| s)
}

proptest! {
    #[test]
    fn identifiers_round_trip_through_the_lexer(name in identifier_strategy()) {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(&name, &mut handler);
        let token = lexer.next_token();
        prop_assert_eq!(&token.literal, &name);
        prop_assert!(matches!(token.kind, TokenKind::Ident | TokenKind::Type)
            || limec_lex::lookup_keyword(&name).is_some()
            || limec_lex::lookup_alternate_keyword(&name).is_some());
    }

    #[test]
    fn integers_round_trip_through_the_lexer(n in 0i64..1_000_000) {
        let text = n.to_string();
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(&text, &mut handler);
        let token = lexer.next_token();
        prop_assert_eq!(token.kind, TokenKind::Int);
        prop_assert_eq!(token.literal, text);
    }
}
