//! The lexer: turns a source string into a stream of [`Token`]s on demand.

use limec_util::{DiagnosticBuilder, Handler, Span};

use crate::cursor::Cursor;
use crate::keywords::lookup_ident;
use crate::token::{Token, TokenKind};

/// Lexer for the source language.
///
/// Scans left-to-right with a one-character cursor and a one-character
/// peek. The lexer never aborts on malformed input: anything it cannot
/// recognize comes back as an `Illegal` token, with a diagnostic recorded
/// in `handler` for whoever wants to report it.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    pub handler: &'a mut Handler,
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token, or `Eof` once the source is exhausted.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::eof(self.token_start_line, self.token_start_column);
        }

        let c = self.cursor.current_char();
        match c {
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_compound(TokenKind::Asterisk, TokenKind::MulEq),
            '/' => self.lex_compound(TokenKind::Slash, TokenKind::DivEq),
            '^' => self.single(TokenKind::Power),
            '%' => self.single(TokenKind::Modulo),
            ';' => self.single(TokenKind::Semicolon),
            ':' => self.single(TokenKind::Colon),
            ',' => self.single(TokenKind::Comma),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            '=' => self.lex_compound(TokenKind::Eq, TokenKind::EqEq),
            '!' => self.lex_compound(TokenKind::Bang, TokenKind::NotEq),
            '<' => self.lex_compound(TokenKind::Lt, TokenKind::LtEq),
            '>' => self.lex_compound(TokenKind::Gt, TokenKind::GtEq),
            '"' => self.lex_string(),
            c if is_ident_start(c) => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c => {
                self.report_error(format!("unexpected character '{c}'"));
                self.cursor.advance();
                self.make_token(TokenKind::Illegal, c.to_string())
            }
        }
    }

    fn make_token(&self, kind: TokenKind, literal: impl Into<String>) -> Token {
        Token::new(kind, literal, self.token_start_line, self.token_start_column)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let lit = self.cursor.current_char().to_string();
        self.cursor.advance();
        self.make_token(kind, lit)
    }

    /// `+`/`-` need a third case beyond the plain `=`-suffix rule: `->` and
    /// the postfix `++`/`--` pair.
    fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.make_token(TokenKind::PlusEq, "+=")
        } else if self.cursor.current_char() == '+' {
            self.cursor.advance();
            self.make_token(TokenKind::PlusPlus, "++")
        } else {
            self.make_token(TokenKind::Plus, "+")
        }
    }

    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.make_token(TokenKind::MinusEq, "-=")
        } else if self.cursor.current_char() == '-' {
            self.cursor.advance();
            self.make_token(TokenKind::MinusMinus, "--")
        } else if self.cursor.current_char() == '>' {
            self.cursor.advance();
            self.make_token(TokenKind::Arrow, "->")
        } else {
            self.make_token(TokenKind::Minus, "-")
        }
    }

    /// Shared shape for the two-character tokens formed only with `=` as a
    /// suffix: `* / = ! < >` each either stand alone or combine with a
    /// trailing `=` into a compound kind.
    fn lex_compound(&mut self, single_kind: TokenKind, eq_kind: TokenKind) -> Token {
        let first = self.cursor.current_char();
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            self.make_token(eq_kind, format!("{first}="))
        } else {
            self.make_token(single_kind, first.to_string())
        }
    }

    fn lex_number(&mut self) -> Token {
        let mut output = String::new();
        let mut dot_count = 0;
        while self.cursor.current_char().is_ascii_digit() || self.cursor.current_char() == '.' {
            if self.cursor.current_char() == '.' {
                dot_count += 1;
            }
            output.push(self.cursor.current_char());
            self.cursor.advance();
        }
        if dot_count > 1 {
            self.report_error(format!(
                "too many decimal points in number literal '{output}'"
            ));
            return self.make_token(TokenKind::Illegal, output);
        }
        if dot_count == 0 {
            self.make_token(TokenKind::Int, output)
        } else {
            self.make_token(TokenKind::Float, output)
        }
    }

    fn lex_identifier(&mut self) -> Token {
        let mut output = String::new();
        while is_ident_continue(self.cursor.current_char()) {
            output.push(self.cursor.current_char());
            self.cursor.advance();
        }
        let kind = lookup_ident(&output);
        self.make_token(kind, output)
    }

    /// No escape processing happens here: the raw interior text, including
    /// a literal backslash-n if present, is captured as-is. The code
    /// generator is the one that rewrites `\n` into an actual newline.
    fn lex_string(&mut self) -> Token {
        self.cursor.advance();
        let mut output = String::new();
        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_string());
                break;
            }
            if self.cursor.current_char() == '"' {
                self.cursor.advance();
                break;
            }
            output.push(self.cursor.current_char());
            self.cursor.advance();
        }
        self.make_token(TokenKind::Str, output)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.cursor.current_char(), ' ' | '\t' | '\n' | '\r') {
            self.cursor.advance();
        }
    }

    fn report_error(&mut self, message: String) {
        let span = Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
