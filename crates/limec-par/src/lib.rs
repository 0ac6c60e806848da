//! Recursive-descent, Pratt-style parser.
//!
//! The parser's prefix/infix "tables" are `match` arms over [`TokenKind`]
//! rather than dynamic lookup, per the named-precedence ladder in
//! [`precedence`].

mod ast;
mod precedence;

pub use ast::*;
pub use precedence::Precedence;

use limec_lex::{AssignOp, Lexer, Token, TokenKind};
use limec_util::Handler;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        let mut lexer = Lexer::new(source, handler);
        let cur_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Self {
            lexer,
            cur_token,
            peek_token,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    fn advance(&mut self) {
        std::mem::swap(&mut self.cur_token, &mut self.peek_token);
        self.peek_token = self.lexer.next_token();
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// If the peek token matches `kind`, advances onto it and returns
    /// true; otherwise records an error and returns false.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_is(kind) {
            self.advance();
            true
        } else {
            self.errors.push(format!(
                "expected next token to be {kind:?}, got {:?} instead (line {})",
                self.peek_token.kind, self.peek_token.line
            ));
            false
        }
    }

    fn peek_precedence(&self) -> Precedence {
        precedence::precedence_of(self.peek_token.kind)
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Vec::new();
        while !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                program.push(stmt);
            }
            self.advance();
        }
        program
    }

    fn parse_statement(&mut self) -> Option<Stmt> {
        if self.cur_is(TokenKind::Ident) && AssignOp::from_kind(self.peek_token.kind).is_some() {
            return self.parse_assign_statement();
        }
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Fn => self.parse_function_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Break => self.parse_break_statement(),
            TokenKind::Continue => self.parse_continue_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Import => self.parse_import_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn consume_optional_semicolon(&mut self) {
        if self.peek_is(TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn parse_let_statement(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_token.literal.clone();
        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        if !self.expect_peek(TokenKind::Type) {
            return None;
        }
        let declared_type = self.cur_token.literal.clone();
        if !self.expect_peek(TokenKind::Eq) {
            return None;
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.consume_optional_semicolon();
        Some(Stmt::Let {
            name,
            declared_type,
            value,
        })
    }

    fn parse_assign_statement(&mut self) -> Option<Stmt> {
        let name = self.cur_token.literal.clone();
        self.advance();
        let op = AssignOp::from_kind(self.cur_token.kind)?;
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        self.consume_optional_semicolon();
        Some(Stmt::Assign { name, op, value })
    }

    fn parse_function_statement(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = self.cur_token.literal.clone();
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        let params = self.parse_function_parameters()?;
        if !self.expect_peek(TokenKind::Arrow) {
            return None;
        }
        if !self.expect_peek(TokenKind::Type) {
            return None;
        }
        let return_type = self.cur_token.literal.clone();
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block()?;
        Some(Stmt::Function {
            name,
            params,
            return_type,
            body,
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<FunctionParameter>> {
        let mut params = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Some(params);
        }
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        params.push(self.parse_one_parameter()?);
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            if !self.expect_peek(TokenKind::Ident) {
                return None;
            }
            params.push(self.parse_one_parameter()?);
        }
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(params)
    }

    fn parse_one_parameter(&mut self) -> Option<FunctionParameter> {
        let name = self.cur_token.literal.clone();
        if !self.expect_peek(TokenKind::Colon) {
            return None;
        }
        if !self.expect_peek(TokenKind::Type) {
            return None;
        }
        let declared_type = self.cur_token.literal.clone();
        Some(FunctionParameter { name, declared_type })
    }

    /// Assumes `cur_token` is the `{` that opens the block.
    fn parse_block(&mut self) -> Option<Block> {
        let mut statements = Vec::new();
        self.advance();
        while !self.cur_is(TokenKind::RBrace) && !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        if !self.cur_is(TokenKind::RBrace) {
            self.errors.push("expected '}' to close block".to_string());
            return None;
        }
        Some(statements)
    }

    fn parse_return_statement(&mut self) -> Option<Stmt> {
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        Some(Stmt::Return(value))
    }

    fn parse_while_statement(&mut self) -> Option<Stmt> {
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block()?;
        Some(Stmt::While { condition, body })
    }

    fn parse_break_statement(&mut self) -> Option<Stmt> {
        self.consume_optional_semicolon();
        Some(Stmt::Break)
    }

    fn parse_continue_statement(&mut self) -> Option<Stmt> {
        self.consume_optional_semicolon();
        Some(Stmt::Continue)
    }

    fn parse_for_statement(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.advance();
        let init = self.parse_let_statement()?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::Semicolon) {
            return None;
        }
        self.advance();
        let step = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let body = self.parse_block()?;
        Some(Stmt::For {
            init: Box::new(init),
            condition,
            step,
            body,
        })
    }

    fn parse_import_statement(&mut self) -> Option<Stmt> {
        if !self.expect_peek(TokenKind::Str) {
            return None;
        }
        let module_name = self.cur_token.literal.clone();
        self.consume_optional_semicolon();
        Some(Stmt::Import(module_name))
    }

    fn parse_expression_statement(&mut self) -> Option<Stmt> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.consume_optional_semicolon();
        Some(Stmt::Expression(expr))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;
        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            self.advance();
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.cur_token.kind {
            TokenKind::Ident => Some(Expr::Identifier(self.cur_token.literal.clone())),
            TokenKind::Int => match self.cur_token.literal.parse::<i64>() {
                Ok(n) => Some(Expr::IntegerLiteral(n)),
                Err(_) => {
                    self.errors
                        .push(format!("could not parse '{}' as an integer", self.cur_token.literal));
                    None
                }
            },
            TokenKind::Float => match self.cur_token.literal.parse::<f64>() {
                Ok(n) => Some(Expr::FloatLiteral(n)),
                Err(_) => {
                    self.errors.push(format!(
                        "could not parse '{}' as a float",
                        self.cur_token.literal
                    ));
                    None
                }
            },
            TokenKind::True => Some(Expr::BooleanLiteral(true)),
            TokenKind::False => Some(Expr::BooleanLiteral(false)),
            TokenKind::Str => Some(Expr::StringLiteral(self.cur_token.literal.clone())),
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression(Precedence::Lowest)?;
                if !self.expect_peek(TokenKind::RParen) {
                    return None;
                }
                Some(expr)
            }
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Bang => {
                self.advance();
                let operand = self.parse_expression(Precedence::Prefix)?;
                Some(Expr::Prefix {
                    op: PrefixOp::Not,
                    operand: Box::new(operand),
                })
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expression(Precedence::Prefix)?;
                Some(Expr::Prefix {
                    op: PrefixOp::Neg,
                    operand: Box::new(operand),
                })
            }
            kind => {
                self.errors
                    .push(format!("no prefix parse function for {kind:?} found"));
                None
            }
        }
    }

    /// Shared by the `if`-as-expression prefix handler; there is no
    /// separate statement-level `if` parser (see `ast::Stmt`).
    fn parse_if_expression(&mut self) -> Option<Expr> {
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let then_block = self.parse_block()?;
        let else_block = if self.peek_is(TokenKind::Else) {
            self.advance();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block()?)
        } else {
            None
        };
        Some(Expr::If {
            condition: Box::new(condition),
            then_block,
            else_block,
        })
    }

    fn parse_infix(&mut self, left: Expr) -> Option<Expr> {
        match self.cur_token.kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Asterisk
            | TokenKind::Slash
            | TokenKind::Modulo
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::LtEq
            | TokenKind::GtEq
            | TokenKind::EqEq
            | TokenKind::NotEq => self.parse_infix_expression(left),
            TokenKind::LParen => self.parse_call_expression(left),
            TokenKind::PlusPlus | TokenKind::MinusMinus => self.parse_postfix_expression(left),
            kind => {
                self.errors.push(format!("no infix parse function for {kind:?} found"));
                None
            }
        }
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let op = match self.cur_token.kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Asterisk => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Modulo => InfixOp::Mod,
            TokenKind::Lt => InfixOp::Lt,
            TokenKind::Gt => InfixOp::Gt,
            TokenKind::LtEq => InfixOp::LtEq,
            TokenKind::GtEq => InfixOp::GtEq,
            TokenKind::EqEq => InfixOp::Eq,
            TokenKind::NotEq => InfixOp::NotEq,
            _ => unreachable!("parse_infix only dispatches here for the kinds above"),
        };
        let precedence = self.peek_precedence_for_cur();
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expr::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn peek_precedence_for_cur(&self) -> Precedence {
        precedence::precedence_of(self.cur_token.kind)
    }

    fn parse_call_expression(&mut self, left: Expr) -> Option<Expr> {
        let callee = match left {
            Expr::Identifier(name) => name,
            _ => {
                self.errors
                    .push("call expression requires an identifier callee".to_string());
                return None;
            }
        };
        let args = self.parse_call_arguments()?;
        Some(Expr::Call { callee, args })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.advance();
            return Some(args);
        }
        self.advance();
        args.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            args.push(self.parse_expression(Precedence::Lowest)?);
        }
        if !self.expect_peek(TokenKind::RParen) {
            return None;
        }
        Some(args)
    }

    fn parse_postfix_expression(&mut self, left: Expr) -> Option<Expr> {
        let op = match self.cur_token.kind {
            TokenKind::PlusPlus => PostfixOp::Inc,
            TokenKind::MinusMinus => PostfixOp::Dec,
            _ => unreachable!(),
        };
        match left {
            Expr::Identifier(name) => Some(Expr::Postfix { operand: name, op }),
            _ => {
                self.errors
                    .push("postfix ++/-- requires an identifier operand".to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Program, Vec<String>) {
        let mut handler = Handler::new();
        let mut parser = Parser::new(source, &mut handler);
        let program = parser.parse_program();
        (program, parser.into_errors())
    }

    #[test]
    fn parses_let_statement() {
        let (program, errors) = parse("let x: int = 5;");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            program,
            vec![Stmt::Let {
                name: "x".into(),
                declared_type: "int".into(),
                value: Expr::IntegerLiteral(5),
            }]
        );
    }

    #[test]
    fn parses_assign_with_compound_operator() {
        let (program, errors) = parse("x += 1;");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            program,
            vec![Stmt::Assign {
                name: "x".into(),
                op: AssignOp::PlusEq,
                value: Expr::IntegerLiteral(1),
            }]
        );
    }

    #[test]
    fn parses_arithmetic_precedence() {
        let (program, errors) = parse("1 + 2 * 3;");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            program,
            vec![Stmt::Expression(Expr::Infix {
                left: Box::new(Expr::IntegerLiteral(1)),
                op: InfixOp::Add,
                right: Box::new(Expr::Infix {
                    left: Box::new(Expr::IntegerLiteral(2)),
                    op: InfixOp::Mul,
                    right: Box::new(Expr::IntegerLiteral(3)),
                }),
            })]
        );
    }

    #[test]
    fn parses_function_with_parameters() {
        let (program, errors) =
            parse("fn add(a: int, b: int) -> int { return a + b; }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program[0] {
            Stmt::Function {
                name,
                params,
                return_type,
                body,
            } => {
                assert_eq!(name, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(return_type, "int");
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected Function statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_call_expression() {
        let (program, errors) = parse("add(1, 2 + 3);");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            program,
            vec![Stmt::Expression(Expr::Call {
                callee: "add".into(),
                args: vec![
                    Expr::IntegerLiteral(1),
                    Expr::Infix {
                        left: Box::new(Expr::IntegerLiteral(2)),
                        op: InfixOp::Add,
                        right: Box::new(Expr::IntegerLiteral(3)),
                    }
                ],
            })]
        );
    }

    #[test]
    fn parses_postfix_increment() {
        let (program, errors) = parse("i++;");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(
            program,
            vec![Stmt::Expression(Expr::Postfix {
                operand: "i".into(),
                op: PostfixOp::Inc,
            })]
        );
    }

    #[test]
    fn parses_if_without_else_as_expression_statement() {
        let (program, errors) = parse("if x { y = 1; }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program[0] {
            Stmt::Expression(Expr::If {
                else_block: None, ..
            }) => {}
            other => panic!("expected Expression(If), got {other:?}"),
        }
    }

    #[test]
    fn parses_while_and_for() {
        let (program, errors) = parse(
            "fn main() -> int { let s: int = 0; for (let i: int = 0; i < 10; i = i + 1) { s = s + i; } return s; }",
        );
        assert!(errors.is_empty(), "{errors:?}");
        assert!(matches!(&program[0], Stmt::Function { .. }));
    }

    #[test]
    fn parses_break_and_continue() {
        let (program, errors) = parse("while true { break; continue; }");
        assert!(errors.is_empty(), "{errors:?}");
        match &program[0] {
            Stmt::While { body, .. } => {
                assert_eq!(body[0], Stmt::Break);
                assert_eq!(body[1], Stmt::Continue);
            }
            other => panic!("expected While statement, got {other:?}"),
        }
    }

    #[test]
    fn parses_import_statement() {
        let (program, errors) = parse(r#"import "math";"#);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(program, vec![Stmt::Import("math".into())]);
    }

    #[test]
    fn missing_prefix_handler_records_an_error_but_does_not_abort() {
        let (_program, errors) = parse("* 1;");
        assert!(!errors.is_empty());
    }

    #[test]
    fn call_expression_on_non_identifier_callee_is_a_parse_error() {
        let (_program, errors) = parse("3(4);");
        assert!(errors.iter().any(|e| e.contains("identifier callee")));
    }

    #[test]
    fn parser_purity_same_source_produces_equal_asts() {
        let source = "fn main() -> int { return 1 + 2 * 3; }";
        let (first, _) = parse(source);
        let (second, _) = parse(source);
        assert_eq!(first, second);
    }

    #[test]
    fn alternate_keywords_parse_identically_to_primary_keywords() {
        let (primary, errors1) = parse("let x: int = 1;");
        let (alternate, errors2) = parse("lit x: int = 1;");
        assert!(errors1.is_empty() && errors2.is_empty());
        assert_eq!(primary, alternate);
    }
}
