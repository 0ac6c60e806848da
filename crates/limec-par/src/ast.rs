//! Abstract syntax tree node kinds.
//!
//! One sum type per syntactic category (statement, expression) replaces
//! a single node-kind discriminator plus an attribute bag; `match` over
//! these enums is the dispatch table.

pub use limec_lex::AssignOp;

/// A parsed program: an ordered sequence of top-level statements.
pub type Program = Vec<Stmt>;

/// A `{ ... }` block: an ordered sequence of statements.
pub type Block = Vec<Stmt>;

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionParameter {
    pub name: String,
    pub declared_type: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Expression(Expr),
    Let {
        name: String,
        declared_type: String,
        value: Expr,
    },
    Assign {
        name: String,
        op: AssignOp,
        value: Expr,
    },
    Function {
        name: String,
        params: Vec<FunctionParameter>,
        return_type: String,
        body: Block,
    },
    Block(Block),
    Return(Expr),
    While {
        condition: Expr,
        body: Block,
    },
    For {
        init: Box<Stmt>,
        condition: Expr,
        step: Expr,
        body: Block,
    },
    Break,
    Continue,
    Import(String),
}

// Note: there is deliberately no `Stmt::If` variant. The grammar never
// gives `if` a dedicated statement parser (see the parser's statement
// dispatch); an `if` at statement position is a plain `Stmt::Expression`
// wrapping an `Expr::If`, constructed through the same prefix handler
// used anywhere else `if` can start an expression. See `Expr::If`.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrefixOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostfixOp {
    Inc,
    Dec,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    IntegerLiteral(i64),
    FloatLiteral(f64),
    BooleanLiteral(bool),
    StringLiteral(String),
    Identifier(String),
    Infix {
        left: Box<Expr>,
        op: InfixOp,
        right: Box<Expr>,
    },
    Prefix {
        op: PrefixOp,
        operand: Box<Expr>,
    },
    /// `operand` names the identifier being incremented/decremented,
    /// matching the grammar's restriction to `IDENT (++|--)`.
    Postfix {
        operand: String,
        op: PostfixOp,
    },
    Call {
        callee: String,
        args: Vec<Expr>,
    },
    /// `if` parsed in expression (prefix) position. This never produces a
    /// usable value at code generation time — preserved as a known
    /// defect, not a real conditional expression.
    If {
        condition: Box<Expr>,
        then_block: Block,
        else_block: Option<Block>,
    },
}
