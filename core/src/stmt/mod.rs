use serde::Serialize;

use crate::expr::Expr;

mod fold;
pub mod stmt_parser;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    /// `name := value`
    Assign { name: String, value: Expr },
    /// `local name := value`
    Local { name: String, value: Expr },
    /// `print value` / `println value`
    Print { value: Expr, newline: bool },
    /// `if test then ... [else ...] end`
    If {
        test: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    /// `while test do ... end`
    While { test: Expr, body: Vec<Stmt> },
    /// `for var := start, end[, step] do ... end`
    For {
        var: String,
        start: Expr,
        end: Expr,
        step: Option<Expr>,
        body: Vec<Stmt>,
    },
    /// `func name(params) ... end`
    Function {
        name: String,
        params: Vec<String>,
        body: Vec<Stmt>,
    },
    /// `ret [value]`
    Return(Option<Expr>),
    /// Bare call used as a statement.
    Expr(Expr),
}

impl Stmt {
    pub fn new(kind: StmtKind, line: u32) -> Self {
        Self { kind, line }
    }
}

/// Root of a parsed source file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}
