use serde::Serialize;

use crate::{
    op::{BinOp, LogicalOp, UnaryOp},
    val::Val,
};

mod fold;

/// Grammar (lowest precedence first):
/// exp     ::= logic
/// logic   ::= and {('or' | 'xor') and}
/// and     ::= cmp {'and' cmp}
/// cmp     ::= addsub [('==' | '~=' | '<' | '<=' | '>' | '>=') addsub]
/// addsub  ::= muldiv {('+' | '-') muldiv}
/// muldiv  ::= unary {('*' | '/' | '%') unary}
/// unary   ::= ('-' | '+' | '~') unary | power
/// power   ::= primary ['^' unary]
/// primary ::= number | string | 'true' | 'false' | id | id '(' [exp {',' exp}] ')' | '(' exp ')'
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Number(f64),
    /// Text between the quotes, escapes still encoded.
    Str(String),
    Bool(bool),
    Var(String),
    Grouping(Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    Logical(Box<Expr>, LogicalOp, Box<Expr>),
    Call { name: String, args: Vec<Expr> },
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Self { kind, line }
    }

    /// Build a literal node from a runtime value.
    pub fn from_val(val: Val, line: u32) -> Self {
        let kind = match val {
            Val::Num(n) => ExprKind::Number(n),
            Val::Str(s) => ExprKind::Str(s.to_string()),
            Val::Bool(b) => ExprKind::Bool(b),
        };
        Self { kind, line }
    }

    /// The runtime value of a literal node, `None` for anything else.
    pub fn literal(&self) -> Option<Val> {
        match &self.kind {
            ExprKind::Number(n) => Some(Val::Num(*n)),
            ExprKind::Str(s) => Some(Val::str(s)),
            ExprKind::Bool(b) => Some(Val::Bool(*b)),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Bool(_))
    }
}
