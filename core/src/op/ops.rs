use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::val::Val;

/// Operand kinds rejected by an operator. `op` is the instruction mnemonic.
#[derive(Debug, Clone, PartialEq)]
pub struct OpError {
    pub op: &'static str,
    pub left: &'static str,
    pub right: Option<&'static str>,
}

impl OpError {
    pub(crate) fn binary(op: &'static str, l: &Val, r: &Val) -> Self {
        Self {
            op,
            left: l.type_name(),
            right: Some(r.type_name()),
        }
    }

    pub(crate) fn unary(op: &'static str, v: &Val) -> Self {
        Self {
            op,
            left: v.type_name(),
            right: None,
        }
    }
}

impl Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.right {
            Some(right) => write!(f, "Invalid types for {}: {} and {}", self.op, self.left, right),
            None => write!(f, "Invalid type for {}: {}", self.op, self.left),
        }
    }
}

impl std::error::Error for OpError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
}

impl UnaryOp {
    pub fn eval_val(&self, val: &Val) -> Result<Val, OpError> {
        match (self, val) {
            (UnaryOp::Neg, Val::Num(n)) => Ok(Val::Num(-n)),
            (UnaryOp::Pos, Val::Num(n)) => Ok(Val::Num(*n)),
            (UnaryOp::Not, Val::Bool(b)) => Ok(Val::Bool(!b)),
            _ => Err(OpError::unary(self.mnemonic(), val)),
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "NEG",
            UnaryOp::Pos => "POS",
            UnaryOp::Not => "NOT",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Pos => write!(f, "+"),
            UnaryOp::Not => write!(f, "~"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl BinOp {
    pub fn is_arith(&self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod | BinOp::Exp
        )
    }

    pub fn is_cmp(&self) -> bool {
        !self.is_arith()
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            BinOp::Add => "ADD",
            BinOp::Sub => "SUB",
            BinOp::Mul => "MUL",
            BinOp::Div => "DIV",
            BinOp::Mod => "MOD",
            BinOp::Exp => "EXP",
            BinOp::Eq => "EQ",
            BinOp::Ne => "NE",
            BinOp::Gt => "GT",
            BinOp::Ge => "GE",
            BinOp::Lt => "LT",
            BinOp::Le => "LE",
        }
    }

    /// Apply `l OP r`. Callers pop the right operand first, so `l` must be the
    /// value pushed earlier.
    pub fn eval_val(&self, l: &Val, r: &Val) -> Result<Val, OpError> {
        match self {
            BinOp::Add => l + r,
            BinOp::Sub => l - r,
            BinOp::Mul => l * r,
            BinOp::Div => l / r,
            BinOp::Mod => l % r,
            BinOp::Exp => l.pow(r),
            BinOp::Eq => Ok(Val::Bool(l == r)),
            BinOp::Ne => Ok(Val::Bool(l != r)),
            BinOp::Gt | BinOp::Ge | BinOp::Lt | BinOp::Le => self.cmp(l, r).map(Val::Bool),
        }
    }

    fn cmp(&self, l: &Val, r: &Val) -> Result<bool, OpError> {
        let (Val::Num(a), Val::Num(b)) = (l, r) else {
            return Err(OpError::binary(self.mnemonic(), l, r));
        };
        Ok(match self {
            BinOp::Gt => a > b,
            BinOp::Ge => a >= b,
            BinOp::Lt => a < b,
            BinOp::Le => a <= b,
            _ => return Err(OpError::binary(self.mnemonic(), l, r)),
        })
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
            BinOp::Exp => write!(f, "^"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "~="),
            BinOp::Gt => write!(f, ">"),
            BinOp::Ge => write!(f, ">="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Le => write!(f, "<="),
        }
    }
}

/// Boolean connectives. The bytecode compiler always evaluates both operands;
/// the tree-walking interpreter consults [`LogicalOp::short_circuit`] first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    Xor,
}

impl LogicalOp {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Xor => "XOR",
        }
    }

    /// Result decided by the left operand alone: `false and _`, `true or _`.
    /// `xor` always needs both sides.
    pub fn short_circuit(&self, l: &Val) -> Option<Val> {
        match (self, l) {
            (LogicalOp::And, Val::Bool(false)) => Some(Val::Bool(false)),
            (LogicalOp::Or, Val::Bool(true)) => Some(Val::Bool(true)),
            _ => None,
        }
    }

    pub fn eval_val(&self, l: &Val, r: &Val) -> Result<Val, OpError> {
        let (Val::Bool(a), Val::Bool(b)) = (l, r) else {
            return Err(OpError::binary(self.mnemonic(), l, r));
        };
        Ok(Val::Bool(match self {
            LogicalOp::And => *a && *b,
            LogicalOp::Or => *a || *b,
            LogicalOp::Xor => a ^ b,
        }))
    }
}

impl Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "and"),
            LogicalOp::Or => write!(f, "or"),
            LogicalOp::Xor => write!(f, "xor"),
        }
    }
}
