use std::fmt;
use std::fmt::Write as _;

use serde::Serialize;

use crate::op::{BinOp, LogicalOp, UnaryOp};
use crate::val::Val;

/// Stack-machine instruction. Jump targets and call targets are label names,
/// resolved to indices once when a [`crate::vm::Vm`] is built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Op {
    // Control
    Start,
    Halt,
    Label(String),
    Jump(String),
    JumpIfFalse(String),
    // Stack
    Push(Val),
    Pop,
    // Arithmetic and logic; operands are popped right first.
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    Neg,
    Pos,
    And,
    Or,
    Xor,
    // Comparison
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    // Output
    Print,
    PrintLine,
    // Variables
    LoadGlobal(String),
    StoreGlobal(String),
    LoadLocal(usize),
    StoreLocal(usize),
    // Calls
    Call(String, usize),
    Return,
}

impl Op {
    pub fn binary(op: BinOp) -> Op {
        match op {
            BinOp::Add => Op::Add,
            BinOp::Sub => Op::Sub,
            BinOp::Mul => Op::Mul,
            BinOp::Div => Op::Div,
            BinOp::Mod => Op::Mod,
            BinOp::Exp => Op::Exp,
            BinOp::Eq => Op::Eq,
            BinOp::Ne => Op::Ne,
            BinOp::Gt => Op::Gt,
            BinOp::Ge => Op::Ge,
            BinOp::Lt => Op::Lt,
            BinOp::Le => Op::Le,
        }
    }

    pub fn logical(op: LogicalOp) -> Op {
        match op {
            LogicalOp::And => Op::And,
            LogicalOp::Or => Op::Or,
            LogicalOp::Xor => Op::Xor,
        }
    }

    /// Unary operators with a dedicated opcode. `Not` has none and is lowered
    /// by the compiler.
    pub fn unary(op: UnaryOp) -> Option<Op> {
        match op {
            UnaryOp::Neg => Some(Op::Neg),
            UnaryOp::Pos => Some(Op::Pos),
            UnaryOp::Not => None,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Op::Start => "START",
            Op::Halt => "HALT",
            Op::Label(_) => "LABEL",
            Op::Jump(_) => "JUMP",
            Op::JumpIfFalse(_) => "JUMP_IF_FALSE",
            Op::Push(_) => "PUSH",
            Op::Pop => "POP",
            Op::Add => "ADD",
            Op::Sub => "SUB",
            Op::Mul => "MUL",
            Op::Div => "DIV",
            Op::Mod => "MOD",
            Op::Exp => "EXP",
            Op::Neg => "NEG",
            Op::Pos => "POS",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Xor => "XOR",
            Op::Eq => "EQ",
            Op::Ne => "NE",
            Op::Gt => "GT",
            Op::Ge => "GE",
            Op::Lt => "LT",
            Op::Le => "LE",
            Op::Print => "PRINT",
            Op::PrintLine => "PRINTLN",
            Op::LoadGlobal(_) => "LOAD_GLOBAL",
            Op::StoreGlobal(_) => "STORE_GLOBAL",
            Op::LoadLocal(_) => "LOAD_LOCAL",
            Op::StoreLocal(_) => "STORE_LOCAL",
            Op::Call(..) => "CALL",
            Op::Return => "RETURN",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.mnemonic();
        match self {
            Op::Label(l) | Op::Jump(l) | Op::JumpIfFalse(l) => write!(f, "{name} {l}"),
            Op::Push(Val::Str(s)) => write!(f, "{name} {s:?}"),
            Op::Push(v) => write!(f, "{name} {v}"),
            Op::LoadGlobal(n) | Op::StoreGlobal(n) => write!(f, "{name} {n}"),
            Op::LoadLocal(s) | Op::StoreLocal(s) => write!(f, "{name} {s}"),
            Op::Call(n, argc) => write!(f, "{name} {n} {argc}"),
            _ => f.write_str(name),
        }
    }
}

/// Human-readable listing, one instruction per line with its index. Labels
/// are outdented so jump targets stand out.
pub fn disassemble(code: &[Op]) -> String {
    let mut out = String::new();
    for (pc, op) in code.iter().enumerate() {
        let _ = match op {
            Op::Label(l) => writeln!(out, "{pc:04}  {l}:"),
            _ => writeln!(out, "{pc:04}      {op}"),
        };
    }
    out
}
