use std::fmt;

use crate::{op::OpError, vm::CompileErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub enum InterpErrorKind {
    InvalidOperands(OpError),
    /// Rejected while collecting declarations, before anything runs.
    Declaration(CompileErrorKind),
    UndefinedVariable(String),
    UndefinedFunction(String),
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    AssignToFunction(String),
    FunctionAsValue(String),
    /// `if`/`while` test that is not a bool.
    NonBoolCondition {
        construct: &'static str,
        found: &'static str,
    },
    /// `for` start, end or step that is not a number.
    NonNumericRange {
        part: &'static str,
        found: &'static str,
    },
    NonPositiveStep,
    ReturnOutsideFunction,
    CallDepthExceeded(usize),
    Io(String),
}

/// Fatal error raised while walking the tree, attributed to a source line.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpError {
    pub kind: InterpErrorKind,
    pub line: u32,
}

impl InterpError {
    pub fn new(kind: InterpErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl fmt::Display for InterpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpErrorKind::InvalidOperands(e) => write!(f, "{e}"),
            InterpErrorKind::Declaration(kind) => write!(f, "{kind}"),
            InterpErrorKind::UndefinedVariable(name) => write!(f, "Undefined variable '{name}'"),
            InterpErrorKind::UndefinedFunction(name) => write!(f, "Undefined function '{name}'"),
            InterpErrorKind::ArityMismatch { name, expected, found } => {
                write!(f, "Function '{name}' expects {expected} argument(s), got {found}")
            }
            InterpErrorKind::AssignToFunction(name) => write!(f, "Cannot assign to function '{name}'"),
            InterpErrorKind::FunctionAsValue(name) => write!(f, "Function '{name}' cannot be used as a value"),
            InterpErrorKind::NonBoolCondition { construct, found } => {
                write!(f, "'{construct}' condition must be a bool, got {found}")
            }
            InterpErrorKind::NonNumericRange { part, found } => {
                write!(f, "'for' {part} must be a number, got {found}")
            }
            InterpErrorKind::NonPositiveStep => write!(f, "'for' step must be positive"),
            InterpErrorKind::ReturnOutsideFunction => write!(f, "'ret' outside of a function"),
            InterpErrorKind::CallDepthExceeded(limit) => write!(f, "Call depth exceeded {limit}"),
            InterpErrorKind::Io(msg) => write!(f, "Output error: {msg}"),
        }
    }
}

impl fmt::Display for InterpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {}", self.line, self.kind)
    }
}

impl std::error::Error for InterpError {}
