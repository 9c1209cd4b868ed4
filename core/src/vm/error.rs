use std::fmt;

use crate::op::OpError;

#[derive(Debug, Clone, PartialEq)]
pub enum CompileErrorKind {
    UndefinedVariable(String),
    UndefinedFunction(String),
    /// A function and a global variable share a name, or a function is declared twice.
    NameCollision(String),
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    AssignToFunction(String),
    FunctionAsValue(String),
    ReturnOutsideFunction,
    UnsupportedFor,
}

/// Fatal compile-time error, attributed to the offending source line.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub line: u32,
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

impl fmt::Display for CompileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileErrorKind::UndefinedVariable(name) => write!(f, "Undefined variable '{name}'"),
            CompileErrorKind::UndefinedFunction(name) => write!(f, "Undefined function '{name}'"),
            CompileErrorKind::NameCollision(name) => {
                write!(f, "Name '{name}' is already declared as a function or variable")
            }
            CompileErrorKind::ArityMismatch { name, expected, found } => {
                write!(f, "Function '{name}' expects {expected} argument(s), got {found}")
            }
            CompileErrorKind::AssignToFunction(name) => write!(f, "Cannot assign to function '{name}'"),
            CompileErrorKind::FunctionAsValue(name) => write!(f, "Function '{name}' cannot be used as a value"),
            CompileErrorKind::ReturnOutsideFunction => write!(f, "'ret' outside of a function"),
            CompileErrorKind::UnsupportedFor => write!(f, "'for' loops are not supported by the bytecode compiler"),
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {}", self.line, self.kind)
    }
}

impl std::error::Error for CompileError {}

#[derive(Debug, Clone, PartialEq)]
pub enum VmErrorKind {
    InvalidOperands(OpError),
    UnknownLabel(String),
    DuplicateLabel(String),
    UndefinedGlobal(String),
    StackUnderflow,
    ReturnWithoutFrame,
    LocalOutOfRange(usize),
    PcOutOfRange,
    /// An instruction other than `Start` ran before the machine was started.
    NotRunning,
    Io(String),
}

/// Fatal runtime error, attributed to the program counter of the failing
/// instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct VmError {
    pub kind: VmErrorKind,
    pub pc: usize,
}

impl VmError {
    pub fn new(kind: VmErrorKind, pc: usize) -> Self {
        Self { kind, pc }
    }
}

impl fmt::Display for VmErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmErrorKind::InvalidOperands(e) => write!(f, "{e}"),
            VmErrorKind::UnknownLabel(label) => write!(f, "Unknown label '{label}'"),
            VmErrorKind::DuplicateLabel(label) => write!(f, "Duplicate label '{label}'"),
            VmErrorKind::UndefinedGlobal(name) => write!(f, "Undefined global '{name}'"),
            VmErrorKind::StackUnderflow => write!(f, "Stack underflow"),
            VmErrorKind::ReturnWithoutFrame => write!(f, "Return outside of a call frame"),
            VmErrorKind::LocalOutOfRange(slot) => write!(f, "Local slot {slot} is out of range"),
            VmErrorKind::PcOutOfRange => write!(f, "Program counter ran past the end of the program"),
            VmErrorKind::NotRunning => write!(f, "Instruction executed before START"),
            VmErrorKind::Io(msg) => write!(f, "Output error: {msg}"),
        }
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[pc {}] {}", self.pc, self.kind)
    }
}

impl std::error::Error for VmError {}

impl From<OpError> for VmErrorKind {
    fn from(e: OpError) -> Self {
        VmErrorKind::InvalidOperands(e)
    }
}
