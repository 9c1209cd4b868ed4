//! Stack bytecode: instruction set, compiler and virtual machine.
//!
//! The compiler and the VM share only [`Op`] and [`crate::val::Val`]; the
//! instruction sequence is the whole interface between them.

mod bytecode;
mod compiler;
mod error;
#[allow(clippy::module_inception)]
mod vm;

pub use bytecode::{Op, disassemble};
pub use compiler::{Compiler, compile_program};
pub use error::{CompileError, CompileErrorKind, VmError, VmErrorKind};
pub use vm::{Frame, Vm, VmState};

#[cfg(test)]
mod vm_test;
