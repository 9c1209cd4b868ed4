pub mod ast;
pub mod expr;
pub mod interp;
pub mod op;
pub mod resolve;
pub mod stmt;
pub mod token;
pub mod util;
pub mod val;

// Bytecode compiler and stack VM
pub mod vm;

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use crate::{stmt::Program, token::ParseError, vm::Op};

/// Tokenize and parse a whole source file.
pub fn parse_program(src: &str) -> std::result::Result<Program, ParseError> {
    ast::parse_source(src)
}

/// Parse, optionally fold constants, and compile to bytecode.
pub fn compile_source(src: &str, optimize: bool) -> Result<Vec<Op>> {
    let mut program = parse_program(src)?;
    if optimize {
        program = program.fold_constants();
    }
    let code = vm::compile_program(&program)?;
    debug!(statements = program.statements.len(), instructions = code.len(), optimize, "compiled source");
    Ok(code)
}

/// Full pipeline: compile `src` and run it on a fresh VM, writing program
/// output to `out`.
pub fn run_source<W: Write>(src: &str, optimize: bool, out: &mut W) -> Result<()> {
    let code = compile_source(src, optimize)?;
    let mut machine = vm::Vm::new(&code)?;
    machine.run(out)?;
    Ok(())
}

/// Parse `src`, optionally fold constants, and walk the tree directly instead
/// of compiling it.
pub fn interpret_source<W: Write>(src: &str, optimize: bool, out: &mut W) -> Result<()> {
    let mut program = parse_program(src)?;
    if optimize {
        program = program.fold_constants();
    }
    debug!(statements = program.statements.len(), optimize, "interpreting source");
    interp::interpret_program(&program, out)?;
    Ok(())
}
