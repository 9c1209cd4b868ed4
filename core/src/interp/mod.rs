//! Tree-walking interpreter over the same syntax tree the compiler consumes.

mod env;
mod error;
mod exec;

pub use env::Env;
pub use error::{InterpError, InterpErrorKind};
pub use exec::{Interpreter, MAX_CALL_DEPTH};

/// Walk `program` on a fresh interpreter, writing its output to `out`.
pub fn interpret_program<W: std::io::Write>(
    program: &crate::stmt::Program,
    out: &mut W,
) -> Result<(), InterpError> {
    Interpreter::new(program)?.run(out)
}

#[cfg(test)]
mod interp_test;
