mod driver;
mod expr;
mod stmt;

pub use driver::{Compiler, compile_program};
