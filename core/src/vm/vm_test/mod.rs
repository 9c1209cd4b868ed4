pub(super) use crate::{
    parse_program,
    val::Val,
    vm::{Op, Vm, VmErrorKind, VmState, compile_program},
};

pub(super) fn compile(src: &str) -> Vec<Op> {
    compile_program(&parse_program(src).unwrap()).unwrap()
}

/// Compile and run `src`, returning everything it printed.
pub(super) fn run(src: &str) -> String {
    let code = compile(src);
    run_code(&code)
}

pub(super) fn run_code(code: &[Op]) -> String {
    let mut out = Vec::new();
    Vm::new(code).unwrap().run(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

/// Run hand-written bytecode and return the error kind it fails with.
pub(super) fn run_err(code: &[Op]) -> (VmErrorKind, usize) {
    let mut out = Vec::new();
    let err = Vm::new(code).unwrap().run(&mut out).unwrap_err();
    (err.kind, err.pc)
}

mod control_flow;
mod functions;
mod semantics;
