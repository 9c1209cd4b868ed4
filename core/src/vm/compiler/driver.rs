use tracing::debug;

use crate::{
    resolve::SymbolTable,
    stmt::{Program, Stmt},
    vm::{CompileError, Op},
};

/// Single-use bytecode compiler. Owns the symbol table, the label counter and
/// the instruction buffer for one compilation.
pub struct Compiler {
    pub(super) code: Vec<Op>,
    pub(super) symbols: SymbolTable,
    label_count: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            symbols: SymbolTable::new(),
            label_count: 0,
        }
    }

    /// Lower a whole program: `Start`, every statement, `Halt`.
    pub fn compile(mut self, program: &Program) -> Result<Vec<Op>, CompileError> {
        self.symbols.prepass(&program.statements)?;

        self.emit(Op::Start);
        for stmt in &program.statements {
            self.stmt(stmt)?;
        }
        self.emit(Op::Halt);

        debug!(instructions = self.code.len(), labels = self.label_count, "compiled program");
        Ok(self.code)
    }

    pub(super) fn emit(&mut self, op: Op) {
        self.code.push(op);
    }

    /// Fresh label name. `#` cannot appear in identifiers, so generated labels
    /// never clash with function labels.
    pub(super) fn fresh_label(&mut self, prefix: &str) -> String {
        let label = format!("{prefix}#{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// Compile `body` in a nested scope and pop the locals it introduced.
    pub(super) fn block(&mut self, body: &[Stmt]) -> Result<(), CompileError> {
        self.symbols.enter_scope();
        for stmt in body {
            self.stmt(stmt)?;
        }
        let dropped = self.symbols.exit_scope();
        for _ in 0..dropped {
            self.emit(Op::Pop);
        }
        Ok(())
    }
}

/// Compile a parsed program into a flat instruction sequence.
pub fn compile_program(program: &Program) -> Result<Vec<Op>, CompileError> {
    Compiler::new().compile(program)
}
