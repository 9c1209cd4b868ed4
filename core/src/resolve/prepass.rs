use tracing::debug;

use crate::{
    resolve::{SymbolKind, SymbolTable},
    stmt::{Stmt, StmtKind},
    vm::CompileError,
};

impl SymbolTable {
    /// Register every function signature and every top-level global before
    /// any code is emitted, so calls may refer to functions declared later.
    pub fn prepass(&mut self, statements: &[Stmt]) -> Result<(), CompileError> {
        self.collect(statements, true)?;
        let (funcs, vars) = self.globals().fold((0, 0), |(f, v), s| match s.kind {
            SymbolKind::Function { .. } => (f + 1, v),
            SymbolKind::Variable => (f, v + 1),
        });
        debug!(functions = funcs, globals = vars, "symbol pre-pass complete");
        Ok(())
    }

    fn collect(&mut self, statements: &[Stmt], top_level: bool) -> Result<(), CompileError> {
        for stmt in statements {
            let wrap = |kind| CompileError::new(kind, stmt.line);
            match &stmt.kind {
                StmtKind::Function { name, params, body } => {
                    self.define_function(name, params.len()).map_err(wrap)?;
                    self.collect(body, false)?;
                }
                StmtKind::Assign { name, .. } | StmtKind::Local { name, .. } if top_level => {
                    self.define_global(name).map_err(wrap)?;
                }
                StmtKind::If {
                    then_body, else_body, ..
                } => {
                    self.collect(then_body, false)?;
                    if let Some(else_body) = else_body {
                        self.collect(else_body, false)?;
                    }
                }
                StmtKind::While { body, .. } | StmtKind::For { body, .. } => self.collect(body, false)?,
                _ => {}
            }
        }
        Ok(())
    }
}
