use tracing::debug;

use super::Compiler;
use crate::{
    expr::Expr,
    resolve::Resolution,
    stmt::{Stmt, StmtKind},
    val::Val,
    vm::{CompileError, CompileErrorKind, Op},
};

impl Compiler {
    pub(super) fn stmt(&mut self, stmt: &Stmt) -> Result<(), CompileError> {
        let line = stmt.line;
        match &stmt.kind {
            StmtKind::Assign { name, value } => {
                self.expr(value)?;
                let target = self
                    .symbols
                    .assign_target(name)
                    .map_err(|k| CompileError::new(k, line))?;
                self.store(name, target, line)
            }
            StmtKind::Local { name, value } => {
                // The initializer sees the outer binding, not the new one.
                self.expr(value)?;
                let target = self.symbols.local_target(name).map_err(|k| CompileError::new(k, line))?;
                self.store(name, target, line)
            }
            StmtKind::Print { value, newline } => {
                self.expr(value)?;
                self.emit(if *newline { Op::PrintLine } else { Op::Print });
                Ok(())
            }
            StmtKind::If {
                test,
                then_body,
                else_body,
            } => self.if_stmt(test, then_body, else_body.as_deref()),
            StmtKind::While { test, body } => self.while_stmt(test, body),
            StmtKind::For { .. } => Err(CompileError::new(CompileErrorKind::UnsupportedFor, line)),
            StmtKind::Function { name, params, body } => self.function(name, params, body),
            StmtKind::Return(value) => {
                if !self.symbols.in_function() {
                    return Err(CompileError::new(CompileErrorKind::ReturnOutsideFunction, line));
                }
                match value {
                    Some(value) => self.expr(value)?,
                    None => self.emit(Op::Push(Val::Bool(false))),
                }
                self.emit(Op::Return);
                Ok(())
            }
            StmtKind::Expr(expr) => {
                self.expr(expr)?;
                self.emit(Op::Pop);
                Ok(())
            }
        }
    }

    fn store(&mut self, name: &str, target: Resolution, line: u32) -> Result<(), CompileError> {
        match target {
            Resolution::Global => self.emit(Op::StoreGlobal(name.to_string())),
            Resolution::Local(slot) => self.emit(Op::StoreLocal(slot)),
            Resolution::Function { .. } => {
                return Err(CompileError::new(
                    CompileErrorKind::AssignToFunction(name.to_string()),
                    line,
                ));
            }
        }
        Ok(())
    }

    fn if_stmt(&mut self, test: &Expr, then_body: &[Stmt], else_body: Option<&[Stmt]>) -> Result<(), CompileError> {
        let then_label = self.fresh_label("if_then");
        let else_label = self.fresh_label("if_else");
        let exit_label = self.fresh_label("if_end");

        self.expr(test)?;
        self.emit(Op::JumpIfFalse(else_label.clone()));
        self.emit(Op::Label(then_label));
        self.block(then_body)?;
        self.emit(Op::Jump(exit_label.clone()));
        self.emit(Op::Label(else_label));
        if let Some(else_body) = else_body {
            self.block(else_body)?;
        }
        self.emit(Op::Label(exit_label));
        Ok(())
    }

    fn while_stmt(&mut self, test: &Expr, body: &[Stmt]) -> Result<(), CompileError> {
        let test_label = self.fresh_label("while_test");
        let body_label = self.fresh_label("while_body");
        let exit_label = self.fresh_label("while_end");

        self.emit(Op::Label(test_label.clone()));
        self.expr(test)?;
        self.emit(Op::JumpIfFalse(exit_label.clone()));
        self.emit(Op::Label(body_label));
        self.block(body)?;
        self.emit(Op::Jump(test_label));
        self.emit(Op::Label(exit_label));
        Ok(())
    }

    /// Inline function body, jumped over by straight-line execution.
    /// Parameters occupy slots `0..n` of the callee frame, in declaration
    /// order, matching the order the caller pushed the arguments.
    fn function(&mut self, name: &str, params: &[String], body: &[Stmt]) -> Result<(), CompileError> {
        let skip_label = self.fresh_label("func_skip");
        let start = self.code.len();

        self.emit(Op::Jump(skip_label.clone()));
        self.emit(Op::Label(name.to_string()));
        self.symbols.enter_function(params);
        for stmt in body {
            if let Err(e) = self.stmt(stmt) {
                self.symbols.exit_function();
                return Err(e);
            }
        }
        self.symbols.exit_function();
        self.emit(Op::Push(Val::Bool(false)));
        self.emit(Op::Return);
        self.emit(Op::Label(skip_label));

        debug!(function = name, arity = params.len(), instructions = self.code.len() - start, "lowered function");
        Ok(())
    }
}
