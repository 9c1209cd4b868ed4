use super::Compiler;
use crate::{
    expr::{Expr, ExprKind},
    op::UnaryOp,
    resolve::{Resolution, SymbolKind},
    val::Val,
    vm::{CompileError, CompileErrorKind, Op},
};

impl Compiler {
    /// Emit code that leaves the value of `expr` on top of the stack.
    /// Operands are always compiled left to right; `and`/`or` evaluate both
    /// sides.
    pub(super) fn expr(&mut self, expr: &Expr) -> Result<(), CompileError> {
        let line = expr.line;
        match &expr.kind {
            ExprKind::Number(n) => self.emit(Op::Push(Val::Num(*n))),
            ExprKind::Str(s) => self.emit(Op::Push(Val::str(s))),
            ExprKind::Bool(b) => self.emit(Op::Push(Val::Bool(*b))),
            ExprKind::Var(name) => match self.symbols.resolve(name) {
                Some(Resolution::Local(slot)) => self.emit(Op::LoadLocal(slot)),
                Some(Resolution::Global) => self.emit(Op::LoadGlobal(name.clone())),
                Some(Resolution::Function { .. }) => {
                    return Err(CompileError::new(CompileErrorKind::FunctionAsValue(name.clone()), line));
                }
                None => {
                    return Err(CompileError::new(CompileErrorKind::UndefinedVariable(name.clone()), line));
                }
            },
            ExprKind::Grouping(inner) => self.expr(inner)?,
            ExprKind::Unary(op, operand) => {
                self.expr(operand)?;
                match Op::unary(*op) {
                    Some(code) => self.emit(code),
                    None => {
                        debug_assert_eq!(*op, UnaryOp::Not);
                        self.emit(Op::Push(Val::Bool(true)));
                        self.emit(Op::Xor);
                    }
                }
            }
            ExprKind::Binary(l, op, r) => {
                self.expr(l)?;
                self.expr(r)?;
                self.emit(Op::binary(*op));
            }
            ExprKind::Logical(l, op, r) => {
                self.expr(l)?;
                self.expr(r)?;
                self.emit(Op::logical(*op));
            }
            ExprKind::Call { name, args } => self.call(name, args, line)?,
        }
        Ok(())
    }

    /// Arguments are pushed in order, then `Call`. The callee must have been
    /// registered by the pre-pass; locals never shadow function names here.
    fn call(&mut self, name: &str, args: &[Expr], line: u32) -> Result<(), CompileError> {
        let arity = match self.symbols.global(name).map(|s| s.kind) {
            Some(SymbolKind::Function { arity }) => arity,
            _ => {
                return Err(CompileError::new(
                    CompileErrorKind::UndefinedFunction(name.to_string()),
                    line,
                ));
            }
        };
        if arity != args.len() {
            return Err(CompileError::new(
                CompileErrorKind::ArityMismatch {
                    name: name.to_string(),
                    expected: arity,
                    found: args.len(),
                },
                line,
            ));
        }
        for arg in args {
            self.expr(arg)?;
        }
        self.emit(Op::Call(name.to_string(), args.len()));
        Ok(())
    }
}
