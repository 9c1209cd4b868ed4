use crate::{
    expr::Expr,
    stmt::{Program, Stmt, StmtKind},
};

impl Program {
    /// Fold constant sub-expressions throughout the program. The result is
    /// structurally equivalent and compiles to the same observable behavior.
    pub fn fold_constants(self) -> Program {
        Program::new(fold_block(self.statements))
    }
}

fn fold_block(stmts: Vec<Stmt>) -> Vec<Stmt> {
    stmts.into_iter().map(Stmt::fold_constants).collect()
}

impl Stmt {
    pub fn fold_constants(self) -> Stmt {
        let kind = match self.kind {
            StmtKind::Assign { name, value } => StmtKind::Assign {
                name,
                value: value.fold_constants(),
            },
            StmtKind::Local { name, value } => StmtKind::Local {
                name,
                value: value.fold_constants(),
            },
            StmtKind::Print { value, newline } => StmtKind::Print {
                value: value.fold_constants(),
                newline,
            },
            StmtKind::If {
                test,
                then_body,
                else_body,
            } => StmtKind::If {
                test: test.fold_constants(),
                then_body: fold_block(then_body),
                else_body: else_body.map(fold_block),
            },
            StmtKind::While { test, body } => StmtKind::While {
                test: test.fold_constants(),
                body: fold_block(body),
            },
            StmtKind::For {
                var,
                start,
                end,
                step,
                body,
            } => StmtKind::For {
                var,
                start: start.fold_constants(),
                end: end.fold_constants(),
                step: step.map(Expr::fold_constants),
                body: fold_block(body),
            },
            StmtKind::Function { name, params, body } => StmtKind::Function {
                name,
                params,
                body: fold_block(body),
            },
            StmtKind::Return(value) => StmtKind::Return(value.map(Expr::fold_constants)),
            StmtKind::Expr(expr) => StmtKind::Expr(expr.fold_constants()),
        };
        Stmt::new(kind, self.line)
    }
}
