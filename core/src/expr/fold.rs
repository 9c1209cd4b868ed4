use crate::{
    expr::{Expr, ExprKind},
    op::BinOp,
    val::Val,
};

impl Expr {
    /// Constant folding: evaluate operators whose operands are literals.
    ///
    /// Uses the same operator semantics as the VM, so a folded program prints
    /// exactly what the unfolded one would. Anything that would fail at
    /// runtime is kept as-is and left for the VM to report.
    pub fn fold_constants(self) -> Expr {
        let line = self.line;
        match self.kind {
            ExprKind::Grouping(inner) => {
                let inner = inner.fold_constants();
                if inner.is_literal() {
                    return inner;
                }
                Expr::new(ExprKind::Grouping(Box::new(inner)), line)
            }
            ExprKind::Unary(op, inner) => {
                let inner = inner.fold_constants();
                if let Some(v) = inner.literal()
                    && let Ok(res) = op.eval_val(&v)
                {
                    return Expr::from_val(res, line);
                }
                Expr::new(ExprKind::Unary(op, Box::new(inner)), line)
            }
            ExprKind::Binary(l, op, r) => {
                let left = l.fold_constants();
                let right = r.fold_constants();
                if let (Some(lv), Some(rv)) = (left.literal(), right.literal())
                    && !(matches!(op, BinOp::Div | BinOp::Mod) && rv == Val::Num(0.0))
                    && let Ok(res) = op.eval_val(&lv, &rv)
                {
                    return Expr::from_val(res, line);
                }
                Expr::new(ExprKind::Binary(Box::new(left), op, Box::new(right)), line)
            }
            ExprKind::Logical(l, op, r) => {
                let left = l.fold_constants();
                let right = r.fold_constants();
                if let (Some(lv), Some(rv)) = (left.literal(), right.literal())
                    && let Ok(res) = op.eval_val(&lv, &rv)
                {
                    return Expr::from_val(res, line);
                }
                Expr::new(ExprKind::Logical(Box::new(left), op, Box::new(right)), line)
            }
            ExprKind::Call { name, args } => {
                let args = args.into_iter().map(Expr::fold_constants).collect();
                Expr::new(ExprKind::Call { name, args }, line)
            }
            kind => Expr::new(kind, line),
        }
    }
}
