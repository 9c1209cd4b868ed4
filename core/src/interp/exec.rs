use std::io::Write;

use tracing::debug;

use super::{Env, InterpError, InterpErrorKind};
use crate::{
    expr::{Expr, ExprKind},
    op::OpError,
    resolve::{SymbolKind, SymbolTable},
    stmt::{Program, Stmt, StmtKind},
    util::fast_map::{FastHashMap, FastHashSet, fast_hash_map_new, fast_hash_set_new},
    val::{Val, decode_escapes},
};

type Result<T> = std::result::Result<T, InterpError>;

/// Deepest call nesting before the interpreter gives up.
pub const MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy)]
struct Function<'p> {
    params: &'p [String],
    body: &'p [Stmt],
}

/// How a statement finished.
enum Flow {
    Normal,
    Return(Val),
}

/// Walks a parsed [`Program`] directly.
///
/// Values and operators behave exactly as in the VM. On top of that, `and`
/// and `or` short-circuit, `if`/`while` demand a bool test, and `for` loops
/// run.
pub struct Interpreter<'p> {
    program: &'p Program,
    functions: FastHashMap<&'p str, Function<'p>>,
    /// Names the declaration pass saw assigned at top level. Assigning one of
    /// these anywhere writes the global, even before its first top-level
    /// assignment ran.
    program_globals: FastHashSet<String>,
    env: Env,
    call_depth: usize,
}

impl<'p> Interpreter<'p> {
    /// Collect every function and top-level global. Duplicate functions and
    /// function/variable name clashes are rejected here.
    pub fn new(program: &'p Program) -> Result<Self> {
        let mut symbols = SymbolTable::new();
        symbols
            .prepass(&program.statements)
            .map_err(|e| InterpError::new(InterpErrorKind::Declaration(e.kind), e.line))?;

        let mut program_globals = fast_hash_set_new();
        for symbol in symbols.globals() {
            if symbol.kind == SymbolKind::Variable {
                program_globals.insert(symbol.name.clone());
            }
        }
        let mut functions = fast_hash_map_new();
        collect_functions(&program.statements, &mut functions);
        debug!(target: "nv::interp", functions = functions.len(), globals = program_globals.len(), "interpreter ready");

        Ok(Self {
            program,
            functions,
            program_globals,
            env: Env::new(),
            call_depth: 0,
        })
    }

    pub fn global(&self, name: &str) -> Option<&Val> {
        self.env.global(name)
    }

    /// Run the whole program, writing its output to `out`.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let program = self.program;
        for stmt in &program.statements {
            if let Flow::Return(_) = self.exec(stmt, out)? {
                return Err(InterpError::new(InterpErrorKind::ReturnOutsideFunction, stmt.line));
            }
        }
        out.flush().map_err(|e| {
            let line = program.statements.last().map_or(1, |s| s.line);
            InterpError::new(InterpErrorKind::Io(e.to_string()), line)
        })
    }

    fn exec<W: Write>(&mut self, stmt: &'p Stmt, out: &mut W) -> Result<Flow> {
        let line = stmt.line;
        match &stmt.kind {
            StmtKind::Assign { name, value } => {
                let value = self.eval(value, out)?;
                self.assign(name, value, line)?;
            }
            StmtKind::Local { name, value } => {
                let value = self.eval(value, out)?;
                // No block scope at top level: same as a plain assignment.
                if self.env.depth() == 0 {
                    self.assign(name, value, line)?;
                } else {
                    self.env.declare(name, value);
                }
            }
            StmtKind::Print { value, newline } => {
                let value = self.eval(value, out)?;
                let text = decode_escapes(&value.to_string());
                let res = if *newline {
                    writeln!(out, "{text}")
                } else {
                    write!(out, "{text}")
                };
                res.map_err(|e| InterpError::new(InterpErrorKind::Io(e.to_string()), line))?;
            }
            StmtKind::If {
                test,
                then_body,
                else_body,
            } => {
                let branch = if self.condition(test, "if", out)? {
                    Some(then_body.as_slice())
                } else {
                    else_body.as_deref()
                };
                if let Some(body) = branch {
                    return self.block(body, out);
                }
            }
            StmtKind::While { test, body } => {
                while self.condition(test, "while", out)? {
                    if let flow @ Flow::Return(_) = self.block(body, out)? {
                        return Ok(flow);
                    }
                }
            }
            StmtKind::For {
                var,
                start,
                end,
                step,
                body,
            } => return self.for_loop(var, start, end, step.as_ref(), body, line, out),
            // Hoisted by `Interpreter::new`.
            StmtKind::Function { .. } => {}
            StmtKind::Return(value) => {
                let value = match value {
                    Some(value) => self.eval(value, out)?,
                    None => Val::Bool(false),
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::Expr(expr) => {
                self.eval(expr, out)?;
            }
        }
        Ok(Flow::Normal)
    }

    /// Run `body` in a fresh scope.
    fn block<W: Write>(&mut self, body: &'p [Stmt], out: &mut W) -> Result<Flow> {
        self.env.push_scope();
        let flow = self.stmts(body, out);
        self.env.pop_scope();
        flow
    }

    fn stmts<W: Write>(&mut self, body: &'p [Stmt], out: &mut W) -> Result<Flow> {
        for stmt in body {
            if let flow @ Flow::Return(_) = self.exec(stmt, out)? {
                return Ok(flow);
            }
        }
        Ok(Flow::Normal)
    }

    /// `for var := start, end[, step]`: counts from `start` while below `end`.
    /// Bounds and step are evaluated once. The counter is assigned like
    /// `var := n` before each pass, so changes made by the body do not affect
    /// the iteration count, and the variable stays visible after the loop.
    #[allow(clippy::too_many_arguments)]
    fn for_loop<W: Write>(
        &mut self,
        var: &str,
        start: &'p Expr,
        end: &'p Expr,
        step: Option<&'p Expr>,
        body: &'p [Stmt],
        line: u32,
        out: &mut W,
    ) -> Result<Flow> {
        let mut counter = self.number(start, "start", out)?;
        let end = self.number(end, "end", out)?;
        let step = match step {
            Some(step) => self.number(step, "step", out)?,
            None => 1.0,
        };
        if counter < end && step <= 0.0 {
            return Err(InterpError::new(InterpErrorKind::NonPositiveStep, line));
        }
        while counter < end {
            self.assign(var, Val::Num(counter), line)?;
            if let flow @ Flow::Return(_) = self.block(body, out)? {
                return Ok(flow);
            }
            counter += step;
        }
        Ok(Flow::Normal)
    }

    /// Assignment without `local`: overwrite the nearest binding, otherwise
    /// create one. Program globals are always written as globals. A local
    /// may reuse a function's name; nothing else may.
    fn assign(&mut self, name: &str, value: Val, line: u32) -> Result<()> {
        if self.env.update(name, &value) {
            return Ok(());
        }
        if self.functions.contains_key(name) {
            return Err(InterpError::new(InterpErrorKind::AssignToFunction(name.to_string()), line));
        }
        if self.program_globals.contains(name) {
            self.env.set_global(name, value);
        } else {
            self.env.declare(name, value);
        }
        Ok(())
    }

    fn condition<W: Write>(&mut self, test: &'p Expr, construct: &'static str, out: &mut W) -> Result<bool> {
        match self.eval(test, out)? {
            Val::Bool(b) => Ok(b),
            other => Err(InterpError::new(
                InterpErrorKind::NonBoolCondition {
                    construct,
                    found: other.type_name(),
                },
                test.line,
            )),
        }
    }

    fn number<W: Write>(&mut self, expr: &'p Expr, part: &'static str, out: &mut W) -> Result<f64> {
        match self.eval(expr, out)? {
            Val::Num(n) => Ok(n),
            other => Err(InterpError::new(
                InterpErrorKind::NonNumericRange {
                    part,
                    found: other.type_name(),
                },
                expr.line,
            )),
        }
    }

    fn eval<W: Write>(&mut self, expr: &'p Expr, out: &mut W) -> Result<Val> {
        let line = expr.line;
        let op_err = |e: OpError| InterpError::new(InterpErrorKind::InvalidOperands(e), line);
        match &expr.kind {
            ExprKind::Number(n) => Ok(Val::Num(*n)),
            ExprKind::Str(s) => Ok(Val::str(s)),
            ExprKind::Bool(b) => Ok(Val::Bool(*b)),
            ExprKind::Var(name) => match self.env.get(name) {
                Some(v) => Ok(v.clone()),
                None if self.functions.contains_key(name.as_str()) => Err(InterpError::new(
                    InterpErrorKind::FunctionAsValue(name.clone()),
                    line,
                )),
                None => Err(InterpError::new(InterpErrorKind::UndefinedVariable(name.clone()), line)),
            },
            ExprKind::Grouping(inner) => self.eval(inner, out),
            ExprKind::Unary(op, operand) => {
                let v = self.eval(operand, out)?;
                op.eval_val(&v).map_err(op_err)
            }
            ExprKind::Binary(l, op, r) => {
                let l = self.eval(l, out)?;
                let r = self.eval(r, out)?;
                op.eval_val(&l, &r).map_err(op_err)
            }
            ExprKind::Logical(l, op, r) => {
                let l = self.eval(l, out)?;
                if let Some(v) = op.short_circuit(&l) {
                    return Ok(v);
                }
                let r = self.eval(r, out)?;
                op.eval_val(&l, &r).map_err(op_err)
            }
            ExprKind::Call { name, args } => self.call(name, args, line, out),
        }
    }

    fn call<W: Write>(&mut self, name: &str, args: &'p [Expr], line: u32, out: &mut W) -> Result<Val> {
        let Some(function) = self.functions.get(name).copied() else {
            return Err(InterpError::new(InterpErrorKind::UndefinedFunction(name.to_string()), line));
        };
        if function.params.len() != args.len() {
            return Err(InterpError::new(
                InterpErrorKind::ArityMismatch {
                    name: name.to_string(),
                    expected: function.params.len(),
                    found: args.len(),
                },
                line,
            ));
        }
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(InterpError::new(InterpErrorKind::CallDepthExceeded(MAX_CALL_DEPTH), line));
        }

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg, out)?);
        }
        debug!(target: "nv::interp", function = name, argc = values.len(), depth = self.call_depth + 1, "call");

        let caller = self.env.enter_call(function.params.iter().cloned().zip(values));
        self.call_depth += 1;
        let flow = self.stmts(function.body, out);
        self.call_depth -= 1;
        self.env.leave_call(caller);

        let value = match flow? {
            Flow::Return(v) => v,
            Flow::Normal => Val::Bool(false),
        };
        debug!(target: "nv::interp", function = name, value = %value, "return");
        Ok(value)
    }
}

fn collect_functions<'p>(stmts: &'p [Stmt], out: &mut FastHashMap<&'p str, Function<'p>>) {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Function { name, params, body } => {
                out.insert(name.as_str(), Function { params, body });
                collect_functions(body, out);
            }
            StmtKind::If {
                then_body, else_body, ..
            } => {
                collect_functions(then_body, out);
                if let Some(else_body) = else_body {
                    collect_functions(else_body, out);
                }
            }
            StmtKind::While { body, .. } | StmtKind::For { body, .. } => collect_functions(body, out),
            _ => {}
        }
    }
}
