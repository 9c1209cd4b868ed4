use std::io::Write;

use super::{Frame, MAX_STACK, Vm, VmState};
use crate::{
    op::{BinOp, LogicalOp, UnaryOp},
    val::{Val, decode_escapes},
    vm::{Op, VmErrorKind},
};

type Result<T> = std::result::Result<T, VmErrorKind>;

impl<'a> Vm<'a> {
    pub(super) fn exec<W: Write>(&mut self, op: &'a Op, out: &mut W) -> Result<()> {
        match op {
            Op::Start => {
                self.state = VmState::Running;
                return Ok(());
            }
            Op::Halt => {
                self.state = VmState::Halted;
                return Ok(());
            }
            _ if self.state != VmState::Running => return Err(VmErrorKind::NotRunning),
            _ => {}
        }

        match op {
            Op::Start | Op::Halt | Op::Label(_) => {}
            Op::Jump(label) => self.pc = self.label(label)?,
            Op::JumpIfFalse(label) => {
                if self.pop()?.is_false() {
                    self.pc = self.label(label)?;
                }
            }
            Op::Push(v) => self.stack.push(v.clone()),
            Op::Pop => {
                self.pop()?;
            }
            Op::Add => self.binary(BinOp::Add)?,
            Op::Sub => self.binary(BinOp::Sub)?,
            Op::Mul => self.binary(BinOp::Mul)?,
            Op::Div => self.binary(BinOp::Div)?,
            Op::Mod => self.binary(BinOp::Mod)?,
            Op::Exp => self.binary(BinOp::Exp)?,
            Op::Eq => self.binary(BinOp::Eq)?,
            Op::Ne => self.binary(BinOp::Ne)?,
            Op::Gt => self.binary(BinOp::Gt)?,
            Op::Ge => self.binary(BinOp::Ge)?,
            Op::Lt => self.binary(BinOp::Lt)?,
            Op::Le => self.binary(BinOp::Le)?,
            Op::And => self.logical(LogicalOp::And)?,
            Op::Or => self.logical(LogicalOp::Or)?,
            Op::Xor => self.logical(LogicalOp::Xor)?,
            Op::Neg => self.unary(UnaryOp::Neg)?,
            Op::Pos => self.unary(UnaryOp::Pos)?,
            Op::Print => self.print(out, false)?,
            Op::PrintLine => self.print(out, true)?,
            Op::LoadGlobal(name) => {
                let v = self
                    .globals
                    .get(name.as_str())
                    .cloned()
                    .ok_or_else(|| VmErrorKind::UndefinedGlobal(name.clone()))?;
                self.stack.push(v);
            }
            Op::StoreGlobal(name) => {
                let v = self.pop()?;
                self.globals.insert(name.clone(), v);
            }
            Op::LoadLocal(slot) => {
                let v = self
                    .bp
                    .checked_add(*slot)
                    .and_then(|idx| self.stack.get(idx))
                    .cloned()
                    .ok_or(VmErrorKind::LocalOutOfRange(*slot))?;
                self.stack.push(v);
            }
            Op::StoreLocal(slot) => {
                let v = self.pop()?;
                let idx = self
                    .bp
                    .checked_add(*slot)
                    .filter(|idx| *idx < MAX_STACK)
                    .ok_or(VmErrorKind::LocalOutOfRange(*slot))?;
                if idx < self.stack.len() {
                    self.stack[idx] = v;
                } else {
                    // Slots between the top and `idx` get the placeholder.
                    self.stack
                        .try_reserve((idx - self.stack.len()).saturating_add(1))
                        .map_err(|_| VmErrorKind::LocalOutOfRange(*slot))?;
                    self.stack.resize(idx, Val::default());
                    self.stack.push(v);
                }
            }
            Op::Call(name, argc) => self.call(name, *argc)?,
            Op::Return => self.ret()?,
        }
        Ok(())
    }

    fn call(&mut self, name: &'a str, argc: usize) -> Result<()> {
        if self.stack.len() < argc {
            return Err(VmErrorKind::StackUnderflow);
        }
        let target = self.label(name)?;
        self.frames.push(Frame {
            name,
            ret_pc: self.pc,
            saved_bp: self.bp,
        });
        // Frame base is the first argument.
        self.bp = self.stack.len() - argc;
        self.pc = target;
        tracing::debug!(target: "nv::vm", function = name, argc, bp = self.bp, depth = self.frames.len(), "call");
        Ok(())
    }

    /// Pop the result, drop the callee's arguments and locals, restore the
    /// caller, push the result.
    fn ret(&mut self) -> Result<()> {
        let frame = self.frames.pop().ok_or(VmErrorKind::ReturnWithoutFrame)?;
        let value = self.pop()?;
        self.stack.truncate(self.bp);
        self.bp = frame.saved_bp;
        self.pc = frame.ret_pc;
        tracing::debug!(target: "nv::vm", function = frame.name, value = %value, "return");
        self.stack.push(value);
        Ok(())
    }

    fn binary(&mut self, op: BinOp) -> Result<()> {
        let r = self.pop()?;
        let l = self.pop()?;
        self.stack.push(op.eval_val(&l, &r)?);
        Ok(())
    }

    fn logical(&mut self, op: LogicalOp) -> Result<()> {
        let r = self.pop()?;
        let l = self.pop()?;
        self.stack.push(op.eval_val(&l, &r)?);
        Ok(())
    }

    fn unary(&mut self, op: UnaryOp) -> Result<()> {
        let v = self.pop()?;
        self.stack.push(op.eval_val(&v)?);
        Ok(())
    }

    fn print<W: Write>(&mut self, out: &mut W, newline: bool) -> Result<()> {
        let v = self.pop()?;
        let text = decode_escapes(&v.to_string());
        let res = if newline {
            writeln!(out, "{text}")
        } else {
            write!(out, "{text}")
        };
        res.map_err(|e| VmErrorKind::Io(e.to_string()))
    }

    #[inline]
    fn pop(&mut self) -> Result<Val> {
        self.stack.pop().ok_or(VmErrorKind::StackUnderflow)
    }

    fn label(&self, name: &str) -> Result<usize> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| VmErrorKind::UnknownLabel(name.to_string()))
    }
}
