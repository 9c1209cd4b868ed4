mod exec;
mod frame;

use tracing::debug;

use crate::util::fast_map::{FastHashMap, fast_hash_map_new, fast_hash_map_with_capacity};
use crate::val::Val;
use crate::vm::{Op, VmError, VmErrorKind};

pub use frame::Frame;

/// Highest stack index a `StoreLocal` may grow the stack to.
const MAX_STACK: usize = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    /// Built, `Start` not executed yet.
    Ready,
    Running,
    Halted,
}

/// Stack virtual machine over a borrowed instruction sequence.
///
/// One `Vec<Val>` holds both locals and temporaries: the current activation's
/// locals start at `bp`, and temporaries are pushed above them. Every run
/// starts from a fresh `Vm`, so no state leaks between executions.
pub struct Vm<'a> {
    code: &'a [Op],
    labels: FastHashMap<&'a str, usize>,
    pc: usize,
    stack: Vec<Val>,
    bp: usize,
    frames: Vec<Frame<'a>>,
    globals: FastHashMap<String, Val>,
    state: VmState,
}

impl<'a> Vm<'a> {
    /// Build the label table in one scan over `code`.
    pub fn new(code: &'a [Op]) -> Result<Self, VmError> {
        let mut labels = fast_hash_map_with_capacity(code.len() / 4);
        for (idx, op) in code.iter().enumerate() {
            if let Op::Label(name) = op
                && labels.insert(name.as_str(), idx).is_some()
            {
                return Err(VmError::new(VmErrorKind::DuplicateLabel(name.clone()), idx));
            }
        }
        debug!(instructions = code.len(), labels = labels.len(), "vm ready");
        Ok(Self {
            code,
            labels,
            pc: 0,
            stack: Vec::with_capacity(64),
            bp: 0,
            frames: Vec::new(),
            globals: fast_hash_map_new(),
            state: VmState::Ready,
        })
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn stack(&self) -> &[Val] {
        &self.stack
    }

    pub fn bp(&self) -> usize {
        self.bp
    }

    pub fn frame_depth(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Frame<'a>] {
        &self.frames
    }

    pub fn global(&self, name: &str) -> Option<&Val> {
        self.globals.get(name)
    }

    pub fn state(&self) -> VmState {
        self.state
    }

    /// Run until `Halt`, writing program output to `out`.
    pub fn run<W: std::io::Write>(&mut self, out: &mut W) -> Result<(), VmError> {
        while self.state != VmState::Halted {
            self.step(out)?;
        }
        out.flush()
            .map_err(|e| VmError::new(VmErrorKind::Io(e.to_string()), self.pc))
    }

    /// Execute exactly one instruction. Stepping a halted machine is a no-op.
    pub fn step<W: std::io::Write>(&mut self, out: &mut W) -> Result<VmState, VmError> {
        if self.state == VmState::Halted {
            return Ok(self.state);
        }
        let pc = self.pc;
        let code = self.code;
        let Some(op) = code.get(pc) else {
            return Err(VmError::new(VmErrorKind::PcOutOfRange, pc));
        };
        tracing::trace!(target: "nv::vm", pc, op = %op, stack = self.stack.len(), bp = self.bp, "exec");
        self.pc += 1;
        self.exec(op, out).map_err(|kind| VmError::new(kind, pc))?;
        Ok(self.state)
    }
}
