use crate::{
    util::fast_map::{FastHashMap, fast_hash_map_new},
    vm::CompileErrorKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function { arity: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// 0 for globals and functions.
    pub depth: u32,
}

/// Where a name lives at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Offset from the frame pointer of the current activation.
    Local(usize),
    Global,
    Function { arity: usize },
}

#[derive(Debug, Clone)]
struct LocalSymbol {
    name: String,
    depth: u32,
}

/// Scoped symbol table used during code generation.
///
/// Locals live in one vector in declaration order. Each function activation
/// owns the tail starting at its frame base, so a local's slot is its index
/// minus the base. That index is also its runtime position above `bp`, as long
/// as every block exit pops exactly the locals it introduced.
#[derive(Debug)]
pub struct SymbolTable {
    globals: FastHashMap<String, Symbol>,
    locals: Vec<LocalSymbol>,
    frame_bases: Vec<usize>,
    depth: u32,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            globals: fast_hash_map_new(),
            locals: Vec::new(),
            frame_bases: vec![0],
            depth: 0,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn in_function(&self) -> bool {
        self.frame_bases.len() > 1
    }

    /// Number of locals visible in the current activation.
    pub fn local_count(&self) -> usize {
        self.locals.len() - self.frame_base()
    }

    pub fn global(&self, name: &str) -> Option<&Symbol> {
        self.globals.get(name)
    }

    pub fn globals(&self) -> impl Iterator<Item = &Symbol> {
        self.globals.values()
    }

    pub fn define_function(&mut self, name: &str, arity: usize) -> Result<(), CompileErrorKind> {
        if self.globals.contains_key(name) {
            return Err(CompileErrorKind::NameCollision(name.to_string()));
        }
        self.insert_global(name, SymbolKind::Function { arity });
        Ok(())
    }

    /// Register a global variable. Redefining an existing global variable is a
    /// no-op; reusing a function's name is an error.
    pub fn define_global(&mut self, name: &str) -> Result<(), CompileErrorKind> {
        match self.globals.get(name).map(|s| s.kind) {
            Some(SymbolKind::Function { .. }) => Err(CompileErrorKind::NameCollision(name.to_string())),
            Some(SymbolKind::Variable) => Ok(()),
            None => {
                self.insert_global(name, SymbolKind::Variable);
                Ok(())
            }
        }
    }

    fn insert_global(&mut self, name: &str, kind: SymbolKind) {
        self.globals.insert(
            name.to_string(),
            Symbol {
                name: name.to_string(),
                kind,
                depth: 0,
            },
        );
    }

    /// Declare a local in the current scope and return its slot. A name that
    /// is already live gets a fresh slot that shadows the old one.
    pub fn declare_local(&mut self, name: &str) -> usize {
        let slot = self.local_count();
        self.locals.push(LocalSymbol {
            name: name.to_string(),
            depth: self.depth,
        });
        slot
    }

    /// Innermost local of the current activation, then globals.
    pub fn resolve(&self, name: &str) -> Option<Resolution> {
        let base = self.frame_base();
        if let Some(idx) = self.locals[base..].iter().rposition(|l| l.name == name) {
            return Some(Resolution::Local(idx));
        }
        self.globals.get(name).map(|s| match s.kind {
            SymbolKind::Variable => Resolution::Global,
            SymbolKind::Function { arity } => Resolution::Function { arity },
        })
    }

    /// Storage for an assignment to `name`.
    ///
    /// This is the only place a plain assignment introduces a symbol: an
    /// unknown name becomes a global at depth 0 and a local of the current
    /// scope anywhere deeper.
    pub fn assign_target(&mut self, name: &str) -> Result<Resolution, CompileErrorKind> {
        match self.resolve(name) {
            Some(Resolution::Function { .. }) => Err(CompileErrorKind::AssignToFunction(name.to_string())),
            Some(found) => Ok(found),
            None if self.depth == 0 => {
                self.define_global(name)?;
                Ok(Resolution::Global)
            }
            None => Ok(Resolution::Local(self.declare_local(name))),
        }
    }

    /// Storage for `local name := ...`. At depth 0 there is no local scope, so
    /// this behaves like a plain global assignment.
    pub fn local_target(&mut self, name: &str) -> Result<Resolution, CompileErrorKind> {
        if self.depth == 0 {
            return self.assign_target(name);
        }
        Ok(Resolution::Local(self.declare_local(name)))
    }

    pub fn enter_scope(&mut self) {
        self.depth += 1;
    }

    /// Leave a block scope. Returns how many locals went out of scope; the
    /// caller emits one `Pop` for each.
    pub fn exit_scope(&mut self) -> usize {
        self.depth = self.depth.saturating_sub(1);
        let base = self.frame_base();
        let keep = self.locals[base..]
            .iter()
            .position(|l| l.depth > self.depth)
            .map_or(self.locals.len(), |i| base + i);
        let dropped = self.locals.len() - keep;
        self.locals.truncate(keep);
        dropped
    }

    /// Start a function activation with `params` bound to slots `0..n`.
    pub fn enter_function(&mut self, params: &[String]) {
        self.depth += 1;
        self.frame_bases.push(self.locals.len());
        for param in params {
            self.declare_local(param);
        }
    }

    /// Drop the activation's locals. No pops are needed; `Return` unwinds the
    /// whole frame at runtime.
    pub fn exit_function(&mut self) {
        if self.frame_bases.len() > 1
            && let Some(base) = self.frame_bases.pop()
        {
            self.locals.truncate(base);
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn frame_base(&self) -> usize {
        self.frame_bases.last().copied().unwrap_or(0)
    }
}
