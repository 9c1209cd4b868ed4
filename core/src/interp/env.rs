use crate::{
    util::fast_map::{FastHashMap, fast_hash_map_new},
    val::Val,
};

type Scope = FastHashMap<String, Val>;

/// Variable storage for the tree-walking interpreter.
///
/// Globals live in one flat map. Block scopes of the running call sit on a
/// stack, innermost last. A call swaps the caller's scopes out, so callees see
/// globals and their own locals only.
#[derive(Debug)]
pub struct Env {
    globals: FastHashMap<String, Val>,
    scopes: Vec<Scope>,
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl Env {
    pub fn new() -> Self {
        Self {
            globals: fast_hash_map_new(),
            scopes: Vec::new(),
        }
    }

    /// Innermost scope first, then globals.
    pub fn get(&self, name: &str) -> Option<&Val> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
    }

    pub fn global(&self, name: &str) -> Option<&Val> {
        self.globals.get(name)
    }

    /// Overwrite the nearest existing binding of `name`. Returns `false` when
    /// there is none.
    pub fn update(&mut self, name: &str, value: &Val) -> bool {
        let slot = match self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(name)) {
            Some(slot) => slot,
            None => match self.globals.get_mut(name) {
                Some(slot) => slot,
                None => return false,
            },
        };
        *slot = value.clone();
        true
    }

    /// Bind `name` in the innermost scope, or as a global at top level. An
    /// existing binding in the same scope is overwritten; outer ones are
    /// shadowed.
    pub fn declare(&mut self, name: &str, value: Val) {
        match self.scopes.last_mut() {
            Some(scope) => scope.insert(name.to_string(), value),
            None => self.globals.insert(name.to_string(), value),
        };
    }

    pub fn set_global(&mut self, name: &str, value: Val) {
        self.globals.insert(name.to_string(), value);
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(fast_hash_map_new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Start a call frame whose only scope holds `params`. Returns the
    /// caller's scopes for [`Env::leave_call`].
    pub fn enter_call<I>(&mut self, params: I) -> Vec<FastHashMap<String, Val>>
    where
        I: IntoIterator<Item = (String, Val)>,
    {
        let mut frame: Scope = fast_hash_map_new();
        frame.extend(params);
        std::mem::replace(&mut self.scopes, vec![frame])
    }

    pub fn leave_call(&mut self, caller: Vec<FastHashMap<String, Val>>) {
        self.scopes = caller;
    }
}
