//! Runtime values.
//!
//! The language has exactly three value kinds. Strings are immutable and
//! shared through `Arc<str>`, so cloning a value never copies text.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

mod convert;
mod ops;
mod text;

pub use text::decode_escapes;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Val {
    Num(f64),
    Str(Arc<str>),
    Bool(bool),
}

impl Val {
    pub fn str(s: impl AsRef<str>) -> Self {
        Val::Str(Arc::from(s.as_ref()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Val::Num(_) => "number",
            Val::Str(_) => "string",
            Val::Bool(_) => "bool",
        }
    }

    #[inline]
    pub fn is_false(&self) -> bool {
        matches!(self, Val::Bool(false))
    }

    pub(crate) fn concat_strings(a: &str, b: &str) -> Val {
        let mut s = String::with_capacity(a.len() + b.len());
        s.push_str(a);
        s.push_str(b);
        Val::Str(Arc::from(s))
    }
}

/// Placeholder used when a local slot is written beyond the current stack top.
impl Default for Val {
    fn default() -> Self {
        Val::Bool(false)
    }
}

/// Tag and payload are compared together; values of different kinds are never equal.
impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Val::Num(a), Val::Num(b)) => a == b,
            (Val::Str(a), Val::Str(b)) => a == b,
            (Val::Bool(a), Val::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Num(n) => f.write_str(&text::format_number(*n)),
            Val::Str(s) => f.write_str(s),
            Val::Bool(b) => write!(f, "{b}"),
        }
    }
}
