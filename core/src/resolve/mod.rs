//! Compile-time name resolution: globals and functions by name, locals by
//! frame-relative slot.

mod prepass;
mod symbols;

pub use symbols::{Resolution, Symbol, SymbolKind, SymbolTable};
