use crate::token::Token;

/// Statement-level parser. Expressions are handed off to [`crate::ast::Parser`]
/// positioned at the current token.
pub struct StmtParser<'a> {
    pub(crate) tokens: &'a [Token],
    pub(crate) pos: usize,
    pub(crate) len: usize,
    pub(crate) depth: usize,
}

impl<'a> StmtParser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            len: tokens.len(),
            depth: 0,
        }
    }
}

mod control;
mod function;
mod helpers;
mod program;
