//! Parsing front end: token stream in, [`Program`] out.

mod parser;

pub use crate::{
    expr::{Expr, ExprKind},
    stmt::{Program, Stmt, StmtKind},
};
pub use parser::{MAX_NESTING, Parser};

use crate::{
    stmt::stmt_parser::StmtParser,
    token::{ParseError, Token, Tokenizer},
};

/// Parse an already tokenized program.
pub fn parse_tokens(tokens: &[Token]) -> Result<Program, ParseError> {
    StmtParser::new(tokens).parse_program()
}

/// Tokenize and parse source text.
pub fn parse_source(src: &str) -> Result<Program, ParseError> {
    let tokens = Tokenizer::tokenize(src)?;
    parse_tokens(&tokens)
}
