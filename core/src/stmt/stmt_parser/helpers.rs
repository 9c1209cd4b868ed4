use super::{StmtParser, program::keyword};
use crate::{
    ast::Parser as ExprParser,
    expr::Expr,
    token::{ParseError, TokenKind},
};

impl<'a> StmtParser<'a> {
    pub(super) fn eof(&self) -> bool {
        self.pos >= self.len
    }

    pub(super) fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    pub(super) fn peek_ahead(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    /// Line of the current token, or of the last one at end of input.
    pub(super) fn line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    pub(super) fn expect_token(&mut self, expected: TokenKind) -> Result<(), ParseError> {
        match self.tokens.get(self.pos) {
            None => Err(self.err(&format!("Expected '{}', found end of input", keyword(expected)))),
            Some(t) if t.kind != expected => {
                Err(self.err(&format!("Expected '{}', found '{}'", keyword(expected), t.lexeme)))
            }
            Some(_) => {
                self.pos += 1;
                Ok(())
            }
        }
    }

    pub(super) fn expect_id(&mut self) -> Result<String, ParseError> {
        match self.tokens.get(self.pos) {
            Some(t) if t.kind == TokenKind::Identifier => {
                self.pos += 1;
                Ok(t.lexeme.clone())
            }
            Some(t) => Err(self.err(&format!("Expected identifier, found '{}'", t.lexeme))),
            None => Err(self.err("Expected identifier, found end of input")),
        }
    }

    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        let mut parser = ExprParser::at(self.tokens, self.pos);
        let expr = parser.parse_expr()?;
        self.pos = parser.pos();
        Ok(expr)
    }

    pub(super) fn err(&self, msg: &str) -> ParseError {
        ParseError::new(msg, self.line())
    }
}
