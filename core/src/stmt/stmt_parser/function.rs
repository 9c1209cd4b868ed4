use super::StmtParser;
use crate::{
    stmt::{Stmt, StmtKind},
    token::{ParseError, TokenKind},
};

type Result<T> = std::result::Result<T, ParseError>;

impl<'a> StmtParser<'a> {
    /// `func name(a, b) ... end`
    pub(super) fn parse_function(&mut self) -> Result<Stmt> {
        let line = self.line();
        self.pos += 1;
        let name = self.expect_id()?;
        self.expect_token(TokenKind::LParen)?;

        let mut params: Vec<String> = Vec::new();
        if self.peek() != Some(TokenKind::RParen) {
            loop {
                let param = self.expect_id()?;
                if params.contains(&param) {
                    return Err(self.err(&format!("Duplicate parameter '{param}' in function '{name}'")));
                }
                params.push(param);
                if self.peek() != Some(TokenKind::Comma) {
                    break;
                }
                self.pos += 1;
            }
        }
        self.expect_token(TokenKind::RParen)?;

        let body = self.parse_block(&[TokenKind::End])?;
        self.expect_token(TokenKind::End)?;
        Ok(Stmt::new(StmtKind::Function { name, params, body }, line))
    }

    /// `ret [expr]`. The value is omitted when the block closes or another
    /// statement starts right after the keyword.
    pub(super) fn parse_return(&mut self) -> Result<Stmt> {
        let line = self.line();
        self.pos += 1;
        let bare = match self.peek() {
            None => true,
            Some(kind) => {
                matches!(kind, TokenKind::End | TokenKind::Else | TokenKind::Semicolon) || kind.starts_statement()
            }
        };
        let value = if bare { None } else { Some(self.parse_expression()?) };
        Ok(Stmt::new(StmtKind::Return(value), line))
    }
}
