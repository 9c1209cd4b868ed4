use super::StmtParser;
use crate::{
    stmt::{Stmt, StmtKind},
    token::{ParseError, TokenKind},
};

type Result<T> = std::result::Result<T, ParseError>;

impl<'a> StmtParser<'a> {
    /// `if expr then ... [else ...] end`
    pub(super) fn parse_if(&mut self) -> Result<Stmt> {
        let line = self.line();
        self.pos += 1;
        let test = self.parse_expression()?;
        self.expect_token(TokenKind::Then)?;
        let then_body = self.parse_block(&[TokenKind::End, TokenKind::Else])?;
        let else_body = if self.peek() == Some(TokenKind::Else) {
            self.pos += 1;
            Some(self.parse_block(&[TokenKind::End])?)
        } else {
            None
        };
        self.expect_token(TokenKind::End)?;
        Ok(Stmt::new(
            StmtKind::If {
                test,
                then_body,
                else_body,
            },
            line,
        ))
    }

    /// `while expr do ... end`
    pub(super) fn parse_while(&mut self) -> Result<Stmt> {
        let line = self.line();
        self.pos += 1;
        let test = self.parse_expression()?;
        self.expect_token(TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect_token(TokenKind::End)?;
        Ok(Stmt::new(StmtKind::While { test, body }, line))
    }

    /// `for name := start, end[, step] do ... end`
    pub(super) fn parse_for(&mut self) -> Result<Stmt> {
        let line = self.line();
        self.pos += 1;
        let var = self.expect_id()?;
        self.expect_token(TokenKind::Assign)?;
        let start = self.parse_expression()?;
        self.expect_token(TokenKind::Comma)?;
        let end = self.parse_expression()?;
        let step = if self.peek() == Some(TokenKind::Comma) {
            self.pos += 1;
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_token(TokenKind::Do)?;
        let body = self.parse_block(&[TokenKind::End])?;
        self.expect_token(TokenKind::End)?;
        Ok(Stmt::new(
            StmtKind::For {
                var,
                start,
                end,
                step,
                body,
            },
            line,
        ))
    }
}
