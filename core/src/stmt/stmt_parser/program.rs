use super::StmtParser;
use crate::{
    ast::MAX_NESTING,
    expr::ExprKind,
    stmt::{Program, Stmt, StmtKind},
    token::{ParseError, TokenKind},
};

type Result<T> = std::result::Result<T, ParseError>;

impl<'a> StmtParser<'a> {
    /// Parse the whole token stream.
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut statements = Vec::new();

        while !self.eof() {
            // Stray separators are allowed anywhere between statements.
            if self.peek() == Some(TokenKind::Semicolon) {
                self.pos += 1;
                continue;
            }
            statements.push(self.parse_statement()?);
        }

        Ok(Program::new(statements))
    }

    /// Statements up to (not including) one of `terminators`.
    pub(super) fn parse_block(&mut self, terminators: &[TokenKind]) -> Result<Vec<Stmt>> {
        if self.depth >= MAX_NESTING {
            return Err(self.err("Blocks nested too deeply"));
        }
        self.depth += 1;
        let block = self.parse_block_body(terminators);
        self.depth -= 1;
        block
    }

    fn parse_block_body(&mut self, terminators: &[TokenKind]) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(self.err(&format!("Expected '{}', found end of input", keyword(terminators[0]))));
                }
                Some(TokenKind::Semicolon) => self.pos += 1,
                Some(kind) if terminators.contains(&kind) => return Ok(statements),
                Some(_) => statements.push(self.parse_statement()?),
            }
        }
    }

    pub(super) fn parse_statement(&mut self) -> Result<Stmt> {
        let token = &self.tokens[self.pos];
        match token.kind {
            TokenKind::Identifier => self.parse_assign_or_call(),
            TokenKind::Local => self.parse_local(),
            TokenKind::Print | TokenKind::Println => self.parse_print(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Func => self.parse_function(),
            TokenKind::Ret => self.parse_return(),
            _ => Err(self.err(&format!("Unexpected '{}' at start of statement", token.lexeme))),
        }
    }

    /// - `name := expr`
    /// - `name(args)`
    fn parse_assign_or_call(&mut self) -> Result<Stmt> {
        let line = self.line();
        match self.peek_ahead(1) {
            Some(TokenKind::Assign) => {
                let name = self.expect_id()?;
                self.pos += 1;
                let value = self.parse_expression()?;
                Ok(Stmt::new(StmtKind::Assign { name, value }, line))
            }
            Some(TokenKind::LParen) => {
                let expr = self.parse_expression()?;
                if !matches!(expr.kind, ExprKind::Call { .. }) {
                    return Err(self.err("Only calls may be used as statements"));
                }
                Ok(Stmt::new(StmtKind::Expr(expr), line))
            }
            _ => {
                self.pos += 1;
                Err(self.err("Expected ':=' or '(' after identifier"))
            }
        }
    }

    /// `local name := expr`
    fn parse_local(&mut self) -> Result<Stmt> {
        let line = self.line();
        self.pos += 1;
        let name = self.expect_id()?;
        self.expect_token(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        Ok(Stmt::new(StmtKind::Local { name, value }, line))
    }

    fn parse_print(&mut self) -> Result<Stmt> {
        let line = self.line();
        let newline = self.tokens[self.pos].kind == TokenKind::Println;
        self.pos += 1;
        let value = self.parse_expression()?;
        Ok(Stmt::new(StmtKind::Print { value, newline }, line))
    }
}

pub(super) fn keyword(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::End => "end",
        TokenKind::Else => "else",
        TokenKind::Then => "then",
        TokenKind::Do => "do",
        TokenKind::Assign => ":=",
        TokenKind::Comma => ",",
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        _ => "token",
    }
}
