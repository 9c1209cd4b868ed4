use crate::{
    expr::{Expr, ExprKind},
    op::{BinOp, LogicalOp, UnaryOp},
    token::{ParseError, Token, TokenKind},
};

type Result<T> = std::result::Result<T, ParseError>;

/// Deepest nesting of groupings, calls and unary operators the parser accepts.
pub const MAX_NESTING: usize = 128;

/// Recursive-descent expression parser. Statement parsing drives it through
/// [`Parser::at`] and picks the position back up with [`Parser::pos`].
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    len: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::at(tokens, 0)
    }

    pub fn at(tokens: &'a [Token], pos: usize) -> Self {
        Self {
            tokens,
            pos,
            len: tokens.len(),
            depth: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Parse a single expression that must cover the whole token slice.
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.parse_expr()?;
        if !self.eof() {
            return Err(self.err(&format!("Unexpected '{}' after expression", self.tokens[self.pos].lexeme)));
        }
        Ok(expr)
    }

    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.nested(Self::parse_or)
    }

    /// Run `f` one nesting level deeper, failing instead of recursing past
    /// [`MAX_NESTING`].
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.err("Expression nested too deeply"));
        }
        self.depth += 1;
        let res = f(self);
        self.depth -= 1;
        res
    }

    /// - `expr or expr`
    /// - `expr xor expr`
    fn parse_or(&mut self) -> Result<Expr> {
        let mut expr = self.parse_and()?;
        while let Some(kind) = self.peek() {
            let op = match kind {
                TokenKind::Or => LogicalOp::Or,
                TokenKind::Xor => LogicalOp::Xor,
                _ => break,
            };
            let line = self.advance_line();
            let right = self.parse_and()?;
            expr = Expr::new(ExprKind::Logical(Box::new(expr), op, Box::new(right)), line);
        }
        Ok(expr)
    }

    /// `expr and expr`
    fn parse_and(&mut self) -> Result<Expr> {
        let mut expr = self.parse_cmp()?;
        while self.peek() == Some(TokenKind::And) {
            let line = self.advance_line();
            let right = self.parse_cmp()?;
            expr = Expr::new(ExprKind::Logical(Box::new(expr), LogicalOp::And, Box::new(right)), line);
        }
        Ok(expr)
    }

    /// Comparisons do not chain: `a < b < c` is rejected.
    fn parse_cmp(&mut self) -> Result<Expr> {
        let expr = self.parse_add_sub()?;
        let Some(op) = self.peek().and_then(cmp_op) else {
            return Ok(expr);
        };
        let line = self.advance_line();
        let right = self.parse_add_sub()?;
        if self.peek().and_then(cmp_op).is_some() {
            return Err(self.err("Comparison operators cannot be chained"));
        }
        Ok(Expr::new(ExprKind::Binary(Box::new(expr), op, Box::new(right)), line))
    }

    /// - `expr + expr`
    /// - `expr - expr`
    fn parse_add_sub(&mut self) -> Result<Expr> {
        let mut expr = self.parse_mul_div()?;
        while let Some(kind) = self.peek() {
            let op = match kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let line = self.advance_line();
            let right = self.parse_mul_div()?;
            expr = Expr::new(ExprKind::Binary(Box::new(expr), op, Box::new(right)), line);
        }
        Ok(expr)
    }

    /// - `expr * expr`
    /// - `expr / expr`
    /// - `expr % expr`
    fn parse_mul_div(&mut self) -> Result<Expr> {
        let mut expr = self.parse_unary()?;
        while let Some(kind) = self.peek() {
            let op = match kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Mod => BinOp::Mod,
                _ => break,
            };
            let line = self.advance_line();
            let right = self.parse_unary()?;
            expr = Expr::new(ExprKind::Binary(Box::new(expr), op, Box::new(right)), line);
        }
        Ok(expr)
    }

    /// - `-expr`, `+expr`, `~expr`
    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek() {
            Some(TokenKind::Minus) => UnaryOp::Neg,
            Some(TokenKind::Plus) => UnaryOp::Pos,
            Some(TokenKind::Not) => UnaryOp::Not,
            _ => return self.parse_power(),
        };
        let line = self.advance_line();
        let operand = self.nested(Self::parse_unary)?;
        Ok(Expr::new(ExprKind::Unary(op, Box::new(operand)), line))
    }

    /// `primary ^ unary`, right associative. The exponent may carry its own
    /// sign, so `2 ^ -1` parses.
    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if self.peek() != Some(TokenKind::Caret) {
            return Ok(base);
        }
        let line = self.advance_line();
        let exponent = self.nested(Self::parse_unary)?;
        Ok(Expr::new(ExprKind::Binary(Box::new(base), BinOp::Exp, Box::new(exponent)), line))
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        if self.eof() {
            return Err(self.err("Expected expression, found end of input"));
        }
        let tokens = self.tokens;
        let token = &tokens[self.pos];
        let line = token.line;
        let kind = match token.kind {
            TokenKind::Integer | TokenKind::Float => {
                let n = token
                    .lexeme
                    .parse::<f64>()
                    .map_err(|_| self.err(&format!("Invalid number '{}'", token.lexeme)))?;
                self.pos += 1;
                ExprKind::Number(n)
            }
            TokenKind::Str => {
                let lexeme = &token.lexeme;
                // The lexer guarantees a matching quote on both ends.
                let inner = lexeme.get(1..lexeme.len().saturating_sub(1)).unwrap_or_default();
                self.pos += 1;
                ExprKind::Str(inner.to_string())
            }
            TokenKind::True => {
                self.pos += 1;
                ExprKind::Bool(true)
            }
            TokenKind::False => {
                self.pos += 1;
                ExprKind::Bool(false)
            }
            TokenKind::Identifier => {
                let name = token.lexeme.clone();
                self.pos += 1;
                if self.peek() == Some(TokenKind::LParen) {
                    let args = self.parse_args()?;
                    ExprKind::Call { name, args }
                } else {
                    ExprKind::Var(name)
                }
            }
            TokenKind::LParen => {
                self.pos += 1;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')' after expression")?;
                ExprKind::Grouping(Box::new(inner))
            }
            _ => return Err(self.err(&format!("Expected expression, found '{}'", token.lexeme))),
        };
        Ok(Expr::new(kind, line))
    }

    /// `(` [expr {`,` expr}] `)`; the cursor sits on the opening paren.
    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        self.pos += 1;
        let mut args = Vec::new();
        if self.peek() == Some(TokenKind::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.peek() {
                Some(TokenKind::Comma) => self.pos += 1,
                Some(TokenKind::RParen) => {
                    self.pos += 1;
                    return Ok(args);
                }
                _ => return Err(self.err("Expected ',' or ')' in argument list")),
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        if self.peek() == Some(kind) {
            self.pos += 1;
            return Ok(());
        }
        Err(self.err(&format!("Expected {what}")))
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    /// Consume the current token and return its line.
    fn advance_line(&mut self) -> u32 {
        let line = self.tokens[self.pos].line;
        self.pos += 1;
        line
    }

    fn eof(&self) -> bool {
        self.pos >= self.len
    }

    fn err(&self, msg: &str) -> ParseError {
        let line = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line);
        ParseError::new(msg, line)
    }
}

fn cmp_op(kind: TokenKind) -> Option<BinOp> {
    Some(match kind {
        TokenKind::Eq => BinOp::Eq,
        TokenKind::Ne => BinOp::Ne,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::Ge => BinOp::Ge,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::Le => BinOp::Le,
        _ => return None,
    })
}
