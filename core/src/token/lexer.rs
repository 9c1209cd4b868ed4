use std::fmt;

use serde::Serialize;

use crate::token::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    LParen,    // (
    RParen,    // )
    LCurly,    // {
    RCurly,    // }
    LSquare,   // [
    RSquare,   // ]
    Dot,       // .
    Comma,     // ,
    Plus,      // +
    Minus,     // -
    Star,      // *
    Caret,     // ^
    Slash,     // /
    Semicolon, // ;
    Question,  // ?
    Mod,       // %
    Colon,     // :
    Assign,    // :=
    Eq,        // ==
    Ne,        // ~=
    Not,       // ~
    Gt,        // >
    Ge,        // >=
    Lt,        // <
    Le,        // <=
    Integer,
    Float,
    Str,
    Identifier,
    // Keywords
    If,
    Then,
    Else,
    End,
    While,
    Do,
    For,
    Func,
    Ret,
    Local,
    Print,
    Println,
    True,
    False,
    And,
    Or,
    Xor,
}

impl TokenKind {
    fn keyword(ident: &str) -> Option<TokenKind> {
        Some(match ident {
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "end" => TokenKind::End,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "func" => TokenKind::Func,
            "ret" => TokenKind::Ret,
            "local" => TokenKind::Local,
            "print" => TokenKind::Print,
            "println" => TokenKind::Println,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "xor" => TokenKind::Xor,
            _ => return None,
        })
    }

    /// Keywords that can only begin a statement.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Func
                | TokenKind::Ret
                | TokenKind::Local
                | TokenKind::Print
                | TokenKind::Println
        )
    }
}

/// A lexeme with its kind and the line it starts on. String lexemes keep
/// their surrounding quotes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>4}  {:<12} {}", self.line, format!("{:?}", self.kind), self.lexeme)
    }
}

pub struct Tokenizer {
    chars: Vec<char>,
    start: usize,
    idx: usize,
    len: usize,
    line: u32,
    pub tokens: Vec<Token>,
}

impl Tokenizer {
    pub fn tokenize(s: &str) -> Result<Vec<Token>, ParseError> {
        let chars: Vec<char> = s.chars().collect();
        let mut t = Tokenizer {
            len: chars.len(),
            chars,
            start: 0,
            idx: 0,
            line: 1,
            tokens: Vec::with_capacity(s.len() / 4),
        };
        t.parse()?;
        Ok(t.tokens)
    }

    fn eof(&self) -> bool {
        self.idx >= self.len
    }

    fn peek(&self) -> char {
        self.chars.get(self.idx).copied().unwrap_or('\0')
    }

    fn lookahead(&self, n: usize) -> char {
        self.chars.get(self.idx + n).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.idx];
        self.idx += 1;
        c
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.eof() || self.chars[self.idx] != expected {
            return false;
        }
        self.idx += 1;
        true
    }

    fn push(&mut self, kind: TokenKind) {
        let lexeme: String = self.chars[self.start..self.idx].iter().collect();
        self.tokens.push(Token {
            kind,
            lexeme,
            line: self.line,
        });
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(msg, self.line)
    }

    fn parse(&mut self) -> Result<(), ParseError> {
        while !self.eof() {
            self.start = self.idx;
            let c = self.advance();
            match c {
                '\n' => self.line += 1,
                ' ' | '\t' | '\r' => {}
                '#' => {
                    while !self.eof() && self.peek() != '\n' {
                        self.idx += 1;
                    }
                }
                '(' => self.push(TokenKind::LParen),
                ')' => self.push(TokenKind::RParen),
                '{' => self.push(TokenKind::LCurly),
                '}' => self.push(TokenKind::RCurly),
                '[' => self.push(TokenKind::LSquare),
                ']' => self.push(TokenKind::RSquare),
                '.' => self.push(TokenKind::Dot),
                ',' => self.push(TokenKind::Comma),
                '+' => self.push(TokenKind::Plus),
                '-' => self.push(TokenKind::Minus),
                '*' => self.push(TokenKind::Star),
                '^' => self.push(TokenKind::Caret),
                '/' => self.push(TokenKind::Slash),
                ';' => self.push(TokenKind::Semicolon),
                '?' => self.push(TokenKind::Question),
                '%' => self.push(TokenKind::Mod),
                '=' => {
                    if self.matches('=') {
                        self.push(TokenKind::Eq);
                    } else {
                        return Err(self.err("Unexpected character '=' (use ':=' to assign or '==' to compare)"));
                    }
                }
                '~' => {
                    let kind = if self.matches('=') { TokenKind::Ne } else { TokenKind::Not };
                    self.push(kind);
                }
                '<' => {
                    let kind = if self.matches('=') { TokenKind::Le } else { TokenKind::Lt };
                    self.push(kind);
                }
                '>' => {
                    let kind = if self.matches('=') { TokenKind::Ge } else { TokenKind::Gt };
                    self.push(kind);
                }
                ':' => {
                    let kind = if self.matches('=') {
                        TokenKind::Assign
                    } else {
                        TokenKind::Colon
                    };
                    self.push(kind);
                }
                '\'' | '"' => self.parse_str(c)?,
                c if c.is_ascii_digit() => self.parse_number(),
                c if c.is_ascii_alphabetic() || c == '_' => self.parse_identifier(),
                other => return Err(self.err(format!("Unexpected character '{other}'"))),
            }
        }
        Ok(())
    }

    /// Scan to the matching quote. A backslash skips the following character
    /// so escaped quotes stay inside the literal; the escape itself is decoded
    /// when the value is printed.
    fn parse_str(&mut self, quote: char) -> Result<(), ParseError> {
        let start_line = self.line;
        while !self.eof() && self.peek() != quote {
            match self.advance() {
                '\n' => self.line += 1,
                '\\' if !self.eof() => {
                    if self.advance() == '\n' {
                        self.line += 1;
                    }
                }
                _ => {}
            }
        }
        if self.eof() {
            return Err(ParseError::new("Unterminated string", start_line));
        }
        self.advance();
        let lexeme: String = self.chars[self.start..self.idx].iter().collect();
        self.tokens.push(Token {
            kind: TokenKind::Str,
            lexeme,
            line: start_line,
        });
        Ok(())
    }

    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.idx += 1;
        }
        if self.peek() == '.' && self.lookahead(1).is_ascii_digit() {
            self.idx += 1;
            while self.peek().is_ascii_digit() {
                self.idx += 1;
            }
            self.push(TokenKind::Float);
        } else {
            self.push(TokenKind::Integer);
        }
    }

    fn parse_identifier(&mut self) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.idx += 1;
        }
        let text: String = self.chars[self.start..self.idx].iter().collect();
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token {
            kind,
            lexeme: text,
            line: self.line,
        });
    }
}
