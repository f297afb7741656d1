use crate::error::{PloxError, Span};
use crate::token::{Literal, Token, TokenType};

/// Tokens produced from one batch of source, plus every scan error hit along the way.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<PloxError>,
}

impl ScanOutput {
    pub fn into_result(self) -> Result<Vec<Token>, Vec<PloxError>> {
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

pub struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,
    errors: Vec<PloxError>,
    start: usize,
    current: usize,
    line: usize,
}

impl Scanner {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the whole source. Errors do not stop the scan; the token stream
    /// always ends with a single `Eof`.
    pub fn scan_tokens(mut self) -> ScanOutput {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        // A trailing newline ends the last line rather than opening a new one.
        let eof_line = if self.source.last() == Some(&'\n') {
            self.line - 1
        } else {
            self.line
        };
        self.tokens.push(Token::new(
            TokenType::Eof,
            String::new(),
            eof_line,
            Span::single(self.current),
        ));

        tracing::debug!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "scanned source"
        );

        ScanOutput {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '!' => {
                let token_type = if self.match_char('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.add_token(token_type);
            }
            '=' => {
                let token_type = if self.match_char('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(token_type);
            }
            '<' => {
                let token_type = if self.match_char('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(token_type);
            }
            '>' => {
                let token_type = if self.match_char('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(token_type);
            }
            '/' => {
                if self.match_char('/') {
                    // Comment goes until end of line
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_alphabetic() || c == '_' => self.identifier(),
            _ => {
                self.errors.push(PloxError::scan_error(
                    self.line,
                    Span::new(self.start, self.current),
                    format!("Invalid character '{}'.", c),
                ));
            }
        }
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.source.get(self.current + 1).copied().unwrap_or('\0')
    }

    fn string(&mut self) {
        let start_line = self.line;

        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.errors.push(PloxError::scan_error(
                start_line,
                Span::new(self.start, self.current),
                "Unterminated string.",
            ));
            return;
        }

        // The closing quote.
        self.advance();

        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.push_token(TokenType::String, Some(Literal::String(value)), start_line);
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // A '.' only belongs to the number when a digit follows it.
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();

            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = self.lexeme();
        match text.parse::<f64>() {
            Ok(value) => self.push_token(TokenType::Number, Some(Literal::Number(value)), self.line),
            Err(_) => self.errors.push(PloxError::scan_error(
                self.line,
                Span::new(self.start, self.current),
                format!("Invalid number '{}'.", text),
            )),
        }
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let token_type = TokenType::keyword(&self.lexeme()).unwrap_or(TokenType::Identifier);
        self.add_token(token_type);
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.push_token(token_type, None, self.line);
    }

    fn push_token(&mut self, token_type: TokenType, literal: Option<Literal>, line: usize) {
        let mut token = Token::new(
            token_type,
            self.lexeme(),
            line,
            Span::new(self.start, self.current),
        );
        token.literal = literal;
        self.tokens.push(token);
    }
}
