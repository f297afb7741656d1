use crate::ast::{BinaryOp, Expr, LogicalOp, Program, Stmt, UnaryOp};
use crate::error::{PloxError, Span};
use crate::stack::ensure_sufficient_stack;
use crate::token::{Token, TokenType};
use crate::value::Value;

type ParseResult<T> = Result<T, PloxError>;

/// Deepest nesting of statements and expressions the parser accepts.
pub const MAX_NESTING: usize = 200;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<PloxError>,
    depth: usize,
    /// Set once nesting overflowed; the rest of the stream is skipped.
    abandoned: bool,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.token_type) != Some(TokenType::Eof) {
            let (line, end) = tokens
                .last()
                .map(|t| (t.line, t.span.end))
                .unwrap_or((1, 0));
            tokens.push(Token::new(TokenType::Eof, String::new(), line, Span::single(end)));
        }

        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            depth: 0,
            abandoned: false,
        }
    }

    /// Parses every declaration in the stream. A failed declaration is
    /// recorded and skipped, so one call reports all independent errors.
    pub fn parse(&mut self) -> Result<Program, Vec<PloxError>> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        tracing::debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );

        if self.errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }

    fn declaration(&mut self) -> Option<Stmt> {
        let start = self.current;
        let result = if self.match_types(&[TokenType::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(_) if self.abandoned => None,
            Err(error) => {
                self.errors.push(error);
                self.synchronize(start);
                None
            }
        }
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self
            .consume(TokenType::Identifier, "Expect variable name.")?
            .clone();

        let initializer = if self.match_types(&[TokenType::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume_with_help(
            TokenType::Semicolon,
            "Expect ';' after variable declaration.",
            "Declarations end with ';': var name = value;",
        )?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        self.nested(Self::any_statement)
    }

    fn any_statement(&mut self) -> ParseResult<Stmt> {
        if self.match_types(&[TokenType::For]) {
            self.for_statement()
        } else if self.match_types(&[TokenType::If]) {
            self.if_statement()
        } else if self.match_types(&[TokenType::Print]) {
            self.print_statement()
        } else if self.match_types(&[TokenType::While]) {
            self.while_statement()
        } else if self.match_types(&[TokenType::LeftBrace]) {
            Ok(Stmt::Block {
                statements: self.block()?,
            })
        } else {
            self.expression_statement()
        }
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenType::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume_with_help(
            TokenType::RightBrace,
            "Expect '}' after block.",
            "Block statements must be closed with '}' after the opening '{'.",
        )?;
        Ok(statements)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume_with_help(
            TokenType::LeftParen,
            "Expect '(' after 'if'.",
            "If statements require parentheses around the condition: if (condition) ...",
        )?;
        let condition = self.expression()?;
        self.consume_with_help(
            TokenType::RightParen,
            "Expect ')' after if condition.",
            "If conditions must be enclosed in parentheses: if (condition) ...",
        )?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_types(&[TokenType::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { keyword, expr })
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(TokenType::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenType::RightParen, "Expect ')' after while condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    /// `for (init; cond; incr) body` becomes
    /// `{ init; while (cond) { body; incr; } }`.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        self.consume(TokenType::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_types(&[TokenType::Semicolon]) {
            None
        } else if self.match_types(&[TokenType::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(TokenType::Semicolon) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(TokenType::RightParen) {
            Some(self.expression()?)
        } else {
            None
        };
        self.consume(TokenType::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block {
                statements: vec![body, Stmt::Expression { expr: increment }],
            };
        }

        let condition = condition.unwrap_or_else(|| Expr::Literal {
            value: Value::Bool(true),
        });
        tracing::trace!(line = keyword.line, "desugared for loop");
        body = Stmt::While {
            condition,
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block {
                statements: vec![initializer, body],
            };
        }

        Ok(body)
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression { expr })
    }

    fn expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.match_types(&[TokenType::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            if let Expr::Variable { name } = expr {
                return Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                });
            }

            // Reported without unwinding: the statement still parses.
            self.errors.push(PloxError::parse_error_with_help(
                &equals,
                "Bad assignment target.",
                "Only variables can be assigned to. Example: 'x = 10'",
            ));
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.match_types(&[TokenType::Or]) {
            let token = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator: LogicalOp::Or,
                token,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.match_types(&[TokenType::And]) {
            let token = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical {
                left: Box::new(expr),
                operator: LogicalOp::And,
                token,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while self.match_types(&[TokenType::BangEqual, TokenType::EqualEqual]) {
            let token = self.previous().clone();
            let operator = match token.token_type {
                TokenType::BangEqual => BinaryOp::NotEqual,
                TokenType::EqualEqual => BinaryOp::Equal,
                _ => unreachable!(),
            };
            let right = self.comparison()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                token,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while self.match_types(&[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ]) {
            let token = self.previous().clone();
            let operator = match token.token_type {
                TokenType::Greater => BinaryOp::Greater,
                TokenType::GreaterEqual => BinaryOp::GreaterEqual,
                TokenType::Less => BinaryOp::Less,
                TokenType::LessEqual => BinaryOp::LessEqual,
                _ => unreachable!(),
            };
            let right = self.term()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                token,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while self.match_types(&[TokenType::Minus, TokenType::Plus]) {
            let token = self.previous().clone();
            let operator = match token.token_type {
                TokenType::Minus => BinaryOp::Subtract,
                TokenType::Plus => BinaryOp::Add,
                _ => unreachable!(),
            };
            let right = self.factor()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                token,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while self.match_types(&[TokenType::Slash, TokenType::Star]) {
            let token = self.previous().clone();
            let operator = match token.token_type {
                TokenType::Slash => BinaryOp::Divide,
                TokenType::Star => BinaryOp::Multiply,
                _ => unreachable!(),
            };
            let right = self.unary()?;
            expr = Expr::Binary {
                left: Box::new(expr),
                operator,
                token,
                right: Box::new(right),
            };
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_types(&[TokenType::Bang, TokenType::Minus]) {
            let token = self.previous().clone();
            let operator = match token.token_type {
                TokenType::Bang => UnaryOp::Not,
                TokenType::Minus => UnaryOp::Negate,
                _ => unreachable!(),
            };
            let operand = self.nested(Self::unary)?;
            return Ok(Expr::Unary {
                operator,
                token,
                operand: Box::new(operand),
            });
        }

        self.primary()
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.match_types(&[TokenType::False]) {
            return Ok(Expr::Literal {
                value: Value::Bool(false),
            });
        }
        if self.match_types(&[TokenType::True]) {
            return Ok(Expr::Literal {
                value: Value::Bool(true),
            });
        }
        if self.match_types(&[TokenType::Nil]) {
            return Ok(Expr::Literal { value: Value::Nil });
        }

        if self.match_types(&[TokenType::Number, TokenType::String]) {
            let token = self.previous();
            return match &token.literal {
                Some(literal) => Ok(Expr::Literal {
                    value: Value::from(literal.clone()),
                }),
                None => Err(PloxError::parse_error(token, "Literal token without a value.")),
            };
        }

        if self.match_types(&[TokenType::Identifier]) {
            return Ok(Expr::Variable {
                name: self.previous().clone(),
            });
        }

        if self.match_types(&[TokenType::LeftParen]) {
            let expr = self.expression()?;
            self.consume_with_help(
                TokenType::RightParen,
                "Expect ')' after expression.",
                "Every opening parenthesis '(' must have a matching closing parenthesis ')'.",
            )?;
            return Ok(Expr::Grouping {
                expr: Box::new(expr),
            });
        }

        let token = self.peek();
        let help = match token.token_type {
            TokenType::RightParen => "Found ')' without matching '('. Check for unbalanced parentheses.",
            TokenType::RightBrace => "Found '}' without matching '{'. Check for unbalanced braces.",
            TokenType::Eof => "Reached end of input while expecting an expression.",
            _ => "Expected a literal value, variable, or parenthesized expression here.",
        };
        Err(PloxError::parse_error_with_help(token, "Expect expression.", help))
    }

    /// Discards tokens until just past a `;` or just before a keyword that
    /// starts a statement. Always consumes at least one token when the failed
    /// declaration consumed none.
    /// Runs one level of recursive descent, refusing to go past
    /// [`MAX_NESTING`]. Overflowing reports a single error and abandons the
    /// rest of the token stream, since every enclosing construct is unfinished.
    fn nested<T>(&mut self, parse: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            let error = PloxError::parse_error_with_help(
                self.peek(),
                "Too much nesting.",
                format!("Statements and expressions nest at most {} levels deep.", MAX_NESTING),
            );
            self.errors.push(error.clone());
            self.abandoned = true;
            self.current = self.tokens.len() - 1;
            return Err(error);
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| parse(self));
        self.depth -= 1;
        result
    }

    fn synchronize(&mut self, start: usize) {
        if self.current == start {
            self.advance();
        }

        while !self.is_at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                return;
            }
            if self.peek().token_type.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(*token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            self.peek().token_type == token_type
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> ParseResult<&Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(PloxError::parse_error(self.peek(), message))
        }
    }

    fn consume_with_help(
        &mut self,
        token_type: TokenType,
        message: &str,
        help: &str,
    ) -> ParseResult<&Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(PloxError::parse_error_with_help(self.peek(), message, help))
        }
    }
}
