use linfrac_solver::Rational;
use thiserror::Error;

use crate::ast::*;
use crate::lexer::{Lexer, Span, Token, TokenKind};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token: expected {expected}, found {found} at position {}..{}", .span.start, .span.end)]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected end of file: expected {0}")]
    UnexpectedEof(String),
    #[error("Invalid number: {text}")]
    InvalidNumber { text: String, span: Span },
}

impl ParseError {
    /// Source range the error points at, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::UnexpectedToken { span, .. } | ParseError::InvalidNumber { span, .. } => Some(*span),
            ParseError::UnexpectedEof(_) => None,
        }
    }
}

/// Recursive-descent parser. Items and constraints end at a newline;
/// inside parentheses newlines are insignificant.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    paren_depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            paren_depth: 0,
        }
    }

    pub fn parse(source: &str) -> Result<Program, ParseError> {
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens);
        parser.parse_program()
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> TokenKind {
        self.current().map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn peek_kind_at(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn current_span(&self) -> Span {
        self.current()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::new(self.previous_end(), self.previous_end()))
    }

    fn previous_end(&self) -> usize {
        self.tokens
            .get(self.pos.saturating_sub(1))
            .map(|t| t.span.end)
            .unwrap_or(0)
    }

    /// Skips comments, and newlines while inside parentheses.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Comment => {}
                TokenKind::Newline if self.paren_depth > 0 => {}
                _ => break,
            }
            self.advance();
        }
    }

    fn skip_newlines_and_comments(&mut self) {
        while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Comment) {
            self.advance();
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.current() {
            Some(token) if token.kind != TokenKind::Eof => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: describe(token),
                span: token.span,
            },
            _ => ParseError::UnexpectedEof(expected.to_string()),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        self.skip_trivia();
        if self.peek_kind() == kind {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(expected))
    }

    /// A line ends at a newline, a closing brace or the end of input.
    fn end_of_line(&mut self) -> Result<(), ParseError> {
        self.skip_trivia();
        match self.peek_kind() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RBrace => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut items = Vec::new();

        loop {
            self.skip_newlines_and_comments();

            match self.peek_kind() {
                TokenKind::Eof => break,
                TokenKind::Vars => items.push(Item::Vars(self.parse_vars()?)),
                TokenKind::Maximize | TokenKind::Minimize => items.push(Item::Objective(self.parse_objective()?)),
                TokenKind::Subject => items.push(Item::Constraints(self.parse_constraint_block()?)),
                _ => return Err(self.unexpected("vars, maximize, minimize, or subject to")),
            }
        }

        Ok(Program { items })
    }

    fn parse_vars(&mut self) -> Result<VarDecl, ParseError> {
        let start = self.expect(TokenKind::Vars, "vars")?.span;

        let mut names = Vec::new();
        loop {
            let token = self.expect(TokenKind::Ident, "variable name")?;
            names.push(Ident {
                span: token.span,
                name: token.text,
            });
            self.skip_trivia();
            if self.peek_kind() != TokenKind::Comma {
                break;
            }
            self.advance();
        }

        let span = Span::new(start.start, self.previous_end());
        self.end_of_line()?;
        Ok(VarDecl { span, names })
    }

    fn parse_objective(&mut self) -> Result<Objective, ParseError> {
        let sense = match self.peek_kind() {
            TokenKind::Maximize => Sense::Maximize,
            TokenKind::Minimize => Sense::Minimize,
            _ => return Err(self.unexpected("maximize or minimize")),
        };
        let start = self.current_span();
        self.advance();

        let expr = self.parse_expr()?;
        let span = Span::new(start.start, self.previous_end());
        self.end_of_line()?;
        Ok(Objective { span, sense, expr })
    }

    fn parse_constraint_block(&mut self) -> Result<ConstraintBlock, ParseError> {
        let start = self.expect(TokenKind::Subject, "subject to")?.span;
        self.expect(TokenKind::To, "to")?;
        self.skip_newlines_and_comments();
        self.expect(TokenKind::LBrace, "{")?;

        let mut constraints = Vec::new();
        loop {
            self.skip_newlines_and_comments();
            match self.peek_kind() {
                TokenKind::RBrace => break,
                TokenKind::Eof => return Err(self.unexpected("}")),
                _ => {
                    constraints.push(self.parse_constraint()?);
                    self.end_of_line()?;
                }
            }
        }

        let end = self.expect(TokenKind::RBrace, "}")?.span;
        Ok(ConstraintBlock {
            span: start.merge(end),
            constraints,
        })
    }

    fn parse_constraint(&mut self) -> Result<ConstraintDecl, ParseError> {
        self.skip_trivia();
        let start = self.current_span();

        let name = if self.peek_kind() == TokenKind::Ident && self.peek_kind_at(1) == TokenKind::Colon {
            let name = self.advance().map(|t| t.text);
            self.advance();
            name
        } else {
            None
        };

        let lhs = self.parse_expr()?;
        self.expect(TokenKind::Equals, "=")?;
        let rhs = self.parse_expr()?;

        Ok(ConstraintDecl {
            span: Span::new(start.start, self.previous_end()),
            name,
            lhs,
            rhs,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;

        loop {
            self.skip_trivia();
            let op = match self.peek_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            self.skip_trivia();
            let op = match self.peek_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        self.skip_trivia();
        match self.peek_kind() {
            TokenKind::Minus => {
                self.advance();
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            TokenKind::Plus => {
                self.advance();
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        self.skip_trivia();

        match self.peek_kind() {
            TokenKind::Number => {
                let Some(token) = self.advance() else {
                    return Err(self.unexpected("number"));
                };
                let value: Rational = token.text.parse().map_err(|_| ParseError::InvalidNumber {
                    text: token.text.clone(),
                    span: token.span,
                })?;
                Ok(Expr::Number(value))
            }
            TokenKind::Ident => {
                let token = self.expect(TokenKind::Ident, "variable")?;
                Ok(Expr::Variable(Ident {
                    span: token.span,
                    name: token.text,
                }))
            }
            TokenKind::LParen => {
                self.advance();
                self.paren_depth += 1;
                let expr = self.parse_expr();
                let close = expr.and_then(|expr| {
                    self.expect(TokenKind::RParen, ")")?;
                    Ok(expr)
                });
                self.paren_depth -= 1;
                Ok(Expr::Paren(Box::new(close?)))
            }
            _ => Err(self.unexpected("number, variable, or (")),
        }
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Newline => "end of line".to_string(),
        TokenKind::Eof => "end of file".to_string(),
        _ => format!("'{}'", token.text),
    }
}
