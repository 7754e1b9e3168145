//! Recursive descent parser for the weft source language.

use crate::ast::*;
use crate::lexer::Lexer;
use crate::token::{Span, Token, TokenKind};
use thiserror::Error;

/// Parser error.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unexpected token at {span}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("unexpected end of file at {span}")]
    UnexpectedEof { span: Span },
    #[error("invalid syntax at {span}: {message}")]
    InvalidSyntax { message: String, span: Span },
}

impl ParseError {
    /// Get the source span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } => *span,
            ParseError::UnexpectedEof { span } => *span,
            ParseError::InvalidSyntax { span, .. } => *span,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a complete program from source text.
pub fn parse(source: &str) -> ParseResult<Program> {
    Parser::new(source).parse_program()
}

/// Parser for weft source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Create a new parser from source text.
    pub fn new(source: &str) -> Self {
        let tokens: Vec<_> = Lexer::new(source)
            .tokenize()
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        Self { tokens, pos: 0 }
    }

    /// Parse a complete program.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let start = self.current_span();

        let mut items = Vec::new();
        while !self.is_at_end() {
            items.push(self.parse_item()?);
        }

        let span = start.merge(self.prev_span());
        Ok(Program { items, span })
    }

    fn parse_item(&mut self) -> ParseResult<Item> {
        match self.peek_kind() {
            TokenKind::Fn => self.parse_fn_decl().map(Item::Fn),
            TokenKind::Let => self.parse_var_decl().map(Item::Let),
            TokenKind::Error(c) => Err(ParseError::InvalidSyntax {
                message: format!("unrecognized character '{}'", c),
                span: self.current_span(),
            }),
            other => Err(ParseError::UnexpectedToken {
                expected: "`fn` or `let`".to_string(),
                found: other.to_string(),
                span: self.current_span(),
            }),
        }
    }

    fn parse_fn_decl(&mut self) -> ParseResult<FnDecl> {
        let start = self.current_span();
        self.expect(TokenKind::Fn)?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;

        let mut body = Vec::new();
        while self.peek_kind() != &TokenKind::RBrace {
            if self.is_at_end() {
                return Err(ParseError::UnexpectedEof {
                    span: self.current_span(),
                });
            }
            body.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;

        let span = start.merge(self.prev_span());
        Ok(FnDecl { name, body, span })
    }

    fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let start = self.current_span();
        self.expect(TokenKind::Let)?;
        let name = self.parse_ident()?;
        self.expect(TokenKind::Assign)?;
        let init = self.parse_expr()?;
        self.expect(TokenKind::Semi)?;

        let span = start.merge(self.prev_span());
        Ok(VarDecl { name, init, span })
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let start = self.current_span();
        match self.peek_kind() {
            TokenKind::Let => {
                let decl = self.parse_var_decl()?;
                let span = decl.span;
                Ok(Stmt {
                    kind: StmtKind::Let(decl),
                    span,
                })
            }
            TokenKind::Pause => {
                self.advance();
                self.expect(TokenKind::Semi)?;
                let span = start.merge(self.prev_span());
                Ok(Stmt {
                    kind: StmtKind::Pause,
                    span,
                })
            }
            TokenKind::Ident(_) if self.peek_ahead_kind(1) == Some(&TokenKind::Assign) => {
                let target = self.parse_ident()?;
                self.expect(TokenKind::Assign)?;
                let value = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                let span = start.merge(self.prev_span());
                Ok(Stmt {
                    kind: StmtKind::Assign { target, value },
                    span,
                })
            }
            TokenKind::Ident(_) | TokenKind::Integer(_) | TokenKind::LParen => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Semi)?;
                let span = start.merge(self.prev_span());
                Ok(Stmt {
                    kind: StmtKind::Expr(expr),
                    span,
                })
            }
            TokenKind::Error(c) => Err(ParseError::InvalidSyntax {
                message: format!("unrecognized character '{}'", c),
                span: self.current_span(),
            }),
            other => Err(ParseError::UnexpectedToken {
                expected: "statement".to_string(),
                found: other.to_string(),
                span: self.current_span(),
            }),
        }
    }

    /// Parse an expression. Equality is non-associative and binds loosest.
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let lhs = self.parse_sum()?;
        if self.peek_kind() == &TokenKind::EqEq {
            self.advance();
            let rhs = self.parse_sum()?;
            let span = lhs.span.merge(rhs.span);
            return Ok(Expr::new(
                ExprKind::Binary {
                    op: BinOp::Eq,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            ));
        }
        Ok(lhs)
    }

    fn parse_sum(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.parse_primary()?;
        while self.peek_kind() == &TokenKind::Plus {
            self.advance();
            let rhs = self.parse_primary()?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr::new(
                ExprKind::Binary {
                    op: BinOp::Plus,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            );
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        match self.peek_kind().clone() {
            TokenKind::Integer(n) => {
                let span = self.current_span();
                self.advance();
                Ok(Expr::new(ExprKind::Int(n), span))
            }
            TokenKind::Ident(_) => {
                let ident = self.parse_ident()?;
                if self.peek_kind() == &TokenKind::LParen {
                    self.parse_call(ident)
                } else {
                    let span = ident.span;
                    Ok(Expr::new(ExprKind::Ident(ident.name), span))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Error(c) => Err(ParseError::InvalidSyntax {
                message: format!("unrecognized character '{}'", c),
                span: self.current_span(),
            }),
            TokenKind::Eof => Err(ParseError::UnexpectedEof {
                span: self.current_span(),
            }),
            other => Err(ParseError::UnexpectedToken {
                expected: "expression".to_string(),
                found: other.to_string(),
                span: self.current_span(),
            }),
        }
    }

    fn parse_call(&mut self, name: Ident) -> ParseResult<Expr> {
        let start = name.span;
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.peek_kind() != &TokenKind::RParen {
            loop {
                args.push(self.parse_expr()?);
                if self.peek_kind() == &TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let span = start.merge(self.prev_span());
        Ok(Expr::new(ExprKind::Call { name, args }, span))
    }

    fn parse_ident(&mut self) -> ParseResult<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => {
                let span = self.current_span();
                self.advance();
                Ok(Ident::new(name, span))
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "identifier".to_string(),
                found: other.to_string(),
                span: self.current_span(),
            }),
        }
    }

    // === Token stream helpers ===

    fn peek_kind(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    fn peek_ahead_kind(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + n).map(|t| &t.kind)
    }

    fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|t| t.span)
            .unwrap_or_else(Span::dummy)
    }

    fn prev_span(&self) -> Span {
        if self.pos == 0 {
            return Span::dummy();
        }
        self.tokens
            .get(self.pos - 1)
            .map(|t| t.span)
            .unwrap_or_else(Span::dummy)
    }

    fn is_at_end(&self) -> bool {
        self.peek_kind() == &TokenKind::Eof
    }

    fn advance(&mut self) -> &Token {
        let token = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek_kind() == &kind {
            self.advance();
            Ok(())
        } else if self.is_at_end() {
            Err(ParseError::UnexpectedEof {
                span: self.current_span(),
            })
        } else {
            Err(ParseError::UnexpectedToken {
                expected: format!("`{}`", kind),
                found: self.peek_kind().to_string(),
                span: self.current_span(),
            })
        }
    }
}
