//! Lexer for the weft source language.

use crate::token::{Span, Token, TokenKind};
use std::str::Chars;

/// Lexer over weft source text.
pub struct Lexer<'a> {
    /// Source text being lexed.
    source: &'a str,
    /// Character iterator.
    chars: Chars<'a>,
    /// Current byte position.
    pos: usize,
    /// Current line number (1-indexed).
    line: u32,
    /// Current column number (1-indexed).
    column: u32,
    /// Start position of the current token.
    token_start: usize,
    /// Start line of the current token.
    token_line: u32,
    /// Start column of the current token.
    token_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars(),
            pos: 0,
            line: 1,
            column: 1,
            token_start: 0,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Tokenize the entire source, including the trailing EOF token.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.mark_token_start();

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        if c == '/' && self.peek_next() == Some('/') {
            return self.lex_comment();
        }

        if c.is_ascii_digit() {
            return self.lex_number();
        }

        if c.is_alphabetic() || c == '_' {
            return self.lex_identifier();
        }

        self.lex_operator()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn mark_token_start(&mut self) {
        self.token_start = self.pos;
        self.token_line = self.line;
        self.token_column = self.column;
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(
            kind,
            Span::new(
                self.token_start,
                self.pos,
                self.token_line,
                self.token_column,
            ),
        )
    }

    fn token_text(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    fn lex_comment(&mut self) -> Token {
        // Skip //
        self.advance();
        self.advance();

        let content_start = self.pos;
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }

        let content = self.source[content_start..self.pos].to_string();
        self.make_token(TokenKind::Comment(content))
    }

    fn lex_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        match self.token_text().parse::<i64>() {
            Ok(n) => self.make_token(TokenKind::Integer(n)),
            // Out-of-range literal; surface the first digit as an error token.
            Err(_) => {
                let c = self.token_text().chars().next().unwrap_or('0');
                self.make_token(TokenKind::Error(c))
            }
        }
    }

    fn lex_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let kind = match self.token_text() {
            "fn" => TokenKind::Fn,
            "let" => TokenKind::Let,
            "pause" => TokenKind::Pause,
            text => TokenKind::Ident(text.to_string()),
        };
        self.make_token(kind)
    }

    fn lex_operator(&mut self) -> Token {
        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };
        let kind = match c {
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::EqEq
                } else {
                    TokenKind::Assign
                }
            }
            '+' => TokenKind::Plus,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semi,
            other => TokenKind::Error(other),
        };
        self.make_token(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            kinds("fn incr let pause x"),
            vec![
                TokenKind::Fn,
                TokenKind::Ident("incr".to_string()),
                TokenKind::Let,
                TokenKind::Pause,
                TokenKind::Ident("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn distinguishes_assign_from_equality() {
        assert_eq!(
            kinds("x = y == 1"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Assign,
                TokenKind::Ident("y".to_string()),
                TokenKind::EqEq,
                TokenKind::Integer(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_trivia() {
        let tokens = kinds("x // trailing note\ny");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Comment("trailing note".to_string()),
                TokenKind::Ident("y".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = Lexer::new("fn f\nlet x").tokenize();
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 1);
    }

    #[test]
    fn unknown_character_is_an_error_token() {
        assert_eq!(
            kinds("x ? y")[1],
            TokenKind::Error('?'),
        );
    }
}
