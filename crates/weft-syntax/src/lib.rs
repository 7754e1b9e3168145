//! Lexer, parser, and AST for the weft source language.
//!
//! The source language is a deliberately small imperative subset: function
//! declarations containing variable declarations, assignments, call
//! statements, and `pause` suspension markers. Semantic restrictions beyond
//! syntax (which calls are legal, which initializers are legal) are the
//! translation layers' concern.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::*;
pub use lexer::Lexer;
pub use parser::{parse, ParseError, ParseResult, Parser};
pub use token::{Span, Token, TokenKind};
