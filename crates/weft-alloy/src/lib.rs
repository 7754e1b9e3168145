//! Alloy model AST, construction helpers, and concrete-syntax renderer.
//!
//! This crate provides:
//! - A tree model of the subset of Alloy 6 that weft emits (signatures,
//!   predicates, assertions, temporal expressions)
//! - Constructors that enforce structural invariants at build time
//! - A generic bottom-up expression rewriter
//! - A renderer producing well-formed Alloy source text

pub mod ast;
pub mod builder;
pub mod render;
pub mod visit;

pub use ast::*;
pub use builder::ModelError;
pub use render::render_model;
pub use visit::{prime_idents, rewrite};
