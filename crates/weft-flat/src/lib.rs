//! Flat intermediate representation for weft.
//!
//! A source function body is lowered into a `FlatProgram`: labeled chunks of
//! straight-line statements whose boundaries are the suspension points. The
//! translation to the relational model consumes this IR, never the source
//! AST directly.

pub mod ir;
pub mod lower;

pub use ir::{FlatBinOp, FlatExpr, FlatProgram, FlatProgramBuilder, FlatStmt, END_LABEL};
pub use lower::{lower_statements, LowerError, LowerResult};
