//! Lowering from the source AST to the flat IR.
//!
//! Variable declarations produce no IR here: they are absorbed into the
//! scope layer before lowering begins. Everything else either maps onto a
//! flat statement or is rejected.

use crate::ir::{FlatBinOp, FlatExpr, FlatProgram, FlatProgramBuilder, FlatStmt};
use thiserror::Error;
use weft_syntax::{BinOp, Expr, ExprKind, Span, Stmt, StmtKind};

/// The designated assertion primitive.
const ASSERT_FN: &str = "assert";

/// Lowering error.
#[derive(Debug, Error)]
pub enum LowerError {
    #[error("unsupported construct at {span}: {construct}")]
    UnsupportedConstruct { construct: String, span: Span },
}

pub type LowerResult<T> = Result<T, LowerError>;

/// Lower a function body into a flat program.
pub fn lower_statements(stmts: &[Stmt]) -> LowerResult<FlatProgram> {
    let mut builder = FlatProgramBuilder::new();
    for stmt in stmts {
        lower_stmt(stmt, &mut builder)?;
    }
    Ok(builder.finish())
}

fn lower_stmt(stmt: &Stmt, builder: &mut FlatProgramBuilder) -> LowerResult<()> {
    match &stmt.kind {
        // Already absorbed into the scope layer.
        StmtKind::Let(_) => Ok(()),

        StmtKind::Pause => {
            builder.cut_block();
            Ok(())
        }

        StmtKind::Assign { target, value } => {
            builder.append(FlatStmt::Assign {
                lhs: FlatExpr::ident(target.name.clone()),
                rhs: lower_expr(value)?,
            });
            Ok(())
        }

        StmtKind::Expr(expr) => match &expr.kind {
            ExprKind::Call { name, args } if name.name == ASSERT_FN => {
                if args.len() != 1 {
                    return Err(LowerError::UnsupportedConstruct {
                        construct: format!(
                            "{} takes exactly one argument, found {}",
                            ASSERT_FN,
                            args.len()
                        ),
                        span: expr.span,
                    });
                }
                builder.append(FlatStmt::Assert(lower_expr(&args[0])?));
                Ok(())
            }
            ExprKind::Call { name, .. } => Err(LowerError::UnsupportedConstruct {
                construct: format!("call to unrecognized function `{}`", name.name),
                span: expr.span,
            }),
            _ => Err(LowerError::UnsupportedConstruct {
                construct: "expression statement with no effect".to_string(),
                span: stmt.span,
            }),
        },
    }
}

fn lower_expr(expr: &Expr) -> LowerResult<FlatExpr> {
    match &expr.kind {
        ExprKind::Int(n) => Ok(FlatExpr::Int(*n)),
        ExprKind::Ident(name) => Ok(FlatExpr::ident(name.clone())),
        ExprKind::Binary { op, lhs, rhs } => {
            let op = match op {
                BinOp::Plus => FlatBinOp::Plus,
                BinOp::Eq => FlatBinOp::Eq,
            };
            Ok(FlatExpr::binary(op, lower_expr(lhs)?, lower_expr(rhs)?))
        }
        ExprKind::Call { name, .. } => Err(LowerError::UnsupportedConstruct {
            construct: format!("call to `{}` in expression position", name.name),
            span: expr.span,
        }),
    }
}
