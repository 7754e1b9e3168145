//! Generic bottom-up rewriting over Alloy expressions.

use crate::ast::AlloyExpr;

/// Rebuild an expression tree bottom-up through a per-node transform.
///
/// Children are rewritten first; the transform then sees each node with its
/// children already replaced. Passing an identity transform with side
/// effects turns this into a structural scan, which is how frame-condition
/// bookkeeping walks effect clauses.
pub fn rewrite<F>(expr: &AlloyExpr, f: &mut F) -> AlloyExpr
where
    F: FnMut(AlloyExpr) -> AlloyExpr,
{
    let rebuilt = match expr {
        AlloyExpr::Ident(_) | AlloyExpr::Int(_) => expr.clone(),
        AlloyExpr::Access { base, field } => AlloyExpr::Access {
            base: Box::new(rewrite(base, f)),
            field: field.clone(),
        },
        AlloyExpr::Call { pred, args } => AlloyExpr::Call {
            pred: pred.clone(),
            args: args.iter().map(|a| rewrite(a, f)).collect(),
        },
        AlloyExpr::And(clauses) => {
            AlloyExpr::And(clauses.iter().map(|c| rewrite(c, f)).collect())
        }
        AlloyExpr::Or(clauses) => {
            AlloyExpr::Or(clauses.iter().map(|c| rewrite(c, f)).collect())
        }
        AlloyExpr::Prime(inner) => AlloyExpr::Prime(Box::new(rewrite(inner, f))),
        AlloyExpr::Binary { op, lhs, rhs } => AlloyExpr::Binary {
            op: *op,
            lhs: Box::new(rewrite(lhs, f)),
            rhs: Box::new(rewrite(rhs, f)),
        },
        AlloyExpr::Quant {
            kind,
            var,
            set,
            body,
        } => AlloyExpr::Quant {
            kind: *kind,
            var: var.clone(),
            set: set.clone(),
            body: Box::new(rewrite(body, f)),
        },
        AlloyExpr::Temporal { kind, body } => AlloyExpr::Temporal {
            kind: *kind,
            body: Box::new(rewrite(body, f)),
        },
    };
    f(rebuilt)
}

/// Prime every identifier leaf of an expression.
///
/// Lifts an expression built at the container level into a next-state
/// context.
pub fn prime_idents(expr: &AlloyExpr) -> AlloyExpr {
    rewrite(expr, &mut |e| match e {
        AlloyExpr::Ident(_) => AlloyExpr::Prime(Box::new(e)),
        other => other,
    })
}
