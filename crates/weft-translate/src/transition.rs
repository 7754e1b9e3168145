//! Transition and frame-condition generation.
//!
//! Turns one function's flat program into the disjuncts of its step
//! relation plus its guarded assertion implications. This is where the
//! relation is made exact: every variable a chunk does not touch gets an
//! explicit unchanged clause, and a final stutter disjunct keeps the
//! relation total after termination.

use crate::error::{TranslateError, TranslateResult};
use crate::scope::Scope;
use weft_alloy::builder::{access, and, call, eq, ident, implies, int, prime, update};
use weft_alloy::{rewrite, AlloyExpr};
use weft_flat::{FlatBinOp, FlatExpr, FlatProgram, FlatStmt, END_LABEL};

/// The transitions and checks generated from one flat program.
#[derive(Debug, Clone)]
pub struct TransitionSet {
    /// Step-relation disjuncts, one per chunk plus the trailing stutter.
    pub transitions: Vec<AlloyExpr>,
    /// Guarded assertion implications, kept apart from the transitions.
    pub checks: Vec<AlloyExpr>,
}

/// Translate a flat program against its scope.
///
/// `pc` names the program-counter field of the scope's container.
pub fn flat_to_transitions(
    pc: &str,
    program: &FlatProgram,
    scope: &Scope<'_>,
) -> TranslateResult<TransitionSet> {
    let mut transitions = Vec::new();
    let mut checks = Vec::new();

    let chunks: Vec<(&String, &Vec<FlatStmt>)> = program.chunks.iter().collect();
    for (i, (label, chunk)) in chunks.iter().enumerate() {
        let sequential = chunks
            .get(i + 1)
            .map(|(next, _)| next.as_str())
            .unwrap_or(END_LABEL);

        let translated = translate_chunk(chunk.as_slice(), scope)?;
        let next_label = translated.jump.as_deref().unwrap_or(sequential);

        let guard = eq(access(scope.state_expr().clone(), pc), ident(label.as_str()));

        let mut clauses = vec![guard.clone()];
        clauses.extend(translated.effects.iter().cloned());
        clauses.extend(frame(scope, &translated.effects));
        clauses.push(update(
            ident(pc),
            scope.state_expr().clone(),
            ident(next_label),
        ));
        transitions.push(and(clauses)?);

        if let Some(check) = translated.check {
            checks.push(implies(guard, check));
        }
    }

    // Stutter closure: a terminated instance must still have a successor
    // state, or every always-formula over the composed relation would be
    // vacuously violated.
    let mut stutter = vec![eq(prime(ident(pc)), ident(pc))];
    stutter.extend(frame(scope, &[]));
    transitions.push(and(stutter)?);

    Ok(TransitionSet {
        transitions,
        checks,
    })
}

/// Unchanged clauses for every visible variable not occurring in `effects`.
///
/// Occurrence is decided by structural tree equality, so two identical
/// identifier nodes from different sources compare equal. First match
/// removes one entry; duplicates introduced by shadowed names survive.
pub fn frame(scope: &Scope<'_>, effects: &[AlloyExpr]) -> Vec<AlloyExpr> {
    let mut unused = scope.all_visible();

    for effect in effects {
        rewrite(effect, &mut |e| {
            if let Some(i) = unused.iter().position(|candidate| *candidate == e) {
                unused.remove(i);
            }
            e
        });
    }

    unused
        .into_iter()
        .map(|v| eq(prime(v.clone()), v))
        .collect()
}

/// The translated content of a single chunk.
struct ChunkTranslation {
    effects: Vec<AlloyExpr>,
    check: Option<AlloyExpr>,
    jump: Option<String>,
}

fn translate_chunk(chunk: &[FlatStmt], scope: &Scope<'_>) -> TranslateResult<ChunkTranslation> {
    let [stmt] = chunk else {
        return Err(TranslateError::UnsupportedConstruct {
            construct: format!(
                "chunk with {} statements (each chunk must hold exactly one)",
                chunk.len()
            ),
        });
    };

    match stmt {
        FlatStmt::Assign { lhs, rhs } => {
            let FlatExpr::Ident(target) = lhs else {
                return Err(TranslateError::UnsupportedConstruct {
                    construct: "assignment to a non-identifier target".to_string(),
                });
            };
            let owner = scope.resolve(target)?;
            let effect = update(
                flat_expr(lhs),
                owner.state_expr().clone(),
                scope.qualify(&flat_expr(rhs))?,
            );
            Ok(ChunkTranslation {
                effects: vec![effect],
                check: None,
                jump: None,
            })
        }

        FlatStmt::Assert(cond) => Ok(ChunkTranslation {
            effects: Vec::new(),
            check: Some(scope.qualify(&flat_expr(cond))?),
            jump: None,
        }),

        FlatStmt::Goto(label) => Ok(ChunkTranslation {
            effects: Vec::new(),
            check: None,
            jump: Some(label.clone()),
        }),
    }
}

/// Translate a flat expression into an (unqualified) target expression.
fn flat_expr(expr: &FlatExpr) -> AlloyExpr {
    match expr {
        FlatExpr::Ident(id) => ident(id.clone()),
        FlatExpr::Int(n) => int(*n),
        FlatExpr::Binary { op, lhs, rhs } => match op {
            FlatBinOp::Plus => call("plus", vec![flat_expr(lhs), flat_expr(rhs)]),
            FlatBinOp::Eq => eq(flat_expr(lhs), flat_expr(rhs)),
        },
    }
}
