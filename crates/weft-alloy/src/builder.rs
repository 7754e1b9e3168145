//! Construction helpers for the Alloy AST.
//!
//! Invariants that would otherwise surface as malformed output (empty
//! connectives, colliding declaration names) are enforced here, at build
//! time.

use crate::ast::{
    AlloyBinOp, AlloyExpr, Assertion, Model, Pred, QuantKind, Sig, TemporalKind,
};
use thiserror::Error;

/// Error raised while assembling a model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("cannot build an empty {connective}")]
    EmptyConnective { connective: &'static str },

    #[error("duplicate {kind} name in model merge: {name}")]
    DuplicateName { kind: &'static str, name: String },
}

pub type ModelResult<T> = Result<T, ModelError>;

pub fn ident(id: impl Into<String>) -> AlloyExpr {
    AlloyExpr::Ident(id.into())
}

pub fn int(value: i64) -> AlloyExpr {
    AlloyExpr::Int(value)
}

pub fn access(base: AlloyExpr, field: impl Into<String>) -> AlloyExpr {
    AlloyExpr::Access {
        base: Box::new(base),
        field: field.into(),
    }
}

/// Predicate call with arguments.
pub fn call(pred: impl Into<String>, args: Vec<AlloyExpr>) -> AlloyExpr {
    AlloyExpr::Call {
        pred: pred.into(),
        args,
    }
}

/// Zero-argument predicate call.
pub fn call0(pred: impl Into<String>) -> AlloyExpr {
    call(pred, Vec::new())
}

pub fn prime(inner: AlloyExpr) -> AlloyExpr {
    AlloyExpr::Prime(Box::new(inner))
}

pub fn binop(op: AlloyBinOp, lhs: AlloyExpr, rhs: AlloyExpr) -> AlloyExpr {
    AlloyExpr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

pub fn eq(lhs: AlloyExpr, rhs: AlloyExpr) -> AlloyExpr {
    binop(AlloyBinOp::Eq, lhs, rhs)
}

pub fn implies(lhs: AlloyExpr, rhs: AlloyExpr) -> AlloyExpr {
    binop(AlloyBinOp::Implies, lhs, rhs)
}

/// Conjunction. Rejects an empty clause list.
pub fn and(clauses: Vec<AlloyExpr>) -> ModelResult<AlloyExpr> {
    if clauses.is_empty() {
        return Err(ModelError::EmptyConnective { connective: "and" });
    }
    Ok(AlloyExpr::And(clauses))
}

/// Disjunction. Rejects an empty clause list.
pub fn or(clauses: Vec<AlloyExpr>) -> ModelResult<AlloyExpr> {
    if clauses.is_empty() {
        return Err(ModelError::EmptyConnective { connective: "or" });
    }
    Ok(AlloyExpr::Or(clauses))
}

pub fn quant(
    kind: QuantKind,
    var: impl Into<String>,
    set: impl Into<String>,
    body: AlloyExpr,
) -> AlloyExpr {
    AlloyExpr::Quant {
        kind,
        var: var.into(),
        set: set.into(),
        body: Box::new(body),
    }
}

pub fn always(body: AlloyExpr) -> AlloyExpr {
    AlloyExpr::Temporal {
        kind: TemporalKind::Always,
        body: Box::new(body),
    }
}

pub fn eventually(body: AlloyExpr) -> AlloyExpr {
    AlloyExpr::Temporal {
        kind: TemporalKind::Eventually,
        body: Box::new(body),
    }
}

/// The partial-update macro used by every assignment translation:
///
/// `mapping' = mapping ++ (key -> value)`
///
/// The enclosing state mapping is overridden at one key rather than
/// rewritten wholesale, so independent updates compose.
pub fn update(mapping: AlloyExpr, key: AlloyExpr, value: AlloyExpr) -> AlloyExpr {
    eq(
        prime(mapping.clone()),
        binop(
            AlloyBinOp::Override,
            mapping,
            binop(AlloyBinOp::Arrow, key, value),
        ),
    )
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sig(&mut self, sig: Sig) {
        self.sigs.insert(sig.name().to_string(), sig);
    }

    pub fn add_pred(&mut self, pred: Pred) {
        self.preds.insert(pred.name.clone(), pred);
    }

    pub fn add_assert(&mut self, assertion: Assertion) {
        self.asserts.insert(assertion.name.clone(), assertion);
    }

    /// Merge `other` into `self`, rejecting name collisions.
    pub fn merge(&mut self, other: Model) -> ModelResult<()> {
        for (name, sig) in other.sigs {
            if self.sigs.contains_key(&name) {
                return Err(ModelError::DuplicateName { kind: "sig", name });
            }
            self.sigs.insert(name, sig);
        }
        for (name, pred) in other.preds {
            if self.preds.contains_key(&name) {
                return Err(ModelError::DuplicateName { kind: "pred", name });
            }
            self.preds.insert(name, pred);
        }
        for (name, assertion) in other.asserts {
            if self.asserts.contains_key(&name) {
                return Err(ModelError::DuplicateName {
                    kind: "assert",
                    name,
                });
            }
            self.asserts.insert(name, assertion);
        }
        Ok(())
    }

    /// Merge `other` into `self`, letting later declarations overwrite
    /// earlier ones of the same name. Kept for callers that rely on the
    /// historical overwrite behavior; new code should prefer [`Model::merge`].
    pub fn merge_overwrite(&mut self, other: Model) {
        self.sigs.extend(other.sigs);
        self.preds.extend(other.preds);
        self.asserts.extend(other.asserts);
    }
}
