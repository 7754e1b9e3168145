//! Variables and nested scopes.
//!
//! A scope maps variable names to their declarations and knows which
//! runtime container (an Alloy expression, e.g. the `st` parameter of a
//! step predicate or the `Globals` singleton) holds those variables.
//! Scopes form an explicit chain of immutable frames; lookup walks parent
//! links so the nearest enclosing definition wins.

use crate::error::{TranslateError, TranslateResult};
use indexmap::IndexMap;
use weft_alloy::builder::{access, ident, int};
use weft_alloy::AlloyExpr;
use weft_syntax::{ExprKind, VarDecl};

/// The scalar type tag of every variable the source subset can declare.
pub const INT_TYPE: &str = "Int";

/// A declared variable: name, type tag, and its initial value translated
/// to a target-AST literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: String,
    pub init: AlloyExpr,
}

impl Variable {
    /// Translate a source declaration. Anything but an integer-literal
    /// initializer is rejected.
    pub fn from_decl(decl: &VarDecl) -> TranslateResult<Self> {
        let ExprKind::Int(value) = decl.init.kind else {
            return Err(TranslateError::InvalidInitializer {
                name: decl.name.name.clone(),
            });
        };
        Ok(Self {
            name: decl.name.name.clone(),
            ty: INT_TYPE.to_string(),
            init: int(value),
        })
    }
}

/// One frame of the scope chain.
#[derive(Debug)]
pub struct Scope<'a> {
    variables: IndexMap<String, Variable>,
    /// Expression denoting the container holding these variables at
    /// runtime.
    state_expr: AlloyExpr,
    /// Type name of that container.
    state_type: String,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new(
        variables: Vec<Variable>,
        state_expr: AlloyExpr,
        state_type: impl Into<String>,
        parent: Option<&'a Scope<'a>>,
    ) -> Self {
        Self {
            variables: variables
                .into_iter()
                .map(|v| (v.name.clone(), v))
                .collect(),
            state_expr,
            state_type: state_type.into(),
            parent,
        }
    }

    /// Variables declared directly in this frame, in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    pub fn state_expr(&self) -> &AlloyExpr {
        &self.state_expr
    }

    pub fn state_type(&self) -> &str {
        &self.state_type
    }

    /// Find the nearest enclosing scope defining `name`.
    pub fn resolve(&self, name: &str) -> TranslateResult<&Scope<'_>> {
        let mut scope = self;
        loop {
            if scope.variables.contains_key(name) {
                return Ok(scope);
            }
            match scope.parent {
                Some(parent) => scope = parent,
                None => {
                    return Err(TranslateError::UnresolvedVariable {
                        name: name.to_string(),
                    })
                }
            }
        }
    }

    /// Every variable visible from this scope, innermost frame first, as
    /// bare identifier expressions. No shadowing filter is applied: a name
    /// declared at several levels appears once per level. Frame-condition
    /// generation depends on this list being complete.
    pub fn all_visible(&self) -> Vec<AlloyExpr> {
        let mut out = Vec::new();
        let mut scope = self;
        loop {
            out.extend(scope.variables.keys().map(ident));
            match scope.parent {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        out
    }

    /// Replace every bare identifier with a property access on the owning
    /// scope's container, so one expression can mix local and global
    /// references.
    ///
    /// Idempotent: property accesses are left whole (their base is a
    /// container reference, not a source identifier), so qualifying an
    /// already-qualified tree is the identity.
    pub fn qualify(&self, expr: &AlloyExpr) -> TranslateResult<AlloyExpr> {
        match expr {
            AlloyExpr::Ident(id) => {
                let owner = self.resolve(id)?;
                Ok(access(owner.state_expr.clone(), id.clone()))
            }
            AlloyExpr::Access { .. } | AlloyExpr::Int(_) => Ok(expr.clone()),
            AlloyExpr::Call { pred, args } => Ok(AlloyExpr::Call {
                pred: pred.clone(),
                args: args
                    .iter()
                    .map(|a| self.qualify(a))
                    .collect::<TranslateResult<_>>()?,
            }),
            AlloyExpr::And(clauses) => Ok(AlloyExpr::And(
                clauses
                    .iter()
                    .map(|c| self.qualify(c))
                    .collect::<TranslateResult<_>>()?,
            )),
            AlloyExpr::Or(clauses) => Ok(AlloyExpr::Or(
                clauses
                    .iter()
                    .map(|c| self.qualify(c))
                    .collect::<TranslateResult<_>>()?,
            )),
            AlloyExpr::Prime(inner) => {
                Ok(AlloyExpr::Prime(Box::new(self.qualify(inner)?)))
            }
            AlloyExpr::Binary { op, lhs, rhs } => Ok(AlloyExpr::Binary {
                op: *op,
                lhs: Box::new(self.qualify(lhs)?),
                rhs: Box::new(self.qualify(rhs)?),
            }),
            AlloyExpr::Quant {
                kind,
                var,
                set,
                body,
            } => Ok(AlloyExpr::Quant {
                kind: *kind,
                var: var.clone(),
                set: set.clone(),
                body: Box::new(self.qualify(body)?),
            }),
            AlloyExpr::Temporal { kind, body } => Ok(AlloyExpr::Temporal {
                kind: *kind,
                body: Box::new(self.qualify(body)?),
            }),
        }
    }
}
