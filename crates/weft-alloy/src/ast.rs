//! Abstract syntax tree for the emitted Alloy models.

use indexmap::IndexMap;

/// A complete Alloy model: signatures, predicates, and named assertions,
/// each keyed by name in insertion order so rendering is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Signature declarations.
    pub sigs: IndexMap<String, Sig>,
    /// Predicate declarations.
    pub preds: IndexMap<String, Pred>,
    /// Assertion (theorem) declarations.
    pub asserts: IndexMap<String, Assertion>,
}

/// A signature declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sig {
    /// Object signature: a typed record with named fields.
    Object(ObjectSig),
    /// Enum signature: an enumerated atom domain.
    Enum(EnumSig),
}

impl Sig {
    /// The declared name of this signature.
    pub fn name(&self) -> &str {
        match self {
            Sig::Object(s) => &s.name,
            Sig::Enum(s) => &s.name,
        }
    }
}

/// `sig Name { fields }`, optionally a singleton (`one sig`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSig {
    pub name: String,
    /// Singleton signature (exactly one atom).
    pub one: bool,
    /// Fields in declaration order.
    pub fields: IndexMap<String, Field>,
}

impl ObjectSig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            one: false,
            fields: IndexMap::new(),
        }
    }

    /// Add a field, replacing any previous field of the same name.
    pub fn add_field(&mut self, field: Field) {
        self.fields.insert(field.name.clone(), field);
    }
}

/// A field of an object signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Type name the field maps to.
    pub ty: String,
    /// Mutable field (`var` in Alloy 6).
    pub var: bool,
}

/// `enum Name { A, B, ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSig {
    pub name: String,
    /// Variants in declaration order.
    pub variants: Vec<String>,
}

/// `pred name[params] { clauses }`. The clause list is an implicit
/// conjunction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pred {
    pub name: String,
    /// `(name, type)` parameter pairs; empty means no parameter brackets.
    pub params: Vec<(String, String)>,
    pub clauses: Vec<AlloyExpr>,
}

/// `assert name { body }`, a named theorem for the downstream checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assertion {
    pub name: String,
    pub body: AlloyExpr,
}

/// An Alloy expression.
///
/// Structural equality (`PartialEq`) is part of the contract: frame
/// condition computation compares subtrees by value, never by allocation
/// identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlloyExpr {
    /// Bare identifier.
    Ident(String),
    /// Integer literal.
    Int(i64),
    /// Property access `base.field`.
    Access {
        base: Box<AlloyExpr>,
        field: String,
    },
    /// Predicate call `pred[args]`.
    Call { pred: String, args: Vec<AlloyExpr> },
    /// N-ary conjunction; non-empty by construction.
    And(Vec<AlloyExpr>),
    /// N-ary disjunction; non-empty by construction.
    Or(Vec<AlloyExpr>),
    /// Next-state wrapper `expr'`.
    Prime(Box<AlloyExpr>),
    /// Binary operator.
    Binary {
        op: AlloyBinOp,
        lhs: Box<AlloyExpr>,
        rhs: Box<AlloyExpr>,
    },
    /// Bounded quantifier `kind var: set | body`.
    Quant {
        kind: QuantKind,
        var: String,
        set: String,
        body: Box<AlloyExpr>,
    },
    /// Temporal qualifier `always body` / `eventually body`.
    Temporal {
        kind: TemporalKind,
        body: Box<AlloyExpr>,
    },
}

/// Binary operators of the emitted subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlloyBinOp {
    /// `=`
    Eq,
    /// `in`
    In,
    /// `=>`
    Implies,
    /// Relational override `++`.
    Override,
    /// Pair construction `->`.
    Arrow,
}

impl AlloyBinOp {
    /// Concrete operator text.
    pub fn symbol(self) -> &'static str {
        match self {
            AlloyBinOp::Eq => "=",
            AlloyBinOp::In => "in",
            AlloyBinOp::Implies => "=>",
            AlloyBinOp::Override => "++",
            AlloyBinOp::Arrow => "->",
        }
    }
}

/// Bounded quantifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantKind {
    All,
    One,
    Some,
}

impl QuantKind {
    pub fn keyword(self) -> &'static str {
        match self {
            QuantKind::All => "all",
            QuantKind::One => "one",
            QuantKind::Some => "some",
        }
    }
}

/// Temporal qualifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
    Always,
    Eventually,
}

impl TemporalKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TemporalKind::Always => "always",
            TemporalKind::Eventually => "eventually",
        }
    }
}
