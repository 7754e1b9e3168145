//! Per-function state-machine synthesis.
//!
//! Each source function becomes an object signature (its state record), an
//! enum signature (its program counter), and an init/step/atEnd predicate
//! triple, optionally joined by an assert predicate when the body contains
//! checked conditions. The bundle of predicates is also returned as a
//! [`MachineUnit`] for composition.

use crate::error::TranslateResult;
use crate::scope::{Scope, Variable};
use crate::transition::flat_to_transitions;
use weft_alloy::builder::{access, eq, ident, or};
use weft_alloy::{EnumSig, Field, Model, ObjectSig, Pred, Sig};
use weft_flat::{lower_statements, END_LABEL};
use weft_syntax::{FnDecl, Stmt, StmtKind};

/// Parameter name every generated predicate binds its state record to.
pub const STATE_PARAM: &str = "st";
/// Program-counter field on every function's state record.
pub const PC_FIELD: &str = "pc";
/// Signature name of the shared global state record.
pub const GLOBALS_SIG: &str = "Globals";
/// Name of the global-state initializer predicate.
pub const GLOBALS_INIT: &str = "globals_init";

/// The predicate bundle of one modeled state machine.
///
/// `init` is mandatory; initializer-only units (global state) leave the
/// rest unset. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct MachineUnit {
    pub init: Pred,
    pub step: Option<Pred>,
    pub at_end: Option<Pred>,
    pub checks: Option<Pred>,
}

/// The output of translating one function.
#[derive(Debug, Clone)]
pub struct FunctionTranslation {
    /// Signatures and predicates for this function alone.
    pub model: Model,
    /// The same predicates, bundled for composition.
    pub unit: MachineUnit,
}

/// Translate one function declaration, chaining its scope to the optional
/// module-level global scope.
pub fn translate_function(
    decl: &FnDecl,
    globals: Option<&Scope<'_>>,
) -> TranslateResult<FunctionTranslation> {
    let fn_name = &decl.name.name;
    let type_base = capitalize(fn_name);
    let state_sig_name = format!("{}Op", type_base);
    let pc_sig_name = format!("{}PC", type_base);

    let variables = collect_locals(&decl.body)?;

    let mut state_sig = ObjectSig::new(&state_sig_name);
    for v in &variables {
        state_sig.add_field(Field {
            name: v.name.clone(),
            ty: v.ty.clone(),
            var: true,
        });
    }
    state_sig.add_field(Field {
        name: PC_FIELD.to_string(),
        ty: pc_sig_name.clone(),
        var: true,
    });

    let scope = Scope::new(variables, ident(STATE_PARAM), &state_sig_name, globals);

    let flat = lower_statements(&decl.body)?;
    let set = flat_to_transitions(PC_FIELD, &flat, &scope)?;

    let mut init = init_pred(format!("{}_init", fn_name), &scope);
    init.clauses.push(eq(
        access(ident(STATE_PARAM), PC_FIELD),
        ident(flat.start.clone()),
    ));

    let params = vec![(STATE_PARAM.to_string(), state_sig_name.clone())];

    let step = Pred {
        name: format!("{}_step", fn_name),
        params: params.clone(),
        clauses: vec![or(set.transitions)?],
    };

    let at_end = Pred {
        name: format!("{}_atEnd", fn_name),
        params: params.clone(),
        clauses: vec![eq(
            access(ident(STATE_PARAM), PC_FIELD),
            ident(END_LABEL),
        )],
    };

    let checks = if set.checks.is_empty() {
        None
    } else {
        Some(Pred {
            name: format!("{}_assert", fn_name),
            params,
            clauses: set.checks,
        })
    };

    let mut variants = flat.labels();
    variants.push(END_LABEL.to_string());
    let pc_sig = EnumSig {
        name: pc_sig_name,
        variants,
    };

    let mut model = Model::new();
    model.add_sig(Sig::Object(state_sig));
    model.add_sig(Sig::Enum(pc_sig));
    model.add_pred(init.clone());
    model.add_pred(step.clone());
    model.add_pred(at_end.clone());
    if let Some(pred) = &checks {
        model.add_pred(pred.clone());
    }

    Ok(FunctionTranslation {
        model,
        unit: MachineUnit {
            init,
            step: Some(step),
            at_end: Some(at_end),
            checks,
        },
    })
}

/// Translate the module-level global state into its singleton signature
/// and initializer-only unit.
pub fn translate_globals(scope: &Scope<'_>) -> (Model, MachineUnit) {
    let mut sig = ObjectSig::new(scope.state_type());
    sig.one = true;
    for v in scope.variables() {
        sig.add_field(Field {
            name: v.name.clone(),
            ty: v.ty.clone(),
            var: true,
        });
    }

    let init = init_pred(GLOBALS_INIT.to_string(), scope);

    let mut model = Model::new();
    model.add_sig(Sig::Object(sig));
    model.add_pred(init.clone());

    (
        model,
        MachineUnit {
            init,
            step: None,
            at_end: None,
            checks: None,
        },
    )
}

/// Initializer predicate pinning every variable of `scope` to its declared
/// initial value.
fn init_pred(name: String, scope: &Scope<'_>) -> Pred {
    Pred {
        name,
        params: vec![(STATE_PARAM.to_string(), scope.state_type().to_string())],
        clauses: scope
            .variables()
            .map(|v| {
                eq(
                    access(ident(STATE_PARAM), v.name.clone()),
                    v.init.clone(),
                )
            })
            .collect(),
    }
}

/// Collect the function's local declarations, in order.
fn collect_locals(body: &[Stmt]) -> TranslateResult<Vec<Variable>> {
    let mut vars = Vec::new();
    for stmt in body {
        if let StmtKind::Let(decl) = &stmt.kind {
            vars.push(Variable::from_decl(decl)?);
        }
    }
    Ok(vars)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use weft_alloy::builder::int;
    use weft_alloy::AlloyExpr;
    use weft_syntax::{parse, Item};

    fn translate_source(source: &str) -> TranslateResult<FunctionTranslation> {
        let program = parse(source).unwrap();
        let Item::Fn(decl) = &program.items[0] else {
            panic!("expected fn item");
        };
        translate_function(decl, None)
    }

    #[test]
    fn one_chunk_function_matches_expected_shape() {
        let t = translate_source("fn incr() { let x = 0; x = x + 1; }").unwrap();

        let Sig::Object(state) = &t.model.sigs["IncrOp"] else {
            panic!("expected object sig");
        };
        assert_eq!(state.fields.len(), 2);
        assert!(state.fields["x"].var);
        assert_eq!(state.fields["pc"].ty, "IncrPC");

        let Sig::Enum(pc) = &t.model.sigs["IncrPC"] else {
            panic!("expected enum sig");
        };
        assert_eq!(pc.variants, vec!["P0".to_string(), "end".to_string()]);

        let init = &t.model.preds["incr_init"];
        assert_eq!(
            init.clauses,
            vec![
                eq(access(ident("st"), "x"), int(0)),
                eq(access(ident("st"), "pc"), ident("P0")),
            ]
        );

        // Assign disjunct plus stutter.
        let AlloyExpr::Or(disjuncts) = &t.model.preds["incr_step"].clauses[0] else {
            panic!("expected disjunction");
        };
        assert_eq!(disjuncts.len(), 2);

        assert_eq!(
            t.model.preds["incr_atEnd"].clauses,
            vec![eq(access(ident("st"), "pc"), ident("end"))]
        );
        assert!(t.unit.checks.is_none());
    }

    #[test]
    fn pc_enum_lists_every_label_exactly_once() {
        let t =
            translate_source("fn f() { let x = 0; x = 1; pause; x = 2; pause; x = 3; }").unwrap();
        let Sig::Enum(pc) = &t.model.sigs["FPC"] else {
            panic!("expected enum sig");
        };
        assert_eq!(
            pc.variants,
            vec![
                "P0".to_string(),
                "P1".to_string(),
                "P2".to_string(),
                "end".to_string()
            ]
        );
    }

    #[test]
    fn two_chunk_function_has_three_disjuncts() {
        let t = translate_source("fn f() { let x = 0; x = x + 1; pause; x = x + 1; }").unwrap();
        let AlloyExpr::Or(disjuncts) = &t.model.preds["f_step"].clauses[0] else {
            panic!("expected disjunction");
        };
        assert_eq!(disjuncts.len(), 3);
    }

    #[test]
    fn asserts_produce_an_assert_predicate() {
        let t = translate_source("fn f() { let x = 0; assert(x == 1); }").unwrap();
        let checks = t.unit.checks.as_ref().expect("assert predicate");
        assert_eq!(checks.name, "f_assert");
        assert_eq!(checks.clauses.len(), 1);
        assert!(t.model.preds.contains_key("f_assert"));
    }

    #[test]
    fn invalid_initializer_is_reported_with_the_name() {
        let program = parse("fn f() { let x = 1 + 2; }").unwrap();
        let Item::Fn(decl) = &program.items[0] else {
            panic!("expected fn item");
        };
        let err = translate_function(decl, None).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::InvalidInitializer { name } if name == "x"
        ));
    }

    #[test]
    fn undeclared_variable_fails_translation() {
        let err = translate_source("fn f() { ghost = 1; }").unwrap_err();
        assert!(matches!(
            err,
            TranslateError::UnresolvedVariable { name } if name == "ghost"
        ));
    }

    #[test]
    fn globals_become_a_singleton_initializer_unit() {
        let scope = Scope::new(
            vec![Variable {
                name: "total".to_string(),
                ty: "Int".to_string(),
                init: int(0),
            }],
            ident(GLOBALS_SIG),
            GLOBALS_SIG,
            None,
        );
        let (model, unit) = translate_globals(&scope);

        let Sig::Object(sig) = &model.sigs[GLOBALS_SIG] else {
            panic!("expected object sig");
        };
        assert!(sig.one);
        assert!(sig.fields["total"].var);

        assert_eq!(unit.init.name, GLOBALS_INIT);
        assert!(unit.step.is_none());
        assert!(unit.at_end.is_none());
        assert!(unit.checks.is_none());
    }
}
