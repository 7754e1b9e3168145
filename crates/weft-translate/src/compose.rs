//! Composition of state-machine units into one global model.
//!
//! The composed step relation is an interleaving: exactly one instance of
//! one unit advances per global transition. Instances outside the chosen
//! disjunct are unconstrained by it, which is sound because each unit's
//! own frame conditions already pin everything its transitions do not
//! touch.

use crate::error::{TranslateError, TranslateResult};
use crate::machine::MachineUnit;
use weft_alloy::builder::{always, and, call, call0, eventually, implies, ident, or, quant};
use weft_alloy::{AlloyExpr, Assertion, Model, Pred, QuantKind};

/// Bound variable used by every composed quantifier.
const INSTANCE_VAR: &str = "x";

/// Compose the units into the global `init` / `step` / `allEnd` /
/// `satisfyAssertions` predicates, the `completeRun` execution template,
/// and the `runSatisfiesAssertions` theorem.
///
/// Initializer-only units contribute to `init` alone. Composing zero
/// step-carrying units is an [`EmptyConnective`] error rather than a
/// silently-empty step relation.
///
/// [`EmptyConnective`]: weft_alloy::ModelError::EmptyConnective
pub fn compose(units: &[MachineUnit]) -> TranslateResult<Model> {
    let mut init_clauses = Vec::new();
    let mut step_disjuncts = Vec::new();
    let mut end_clauses = Vec::new();
    let mut assert_clauses = Vec::new();

    for unit in units {
        init_clauses.push(quantified(QuantKind::All, &unit.init)?);
        if let Some(step) = &unit.step {
            step_disjuncts.push(quantified(QuantKind::Some, step)?);
        }
        if let Some(at_end) = &unit.at_end {
            end_clauses.push(quantified(QuantKind::All, at_end)?);
        }
        if let Some(checks) = &unit.checks {
            assert_clauses.push(quantified(QuantKind::All, checks)?);
        }
    }

    let step_body = or(step_disjuncts)?;

    let mut model = Model::new();
    model.add_pred(Pred {
        name: "init".to_string(),
        params: Vec::new(),
        clauses: init_clauses,
    });
    model.add_pred(Pred {
        name: "step".to_string(),
        params: Vec::new(),
        clauses: vec![step_body],
    });
    model.add_pred(Pred {
        name: "allEnd".to_string(),
        params: Vec::new(),
        clauses: end_clauses,
    });
    model.add_pred(Pred {
        name: "satisfyAssertions".to_string(),
        params: Vec::new(),
        clauses: assert_clauses,
    });
    model.add_pred(Pred {
        name: "completeRun".to_string(),
        params: Vec::new(),
        clauses: vec![
            call0("init"),
            always(call0("step")),
            eventually(call0("allEnd")),
        ],
    });
    model.add_assert(Assertion {
        name: "runSatisfiesAssertions".to_string(),
        body: implies(
            and(vec![call0("init"), always(call0("step"))])?,
            always(call0("satisfyAssertions")),
        ),
    });

    Ok(model)
}

/// `kind x: T | pred[x]` where `T` is the state type of `pred`.
fn quantified(kind: QuantKind, pred: &Pred) -> TranslateResult<AlloyExpr> {
    let ty = state_type(pred)?;
    Ok(quant(
        kind,
        INSTANCE_VAR,
        ty,
        call(pred.name.clone(), vec![ident(INSTANCE_VAR)]),
    ))
}

/// The state type a unit ranges over: the type of its predicate's first
/// parameter.
fn state_type(pred: &Pred) -> TranslateResult<&str> {
    pred.params
        .first()
        .map(|(_, ty)| ty.as_str())
        .ok_or_else(|| TranslateError::MalformedPredicate {
            pred: pred.name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_alloy::builder::{access, eq, int};
    use weft_alloy::ModelError;

    fn unit(name: &str, ty: &str, with_checks: bool) -> MachineUnit {
        let params = vec![("st".to_string(), ty.to_string())];
        let pred = |suffix: &str| Pred {
            name: format!("{}_{}", name, suffix),
            params: params.clone(),
            clauses: vec![eq(access(ident("st"), "x"), int(0))],
        };
        MachineUnit {
            init: pred("init"),
            step: Some(pred("step")),
            at_end: Some(pred("atEnd")),
            checks: with_checks.then(|| pred("assert")),
        }
    }

    fn init_only(name: &str, ty: &str) -> MachineUnit {
        MachineUnit {
            init: Pred {
                name: format!("{}_init", name),
                params: vec![("st".to_string(), ty.to_string())],
                clauses: vec![eq(access(ident("st"), "g"), int(0))],
            },
            step: None,
            at_end: None,
            checks: None,
        }
    }

    #[test]
    fn two_functions_interleave_in_the_step_relation() {
        let model = compose(&[unit("f", "FOp", false), unit("g", "GOp", false)]).unwrap();

        let AlloyExpr::Or(disjuncts) = &model.preds["step"].clauses[0] else {
            panic!("expected disjunction");
        };
        assert_eq!(disjuncts.len(), 2);
        assert_eq!(
            disjuncts[0],
            quant(QuantKind::Some, "x", "FOp", call("f_step", vec![ident("x")]))
        );
        assert_eq!(
            disjuncts[1],
            quant(QuantKind::Some, "x", "GOp", call("g_step", vec![ident("x")]))
        );

        assert_eq!(
            model.preds["init"].clauses,
            vec![
                quant(QuantKind::All, "x", "FOp", call("f_init", vec![ident("x")])),
                quant(QuantKind::All, "x", "GOp", call("g_init", vec![ident("x")])),
            ]
        );
        assert_eq!(model.preds["allEnd"].clauses.len(), 2);
    }

    #[test]
    fn initializer_only_units_join_init_but_not_step() {
        let model = compose(&[init_only("globals", "Globals"), unit("f", "FOp", false)]).unwrap();

        assert_eq!(model.preds["init"].clauses.len(), 2);
        let AlloyExpr::Or(disjuncts) = &model.preds["step"].clauses[0] else {
            panic!("expected disjunction");
        };
        assert_eq!(disjuncts.len(), 1);
        assert_eq!(model.preds["allEnd"].clauses.len(), 1);
    }

    #[test]
    fn composing_only_initializer_units_is_an_error() {
        let err = compose(&[init_only("globals", "Globals")]).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Model(ModelError::EmptyConnective { connective: "or" })
        ));
    }

    #[test]
    fn missing_first_parameter_is_malformed() {
        let mut broken = unit("f", "FOp", false);
        broken.init.params.clear();
        let err = compose(&[broken]).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::MalformedPredicate { pred } if pred == "f_init"
        ));
    }

    #[test]
    fn assertion_carriers_feed_satisfy_assertions() {
        let model = compose(&[unit("f", "FOp", true), unit("g", "GOp", false)]).unwrap();
        assert_eq!(
            model.preds["satisfyAssertions"].clauses,
            vec![quant(
                QuantKind::All,
                "x",
                "FOp",
                call("f_assert", vec![ident("x")])
            )]
        );
    }

    #[test]
    fn complete_run_and_theorem_have_the_template_shape() {
        let model = compose(&[unit("f", "FOp", true)]).unwrap();

        assert_eq!(
            model.preds["completeRun"].clauses,
            vec![
                call0("init"),
                always(call0("step")),
                eventually(call0("allEnd")),
            ]
        );

        let theorem = &model.asserts["runSatisfiesAssertions"];
        assert_eq!(
            theorem.body,
            implies(
                and(vec![call0("init"), always(call0("step"))]).unwrap(),
                always(call0("satisfyAssertions")),
            )
        );
    }
}
