//! Whole-program translation driver.
//!
//! Gathers module-level globals and function declarations across all parsed
//! source files, translates each function against the shared global scope,
//! strictly merges the per-function models, and appends the composition.

use crate::compose::compose;
use crate::error::TranslateResult;
use crate::machine::{translate_function, translate_globals, GLOBALS_SIG};
use crate::scope::{Scope, Variable};
use tracing::debug;
use weft_alloy::builder::ident;
use weft_alloy::Model;
use weft_syntax::{FnDecl, Item, Program, VarDecl};

/// Translate a batch of parsed programs into one composed model.
///
/// The translation is a pure function of its input: any error aborts the
/// whole batch with no partial output.
pub fn translate_program(programs: &[Program]) -> TranslateResult<Model> {
    let mut global_decls: Vec<&VarDecl> = Vec::new();
    let mut functions: Vec<&FnDecl> = Vec::new();
    for program in programs {
        for item in &program.items {
            match item {
                Item::Fn(decl) => functions.push(decl),
                Item::Let(decl) => global_decls.push(decl),
            }
        }
    }

    let globals_scope = if global_decls.is_empty() {
        None
    } else {
        let vars = global_decls
            .iter()
            .map(|d| Variable::from_decl(d))
            .collect::<TranslateResult<Vec<_>>>()?;
        Some(Scope::new(vars, ident(GLOBALS_SIG), GLOBALS_SIG, None))
    };

    let mut model = Model::new();
    let mut units = Vec::new();

    if let Some(scope) = &globals_scope {
        let (globals_model, unit) = translate_globals(scope);
        model.merge(globals_model)?;
        units.push(unit);
    }

    for decl in functions {
        debug!(function = %decl.name.name, "translating function");
        let translation = translate_function(decl, globals_scope.as_ref())?;
        model.merge(translation.model)?;
        units.push(translation.unit);
    }

    model.merge(compose(&units)?)?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TranslateError;
    use weft_alloy::ModelError;
    use weft_syntax::parse;

    #[test]
    fn global_state_threads_through_every_function() {
        let program = parse(
            "let total = 0;\n\
             fn add() { total = total + 1; }\n\
             fn check() { assert(total == 0); }",
        )
        .unwrap();
        let model = translate_program(&[program]).unwrap();

        assert!(model.sigs.contains_key("Globals"));
        assert!(model.preds.contains_key("globals_init"));
        assert!(model.preds.contains_key("add_step"));
        assert!(model.preds.contains_key("check_assert"));
        // Three units feed init: globals, add, check.
        assert_eq!(model.preds["init"].clauses.len(), 3);
    }

    #[test]
    fn duplicate_function_names_collide_in_the_merge() {
        let a = parse("fn f() { let x = 0; x = 1; }").unwrap();
        let b = parse("fn f() { let y = 0; y = 1; }").unwrap();
        let err = translate_program(&[a, b]).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Model(ModelError::DuplicateName { .. })
        ));
    }

    #[test]
    fn globals_without_functions_fail_composition() {
        let program = parse("let g = 0;").unwrap();
        let err = translate_program(&[program]).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::Model(ModelError::EmptyConnective { .. })
        ));
    }
}
