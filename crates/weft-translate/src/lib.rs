//! Translation from flat imperative programs to relational state machines.
//!
//! This crate is the algorithmic core of weft:
//! - nested-scope variable resolution and identifier qualification
//! - per-chunk transition relations with exact frame conditions and
//!   stutter closure
//! - per-function state-machine synthesis (init / step / atEnd / assert)
//! - composition of many machines into one global interleaving model with
//!   a correctness theorem

pub mod compose;
pub mod error;
pub mod machine;
pub mod scope;
pub mod transition;
pub mod translate;

pub use compose::compose;
pub use error::{TranslateError, TranslateResult};
pub use machine::{translate_function, translate_globals, FunctionTranslation, MachineUnit};
pub use scope::{Scope, Variable};
pub use transition::{flat_to_transitions, frame, TransitionSet};
pub use translate::translate_program;
