//! Translation error types.
//!
//! Every error is fatal for the whole batch: there is no partial-success
//! output mode and nothing is downgraded to a warning.

use thiserror::Error;
use weft_alloy::ModelError;
use weft_flat::LowerError;

/// A translation error.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String },

    #[error("unresolved variable: {name}")]
    UnresolvedVariable { name: String },

    #[error("variable `{name}` must be initialized with an integer literal")]
    InvalidInitializer { name: String },

    #[error("malformed predicate `{pred}`: missing first parameter")]
    MalformedPredicate { pred: String },

    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;
