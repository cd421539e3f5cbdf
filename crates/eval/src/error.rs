//! Evaluation errors.
//!
//! Errors are absorbing: any combinator that sees one short-circuits, and
//! accumulated data requests are discarded on the way out. The engine
//! never converts an error into a determined `false`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A required field or predicate is absent from the container.
    KeyNotFound { key: String, container: String },
    /// A bound variable was referenced but never bound in the rule
    /// condition.
    Unbound { name: String },
    /// Opaque failure forwarded from the loader.
    Loader { message: String },
    /// A callable inside a value template failed.
    Call { function: String, message: String },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::KeyNotFound { key, container } => {
                write!(f, "key '{}' not found on {}", key, container)
            }
            EvalError::Unbound { name } => {
                write!(f, "variable '{}' was not bound in the rule condition", name)
            }
            EvalError::Loader { message } => {
                write!(f, "loader error: {}", message)
            }
            EvalError::Call { function, message } => {
                write!(f, "function '{}' failed: {}", function, message)
            }
        }
    }
}

impl std::error::Error for EvalError {}
