//! Sandboxed condition language evaluated against a single answer.
//!
//! Conditions are tokenized, parsed into an operator tree and evaluated with
//! the answer bound to `x`. Only literals, `x`, comparison, logical and
//! membership operators and a fixed set of methods exist; there is no way to
//! reach anything outside the bound answer.

pub mod lexer;
pub mod parser;
mod value;

pub use parser::{CompareOp, Expr, Method, ANSWER_VARIABLE, MAX_DEPTH};
pub use value::{AnswerValue, Value};

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("condition is empty")]
    Empty,
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[error("unterminated string literal starting at offset {0}")]
    UnterminatedString(usize),
    #[error("integer literal {0} is out of range")]
    IntegerOutOfRange(String),
    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        offset: usize,
    },
    #[error("unknown identifier '{0}'; conditions can only reference x")]
    UnknownIdentifier(String),
    #[error("unknown method '{0}'")]
    UnknownMethod(String),
    #[error("{method} takes {expected} argument(s), got {found}")]
    Arity {
        method: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("condition nests deeper than {0} levels")]
    TooDeep(usize),
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

impl ConditionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConditionError::TypeMismatch(_) => ErrorCategory::TypeMismatch,
            _ => ErrorCategory::ConditionCompilation,
        }
    }
}

impl From<ConditionError> for AppError {
    fn from(err: ConditionError) -> Self {
        let category = err.category();
        AppError::new(category, err.to_string())
    }
}

/// A compiled condition, ready to be evaluated against any number of answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    root: Expr,
}

impl Condition {
    /// Compile condition text. Malformed text fails with a compilation error.
    pub fn compile(source: &str) -> Result<Self, ConditionError> {
        let root = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against `answer`. Non-boolean outcomes and operators applied
    /// to the wrong shape of value fail with [`ConditionError::TypeMismatch`].
    pub fn evaluate(&self, answer: &AnswerValue) -> Result<bool, ConditionError> {
        match value::eval(&self.root, answer)? {
            Value::Bool(flag) => Ok(flag),
            other => Err(ConditionError::TypeMismatch(format!(
                "condition '{}' produced {}, expected bool",
                self.source,
                other.type_name()
            ))),
        }
    }
}

/// Compile and evaluate in one step.
pub fn evaluate(source: &str, answer: &AnswerValue) -> Result<bool, ConditionError> {
    Condition::compile(source)?.evaluate(answer)
}
