use crate::ast::Value;
use thiserror::Error;

/// Grammar failure with a 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {line}:{column}")]
pub struct SyntaxError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, (line, column): (usize, usize)) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The grammar produced a node the tree builder does not know how to lower.
    #[error("unsupported construct '{construct}' at {line}:{column}")]
    UnsupportedConstruct {
        construct: String,
        line: usize,
        column: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("value of '{name}' was not found")]
    UnresolvedVariable { name: String },
    #[error("{value} ({kind}) has not a valid type", kind = .value.type_name())]
    TypeMismatch { value: Value },
    #[error("the operator '{op}' is not supported")]
    UnsupportedOperator { op: String },
    #[error("'{name}' expects {expected} parameters")]
    Arity { name: String, expected: usize },
    #[error("the function '{name}' is not defined")]
    UndefinedFunction { name: String },
    /// Failure reported by a host-registered function.
    #[error("{0}")]
    Function(String),
}
