//! Runtime evaluation errors.
//!
//! These are conditions that only show up once values are known, such as a
//! registry function's domain failure on some simulated path.
//!
//! # Error Categories
//!
//! - **Runtime errors**: numeric or call failures while evaluating a node.
//! - **Resource exceeded errors**: evaluation limits, currently the stack depth.

use crate::api::{Diagnostic, Severity};
use crate::parser::Span;
use crate::values::ShapeMismatch;

/// Evaluation error with the span of the node that failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    /// The expression text being evaluated.
    pub src: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionErrorKind {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    ResourceExceeded(#[from] ResourceExceededError),
}

/// Failures of a single evaluation step.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// A registry function received an argument outside its domain.
    #[error("math domain error in {function}(): {message}")]
    Domain {
        function: &'static str,
        message: &'static str,
    },

    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatch),

    /// The payoff vector does not have one value per simulated path.
    #[error("payoff has {found} values but {expected} paths were simulated")]
    PayoffLength { expected: usize, found: usize },

    #[error("'{name}' is a function and cannot be used as a value")]
    FunctionAsValue { name: String },

    #[error("name '{name}' is not defined")]
    UndefinedName { name: String },

    #[error("'{name}' is not a function")]
    NotAFunction { name: String },

    #[error("{function}() takes {expected} argument(s) but {found} were given")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{function}() got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword {
        function: &'static str,
        keyword: String,
    },

    #[error("{function}() got multiple values for argument '{param}'")]
    DuplicateArgument {
        function: &'static str,
        param: &'static str,
    },

    #[error("{function}() missing required argument '{param}'")]
    MissingArgument {
        function: &'static str,
        param: &'static str,
    },
}

/// Evaluation limits that were exceeded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceExceededError {
    #[error("evaluation stack overflow: depth {depth} exceeds maximum of {max_depth}")]
    StackOverflow { depth: usize, max_depth: usize },
}

impl ExecutionError {
    pub fn new(kind: ExecutionErrorKind, src: String, span: Span) -> Self {
        Self { kind, src, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ExecutionErrorKind::Runtime(err) => match err {
                RuntimeError::Domain { .. } => (
                    "R001",
                    Some("guard the argument, e.g. sqrt(maximum(x, 0))"),
                ),
                RuntimeError::ShapeMismatch(_) => ("R002", None),
                RuntimeError::PayoffLength { .. } => ("R003", None),
                RuntimeError::FunctionAsValue { .. } => {
                    ("R004", Some("call the function with arguments"))
                }
                RuntimeError::UndefinedName { .. } | RuntimeError::NotAFunction { .. } => {
                    ("R005", None)
                }
                RuntimeError::ArgumentCount { .. }
                | RuntimeError::UnexpectedKeyword { .. }
                | RuntimeError::DuplicateArgument { .. }
                | RuntimeError::MissingArgument { .. } => ("R006", None),
            },
            ExecutionErrorKind::ResourceExceeded(ResourceExceededError::StackOverflow {
                ..
            }) => ("R100", Some("simplify the expression")),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}
