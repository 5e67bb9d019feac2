//! Public error types for the pricing API.
//!
//! Each stage of the pipeline owns a structured error type. [`Error`] unifies
//! them at the API boundary, and the source-bearing ones convert to a
//! [`Diagnostic`] for rendering.

use core::fmt;

use crate::evaluator::ExecutionError;
use crate::parser::{ParseError, Span};
use crate::pricing::ParameterError;
use crate::validator::ValidationError;

/// Public error type for all pricing operations.
///
/// A pricing call yields exactly one of a price or an `Error`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The payoff text is not a single parseable expression.
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// The payoff uses a construct, operator or name outside the allowed sets.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A simulation parameter violates its constraint.
    #[error("parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Evaluation failed on the simulated paths.
    #[error("runtime error: {0}")]
    Runtime(#[from] ExecutionError),
}

/// Discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Validation,
    Parameter,
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Parameter => "ParameterError",
            ErrorKind::Runtime => "RuntimeEvaluationError",
        })
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Parameter(_) => ErrorKind::Parameter,
            Error::Runtime(_) => ErrorKind::Runtime,
        }
    }

    /// The payoff text the error points into, if the error is tied to one.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            Error::Syntax(e) => Some(&e.src),
            Error::Validation(e) => Some(&e.src),
            Error::Runtime(e) => Some(&e.src),
            Error::Parameter(_) => None,
        }
    }

    /// Diagnostic for errors that point into the payoff text.
    ///
    /// Parameter errors have no source location and return `None`.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Error::Syntax(e) => Some(e.to_diagnostic()),
            Error::Validation(e) => Some(e.to_diagnostic()),
            Error::Runtime(e) => Some(e.to_diagnostic()),
            Error::Parameter(_) => None,
        }
    }
}

/// A diagnostic message with a source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Stable error code, e.g. "V003".
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}
