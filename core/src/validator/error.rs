use crate::api::{Diagnostic, Severity};
use crate::parser::Span;

/// The first construct that made validation fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// The expression text that failed validation.
    pub src: String,
    pub span: Span,
    /// Names the payoff could have used instead, from the registry the
    /// expression was validated against. Empty unless the error is about a
    /// name.
    pub suggestions: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationErrorKind {
    /// A syntax node a payoff may not contain.
    #[error("{node} is not allowed in a payoff expression")]
    DisallowedNode { node: &'static str },

    /// A parsed operator outside the allowed set.
    #[error("operator '{op}' is not allowed in a payoff expression")]
    DisallowedOperator { op: &'static str },

    /// A name that is neither a registry entry nor a call variable.
    #[error("name '{name}' is not allowed in a payoff expression")]
    UnknownIdentifier { name: String },

    /// A call whose target is not a bare name.
    #[error("only registry functions can be called, not a {target}")]
    DisallowedCallTarget { target: &'static str },

    /// A call to a name that is not a registry function.
    #[error("'{name}' is not a callable function")]
    NotAFunction { name: String },
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, src: String, span: Span) -> Self {
        Self {
            kind,
            src,
            span,
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<&'static str>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ValidationErrorKind::DisallowedNode { .. } => (
                "V001",
                "payoffs may use numbers, names, arithmetic, comparisons, and/or, \
                 conditionals and registry function calls"
                    .to_string(),
            ),
            ValidationErrorKind::DisallowedOperator { .. } => (
                "V002",
                "allowed operators are + - * / % ** (binary), + - (unary), and, or, \
                 == != < <= > >="
                    .to_string(),
            ),
            ValidationErrorKind::UnknownIdentifier { .. } => (
                "V003",
                format!("available names: {}", self.suggestions.join(", ")),
            ),
            ValidationErrorKind::DisallowedCallTarget { .. } => (
                "V004",
                "call a function by its bare name, e.g. maximum(S_T - K, 0)".to_string(),
            ),
            ValidationErrorKind::NotAFunction { .. } => (
                "V005",
                format!("callable functions: {}", self.suggestions.join(", ")),
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            help: Some(help),
            code: Some(code.to_string()),
        }
    }
}
