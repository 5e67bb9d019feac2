use crate::api::{Diagnostic, Severity};
use crate::parser::{Rule, Span};

/// Parser error with context
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// The expression text that failed to parse.
    pub src: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    /// Unexpected token
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    /// Unclosed delimiter
    #[error("unclosed delimiter '{delimiter}'")]
    UnclosedDelimiter { delimiter: char },
    /// Invalid number literal
    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },
    /// Maximum nesting depth exceeded
    #[error("expression nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { depth: usize, max_depth: usize },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    #[error("{message}")]
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, src: String, span: Span) -> Self {
        Self { kind, src, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { .. } => (
                "P001",
                Some("a payoff must be a single expression, e.g. maximum(S_T - K, 0)"),
            ),
            ParseErrorKind::UnclosedDelimiter { .. } => {
                ("P002", Some("add the missing closing delimiter"))
            }
            ParseErrorKind::InvalidNumber { .. } => ("P003", Some("check the number format")),
            ParseErrorKind::MaxDepthExceeded { .. } => {
                ("P004", Some("reduce nesting or simplify the expression"))
            }
            ParseErrorKind::Other { .. } => ("P999", None),
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

/// Convert Pest error to human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>, source: &str) -> ParseError {
    use pest::error::ErrorVariant;

    let (start, end) = match err.location {
        pest::error::InputLocation::Pos(pos) => (pos, pos),
        pest::error::InputLocation::Span((start, end)) => (start, end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError { positives, .. } => ParseErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: describe_found(source, start),
        },
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    let end = if end == start {
        next_token_end(source, start)
    } else {
        end
    };
    ParseError::new(kind, source.to_string(), Span::new(start, end))
}

fn rule_description(rule: Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::expression | Rule::main => "expression",
        Rule::number => "number",
        Rule::string => "string",
        Rule::ident => "identifier",
        Rule::boolean | Rule::none => "literal",
        Rule::grouped | Rule::tuple => "'('",
        Rule::list => "'['",
        Rule::dict | Rule::set | Rule::dict_entry => "'{'",
        Rule::call_op => "'('",
        Rule::index_op => "'['",
        Rule::attr_op => "'.'",
        Rule::keyword_arg => "keyword argument",
        Rule::lambda_op | Rule::lambda_params | Rule::kw_lambda => "lambda",
        Rule::kw_if | Rule::if_op => "'if'",
        Rule::kw_else => "'else'",
        Rule::not | Rule::pos | Rule::neg | Rule::invert => "unary operator",
        _ => "operator",
    }
}

fn format_expected_rules(rules: &[Rule]) -> String {
    let mut descriptions: Vec<&str> = Vec::new();
    for rule in rules {
        let description = rule_description(*rule);
        if !descriptions.contains(&description) {
            descriptions.push(description);
        }
    }
    match descriptions.as_slice() {
        [] => "expression".to_string(),
        [one] => one.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn describe_found(source: &str, pos: usize) -> String {
    let end = next_token_end(source, pos);
    if pos >= source.len() || end == pos {
        "end of input".to_string()
    } else {
        format!("'{}'", &source[pos..end])
    }
}

/// End of the token starting at `pos`: a whole word, or a single character.
fn next_token_end(source: &str, pos: usize) -> usize {
    let Some(rest) = source.get(pos..) else {
        return source.len();
    };
    let mut chars = rest.char_indices();
    match chars.next() {
        None => pos,
        Some((_, c)) if c.is_alphanumeric() || c == '_' => {
            let len = rest
                .char_indices()
                .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
            pos + len
        }
        Some((_, c)) => pos + c.len_utf8(),
    }
}
