mod parsed_expr;
pub mod parser;
mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::ExpressionParser;
pub use parser::Rule;
pub use parser::{parse, parse_with_max_depth, parse_with_options};

pub use parsed_expr::{Expr, ExprKind, Keyword, Literal};
pub use syntax::{BinaryOp, BoolOp, ComparisonOp, Span, UnaryOp};
pub use error::{ParseError, ParseErrorKind};

#[cfg(test)]
mod precedence_test;
