//! Whitelist validation of parsed payoff expressions.
//!
//! The validator walks the parser's tree and converts it into a
//! [`PayoffExpr`], a closed tree that can only hold the node kinds and
//! operators a payoff may use. Anything not explicitly recognised is rejected.

mod error;
mod payoff_expr;
mod validator;

#[cfg(test)]
mod validator_test;

pub use error::{ValidationError, ValidationErrorKind};
pub use payoff_expr::{ArithOp, CompareOp, Constant, Node, NodeKind, PayoffExpr, SignOp};
pub use validator::{validate, validate_with_registry};
