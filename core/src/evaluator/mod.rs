//! Tree-walking evaluator for validated payoff expressions.
//!
//! The evaluator interprets a [`PayoffExpr`] against an [`Environment`] and
//! produces a scalar or a per-path vector.
//!
//! ## Design Principles
//!
//! - **Never panic**: domain failures and shape mismatches become errors
//! - **Stack-safe**: depth tracking bounds recursion on deeply nested input
//! - **Pure**: neither the expression nor the environment is modified
//!
//! ## Example
//!
//! ```
//! use bumpalo::Bump;
//! use payoff_core::api::Environment;
//! use payoff_core::stdlib::REGISTRY;
//! use payoff_core::values::Value;
//! use payoff_core::{evaluator, parser, validator};
//!
//! let source = "maximum(S_T - K, 0)";
//! let parsed = parser::parse(source).unwrap();
//! let payoff = validator::validate(&parsed, source).unwrap();
//!
//! let arena = Bump::new();
//! let paths = [90.0, 110.0];
//! let env = Environment::new(&REGISTRY, &paths, 100.0, 100.0, 0.03);
//! let result = evaluator::eval(&arena, &payoff, &env).unwrap();
//! assert_eq!(result, Value::Array(&[0.0, 10.0]));
//! ```

mod error;
mod eval;
mod operators;


pub use crate::api::EvaluatorOptions;
pub use error::{ExecutionError, ExecutionErrorKind, ResourceExceededError, RuntimeError};
pub use eval::Evaluator;

use crate::{api::Environment, validator::PayoffExpr, values::Value};
use bumpalo::Bump;

/// Evaluate a validated expression with default limits.
///
/// Vectors in the result are allocated in `arena`.
pub fn eval<'a>(
    arena: &'a Bump,
    expr: &PayoffExpr,
    env: &Environment<'a>,
) -> Result<Value<'a>, ExecutionError> {
    eval_with_options(EvaluatorOptions::default(), arena, expr, env)
}

/// Evaluate a validated expression with custom limits.
///
/// ## Example
///
/// ```ignore
/// // Allow deeper nesting for machine-generated payoffs
/// let options = EvaluatorOptions { max_depth: 5000 };
/// let result = eval_with_options(options, &arena, &payoff, &env)?;
/// ```
pub fn eval_with_options<'a>(
    options: EvaluatorOptions,
    arena: &'a Bump,
    expr: &PayoffExpr,
    env: &Environment<'a>,
) -> Result<Value<'a>, ExecutionError> {
    Evaluator::new(options, arena, expr, env).eval()
}
