//! Public API types shared by the pipeline stages.
//!
//! - [`Error`] and [`Diagnostic`]: the unified failure type of a pricing call
//!   and its renderable form.
//! - [`Environment`]: the per-call bindings seen by the evaluator.
//! - Options structs with defaults for each stage.

pub mod environment;
pub mod error;
pub mod options;

pub use environment::{Binding, CALL_VARIABLES, Environment};
pub use error::{Diagnostic, Error, ErrorKind, Severity};
pub use options::{EvaluatorOptions, ParserOptions, PricingOptions};
