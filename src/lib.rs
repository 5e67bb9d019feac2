//! Payoff - Monte Carlo pricing of European payoffs written as expressions
//!
//! # Overview
//!
//! A payoff is a small arithmetic expression evaluated over simulated
//! terminal prices. The expression language is deliberately closed: only
//! numbers, booleans, arithmetic, comparisons, conditionals and calls to a
//! fixed set of numeric functions are accepted. Everything else is rejected
//! before a single path is simulated.
//!
//! Names available to a payoff:
//!
//! - `S_T`: simulated terminal prices, one per path
//! - `K`, `S0`, `r`: strike, spot and risk-free rate
//! - `exp`, `log`, `sqrt`, `abs`, `max`, `maximum`, `min`, `minimum`, `clip`
//! - `pi`, `e`
//!
//! # Quick Start
//!
//! ```rust
//! use payoff::{Pricer, PricingOptions, SimulationParams};
//!
//! let pricer = Pricer::new(PricingOptions {
//!     seed: Some(7),
//!     ..PricingOptions::default()
//! });
//! let params = SimulationParams::new(100.0, 100.0, 0.03, 0.2, 1.0).with_path_count(20_000);
//!
//! let call = pricer.price(&params, "maximum(S_T - K, 0)").unwrap();
//! let put = pricer.price(&params, "maximum(K - S_T, 0)").unwrap();
//! assert!(call > put);
//! ```
//!
//! # Errors
//!
//! Every failure is an [`Error`] with one of four kinds. All but parameter
//! errors point into the payoff text and can be rendered with
//! [`render_error`]:
//!
//! ```rust
//! use payoff::{ErrorKind, price, render_error_to_string_no_color};
//!
//! let err = price(100.0, 100.0, 0.03, 0.2, 1.0, "S_T.mean()", 1_000).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! assert!(render_error_to_string_no_color(&err).contains("S_T.mean()"));
//! ```

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from payoff_core
pub use payoff_core::api::{
    Diagnostic, Error, ErrorKind, EvaluatorOptions, ParserOptions, PricingOptions, Severity,
};
pub use payoff_core::pricing::{
    DEFAULT_PATH_COUNT, ParameterError, Pricer, SimulationParams, price,
};
pub use payoff_core::stdlib::{self, REGISTRY};
pub use payoff_core::validator::{self, PayoffExpr};
