//! Monte Carlo option pricing with sandboxed payoff expressions.
//!
//! A payoff is a single arithmetic expression over the simulated terminal
//! prices `S_T` and the scalars `K`, `S0` and `r`. The text is parsed,
//! checked against a closed set of constructs and names, then evaluated
//! once per batch of simulated paths.
//!
//! ```rust
//! let price = payoff_core::price(100.0, 100.0, 0.03, 0.2, 1.0, "maximum(S_T - K, 0)", 10_000)
//!     .unwrap();
//! assert!(price > 0.0);
//! ```

pub mod api;
pub mod evaluator;
pub mod parser;
pub mod pricing;
pub mod simulator;
pub mod stdlib;
pub mod validator;
pub mod values;

pub use api::{Diagnostic, Error, ErrorKind, PricingOptions, Severity};
pub use pricing::{DEFAULT_PATH_COUNT, ParameterError, Pricer, SimulationParams, price};
pub use validator::PayoffExpr;
