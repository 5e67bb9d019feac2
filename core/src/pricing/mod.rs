//! Monte Carlo pricing of payoff expressions.
//!
//! A pricing call runs these steps:
//!
//! 1. Check the simulation parameters (before any randomness is drawn)
//! 2. Parse and validate the payoff
//! 3. Simulate terminal prices, in batches if configured
//! 4. Evaluate the payoff on each batch and sum the payoffs
//! 5. Return `exp(-rT) × Σpayoff / path_count`

mod params;
mod pricer;

pub use params::{DEFAULT_PATH_COUNT, ParameterError, SimulationParams};
pub use pricer::{Pricer, price};
