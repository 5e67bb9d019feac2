use crate::simulator::TerminalPriceSimulator;

/// Number of simulated paths when none is given.
pub const DEFAULT_PATH_COUNT: usize = 50_000;

/// Market and simulation inputs of a pricing call.
///
/// # Examples
///
/// ```rust
/// use payoff_core::pricing::{DEFAULT_PATH_COUNT, SimulationParams};
///
/// let params = SimulationParams::new(100.0, 100.0, 0.03, 0.2, 1.0);
/// assert_eq!(params.path_count, DEFAULT_PATH_COUNT);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    /// Spot price (S₀).
    pub spot: f64,
    /// Strike (K).
    pub strike: f64,
    /// Risk-free rate (r), annualised.
    pub rate: f64,
    /// Volatility (σ), annualised.
    pub volatility: f64,
    /// Time to maturity (T) in years.
    pub maturity: f64,
    pub path_count: usize,
}

/// A simulation parameter that violates its constraint.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("maturity must be positive, got {0}")]
    NonPositiveMaturity(f64),

    #[error("volatility must be positive, got {0}")]
    NonPositiveVolatility(f64),

    #[error("number of simulations must be positive")]
    ZeroPathCount,

    #[error("batch size must be positive")]
    ZeroBatchSize,
}

impl SimulationParams {
    pub fn new(spot: f64, strike: f64, rate: f64, volatility: f64, maturity: f64) -> Self {
        Self {
            spot,
            strike,
            rate,
            volatility,
            maturity,
            path_count: DEFAULT_PATH_COUNT,
        }
    }

    pub fn with_path_count(self, path_count: usize) -> Self {
        Self { path_count, ..self }
    }

    /// Checks maturity, volatility and path count, in that order.
    ///
    /// NaN fails the positivity checks. The spot is not checked.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.maturity > 0.0) {
            return Err(ParameterError::NonPositiveMaturity(self.maturity));
        }
        if !(self.volatility > 0.0) {
            return Err(ParameterError::NonPositiveVolatility(self.volatility));
        }
        if self.path_count == 0 {
            return Err(ParameterError::ZeroPathCount);
        }
        Ok(())
    }

    pub fn simulator(&self) -> TerminalPriceSimulator {
        TerminalPriceSimulator::new(self.spot, self.rate, self.volatility, self.maturity)
    }

    /// exp(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SimulationParams {
        SimulationParams::new(100.0, 100.0, 0.03, 0.2, 1.0)
    }

    #[test]
    fn test_validate_order_and_messages() {
        let bad = SimulationParams {
            maturity: 0.0,
            volatility: -0.1,
            path_count: 0,
            ..params()
        };
        assert_eq!(bad.validate(), Err(ParameterError::NonPositiveMaturity(0.0)));

        let bad = SimulationParams {
            volatility: -0.1,
            path_count: 0,
            ..params()
        };
        assert_eq!(
            bad.validate().unwrap_err().to_string(),
            "volatility must be positive, got -0.1"
        );

        assert_eq!(
            params().with_path_count(0).validate(),
            Err(ParameterError::ZeroPathCount)
        );
    }

    #[test]
    fn test_nan_is_rejected() {
        let bad = SimulationParams {
            maturity: f64::NAN,
            ..params()
        };
        assert!(matches!(
            bad.validate(),
            Err(ParameterError::NonPositiveMaturity(_))
        ));
        let bad = SimulationParams {
            volatility: f64::NAN,
            ..params()
        };
        assert!(matches!(
            bad.validate(),
            Err(ParameterError::NonPositiveVolatility(_))
        ));
    }

    #[test]
    fn test_spot_and_rate_are_not_checked() {
        let odd = SimulationParams {
            spot: -5.0,
            rate: -0.02,
            ..params()
        };
        assert!(odd.validate().is_ok());
    }

    #[test]
    fn test_discount_factor() {
        let params = SimulationParams {
            rate: 0.05,
            maturity: 2.0,
            ..params()
        };
        assert_eq!(params.discount_factor(), (-0.1_f64).exp());
    }
}
