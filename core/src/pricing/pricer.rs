use bumpalo::Bump;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::params::{ParameterError, SimulationParams};
use crate::api::{Environment, Error, PricingOptions};
use crate::evaluator::{self, ExecutionError, RuntimeError};
use crate::parser;
use crate::stdlib::REGISTRY;
use crate::validator::{self, PayoffExpr};

/// Monte Carlo pricer for payoff expressions.
///
/// A `Pricer` holds only options, so one instance can serve concurrent
/// calls from several threads.
///
/// # Examples
///
/// ```rust
/// use payoff_core::api::PricingOptions;
/// use payoff_core::pricing::{Pricer, SimulationParams};
///
/// let pricer = Pricer::new(PricingOptions {
///     seed: Some(42),
///     ..PricingOptions::default()
/// });
/// let params = SimulationParams::new(100.0, 100.0, 0.03, 0.2, 1.0).with_path_count(10_000);
/// let price = pricer.price(&params, "maximum(S_T - K, 0)").unwrap();
/// assert!(price > 8.0 && price < 11.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Pricer {
    options: PricingOptions,
}

impl Pricer {
    pub fn new(options: PricingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PricingOptions {
        &self.options
    }

    /// Parses and validates a payoff without simulating anything.
    pub fn compile(&self, payoff: &str) -> Result<PayoffExpr, Error> {
        let parsed = parser::parse_with_options(payoff, &self.options.parser)?;
        Ok(validator::validate(&parsed, payoff)?)
    }

    /// Prices `payoff`, seeding the generator from the options.
    pub fn price(&self, params: &SimulationParams, payoff: &str) -> Result<f64, Error> {
        self.check(params)?;
        let payoff = self.compile(payoff)?;
        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.run(params, &payoff, &mut rng)
    }

    /// Prices `payoff` drawing shocks from `rng`.
    ///
    /// Parameters and the payoff are checked before the first draw, so a
    /// failing call leaves `rng` untouched.
    pub fn price_with_rng<R: Rng + ?Sized>(
        &self,
        params: &SimulationParams,
        payoff: &str,
        rng: &mut R,
    ) -> Result<f64, Error> {
        self.check(params)?;
        let payoff = self.compile(payoff)?;
        self.run(params, &payoff, rng)
    }

    /// Prices an already validated payoff.
    pub fn price_compiled<R: Rng + ?Sized>(
        &self,
        params: &SimulationParams,
        payoff: &PayoffExpr,
        rng: &mut R,
    ) -> Result<f64, Error> {
        self.check(params)?;
        self.run(params, payoff, rng)
    }

    fn check(&self, params: &SimulationParams) -> Result<(), ParameterError> {
        params.validate()?;
        if self.options.batch_size == Some(0) {
            return Err(ParameterError::ZeroBatchSize);
        }
        Ok(())
    }

    fn run<R: Rng + ?Sized>(
        &self,
        params: &SimulationParams,
        payoff: &PayoffExpr,
        rng: &mut R,
    ) -> Result<f64, Error> {
        let simulator = params.simulator();
        let batch_size = self
            .options
            .batch_size
            .unwrap_or(params.path_count)
            .min(params.path_count);
        tracing::debug!(
            paths = params.path_count,
            batch_size,
            payoff = %payoff,
            "starting pricing run"
        );

        let mut arena = Bump::new();
        let mut prices = vec![0.0; batch_size];
        let mut total = 0.0;
        let mut remaining = params.path_count;
        let mut batch = 0usize;

        while remaining > 0 {
            let len = remaining.min(batch_size);
            let terminal = &mut prices[..len];
            simulator.fill(rng, terminal);

            let env = Environment::new(&REGISTRY, terminal, params.strike, params.spot, params.rate);
            let value = evaluator::eval_with_options(self.options.evaluator, &arena, payoff, &env)?;
            let sum = value.sum_over(len).ok_or_else(|| {
                ExecutionError::new(
                    RuntimeError::PayoffLength {
                        expected: len,
                        found: value.vector_len().unwrap_or(0),
                    }
                    .into(),
                    payoff.src.clone(),
                    payoff.root.span.clone(),
                )
            })?;
            tracing::trace!(batch, paths = len, sum, "evaluated batch");

            total += sum;
            remaining -= len;
            batch += 1;
            arena.reset();
        }

        let price = params.discount_factor() * total / params.path_count as f64;
        if !price.is_finite() {
            tracing::warn!(price, "discounted price is not finite");
        }
        Ok(price)
    }
}

/// Prices `payoff` with default options and fresh randomness.
///
/// # Examples
///
/// ```rust
/// use payoff_core::api::ErrorKind;
/// use payoff_core::pricing::price;
///
/// let err = price(100.0, 100.0, 0.03, 0.2, 0.0, "maximum(S_T - K, 0)", 1000).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Parameter);
/// ```
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    maturity: f64,
    payoff: &str,
    path_count: usize,
) -> Result<f64, Error> {
    let params = SimulationParams {
        spot,
        strike,
        rate,
        volatility,
        maturity,
        path_count,
    };
    Pricer::default().price(&params, payoff)
}
