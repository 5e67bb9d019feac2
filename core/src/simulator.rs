//! Terminal price simulation under geometric Brownian motion.
//!
//! Only the price at maturity matters for a payoff of `S_T`, so each path is
//! drawn in one step from the exact solution:
//!
//! ```text
//! S_T = S0 × exp((r - σ²/2)T + σ√T × Z),  Z ~ N(0, 1)
//! ```

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Draws independent terminal prices for fixed market parameters.
///
/// # Examples
///
/// ```rust
/// use payoff_core::simulator::TerminalPriceSimulator;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let simulator = TerminalPriceSimulator::new(100.0, 0.03, 0.2, 1.0);
/// let mut rng = StdRng::seed_from_u64(42);
/// let prices = simulator.simulate(&mut rng, 1_000);
/// assert_eq!(prices.len(), 1_000);
/// assert!(prices.iter().all(|s| *s > 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerminalPriceSimulator {
    spot: f64,
    /// (r - σ²/2)T
    drift: f64,
    /// σ√T
    diffusion: f64,
}

impl TerminalPriceSimulator {
    pub fn new(spot: f64, rate: f64, volatility: f64, maturity: f64) -> Self {
        Self {
            spot,
            drift: (rate - 0.5 * volatility * volatility) * maturity,
            diffusion: volatility * maturity.sqrt(),
        }
    }

    /// Terminal price for a given standard normal shock.
    #[inline]
    pub fn terminal_price(&self, shock: f64) -> f64 {
        self.spot * (self.drift + self.diffusion * shock).exp()
    }

    /// Fills `out` with terminal prices, one normal draw per element.
    pub fn fill<R: Rng + ?Sized>(&self, rng: &mut R, out: &mut [f64]) {
        for price in out.iter_mut() {
            let shock: f64 = StandardNormal.sample(rng);
            *price = self.terminal_price(shock);
        }
    }

    /// Draws `path_count` terminal prices.
    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R, path_count: usize) -> Vec<f64> {
        let mut prices = vec![0.0; path_count];
        self.fill(rng, &mut prices);
        prices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_terminal_price_formula() {
        let simulator = TerminalPriceSimulator::new(100.0, 0.05, 0.2, 2.0);
        let expected = 100.0 * ((0.05 - 0.02) * 2.0 + 0.2 * 2.0_f64.sqrt() * 1.5).exp();
        assert_relative_eq!(simulator.terminal_price(1.5), expected, epsilon = 1e-12);
        assert_relative_eq!(
            simulator.terminal_price(0.0),
            100.0 * (0.06_f64).exp(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_same_seed_same_paths() {
        let simulator = TerminalPriceSimulator::new(100.0, 0.03, 0.2, 1.0);
        let a = simulator.simulate(&mut StdRng::seed_from_u64(7), 256);
        let b = simulator.simulate(&mut StdRng::seed_from_u64(7), 256);
        let c = simulator.simulate(&mut StdRng::seed_from_u64(8), 256);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fill_in_chunks_matches_single_draw() {
        let simulator = TerminalPriceSimulator::new(100.0, 0.03, 0.2, 1.0);
        let whole = simulator.simulate(&mut StdRng::seed_from_u64(11), 10);

        let mut rng = StdRng::seed_from_u64(11);
        let mut chunked = vec![0.0; 10];
        for chunk in chunked.chunks_mut(3) {
            simulator.fill(&mut rng, chunk);
        }
        assert_eq!(whole, chunked);
    }

    #[test]
    fn test_zero_volatility_is_deterministic_forward() {
        let simulator = TerminalPriceSimulator::new(100.0, 0.05, 0.0, 1.0);
        let prices = simulator.simulate(&mut StdRng::seed_from_u64(1), 16);
        for price in prices {
            assert_relative_eq!(price, 100.0 * 0.05_f64.exp(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_risk_neutral_mean() {
        // E[S_T] = S0 × exp(rT)
        let simulator = TerminalPriceSimulator::new(100.0, 0.03, 0.2, 1.0);
        let prices = simulator.simulate(&mut StdRng::seed_from_u64(2024), 200_000);
        let mean = prices.iter().sum::<f64>() / prices.len() as f64;
        assert_relative_eq!(mean, 100.0 * 0.03_f64.exp(), max_relative = 0.005);
    }

    #[test]
    fn test_empty_simulation() {
        let simulator = TerminalPriceSimulator::new(100.0, 0.03, 0.2, 1.0);
        assert!(simulator.simulate(&mut StdRng::seed_from_u64(0), 0).is_empty());
    }
}
