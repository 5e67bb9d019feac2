//! Configuration options for parsing, evaluation and pricing.

/// Limits applied while parsing a payoff expression.
///
/// # Example
///
/// ```
/// use payoff_core::api::ParserOptions;
///
/// let options = ParserOptions {
///     max_nesting: 16,
///     ..ParserOptions::default()
/// };
/// assert_eq!(options.max_depth, 512);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum depth of the syntax tree, counting operator chains. Runs of
    /// prefix operators and right-associative links (`**`, `if ... else`)
    /// are bounded by the same limit before the tree is built.
    ///
    /// Default: 512
    pub max_depth: usize,

    /// Maximum nesting of brackets and `if ... else` tests, checked before
    /// the grammar runs.
    ///
    /// Default: 64
    pub max_nesting: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_nesting: 64,
        }
    }
}

/// Limits applied while evaluating a validated payoff expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Maximum evaluation stack depth.
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}

/// Options for a pricing run.
///
/// # Example
///
/// ```
/// use payoff_core::api::PricingOptions;
///
/// let options = PricingOptions {
///     seed: Some(42),
///     batch_size: Some(10_000),
///     ..PricingOptions::default()
/// };
/// assert!(options.evaluator.max_depth > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PricingOptions {
    /// Seed for the normal shocks. `None` seeds from OS entropy on every run.
    pub seed: Option<u64>,

    /// Number of paths simulated and evaluated at a time.
    ///
    /// `None` evaluates all paths in a single batch. `Some(0)` is rejected.
    pub batch_size: Option<usize>,

    pub parser: ParserOptions,

    pub evaluator: EvaluatorOptions,
}
