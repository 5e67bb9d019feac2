use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payoff::{DEFAULT_PATH_COUNT, Pricer, PricingOptions, SimulationParams, render_error};
use payoff_core::parser;

/// Price a European payoff by Monte Carlo simulation
#[derive(Parser, Debug)]
#[command(name = "payoff")]
#[command(about = "Price a payoff expression over simulated terminal prices", long_about = None)]
struct Args {
    /// Payoff expression over S_T, K, S0 and r
    #[arg(default_value = "maximum(S_T - K, 0)")]
    payoff: String,

    /// Spot price S0
    #[arg(long, default_value_t = 100.0)]
    spot: f64,

    /// Strike K
    #[arg(long, default_value_t = 100.0)]
    strike: f64,

    /// Annual risk-free rate r
    #[arg(long, default_value_t = 0.03, allow_negative_numbers = true)]
    rate: f64,

    /// Annual volatility
    #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
    volatility: f64,

    /// Time to maturity in years
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    maturity: f64,

    /// Number of simulated paths
    #[arg(long, default_value_t = DEFAULT_PATH_COUNT)]
    paths: usize,

    /// Seed for reproducible prices
    #[arg(long)]
    seed: Option<u64>,

    /// Simulate and evaluate at most this many paths at a time
    #[arg(long)]
    batch_size: Option<usize>,

    /// Print the parsed and validated expression (for debugging)
    #[arg(long)]
    debug_parse: bool,
}

fn debug_parse(pricer: &Pricer, payoff: &str) {
    // Errors are reported by the pricing call that follows.
    let Ok(ast) = parser::parse_with_options(payoff, &pricer.options().parser) else {
        return;
    };
    println!("=== Parsed AST ===");
    println!("{:#?}", ast);
    println!();

    if let Ok(validated) = pricer.compile(payoff) {
        println!("=== Validated Expression ===");
        println!("{}", validated);
        println!();
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control the log level, WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let pricer = Pricer::new(PricingOptions {
        seed: args.seed,
        batch_size: args.batch_size,
        ..PricingOptions::default()
    });
    let params = SimulationParams {
        spot: args.spot,
        strike: args.strike,
        rate: args.rate,
        volatility: args.volatility,
        maturity: args.maturity,
        path_count: args.paths,
    };

    if args.debug_parse {
        debug_parse(&pricer, &args.payoff);
    }

    match pricer.price(&params, &args.payoff) {
        Ok(price) => {
            println!("{}", price);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!(kind = %e.kind(), "pricing failed");
            render_error(&e);
            Ok(ExitCode::FAILURE)
        }
    }
}
