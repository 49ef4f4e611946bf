use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use klinkenberg::dataset::{SyntheticParams, synthetic};
use klinkenberg::store::write_samples;

/// Writes a synthetic `k_app = k (1 + b/p)` table for trying out the fit.
#[derive(Parser)]
#[command(name = "generate_dataset", version)]
struct Args {
    /// Output CSV path
    output: PathBuf,

    #[arg(long, default_value_t = 1.0)]
    true_permeability: f64,

    #[arg(long, default_value_t = 50.0, help = "Gas slippage b, in pressure units")]
    slip: f64,

    #[arg(long, default_value_t = 100.0)]
    min_pressure: f64,

    #[arg(long, default_value_t = 600.0)]
    max_pressure: f64,

    #[arg(long, default_value_t = 6)]
    points: usize,

    #[arg(long, default_value_t = 0.0, help = "Half-width of uniform noise on k_app")]
    noise: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let params = SyntheticParams {
        true_permeability: args.true_permeability,
        slippage: args.slip,
        min_pressure: args.min_pressure,
        max_pressure: args.max_pressure,
        points: args.points,
        noise: args.noise,
    };
    params.validate()?;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let samples = synthetic(&params, &mut rng);

    write_samples(&args.output, &samples)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), rows = samples.len(), "generated dataset");
    println!("Wrote {} samples to {}", samples.len(), args.output.display());
    Ok(())
}
