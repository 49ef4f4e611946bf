use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use klinkenberg::config::Config;
use klinkenberg::dataset::reference_samples;
use klinkenberg::engine::{Regressor, Sample, correct};
use klinkenberg::report::FitReport;
use klinkenberg::store::{read_samples, write_samples};

#[derive(Parser)]
#[command(
    name = "klinkenberg",
    version,
    about = "Klinkenberg gas-slippage correction for permeability measurements"
)]
struct Cli {
    #[arg(short, long, help = "Config file (defaults to the user config dir)")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Decimal places in text output")]
    precision: Option<usize>,

    #[arg(short, long, help = "Relative tolerance for a degenerate fit")]
    tolerance: Option<f64>,

    #[arg(long, help = "Print the report as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit a mean_pressure,apparent_permeability table
    Fit { input: PathBuf },
    /// Write the reference table, read it back and fit it
    Demo {
        #[arg(short, long, help = "Where to write the table (defaults to config data_file)")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(precision) = cli.precision {
        config.precision = precision;
    }
    if let Some(tolerance) = cli.tolerance {
        config.degenerate_tolerance = tolerance;
    }
    config.validate()?;

    let samples = match cli.command {
        Command::Fit { input } => load(&input)?,
        Command::Demo { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(&config.data_file));
            write_samples(&path, &reference_samples())
                .with_context(|| format!("writing demo table to {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote reference table");
            load(&path)?
        }
    };

    let report = run(&samples, &config)?;
    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

fn load(path: &Path) -> Result<Vec<Sample>> {
    let samples =
        read_samples(path).with_context(|| format!("loading samples from {}", path.display()))?;
    tracing::info!(path = %path.display(), count = samples.len(), "loaded samples");
    Ok(samples)
}

fn run(samples: &[Sample], config: &Config) -> Result<FitReport> {
    let regressor: Regressor = config.regressor()?;
    let fit = correct(samples, &regressor).context("Klinkenberg fit failed")?;
    tracing::debug!(
        intercept = fit.true_permeability,
        slope = fit.slip_factor,
        "fit complete"
    );
    Ok(FitReport::new(samples, &fit, config))
}
