use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridepi::io::series::{write_series_csv, write_series_csv_file};
use gridepi::scenario::{beta_range, run_scenario, steps_for_years, sweep_beta, ScenarioConfig};

#[derive(Debug, Parser)]
#[command(name = "gridepi", about = "Spatially coupled SEIR/SEIRDS grid simulator")]
struct Cli {
    /// Scenario JSON; the built-in 3x4 SEIRDS scenario when omitted
    #[arg(long, global = true)]
    scenario: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the scenario and write the S,E,I,R,D totals per step as CSV
    Run {
        /// Output CSV path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print every compartment grid after the last step
        #[arg(long)]
        dump_state: bool,
    },
    /// Total dead at the end of the run for a range of beta values
    SweepBeta {
        #[arg(long, default_value_t = 5.0)]
        from: f64,
        /// Exclusive upper bound
        #[arg(long, default_value_t = 200.0)]
        to: f64,
        #[arg(long, default_value_t = 5.0)]
        step: f64,
        /// Simulated years per beta, replacing the scenario's step count
        #[arg(long, default_value_t = 20.0)]
        years: f64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = match &cli.scenario {
        Some(path) => ScenarioConfig::load_json(path)?,
        None => ScenarioConfig::default(),
    };
    info!(rows = cfg.rows, cols = cfg.cols, variant = ?cfg.variant, steps = cfg.steps, "scenario loaded");

    match cli.command {
        Command::Run { out, dump_state } => {
            let run = run_scenario(&cfg)?;
            match out {
                Some(path) => {
                    let path = write_series_csv_file(&path, &run.series)?;
                    info!(path = %path.display(), "series written");
                }
                None => write_series_csv(std::io::stdout().lock(), &run.series)?,
            }
            if dump_state {
                println!("{}", run.model);
            }
        }
        Command::SweepBeta { from, to, step, years } => {
            let betas = beta_range(from, to, step)?;
            cfg.steps = steps_for_years(years, cfg.dt)?;
            info!(points = betas.len(), steps = cfg.steps, "sweeping beta");
            let points = sweep_beta(&cfg, &betas).context("beta sweep failed")?;
            println!("beta,number_dead");
            for (beta, dead) in points {
                println!("{},{}", beta, dead);
            }
        }
    }
    Ok(())
}
