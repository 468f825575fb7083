use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use annealer::{anneal, AnnealerConfig, AnnealingSchedule};
use portfolio::{PortfolioInput, PortfolioProblem};
use report::csv::{to_file, write_frontier};
use report::FrontierRow;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Annealed efficient frontier over a list of risk-aversion values")]
struct Args {
    /// Problem file (JSON portfolio description)
    problem: PathBuf,

    /// Comma-separated list of risk-aversion values α
    #[arg(long, default_value = "0,0.5,1,2,5,10")]
    alphas: String,

    /// Annealing restarts per α
    #[arg(long, default_value_t = 100)]
    restarts: usize,

    /// Temperature steps in the annealing schedule (0 keeps each trial's random start)
    #[arg(long, default_value_t = 100)]
    schedule_steps: usize,

    /// Sweeps per temperature step
    #[arg(long, default_value_t = 10)]
    sweeps: usize,

    /// Base RNG seed (shared across α values)
    #[arg(long, default_value = "frontier")]
    seed: String,

    /// Output CSV path
    #[arg(long, default_value = "frontier_sweep.csv")]
    out: PathBuf,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("failed to build Rayon thread pool")?;
    }
    let alphas = parse_list(&args.alphas)?;
    if alphas.is_empty() {
        bail!("alphas must contain at least one number");
    }

    let text = fs::read_to_string(&args.problem)
        .with_context(|| format!("failed to read {}", args.problem.display()))?;
    let input: PortfolioInput = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.problem.display()))?;
    let base = PortfolioProblem::new(input)
        .with_context(|| format!("invalid portfolio in {}", args.problem.display()))?;
    info!(spins = base.num_spins(), points = alphas.len(), "starting frontier sweep");

    let config = AnnealerConfig {
        restarts: args.restarts,
        seed: args.seed.clone(),
        ..AnnealerConfig::default()
    };

    let start = Instant::now();
    let rows: Vec<FrontierRow> = alphas
        .par_iter()
        .map(|&alpha| -> Result<FrontierRow> {
            let problem = base.with_risk_aversion(alpha)?;
            let model = problem.to_ising();
            let schedule = AnnealingSchedule::auto(&model, args.schedule_steps, args.sweeps);
            let outcome = anneal(&model, &schedule, &config)?;
            Ok(FrontierRow {
                risk_aversion: alpha,
                best_energy: outcome.best_energy(),
                distinct_solutions: outcome.cloud.len(),
                metrics: problem.metrics(outcome.best_configuration()),
            })
        })
        .collect::<Result<_>>()?;
    info!(elapsed_s = start.elapsed().as_secs_f64(), "frontier sweep finished");

    for r in &rows {
        println!(
            "alpha={} return={:.6} variance={:.6} shares={:?}",
            r.risk_aversion, r.metrics.expected_return, r.metrics.variance, r.metrics.shares
        );
    }

    let ids: Vec<&str> = base.assets().iter().map(|a| a.id()).collect();
    to_file(&args.out, |w| write_frontier(w, &ids, &rows))?;
    println!("wrote {}", args.out.display());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Comma-separated numbers; blank entries are skipped, anything else must parse.
fn parse_list(input: &str) -> Result<Vec<f64>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            t.parse::<f64>()
                .with_context(|| format!("invalid number {t:?} in list {input:?}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_list;

    #[test]
    fn list_entries_must_all_parse() {
        assert_eq!(parse_list("1, 2.5,,5").unwrap(), vec![1.0, 2.5, 5.0]);
        let err = parse_list("1,x,5").unwrap_err();
        assert!(err.to_string().contains("\"x\""), "{err}");
    }
}
