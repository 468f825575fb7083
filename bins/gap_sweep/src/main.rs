use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use portfolio::{PortfolioInput, PortfolioProblem};
use quantum::{AdiabaticEvolution, EvolutionConfig, Mixer, SamplingPolicy};
use report::csv::{to_file, write_gap_sweep};
use report::GapSweepRow;

use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Final ground-state probability and minimum gap vs total evolution time")]
struct Args {
    /// Problem file (JSON portfolio description)
    problem: PathBuf,

    /// Comma-separated list of total evolution times
    #[arg(long, default_value = "1,2,5,10,20,50")]
    times: String,

    /// Integration steps per unit of evolution time
    #[arg(long, default_value_t = 20)]
    steps_per_unit: usize,

    /// Number of sampled points along s
    #[arg(long, default_value_t = 40)]
    samples: usize,

    /// Sample layout along s
    #[arg(long, value_enum, default_value_t = Sampling::Log)]
    sampling: Sampling,

    /// Smallest 1 - s for logarithmic sampling
    #[arg(long, default_value_t = 1e-6)]
    min_distance: f64,

    /// Transverse-field strength g
    #[arg(long, default_value_t = 1.0)]
    mixer: f64,

    /// Largest spin count accepted by the evolution engine
    #[arg(long, default_value_t = quantum::DEFAULT_MAX_SPINS)]
    max_spins: usize,

    /// Output CSV path
    #[arg(long, default_value = "gap_sweep.csv")]
    out: PathBuf,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Sampling {
    Linear,
    Log,
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
    if args.steps_per_unit == 0 {
        bail!("steps_per_unit must be > 0");
    }

    let times = parse_list(&args.times)?;
    if times.is_empty() {
        bail!("times must contain at least one positive number");
    }
    if let Some(t) = times.iter().find(|&&t| !(t.is_finite() && t > 0.0)) {
        bail!("total times must be positive, got {t}");
    }

    let text = fs::read_to_string(&args.problem)
        .with_context(|| format!("failed to read {}", args.problem.display()))?;
    let input: PortfolioInput = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.problem.display()))?;
    let model = PortfolioProblem::new(input)
        .with_context(|| format!("invalid portfolio in {}", args.problem.display()))?
        .to_ising();
    info!(spins = model.num_spins(), runs = times.len(), "starting gap sweep");

    let sampling = match args.sampling {
        Sampling::Linear => SamplingPolicy::Linear {
            points: args.samples,
        },
        Sampling::Log => SamplingPolicy::Logarithmic {
            points: args.samples,
            min_distance: args.min_distance,
        },
    };

    // one evolution per total time; results come back in list order
    let rows: Vec<GapSweepRow> = times
        .par_iter()
        .map(|&total_time| -> Result<GapSweepRow> {
            let config = EvolutionConfig {
                total_time,
                time_steps: ((total_time * args.steps_per_unit as f64).ceil() as usize).max(1),
                sampling: sampling.clone(),
                mixer: Mixer::TransverseField(args.mixer),
                max_spins: args.max_spins,
                ..EvolutionConfig::default()
            };
            let outcome = AdiabaticEvolution::new(&model, config)?.run()?;
            let (min_gap_s, min_gap) = outcome
                .trace
                .min_gap()
                .map(|p| (p.s, p.gap))
                .unwrap_or((f64::NAN, f64::NAN));
            Ok(GapSweepRow {
                total_time,
                min_gap,
                min_gap_s,
                ground_overlap: outcome.ground_overlap,
                found_ground_state: outcome.found_ground_state(),
            })
        })
        .collect::<Result<_>>()?;

    for r in &rows {
        println!(
            "T={}  P(ground)={:.4}  min_gap={:.4e} @ s={:.6}",
            r.total_time, r.ground_overlap, r.min_gap, r.min_gap_s
        );
    }
    to_file(&args.out, |w| write_gap_sweep(w, &rows))?;
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
