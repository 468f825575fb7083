use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use annealer::{anneal, AnnealerConfig, AnnealingSchedule};
use ising::{exact_ground_states, IsingModel, DEFAULT_ENUMERATION_LIMIT};
use portfolio::{HamiltonianBuilder, PortfolioInput, PortfolioProblem};
use quantum::{AdiabaticEvolution, EvolutionConfig, Integrator, Mixer, SamplingPolicy};
use report::csv::{
    to_file, write_cloud, write_curve, write_eigenvalues, write_holdings, write_trace,
};
use report::{cloud_rows, holding_rows, AnnealingSummary, EvolutionSummary, ExactSummary, RunReport};

use std::fs;
use std::path::PathBuf;

/// Portfolio selection by simulated annealing and adiabatic evolution
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Problem file (JSON portfolio description)
    problem: PathBuf,

    /// Which solvers to run
    #[arg(long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Override the problem's risk aversion α
    #[arg(long)]
    risk_aversion: Option<f64>,

    /// Override the problem's budget penalty λ
    #[arg(long)]
    budget_penalty: Option<f64>,

    /// Independent annealing restarts
    #[arg(long, default_value_t = 100)]
    restarts: usize,

    /// Temperature steps in the annealing schedule (0 keeps each trial's random start)
    #[arg(long, default_value_t = 100)]
    schedule_steps: usize,

    /// Sweeps per temperature step
    #[arg(long, default_value_t = 10)]
    sweeps: usize,

    /// Starting temperature (with --t-cold: geometric schedule; default: derived from the model)
    #[arg(long, requires = "t_cold")]
    t_hot: Option<f64>,

    /// Final temperature
    #[arg(long, requires = "t_hot")]
    t_cold: Option<f64>,

    /// RNG seed (full reproducibility)
    #[arg(long, default_value = "default-seed")]
    seed: String,

    /// Run restarts one after another instead of on the Rayon pool
    #[arg(long)]
    sequential: bool,

    /// Total evolution time T
    #[arg(long, default_value_t = 10.0)]
    total_time: f64,

    /// Uniform integration steps
    #[arg(long, default_value_t = 100)]
    time_steps: usize,

    /// Number of sampled points along s
    #[arg(long, default_value_t = 50)]
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

    /// Time integrator
    #[arg(long, value_enum, default_value_t = Stepper::Exact)]
    integrator: Stepper,

    /// Largest spin count accepted by the evolution engine
    #[arg(long, default_value_t = quantum::DEFAULT_MAX_SPINS)]
    max_spins: usize,

    /// Output directory for CSV tables and run.json
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Number of Rayon worker threads (0 = Rayon default)
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Anneal,
    Evolve,
    Spectrum,
    All,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Sampling {
    Linear,
    Log,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Stepper {
    Exact,
    Rk4,
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

    let input = problem_input(&args)?;
    let problem = load_problem(&args, input.clone())?;
    let model = HamiltonianBuilder::new(&problem).ising();
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let mut run = RunReport::new(&model);
    run.problem = Some(input);

    match exact_ground_states(&model, DEFAULT_ENUMERATION_LIMIT, 1e-9) {
        Ok(exact) => {
            println!(
                "exact ground energy = {:.6} ({} state(s))",
                exact.energy,
                exact.ground_states.len()
            );
            run.exact = Some(ExactSummary::from(&exact));
        }
        Err(e) => warn!("skipping exhaustive check: {e}"),
    }

    if matches!(args.mode, Mode::Anneal | Mode::All) {
        run.annealing = Some(run_annealer(&args, &problem, &model)?);
    }

    if matches!(args.mode, Mode::Evolve | Mode::Spectrum | Mode::All) {
        let config = evolution_config(&args);
        if args.mode == Mode::All && model.num_spins() > config.max_spins {
            warn!(
                spins = model.num_spins(),
                max_spins = config.max_spins,
                "problem too large for exact evolution, skipping"
            );
        } else {
            let evolution = AdiabaticEvolution::new(&model, config.clone())?;
            if args.mode == Mode::Spectrum {
                let trace = evolution.analyze_path()?;
                write_spectrum_tables(&args, &trace)?;
                run.spectrum = Some(trace);
            } else {
                let outcome = evolution.run()?;
                write_spectrum_tables(&args, &outcome.trace)?;
                println!(
                    "evolution: P(ground) = {:.4}, dominant = {} (p = {:.4}), final gap {:.3e} [{:?}]",
                    outcome.ground_overlap,
                    outcome.dominant_state,
                    outcome.dominant_probability,
                    outcome.final_gap,
                    outcome.final_gap_class
                );
                if let Some(p) = outcome.trace.min_gap() {
                    println!("minimum gap {:.4e} at s = {:.6}", p.gap, p.s);
                }
                println!(
                    "evolved shares = {:?}",
                    problem.decode_shares(&outcome.dominant_state)
                );
                run.evolution = Some(EvolutionSummary::new(&config, &outcome));
            }
        }
    }

    let json = args.out_dir.join("run.json");
    run.write_json(&json)?;
    println!("report: {}", json.display());
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

fn problem_input(args: &Args) -> Result<PortfolioInput> {
    let text = fs::read_to_string(&args.problem)
        .with_context(|| format!("failed to read {}", args.problem.display()))?;
    let mut input: PortfolioInput = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", args.problem.display()))?;
    if let Some(alpha) = args.risk_aversion {
        input.risk_aversion = alpha;
    }
    if let Some(lambda) = args.budget_penalty {
        input.budget_penalty = lambda;
    }
    Ok(input)
}

fn load_problem(args: &Args, input: PortfolioInput) -> Result<PortfolioProblem> {
    let problem = PortfolioProblem::new(input)
        .with_context(|| format!("invalid portfolio in {}", args.problem.display()))?;
    info!(
        assets = problem.num_assets(),
        spins = problem.num_spins(),
        budget = problem.budget(),
        "loaded portfolio"
    );
    Ok(problem)
}

fn run_annealer(args: &Args, problem: &PortfolioProblem, model: &IsingModel) -> Result<AnnealingSummary> {
    let schedule = match (args.t_hot, args.t_cold) {
        (Some(hot), Some(cold)) => {
            AnnealingSchedule::geometric(hot, cold, args.schedule_steps, args.sweeps)?
        }
        _ => AnnealingSchedule::auto(model, args.schedule_steps, args.sweeps),
    };
    let config = AnnealerConfig {
        restarts: args.restarts,
        seed: args.seed.clone(),
        parallel: !args.sequential,
        ..AnnealerConfig::default()
    };
    let outcome = anneal(model, &schedule, &config)?;

    let best = outcome.best();
    let metrics = problem.metrics(&best.configuration);
    println!(
        "annealing: best cost = {:.6} (trial {}), {} distinct solution(s)",
        best.energy,
        best.trial,
        outcome.cloud.len()
    );
    for (asset, shares) in problem.assets().iter().zip(&metrics.shares) {
        println!("  {:<12} {}", asset.id(), shares);
    }
    println!(
        "  return = {:.6}  variance = {:.6}  spent = {:.4} / {:.4}",
        metrics.expected_return,
        metrics.variance,
        metrics.spent,
        problem.budget()
    );

    let ids: Vec<&str> = problem.assets().iter().map(|a| a.id()).collect();
    let cloud = cloud_rows(&outcome.cloud);
    let holdings = holding_rows(problem, &outcome.cloud);
    to_file(&args.out_dir.join("cloud.csv"), |w| write_cloud(w, &cloud))?;
    to_file(&args.out_dir.join("holdings.csv"), |w| write_holdings(w, &ids, &holdings))?;

    Ok(AnnealingSummary::new(&config, &outcome, Some(problem)))
}

fn evolution_config(args: &Args) -> EvolutionConfig {
    EvolutionConfig {
        total_time: args.total_time,
        time_steps: args.time_steps,
        sampling: match args.sampling {
            Sampling::Linear => SamplingPolicy::Linear {
                points: args.samples,
            },
            Sampling::Log => SamplingPolicy::Logarithmic {
                points: args.samples,
                min_distance: args.min_distance,
            },
        },
        mixer: Mixer::TransverseField(args.mixer),
        integrator: match args.integrator {
            Stepper::Exact => Integrator::ExactExponential,
            Stepper::Rk4 => Integrator::RungeKutta4,
        },
        max_spins: args.max_spins,
        ..EvolutionConfig::default()
    }
}

fn write_spectrum_tables(args: &Args, trace: &quantum::EvolutionTrace) -> Result<()> {
    to_file(&args.out_dir.join("trace.csv"), |w| write_trace(w, trace))?;
    to_file(&args.out_dir.join("gap.csv"), |w| {
        write_curve(w, ["s", "gap"], &trace.gap_curve())
    })?;
    to_file(&args.out_dir.join("relative_gap.csv"), |w| {
        write_curve(w, ["s", "relative_gap"], &trace.relative_gap_curve())
    })?;
    to_file(&args.out_dir.join("eigenvalues.csv"), |w| {
        write_eigenvalues(w, &trace.eigenvalue_curve())
    })?;
    Ok(())
}
