use annealer::{anneal, AnnealError, AnnealerConfig, AnnealingSchedule};
use ising::{exact_ground_states, IsingModel, SpinConfiguration};
use portfolio::{PortfolioInput, PortfolioProblem};
use rng::StreamRng;

/// Frustrated triangle plus a pendant spin.
fn frustrated() -> IsingModel {
    IsingModel::new(
        vec![0.2, -0.1, 0.05, 0.3],
        vec![
            vec![0.0, 1.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0, -0.5],
            vec![1.0, 1.0, 0.0, 0.0],
            vec![0.0, -0.5, 0.0, 0.0],
        ],
        0.0,
    )
    .unwrap()
}

fn config(restarts: usize, seed: &str) -> AnnealerConfig {
    AnnealerConfig {
        restarts,
        seed: seed.to_string(),
        ..AnnealerConfig::default()
    }
}

#[test]
fn same_seed_reproduces_every_decision() {
    let model = frustrated();
    let schedule = AnnealingSchedule::geometric(5.0, 0.05, 20, 2).unwrap();
    let cfg = AnnealerConfig {
        record_decisions: true,
        ..config(8, "repro")
    };

    let a = anneal(&model, &schedule, &cfg).unwrap();
    let b = anneal(&model, &schedule, &cfg).unwrap();

    for (x, y) in a.samples.iter().zip(&b.samples) {
        assert_eq!(x.decisions, y.decisions);
        assert_eq!(x.configuration, y.configuration);
        assert_eq!(x.energy.to_bits(), y.energy.to_bits());
    }
    let decisions = a.samples[0].decisions.as_ref().unwrap();
    assert_eq!(decisions.len(), schedule.total_sweeps() * model.num_spins());
}

#[test]
fn parallel_and_sequential_agree() {
    let model = frustrated();
    let schedule = AnnealingSchedule::geometric(5.0, 0.05, 10, 1).unwrap();
    let par = anneal(&model, &schedule, &config(16, "par")).unwrap();
    let seq = anneal(
        &model,
        &schedule,
        &AnnealerConfig {
            parallel: false,
            ..config(16, "par")
        },
    )
    .unwrap();

    let pc: Vec<_> = par.samples.iter().map(|s| s.configuration.clone()).collect();
    let sc: Vec<_> = seq.samples.iter().map(|s| s.configuration.clone()).collect();
    assert_eq!(pc, sc);
    assert_eq!(par.best_index, seq.best_index);
}

#[test]
fn finds_exhaustive_ground_state() {
    let model = frustrated();
    let exact = exact_ground_states(&model, 10, 1e-12).unwrap();
    let schedule = AnnealingSchedule::auto(&model, 30, 2);

    let out = anneal(&model, &schedule, &config(20, "ground")).unwrap();

    assert!((out.best_energy() - exact.energy).abs() < 1e-12);
    assert!(exact.contains(out.best_configuration()));
}

#[test]
fn best_energy_never_worsens_with_more_restarts() {
    let model = frustrated();
    let schedule = AnnealingSchedule::geometric(3.0, 0.5, 4, 1).unwrap();
    let out = anneal(&model, &schedule, &config(24, "mono")).unwrap();

    let mut previous = f64::INFINITY;
    for k in 1..=24 {
        let best = out.best_energy_within(k).unwrap();
        assert!(best <= previous, "k = {}: {} > {}", k, best, previous);
        previous = best;
    }
    assert_eq!(previous, out.best_energy());
}

#[test]
fn empty_schedule_returns_initial_configuration() {
    let model = frustrated();
    let schedule = AnnealingSchedule::empty();

    let start = SpinConfiguration::new(vec![1, 1, 1, 1]).unwrap();
    let fixed = anneal(
        &model,
        &schedule,
        &AnnealerConfig {
            initial: Some(start.clone()),
            ..config(3, "empty")
        },
    )
    .unwrap();
    assert!(fixed.samples.iter().all(|s| s.configuration == start));
    assert!(fixed.samples.iter().all(|s| s.accepted + s.rejected == 0));

    let random = anneal(&model, &schedule, &config(1, "empty")).unwrap();
    let mut rng = StreamRng::fork("empty", "trial", 0);
    let expected: Vec<i8> = (0..4).map(|_| rng.next_spin(b"INIT")).collect();
    assert_eq!(random.samples[0].configuration.spins(), expected.as_slice());
}

#[test]
fn zero_temperature_only_descends() {
    let model = frustrated();
    let schedule = AnnealingSchedule::constant(0.0, 20).unwrap();
    let start = SpinConfiguration::new(vec![1, 1, 1, -1]).unwrap();
    let initial_energy = model.energy(&start).unwrap();

    let out = anneal(
        &model,
        &schedule,
        &AnnealerConfig {
            initial: Some(start),
            polish: false,
            ..config(4, "greedy")
        },
    )
    .unwrap();

    for s in &out.samples {
        assert!(s.energy <= initial_energy + 1e-12);
        for i in 0..model.num_spins() {
            assert!(model.flip_delta(s.configuration.spins(), i) >= -1e-12);
        }
    }
}

#[test]
fn cloud_aggregates_local_minima() {
    let model = frustrated();
    let schedule = AnnealingSchedule::geometric(2.0, 0.2, 5, 1).unwrap();
    let out = anneal(&model, &schedule, &config(30, "cloud")).unwrap();

    let total: usize = out.cloud.iter().map(|c| c.occurrences).sum();
    assert_eq!(total, 30);
    assert!(out.cloud.windows(2).all(|w| w[0].energy <= w[1].energy));

    for entry in &out.cloud {
        for i in 0..model.num_spins() {
            assert!(model.flip_delta(entry.configuration.spins(), i) >= -1e-9);
        }
    }
    assert_eq!(out.cloud[0].energy, out.best_energy());
}

#[test]
fn ties_resolve_to_first_trial() {
    // every configuration has energy 0
    let model = IsingModel::fields_only(vec![0.0; 3]).unwrap();
    let schedule = AnnealingSchedule::constant(1.0, 1).unwrap();
    let out = anneal(&model, &schedule, &config(5, "ties")).unwrap();
    assert_eq!(out.best_index, 0);
}

#[test]
fn configuration_errors_are_reported() {
    let model = frustrated();
    let schedule = AnnealingSchedule::constant(1.0, 1).unwrap();

    assert!(matches!(
        anneal(&model, &schedule, &config(0, "x")),
        Err(AnnealError::NoRestarts)
    ));

    let short = AnnealerConfig {
        initial: Some(SpinConfiguration::new(vec![1, -1]).unwrap()),
        ..config(1, "x")
    };
    assert!(matches!(
        anneal(&model, &schedule, &short),
        Err(AnnealError::InitialLength { expected: 4, found: 2 })
    ));
}

#[test]
fn two_asset_portfolio_matches_enumeration() {
    let problem = PortfolioProblem::new(PortfolioInput {
        asset_ids: vec!["AAA".into(), "BBB".into()],
        expected_returns: vec![0.08, 0.15],
        covariance: vec![vec![0.02, 0.005], vec![0.005, 0.06]],
        prices: vec![1.0, 1.0],
        budget: 1.0,
        bit_widths: Some(vec![1, 1]),
        risk_aversion: 1.0,
        budget_penalty: 1.0,
    })
    .unwrap();
    let model = problem.to_ising();
    let exact = exact_ground_states(&model, 10, 1e-12).unwrap();

    let out = anneal(&model, &AnnealingSchedule::auto(&model, 20, 2), &config(10, "pf")).unwrap();

    assert!(exact.contains(out.best_configuration()));
    let shares = problem.decode_shares(out.best_configuration());
    assert_eq!(shares.iter().sum::<u64>(), 1, "budget buys exactly one share: {:?}", shares);
}
