use annealer::{anneal, AnnealerConfig, AnnealingSchedule};
use ising::exact_ground_states;
use portfolio::{PortfolioInput, PortfolioProblem};
use quantum::{AdiabaticEvolution, EvolutionConfig, SamplingPolicy};
use report::csv::{
    to_file, write_cloud, write_curve, write_eigenvalues, write_holdings, write_trace,
};
use report::{cloud_rows, holding_rows, AnnealingSummary, EvolutionSummary, ExactSummary, RunReport};

fn problem() -> PortfolioProblem {
    PortfolioProblem::new(PortfolioInput {
        asset_ids: vec!["AAA".into(), "BBB".into()],
        expected_returns: vec![0.10, 0.06],
        covariance: vec![vec![0.04, 0.01], vec![0.01, 0.03]],
        prices: vec![1.0, 2.0],
        budget: 3.0,
        bit_widths: Some(vec![2, 1]),
        risk_aversion: 0.5,
        budget_penalty: 1.0,
    })
    .unwrap()
}

fn annealer_config() -> AnnealerConfig {
    AnnealerConfig {
        restarts: 12,
        seed: "report".into(),
        ..AnnealerConfig::default()
    }
}

fn lines(buf: Vec<u8>) -> Vec<String> {
    String::from_utf8(buf).unwrap().lines().map(str::to_owned).collect()
}

#[test]
fn cloud_and_holdings_tables() {
    let problem = problem();
    let model = problem.to_ising();
    let outcome = anneal(&model, &AnnealingSchedule::auto(&model, 30, 2), &annealer_config()).unwrap();

    let cloud = cloud_rows(&outcome.cloud);
    assert_eq!(cloud.len(), outcome.cloud.len());
    assert_eq!(cloud.iter().map(|r| r.occurrences).sum::<usize>(), 12);
    assert!(cloud.windows(2).all(|w| w[0].energy <= w[1].energy));

    let mut buf = Vec::new();
    write_cloud(&mut buf, &cloud).unwrap();
    let text = lines(buf);
    assert_eq!(text[0], "rank,bits,energy,occurrences,first_trial");
    assert_eq!(text.len(), cloud.len() + 1);
    assert!(text[1].starts_with(&format!("0,{},", cloud[0].bits)));

    let holdings = holding_rows(&problem, &outcome.cloud);
    for (row, entry) in holdings.iter().zip(&outcome.cloud) {
        assert!((row.metrics.cost - entry.energy).abs() < 1e-9);
    }
    let mut buf = Vec::new();
    write_holdings(&mut buf, &["AAA", "BBB"], &holdings).unwrap();
    let text = lines(buf);
    assert_eq!(
        text[0],
        "rank,bits,occurrences,AAA,BBB,expected_return,variance,spent,budget_residual,cost"
    );
    assert_eq!(text[1].split(',').count(), 10);
}

#[test]
fn curve_and_eigenvalue_tables() {
    let mut buf = Vec::new();
    write_curve(&mut buf, ["s", "gap"], &[(0.0, 2.0), (1.0, 0.5)]).unwrap();
    assert_eq!(lines(buf), vec!["s,gap", "0,2", "1,0.5"]);

    let mut buf = Vec::new();
    write_eigenvalues(&mut buf, &[(0.0, vec![-1.0, 1.0]), (1.0, vec![-2.0])]).unwrap();
    assert_eq!(lines(buf), vec!["s,e0,e1", "0,-1,1", "1,-2,"]);
}

#[test]
fn spectrum_only_trace_leaves_state_columns_empty() {
    let model = problem().to_ising();
    let config = EvolutionConfig {
        sampling: SamplingPolicy::Linear { points: 4 },
        ..EvolutionConfig::default()
    };
    let trace = AdiabaticEvolution::new(&model, config).unwrap().analyze_path().unwrap();

    let mut buf = Vec::new();
    write_trace(&mut buf, &trace).unwrap();
    let text = lines(buf);
    assert_eq!(text.len(), 5);
    let cells: Vec<&str> = text[1].split(',').collect();
    assert_eq!(cells.len(), 9);
    assert_eq!(cells[6], "");
    assert_eq!(cells[7], "");

    let mut buf = Vec::new();
    write_curve(&mut buf, ["s", "gap"], &trace.gap_curve()).unwrap();
    let text = lines(buf);
    assert_eq!(text[0], "s,gap");
    assert_eq!(text.len(), 5);
    for (line, p) in text[1..].iter().zip(trace.points()) {
        assert_eq!(*line, format!("{},{}", p.s, p.gap));
    }
}

#[test]
fn run_report_serializes_computed_sections_only() {
    let problem = problem();
    let model = problem.to_ising();
    let exact = exact_ground_states(&model, 10, 1e-12).unwrap();
    let cfg = annealer_config();
    let annealed = anneal(&model, &AnnealingSchedule::auto(&model, 30, 2), &cfg).unwrap();

    let mut report = RunReport::new(&model);
    report.exact = Some(ExactSummary::from(&exact));
    report.annealing = Some(AnnealingSummary::new(&cfg, &annealed, Some(&problem)));

    let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(value["model"]["spins"], 3);
    assert_eq!(value["annealing"]["restarts"], 12);
    assert!(value["annealing"]["holdings"].is_array());
    assert!(value.get("evolution").is_none());
    assert!(value.get("spectrum").is_none());

    let evo_config = EvolutionConfig {
        total_time: 4.0,
        time_steps: 40,
        sampling: SamplingPolicy::Linear { points: 5 },
        ..EvolutionConfig::default()
    };
    let outcome = AdiabaticEvolution::new(&model, evo_config.clone()).unwrap().run().unwrap();
    report.evolution = Some(EvolutionSummary::new(&evo_config, &outcome));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    report.write_json(&path).unwrap();
    let back: RunReport = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let evolution = back.evolution.unwrap();
    assert_eq!(evolution.trace.len(), 5);
    for (a, b) in evolution.gap_trace.iter().zip(outcome.trace.gap_curve()) {
        assert!((a.0 - b.0).abs() < 1e-12 && (a.1 - b.1).abs() < 1e-12);
    }
    assert_eq!(evolution.gap_trace.len(), 5);
    assert_eq!(evolution.probabilities.len(), 8);
    assert_eq!(evolution.ground_states, vec![exact.ground_states[0].to_string()]);
}

#[test]
fn file_writer_reports_the_path_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let ok = dir.path().join("gap.csv");
    to_file(&ok, |w| write_curve(w, ["s", "gap"], &[(0.5, 1.0)])).unwrap();
    assert_eq!(std::fs::read_to_string(&ok).unwrap(), "s,gap\n0.5,1\n");

    let missing = dir.path().join("no-such-dir").join("gap.csv");
    let err = to_file(&missing, |w| write_curve(w, ["s", "gap"], &[])).unwrap_err();
    assert!(err.to_string().contains("gap.csv"));
}
