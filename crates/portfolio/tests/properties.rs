//! Randomized checks of the financial ↔ Ising correspondence.

use ising::SpinConfiguration;
use portfolio::{PortfolioInput, PortfolioProblem};
use proptest::prelude::*;

/// Random problems with a PSD covariance `A Aᵀ` and at most 8 spins.
fn arb_input() -> impl Strategy<Value = PortfolioInput> {
    (1usize..=3).prop_flat_map(|n| {
        (
            prop::collection::vec(-0.2f64..0.3, n),
            prop::collection::vec(-0.5f64..0.5, n * n),
            prop::collection::vec(1.0f64..50.0, n),
            10.0f64..200.0,
            prop::collection::vec(1i64..=(8 / n as i64).min(3), n),
            0.0f64..3.0,
            0.0f64..0.1,
        )
            .prop_map(move |(mu, a, prices, budget, bits, alpha, lambda)| {
                let mut cov = vec![vec![0.0; n]; n];
                for i in 0..n {
                    for j in 0..n {
                        cov[i][j] = (0..n).map(|k| a[i * n + k] * a[j * n + k]).sum();
                    }
                }
                PortfolioInput {
                    asset_ids: Vec::new(),
                    expected_returns: mu,
                    covariance: cov,
                    prices,
                    budget,
                    bit_widths: Some(bits),
                    risk_aversion: alpha,
                    budget_penalty: lambda,
                }
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn couplings_symmetric_zero_diagonal(input in arb_input()) {
        let model = PortfolioProblem::new(input).unwrap().to_ising();
        let n = model.num_spins();
        for i in 0..n {
            prop_assert_eq!(model.coupling(i, i), 0.0);
            for j in 0..n {
                prop_assert_eq!(model.coupling(i, j), model.coupling(j, i));
            }
        }
    }

    #[test]
    fn energy_matches_cost_on_all_configurations(input in arb_input()) {
        let problem = PortfolioProblem::new(input).unwrap();
        let model = problem.to_ising();
        let n = model.num_spins();
        for index in 0..(1usize << n) {
            let config = SpinConfiguration::from_basis_index(index, n);
            let cost = problem.cost(&problem.decode_shares(&config)).unwrap();
            let energy = model.energy(&config).unwrap();
            let scale = 1.0f64.max(cost.abs());
            prop_assert!((cost - energy).abs() <= 1e-9 * scale, "index {}: {} vs {}", index, cost, energy);
        }
    }
}
