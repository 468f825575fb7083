use serde::{Deserialize, Serialize};

use crate::error::{ConfigResult, ConfigurationError};
use crate::problem::PortfolioProblem;

/// Financial read-out of a holding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub shares: Vec<u64>,
    /// `Σ μ_i n_i`
    pub expected_return: f64,
    /// `Σ σ_ij n_i n_j`
    pub variance: f64,
    /// `Σ p_i n_i`
    pub spent: f64,
    /// `B − spent`
    pub budget_residual: f64,
    /// Full objective `−return + α variance + λ residual²`.
    pub cost: f64,
}

impl PortfolioMetrics {
    /// Evaluate one holding count per asset.
    pub fn evaluate(problem: &PortfolioProblem, shares: &[u64]) -> ConfigResult<Self> {
        if shares.len() != problem.num_assets() {
            return Err(ConfigurationError::DimensionMismatch {
                what: "shares",
                expected: problem.num_assets(),
                found: shares.len(),
            });
        }
        Ok(Self::compute(problem, shares))
    }

    /// `shares.len()` equals the asset count.
    pub(crate) fn compute(problem: &PortfolioProblem, shares: &[u64]) -> Self {
        let assets = problem.assets();
        let cov = problem.covariance();
        let n: Vec<f64> = shares.iter().map(|&s| s as f64).collect();

        let expected_return: f64 = assets.iter().zip(&n).map(|(a, x)| a.expected_return() * x).sum();
        let spent: f64 = assets.iter().zip(&n).map(|(a, x)| a.price() * x).sum();

        let mut variance = 0.0;
        for (i, xi) in n.iter().enumerate() {
            for (j, xj) in n.iter().enumerate() {
                variance += cov[i][j] * xi * xj;
            }
        }

        let budget_residual = problem.budget() - spent;
        let cost = -expected_return
            + problem.risk_aversion() * variance
            + problem.budget_penalty() * budget_residual * budget_residual;

        Self {
            shares: shares.to_vec(),
            expected_return,
            variance,
            spent,
            budget_residual,
            cost,
        }
    }
}
