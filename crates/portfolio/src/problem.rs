//! Validated portfolio definitions.

use faer::{Mat, Side};
use ising::{IsingModel, Qubo, SpinConfiguration};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::asset::Asset;
use crate::builder::HamiltonianBuilder;
use crate::encoding::BinaryEncoding;
use crate::error::{ConfigResult, ConfigurationError};
use crate::metrics::PortfolioMetrics;

/// Relative tolerance for covariance symmetry and PSD checks.
const COVARIANCE_RTOL: f64 = 1e-9;

fn default_weight() -> f64 {
    1.0
}

/// Raw problem description as supplied by the market-data layer.
///
/// Bit-widths are signed so that zero and negative widths reach validation
/// and come back as [`ConfigurationError::InvalidBitWidth`]. When they are
/// omitted, each width is derived from budget and price with
/// [`auto_bit_width`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioInput {
    #[serde(default)]
    pub asset_ids: Vec<String>,
    pub expected_returns: Vec<f64>,
    pub covariance: Vec<Vec<f64>>,
    pub prices: Vec<f64>,
    pub budget: f64,
    #[serde(default)]
    pub bit_widths: Option<Vec<i64>>,
    #[serde(default = "default_weight")]
    pub risk_aversion: f64,
    #[serde(default = "default_weight")]
    pub budget_penalty: f64,
}

/// Bits needed to express `floor(budget / price)` shares.
///
/// `floor(log2(max_shares)) + 1`, or 1 when not even one share is
/// affordable.
pub fn auto_bit_width(budget: f64, price: f64) -> i64 {
    let max_shares = (budget / price).floor();
    if max_shares.is_nan() || max_shares < 1.0 {
        return 1;
    }
    let max_shares = max_shares.min(u64::MAX as f64) as u64;
    i64::from(u64::BITS - max_shares.leading_zeros())
}

/// A validated portfolio-selection problem.
///
/// Serializes as its [`PortfolioInput`], and deserializes through
/// [`PortfolioProblem::new`], so a stored problem is re-validated on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "PortfolioInput", try_from = "PortfolioInput")]
pub struct PortfolioProblem {
    assets: Vec<Asset>,
    covariance: Vec<Vec<f64>>,
    budget: f64,
    risk_aversion: f64,
    budget_penalty: f64,
    encoding: BinaryEncoding,
}

impl PortfolioProblem {
    pub fn new(input: PortfolioInput) -> ConfigResult<Self> {
        let n = input.expected_returns.len();
        if n == 0 {
            return Err(ConfigurationError::Empty);
        }
        check_len("prices", n, input.prices.len())?;
        check_len("covariance", n, input.covariance.len())?;
        for row in &input.covariance {
            check_len("covariance row", n, row.len())?;
        }

        let ids = if input.asset_ids.is_empty() {
            (0..n).map(|i| format!("asset-{i}")).collect()
        } else {
            check_len("asset_ids", n, input.asset_ids.len())?;
            input.asset_ids
        };

        if !input.budget.is_finite() {
            return Err(ConfigurationError::NonFinite { what: "budget" });
        }
        if input.budget <= 0.0 {
            return Err(ConfigurationError::NonPositiveBudget(input.budget));
        }
        check_weight("risk_aversion", input.risk_aversion)?;
        check_weight("budget_penalty", input.budget_penalty)?;
        validate_covariance(&input.covariance)?;

        let widths = match input.bit_widths {
            Some(w) => {
                check_len("bit_widths", n, w.len())?;
                w
            }
            None => input
                .prices
                .iter()
                .map(|&p| auto_bit_width(input.budget, p))
                .collect(),
        };

        let mut assets = Vec::with_capacity(n);
        for (i, id) in ids.into_iter().enumerate() {
            assets.push(Asset::new(id, input.expected_returns[i], input.prices[i], widths[i])?);
        }

        for a in &assets {
            let affordable = (input.budget / a.price()).floor();
            if (a.max_representable() as f64) < affordable {
                warn!(
                    asset = a.id(),
                    bits = a.bits(),
                    affordable,
                    "bit-width cannot represent every affordable holding"
                );
            }
        }

        let encoding = BinaryEncoding::new(&assets);
        Ok(Self {
            assets,
            covariance: input.covariance,
            budget: input.budget,
            risk_aversion: input.risk_aversion,
            budget_penalty: input.budget_penalty,
            encoding,
        })
    }

    /// Same problem with a different risk-aversion weight `α`.
    pub fn with_risk_aversion(&self, alpha: f64) -> ConfigResult<Self> {
        check_weight("risk_aversion", alpha)?;
        Ok(Self {
            risk_aversion: alpha,
            ..self.clone()
        })
    }

    /// Same problem with a different budget-penalty weight `λ`.
    pub fn with_budget_penalty(&self, lambda: f64) -> ConfigResult<Self> {
        check_weight("budget_penalty", lambda)?;
        Ok(Self {
            budget_penalty: lambda,
            ..self.clone()
        })
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn num_assets(&self) -> usize {
        self.assets.len()
    }

    pub fn covariance(&self) -> &[Vec<f64>] {
        &self.covariance
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    pub fn budget_penalty(&self) -> f64 {
        self.budget_penalty
    }

    pub fn encoding(&self) -> &BinaryEncoding {
        &self.encoding
    }

    /// Total spin count `N = Σ k_i`.
    pub fn num_spins(&self) -> usize {
        self.encoding.num_variables()
    }

    pub fn to_qubo(&self) -> Qubo {
        HamiltonianBuilder::new(self).qubo()
    }

    pub fn to_ising(&self) -> IsingModel {
        HamiltonianBuilder::new(self).ising()
    }

    pub fn decode_shares(&self, config: &SpinConfiguration) -> Vec<u64> {
        self.encoding.decode(config)
    }

    /// The financial objective `H(n)` evaluated on holding counts, one per
    /// asset.
    pub fn cost(&self, shares: &[u64]) -> ConfigResult<f64> {
        Ok(PortfolioMetrics::evaluate(self, shares)?.cost)
    }

    /// Read-out of the holdings encoded by `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` is shorter than the encoding, as
    /// [`BinaryEncoding::decode`] does.
    pub fn metrics(&self, config: &SpinConfiguration) -> PortfolioMetrics {
        PortfolioMetrics::compute(self, &self.decode_shares(config))
    }

    /// The input this problem was built from, with the resolved asset ids
    /// and bit-widths filled in.
    pub fn to_input(&self) -> PortfolioInput {
        PortfolioInput {
            asset_ids: self.assets.iter().map(|a| a.id().to_owned()).collect(),
            expected_returns: self.assets.iter().map(Asset::expected_return).collect(),
            covariance: self.covariance.clone(),
            prices: self.assets.iter().map(Asset::price).collect(),
            budget: self.budget,
            bit_widths: Some(self.assets.iter().map(|a| i64::from(a.bits())).collect()),
            risk_aversion: self.risk_aversion,
            budget_penalty: self.budget_penalty,
        }
    }
}

impl From<PortfolioProblem> for PortfolioInput {
    fn from(problem: PortfolioProblem) -> Self {
        problem.to_input()
    }
}

impl TryFrom<PortfolioInput> for PortfolioProblem {
    type Error = ConfigurationError;

    fn try_from(input: PortfolioInput) -> ConfigResult<Self> {
        Self::new(input)
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> ConfigResult<()> {
    if expected != found {
        return Err(ConfigurationError::DimensionMismatch { what, expected, found });
    }
    Ok(())
}

fn check_weight(what: &'static str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() {
        return Err(ConfigurationError::NonFinite { what });
    }
    if value < 0.0 {
        return Err(ConfigurationError::NegativeWeight { what, value });
    }
    Ok(())
}

fn validate_covariance(cov: &[Vec<f64>]) -> ConfigResult<()> {
    let n = cov.len();
    if cov.iter().flatten().any(|v| !v.is_finite()) {
        return Err(ConfigurationError::NonFinite { what: "covariance" });
    }

    let scale = cov.iter().flatten().fold(0.0f64, |m, v| m.max(v.abs()));
    let tol = COVARIANCE_RTOL * scale.max(1.0);

    for i in 0..n {
        for j in (i + 1)..n {
            if (cov[i][j] - cov[j][i]).abs() > tol {
                return Err(ConfigurationError::AsymmetricCovariance {
                    i,
                    j,
                    a: cov[i][j],
                    b: cov[j][i],
                });
            }
        }
    }

    let m = Mat::<f64>::from_fn(n, n, |i, j| cov[i][j]);
    let min_eigenvalue = m
        .selfadjoint_eigenvalues(Side::Lower)
        .into_iter()
        .fold(f64::INFINITY, f64::min);
    if min_eigenvalue < -tol {
        return Err(ConfigurationError::NotPositiveSemiDefinite { min_eigenvalue });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_width_covers_affordable_shares() {
        assert_eq!(auto_bit_width(100.0, 30.0), 2); // 3 shares
        assert_eq!(auto_bit_width(100.0, 25.0), 3); // 4 shares
        assert_eq!(auto_bit_width(100.0, 100.0), 1); // 1 share
        assert_eq!(auto_bit_width(100.0, 500.0), 1); // none affordable
        assert_eq!(auto_bit_width(1023.0, 1.0), 10);
    }
}
