//! Financial objective → QUBO → Ising coefficients.

use ising::{IsingModel, Qubo};
use tracing::info;

use crate::problem::PortfolioProblem;

/// Expands a [`PortfolioProblem`] into binary and spin form.
///
/// With bit weights `w_q = 2^k`, bit prices `c_q = p_a w_q`:
///
/// * `Q_qq = −μ_a w_q + α σ_aa w_q² + λ c_q² − 2λB c_q`
/// * `Q_qr = α (σ_ab + σ_ba) w_q w_r + 2λ c_q c_r` for `q < r`
/// * constant `λB²`
///
/// Every term is computed once; there is no iterative refinement.
pub struct HamiltonianBuilder<'a> {
    problem: &'a PortfolioProblem,
}

impl<'a> HamiltonianBuilder<'a> {
    pub fn new(problem: &'a PortfolioProblem) -> Self {
        Self { problem }
    }

    pub fn qubo(&self) -> Qubo {
        let p = self.problem;
        let vars = p.encoding().variables();
        let assets = p.assets();
        let cov = p.covariance();
        let alpha = p.risk_aversion();
        let lambda = p.budget_penalty();
        let budget = p.budget();

        let mut q = Qubo::new(vars.len());
        for (a, va) in vars.iter().enumerate() {
            let asset = &assets[va.asset];
            let ca = asset.price() * va.weight;

            let linear = -asset.expected_return() * va.weight
                + alpha * cov[va.asset][va.asset] * va.weight * va.weight
                + lambda * ca * ca
                - 2.0 * lambda * budget * ca;
            q.add(a, a, linear);

            for (b, vb) in vars.iter().enumerate().skip(a + 1) {
                let cb = assets[vb.asset].price() * vb.weight;
                let risk = alpha * (cov[va.asset][vb.asset] + cov[vb.asset][va.asset]);
                q.add(a, b, risk * va.weight * vb.weight + 2.0 * lambda * ca * cb);
            }
        }
        q.add_constant(lambda * budget * budget);
        q
    }

    pub fn ising(&self) -> IsingModel {
        let model = self.qubo().to_ising();
        info!(
            assets = self.problem.num_assets(),
            spins = model.num_spins(),
            alpha = self.problem.risk_aversion(),
            lambda = self.problem.budget_penalty(),
            "built Ising coefficients"
        );
        model
    }
}
