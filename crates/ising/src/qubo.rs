//! Quadratic binary form and its exact Ising image.

use serde::Serialize;

use crate::model::IsingModel;

/// `f(x) = constant + Σ_{i≤j} Q_ij x_i x_j` over bits `x_i ∈ {0, 1}`.
///
/// Only the upper triangle is stored; [`Qubo::add`] folds `(j, i)` onto
/// `(i, j)`, so contributions to the same pair always aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Qubo {
    n: usize,
    q: Vec<f64>,
    constant: f64,
}

impl Qubo {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            q: vec![0.0; n * n],
            constant: 0.0,
        }
    }

    pub fn num_variables(&self) -> usize {
        self.n
    }

    pub fn add(&mut self, i: usize, j: usize, value: f64) {
        let (a, b) = if i <= j { (i, j) } else { (j, i) };
        self.q[a * self.n + b] += value;
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// Upper-triangle coefficient for the unordered pair `{i, j}`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (a, b) = if i <= j { (i, j) } else { (j, i) };
        self.q[a * self.n + b]
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn evaluate(&self, bits: &[u8]) -> f64 {
        let mut v = self.constant;
        for i in 0..self.n {
            if bits[i] == 0 {
                continue;
            }
            for j in i..self.n {
                if bits[j] != 0 {
                    v += self.q[i * self.n + j];
                }
            }
        }
        v
    }

    /// Substitute `x = (s + 1) / 2`.
    ///
    /// `h_i = Q_ii/2 + Σ_{j≠i} Q_{ij}/4`, `J_ij = Q_ij/4`, and the offset
    /// collects every constant so that energies agree exactly.
    pub fn to_ising(&self) -> IsingModel {
        let n = self.n;
        let mut h = vec![0.0; n];
        let mut j = vec![0.0; n * n];
        let mut offset = self.constant;

        for a in 0..n {
            let diag = self.q[a * n + a];
            h[a] += diag / 2.0;
            offset += diag / 2.0;

            for b in (a + 1)..n {
                let quarter = self.q[a * n + b] / 4.0;
                if quarter == 0.0 {
                    continue;
                }
                h[a] += quarter;
                h[b] += quarter;
                j[a * n + b] += quarter;
                j[b * n + a] += quarter;
                offset += quarter;
            }
        }

        IsingModel::from_parts(h, j, offset)
    }
}
