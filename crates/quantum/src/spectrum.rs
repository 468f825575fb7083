//! Exact diagonalization of `H(s)` and gap classification.

use faer::{Mat, Side};
use serde::{Deserialize, Serialize};

use crate::C64;

/// How trustworthy a reported gap is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapClass {
    /// Gap at or above the tolerance.
    Resolved,
    /// Exact tie between the two lowest levels.
    Degenerate,
    /// Non-zero but below the tolerance; the lowest levels cannot be told apart
    /// reliably.
    Ambiguous,
}

impl GapClass {
    pub fn classify(gap: f64, tolerance: f64) -> Self {
        if gap == 0.0 {
            GapClass::Degenerate
        } else if gap < tolerance {
            GapClass::Ambiguous
        } else {
            GapClass::Resolved
        }
    }
}

/// Eigenvalues in ascending order with matching orthonormal eigenvectors.
#[derive(Debug, Clone)]
pub struct Eigensystem {
    values: Vec<f64>,
    /// Row-major: entry `[i * dim + k]` is component `i` of eigenvector `k`.
    vectors: Vec<f64>,
}

impl Eigensystem {
    /// Decompose a real symmetric matrix. Only the lower triangle is read.
    pub fn of(h: &Mat<f64>) -> Self {
        let dim = h.nrows();
        let evd = h.selfadjoint_eigendecomposition(Side::Lower);
        let s = evd.s().column_vector();
        let u = evd.u();

        let mut order: Vec<usize> = (0..dim).collect();
        order.sort_by(|&a, &b| s.read(a).total_cmp(&s.read(b)));

        let values = order.iter().map(|&k| s.read(k)).collect();
        let mut vectors = vec![0.0; dim * dim];
        for i in 0..dim {
            for (k, &src) in order.iter().enumerate() {
                vectors[i * dim + k] = u.read(i, src);
            }
        }
        Self { values, vectors }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn ground_energy(&self) -> f64 {
        self.values[0]
    }

    /// `E_1 - E_0`, clamped at zero; 0 for a one-dimensional space.
    pub fn gap(&self) -> f64 {
        match self.values.as_slice() {
            [e0, e1, ..] => (e1 - e0).max(0.0),
            _ => 0.0,
        }
    }

    /// Gap divided by the spectral width `E_max - E_0`, or 0 for a flat
    /// spectrum.
    pub fn relative_gap(&self) -> f64 {
        let width = self.values[self.dim() - 1] - self.values[0];
        if width > 1e-12 {
            self.gap() / width
        } else {
            0.0
        }
    }

    pub fn vector(&self, k: usize) -> Vec<f64> {
        let dim = self.dim();
        (0..dim).map(|i| self.vectors[i * dim + k]).collect()
    }

    /// Basis index carrying the largest weight in the ground state.
    pub fn dominant_state(&self) -> usize {
        let dim = self.dim();
        (0..dim)
            .max_by(|&a, &b| {
                let wa = self.vectors[a * dim].powi(2);
                let wb = self.vectors[b * dim].powi(2);
                wa.total_cmp(&wb).then(b.cmp(&a))
            })
            .unwrap_or(0)
    }

    /// Number of levels within `tolerance` of the ground energy.
    pub fn ground_multiplicity(&self, tolerance: f64) -> usize {
        let e0 = self.values[0];
        self.values.iter().take_while(|&&e| e - e0 <= tolerance).count()
    }

    /// Squared overlap of `psi` with the span of the first `levels`
    /// eigenvectors.
    pub fn overlap(&self, psi: &[C64], levels: usize) -> f64 {
        let dim = self.dim();
        (0..levels.min(dim))
            .map(|k| {
                let amp: C64 = (0..dim).map(|i| psi[i] * self.vectors[i * dim + k]).sum();
                amp.norm_sqr()
            })
            .sum()
    }

    /// `exp(-i H dt) ψ`, exact for the decomposed `H`.
    pub fn propagate(&self, psi: &[C64], dt: f64) -> Vec<C64> {
        let dim = self.dim();
        let coeffs: Vec<C64> = (0..dim)
            .map(|k| {
                let amp: C64 = (0..dim).map(|i| psi[i] * self.vectors[i * dim + k]).sum();
                amp * C64::from_polar(1.0, -self.values[k] * dt)
            })
            .collect();

        (0..dim)
            .map(|i| {
                let row = &self.vectors[i * dim..(i + 1) * dim];
                row.iter().zip(&coeffs).map(|(&u, &c)| c * u).sum()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_values_and_orthonormal_vectors() {
        let h = Mat::from_fn(3, 3, |i, j| match (i, j) {
            (0, 0) => 2.0,
            (1, 1) => -1.0,
            (2, 2) => 0.5,
            (0, 1) | (1, 0) => 0.3,
            _ => 0.0,
        });
        let eig = Eigensystem::of(&h);
        assert!(eig.values().windows(2).all(|w| w[0] <= w[1]));
        for a in 0..3 {
            for b in 0..3 {
                let dot: f64 = eig.vector(a).iter().zip(eig.vector(b)).map(|(x, y)| x * y).sum();
                let expected = if a == b { 1.0 } else { 0.0 };
                assert!((dot - expected).abs() < 1e-10);
            }
        }
        assert_eq!(eig.dominant_state(), 1);
    }

    #[test]
    fn propagation_is_unitary_and_phases_eigenstates() {
        let h = Mat::from_fn(2, 2, |i, j| if i == j { 0.0 } else { -1.0 });
        let eig = Eigensystem::of(&h);
        let ground: Vec<C64> = eig.vector(0).into_iter().map(|v| C64::new(v, 0.0)).collect();
        let evolved = eig.propagate(&ground, 0.7);
        let norm: f64 = evolved.iter().map(|a| a.norm_sqr()).sum();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!((eig.overlap(&evolved, 1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn classify_gaps() {
        assert_eq!(GapClass::classify(0.0, 1e-9), GapClass::Degenerate);
        assert_eq!(GapClass::classify(1e-12, 1e-9), GapClass::Ambiguous);
        assert_eq!(GapClass::classify(0.5, 1e-9), GapClass::Resolved);
    }
}
