//! Ising coefficients `(h, J, offset)`.

use serde::{Deserialize, Serialize};

use crate::error::{IsingError, IsingResult};
use crate::spin::SpinConfiguration;

/// Relative tolerance for the `J[i][j] == J[j][i]` check on caller input.
const SYMMETRY_RTOL: f64 = 1e-12;

/// Ising Hamiltonian over `n` spins.
///
/// `J` is stored dense and row-major with both triangles filled, so the
/// coupling row of a spin is a contiguous slice. The model is immutable once
/// built and is shared by reference between solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawIsingModel")]
pub struct IsingModel {
    h: Vec<f64>,
    j: Vec<f64>,
    offset: f64,
}

/// Wire form of [`IsingModel`]; deserialization goes through
/// [`IsingModel::from_dense`].
#[derive(Deserialize)]
struct RawIsingModel {
    h: Vec<f64>,
    j: Vec<f64>,
    offset: f64,
}

impl TryFrom<RawIsingModel> for IsingModel {
    type Error = IsingError;

    fn try_from(raw: RawIsingModel) -> IsingResult<Self> {
        Self::from_dense(raw.h, raw.j, raw.offset)
    }
}

impl IsingModel {
    /// Build from a field vector and a nested coupling matrix.
    pub fn new(h: Vec<f64>, j: Vec<Vec<f64>>, offset: f64) -> IsingResult<Self> {
        let n = h.len();
        if j.len() != n || j.iter().any(|row| row.len() != n) {
            return Err(IsingError::DimensionMismatch {
                spins: n,
                expected: n * n,
                found: j.iter().map(Vec::len).sum(),
            });
        }
        Self::from_dense(h, j.into_iter().flatten().collect(), offset)
    }

    /// Build from a field vector and a row-major `n * n` coupling buffer.
    pub fn from_dense(h: Vec<f64>, j: Vec<f64>, offset: f64) -> IsingResult<Self> {
        let n = h.len();
        if j.len() != n * n {
            return Err(IsingError::DimensionMismatch {
                spins: n,
                expected: n * n,
                found: j.len(),
            });
        }
        if h.iter().any(|v| !v.is_finite()) {
            return Err(IsingError::NonFinite { what: "local fields" });
        }
        if j.iter().any(|v| !v.is_finite()) {
            return Err(IsingError::NonFinite { what: "couplings" });
        }
        if !offset.is_finite() {
            return Err(IsingError::NonFinite { what: "offset" });
        }

        for a in 0..n {
            let diag = j[a * n + a];
            if diag != 0.0 {
                return Err(IsingError::NonZeroDiagonal { index: a, value: diag });
            }
            for b in (a + 1)..n {
                let (x, y) = (j[a * n + b], j[b * n + a]);
                let scale = 1.0f64.max(x.abs()).max(y.abs());
                if (x - y).abs() > SYMMETRY_RTOL * scale {
                    return Err(IsingError::AsymmetricCoupling { i: a, j: b, a: x, b: y });
                }
            }
        }

        Ok(Self { h, j, offset })
    }

    /// Caller guarantees `j` is `n * n`, symmetric, with a zero diagonal.
    pub(crate) fn from_parts(h: Vec<f64>, j: Vec<f64>, offset: f64) -> Self {
        debug_assert_eq!(j.len(), h.len() * h.len());
        Self { h, j, offset }
    }

    /// Model with no couplings and zero offset.
    pub fn fields_only(h: Vec<f64>) -> IsingResult<Self> {
        let n = h.len();
        Self::from_dense(h, vec![0.0; n * n], 0.0)
    }

    pub fn num_spins(&self) -> usize {
        self.h.len()
    }

    pub fn fields(&self) -> &[f64] {
        &self.h
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn coupling(&self, i: usize, j: usize) -> f64 {
        self.j[i * self.h.len() + j]
    }

    /// Row `i` of `J`, including the zero at position `i`.
    pub fn coupling_row(&self, i: usize) -> &[f64] {
        let n = self.h.len();
        &self.j[i * n..(i + 1) * n]
    }

    /// `J` as nested rows, for export.
    pub fn couplings(&self) -> Vec<Vec<f64>> {
        (0..self.h.len()).map(|i| self.coupling_row(i).to_vec()).collect()
    }

    /// Energy of a validated configuration.
    pub fn energy(&self, config: &SpinConfiguration) -> IsingResult<f64> {
        if config.len() != self.num_spins() {
            return Err(IsingError::LengthMismatch {
                expected: self.num_spins(),
                found: config.len(),
            });
        }
        Ok(self.energy_of(config.spins()))
    }

    /// Energy of a raw `±1` slice of the model's length.
    pub fn energy_of(&self, spins: &[i8]) -> f64 {
        let n = self.h.len();
        let mut e = self.offset;
        for i in 0..n {
            let si = f64::from(spins[i]);
            e += self.h[i] * si;
            let row = self.coupling_row(i);
            for k in (i + 1)..n {
                e += row[k] * si * f64::from(spins[k]);
            }
        }
        e
    }

    /// Effective field on spin `i`: `h_i + Σ_j J_ij s_j`.
    pub fn local_field(&self, spins: &[i8], i: usize) -> f64 {
        let row = self.coupling_row(i);
        self.h[i]
            + row
                .iter()
                .zip(spins)
                .map(|(&jij, &sj)| jij * f64::from(sj))
                .sum::<f64>()
    }

    /// Energy change from flipping spin `i` in `spins`.
    pub fn flip_delta(&self, spins: &[i8], i: usize) -> f64 {
        -2.0 * f64::from(spins[i]) * self.local_field(spins, i)
    }

    /// Largest `|h_i|` or `|J_ij|`; 0 for an empty model.
    pub fn max_abs_coefficient(&self) -> f64 {
        self.h
            .iter()
            .chain(self.j.iter())
            .fold(0.0f64, |m, v| m.max(v.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> IsingModel {
        IsingModel::new(vec![1.0, -1.0], vec![vec![0.0, -1.0], vec![-1.0, 0.0]], 0.5).unwrap()
    }

    #[test]
    fn energy_includes_offset() {
        let m = pair();
        // s = (+1, +1): 0.5 + 1 - 1 - 1
        assert!((m.energy_of(&[1, 1]) - (-0.5)).abs() < 1e-12);
        // s = (-1, +1): 0.5 - 1 - 1 + 1
        assert!((m.energy_of(&[-1, 1]) - (-0.5)).abs() < 1e-12);
    }

    #[test]
    fn flip_delta_matches_recomputation() {
        let m = pair();
        let s = [1i8, -1];
        for i in 0..2 {
            let mut t = s;
            t[i] = -t[i];
            let direct = m.energy_of(&t) - m.energy_of(&s);
            assert!((m.flip_delta(&s, i) - direct).abs() < 1e-12);
        }
    }

    #[test]
    fn rejects_asymmetric_and_diagonal() {
        let asym = IsingModel::new(vec![0.0, 0.0], vec![vec![0.0, 1.0], vec![2.0, 0.0]], 0.0);
        assert!(matches!(asym, Err(IsingError::AsymmetricCoupling { .. })));

        let diag = IsingModel::new(vec![0.0], vec![vec![3.0]], 0.0);
        assert!(matches!(diag, Err(IsingError::NonZeroDiagonal { index: 0, .. })));

        let ragged = IsingModel::new(vec![0.0, 0.0], vec![vec![0.0], vec![0.0, 0.0]], 0.0);
        assert!(matches!(ragged, Err(IsingError::DimensionMismatch { .. })));
    }

    #[test]
    fn deserialization_is_validated() {
        let back: IsingModel = serde_json::from_str(&serde_json::to_string(&pair()).unwrap()).unwrap();
        assert_eq!(back, pair());

        let short = serde_json::from_str::<IsingModel>(r#"{"h":[1,2],"j":[0.0],"offset":0}"#);
        assert!(short.unwrap_err().to_string().contains("expected 4"));

        let asym = r#"{"h":[0,0],"j":[0.0,1.0,2.0,0.0],"offset":0}"#;
        assert!(serde_json::from_str::<IsingModel>(asym).is_err());
    }
}
