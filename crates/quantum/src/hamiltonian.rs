//! Interpolated Hamiltonian `H(s) = (1 - s) H_0 + s H_P`.

use faer::Mat;
use ising::{basis_energies, IsingModel};
use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, EvolutionResult};
use crate::C64;

/// Transverse-field driver `H_0 = -Σ_q g_q X_q`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mixer {
    /// Same strength `g` on every spin.
    TransverseField(f64),
    /// One strength per spin.
    PerSpin(Vec<f64>),
}

impl Default for Mixer {
    fn default() -> Self {
        Mixer::TransverseField(1.0)
    }
}

impl Mixer {
    /// Validated per-spin strengths for an `n`-spin problem.
    pub fn strengths(&self, n: usize) -> EvolutionResult<Vec<f64>> {
        let g = match self {
            Mixer::TransverseField(g) => vec![*g; n],
            Mixer::PerSpin(g) => {
                if g.len() != n {
                    return Err(EvolutionError::MixerLength {
                        expected: n,
                        found: g.len(),
                    });
                }
                g.clone()
            }
        };
        if let Some((spin, &value)) = g
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v == 0.0)
        {
            return Err(EvolutionError::InvalidMixerStrength { spin, value });
        }
        Ok(g)
    }
}

/// Index-based operator: the problem part is a diagonal vector and the
/// mixer acts by flipping bit `q` of the basis index. Nothing of size
/// `dim × dim` is stored.
#[derive(Debug, Clone)]
pub struct AdiabaticHamiltonian {
    n: usize,
    problem: Vec<f64>,
    mixer: Vec<f64>,
}

impl AdiabaticHamiltonian {
    /// Checks the size limit before computing the `2^N` diagonal.
    pub fn new(model: &IsingModel, mixer: &Mixer, max_spins: usize) -> EvolutionResult<Self> {
        let n = model.num_spins();
        if n == 0 {
            return Err(EvolutionError::EmptyModel);
        }
        if n > max_spins || n >= usize::BITS as usize {
            return Err(EvolutionError::ProblemTooLarge { spins: n, max_spins });
        }
        let mixer = mixer.strengths(n)?;
        Ok(Self {
            n,
            problem: basis_energies(model),
            mixer,
        })
    }

    pub fn num_spins(&self) -> usize {
        self.n
    }

    /// Hilbert-space dimension `2^N`.
    pub fn dim(&self) -> usize {
        self.problem.len()
    }

    /// `H_P[z, z]` for every basis index `z`.
    pub fn problem_diagonal(&self) -> &[f64] {
        &self.problem
    }

    pub fn mixer_strengths(&self) -> &[f64] {
        &self.mixer
    }

    /// `out = H(s) ψ`.
    pub fn apply(&self, s: f64, psi: &[C64], out: &mut [C64]) {
        debug_assert_eq!(psi.len(), self.dim());
        debug_assert_eq!(out.len(), self.dim());
        let drive = 1.0 - s;
        for (z, o) in out.iter_mut().enumerate() {
            let mut acc = psi[z] * (s * self.problem[z]);
            for (q, &g) in self.mixer.iter().enumerate() {
                acc -= psi[z ^ (1 << q)] * (drive * g);
            }
            *o = acc;
        }
    }

    /// Dense real symmetric matrix of `H(s)`, for diagonalization.
    pub fn dense(&self, s: f64) -> Mat<f64> {
        let drive = 1.0 - s;
        let mut h = Mat::<f64>::zeros(self.dim(), self.dim());
        for z in 0..self.dim() {
            h.write(z, z, s * self.problem[z]);
            for (q, &g) in self.mixer.iter().enumerate() {
                h.write(z, z ^ (1 << q), -drive * g);
            }
        }
        h
    }

    /// Ground state of `H_0`: the product of `|+⟩` (or `|-⟩` where
    /// `g_q < 0`) on every spin.
    pub fn initial_state(&self) -> Vec<C64> {
        let amp = (self.dim() as f64).sqrt().recip();
        (0..self.dim())
            .map(|z| {
                let negative = self
                    .mixer
                    .iter()
                    .enumerate()
                    .filter(|&(q, &g)| g < 0.0 && (z >> q) & 1 == 1)
                    .count();
                let sign = if negative % 2 == 0 { 1.0 } else { -1.0 };
                C64::new(sign * amp, 0.0)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> IsingModel {
        IsingModel::new(vec![0.5, -0.25], vec![vec![0.0, 1.0], vec![1.0, 0.0]], 0.1).unwrap()
    }

    #[test]
    fn apply_matches_dense() {
        let h = AdiabaticHamiltonian::new(&pair(), &Mixer::PerSpin(vec![1.0, 0.7]), 12).unwrap();
        let psi: Vec<C64> = (0..4).map(|z| C64::new(z as f64 + 1.0, 0.5 * z as f64)).collect();
        let s = 0.3;
        let mut out = vec![C64::new(0.0, 0.0); 4];
        h.apply(s, &psi, &mut out);

        let dense = h.dense(s);
        for i in 0..4 {
            let expected: C64 = (0..4).map(|j| psi[j] * dense.read(i, j)).sum();
            assert!((out[i] - expected).norm() < 1e-12);
        }
    }

    #[test]
    fn dense_is_symmetric_and_endpoints_are_pure() {
        let h = AdiabaticHamiltonian::new(&pair(), &Mixer::default(), 12).unwrap();
        let m = h.dense(0.42);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.read(i, j), m.read(j, i));
            }
        }
        let end = h.dense(1.0);
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { h.problem_diagonal()[i] } else { 0.0 };
                assert_eq!(end.read(i, j), expected);
            }
        }
        assert_eq!(h.dense(0.0).read(0, 0), 0.0);
    }

    #[test]
    fn rejects_bad_mixers() {
        let zero = AdiabaticHamiltonian::new(&pair(), &Mixer::PerSpin(vec![1.0, 0.0]), 12);
        assert!(matches!(zero, Err(EvolutionError::InvalidMixerStrength { spin: 1, .. })));

        let short = AdiabaticHamiltonian::new(&pair(), &Mixer::PerSpin(vec![1.0]), 12);
        assert!(matches!(short, Err(EvolutionError::MixerLength { expected: 2, found: 1 })));
    }

    #[test]
    fn initial_state_is_normalized_and_signed() {
        let h = AdiabaticHamiltonian::new(&pair(), &Mixer::PerSpin(vec![1.0, -1.0]), 12).unwrap();
        let psi = h.initial_state();
        let norm: f64 = psi.iter().map(|a| a.norm_sqr()).sum();
        assert!((norm - 1.0).abs() < 1e-12);
        assert!(psi[0].re > 0.0 && psi[1].re > 0.0);
        assert!(psi[2].re < 0.0 && psi[3].re < 0.0);
    }
}
