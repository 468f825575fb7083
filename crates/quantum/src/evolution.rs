//! Time evolution along the interpolation path.
//!
//! `s(t) = t / T`. The uniform integration grid is merged with the sample
//! times so every recorded point sees the state at exactly its `s`. The
//! state norm is checked after every step.

use ising::{IsingModel, SpinConfiguration};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{EvolutionError, EvolutionResult};
use crate::hamiltonian::{AdiabaticHamiltonian, Mixer};
use crate::observables;
use crate::sampling::SamplingPolicy;
use crate::spectrum::{Eigensystem, GapClass};
use crate::trace::{EvolutionOutcome, EvolutionPoint, EvolutionTrace};
use crate::C64;

/// Largest problem the engine accepts unless configured otherwise.
pub const DEFAULT_MAX_SPINS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Integrator {
    /// `exp(-i H(s_mid) Δt)` through an eigendecomposition of the midpoint
    /// Hamiltonian. Unitary up to rounding.
    #[default]
    ExactExponential,
    /// Classic fourth-order Runge-Kutta on the sparse operator. Not unitary;
    /// a step that is too long for the spectrum shows up as norm drift.
    RungeKutta4,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub total_time: f64,
    pub time_steps: usize,
    pub sampling: SamplingPolicy,
    pub mixer: Mixer,
    pub integrator: Integrator,
    pub max_spins: usize,
    /// Number of lowest eigenvalues kept per sample.
    pub levels: usize,
    pub norm_tolerance: f64,
    /// Energies closer than this to the minimum belong to the ground space.
    pub degeneracy_tolerance: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            total_time: 10.0,
            time_steps: 100,
            sampling: SamplingPolicy::default(),
            mixer: Mixer::default(),
            integrator: Integrator::default(),
            max_spins: DEFAULT_MAX_SPINS,
            levels: 4,
            norm_tolerance: 1e-8,
            degeneracy_tolerance: 1e-9,
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> EvolutionResult<()> {
        if !(self.total_time.is_finite() && self.total_time > 0.0) {
            return Err(EvolutionError::NonPositiveTime(self.total_time));
        }
        if self.time_steps == 0 {
            return Err(EvolutionError::ZeroSteps);
        }
        if self.levels < 2 {
            return Err(EvolutionError::TooFewLevels(self.levels));
        }
        for (what, value) in [
            ("norm_tolerance", self.norm_tolerance),
            ("degeneracy_tolerance", self.degeneracy_tolerance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(EvolutionError::InvalidTolerance { what, value });
            }
        }
        self.sampling.validate()
    }
}

/// A validated problem ready to be analysed or evolved.
#[derive(Debug, Clone)]
pub struct AdiabaticEvolution {
    config: EvolutionConfig,
    hamiltonian: AdiabaticHamiltonian,
}

impl AdiabaticEvolution {
    /// Validates `config` and the problem size before building anything of
    /// size `2^N`.
    pub fn new(model: &IsingModel, config: EvolutionConfig) -> EvolutionResult<Self> {
        config.validate()?;
        let hamiltonian = AdiabaticHamiltonian::new(model, &config.mixer, config.max_spins)?;
        Ok(Self {
            config,
            hamiltonian,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn hamiltonian(&self) -> &AdiabaticHamiltonian {
        &self.hamiltonian
    }

    /// Spectrum at every sample point without evolving a state.
    pub fn analyze_path(&self) -> EvolutionResult<EvolutionTrace> {
        let samples = self.config.sampling.sample_points()?;
        info!(
            spins = self.hamiltonian.num_spins(),
            samples = samples.len(),
            "analysing spectral path"
        );
        let mut trace = EvolutionTrace::new();
        for &s in &samples {
            trace.push(self.sample_point(s, None));
        }
        log_min_gap(&trace, self.config.degeneracy_tolerance);
        Ok(trace)
    }

    /// Evolve the ground state of `H_0` to `t = T` and report the spectrum
    /// and state diagnostics along the way.
    pub fn run(&self) -> EvolutionResult<EvolutionOutcome> {
        let samples = self.config.sampling.sample_points()?;
        let grid = self.time_grid(&samples);
        info!(
            spins = self.hamiltonian.num_spins(),
            dim = self.hamiltonian.dim(),
            steps = grid.len() - 1,
            samples = samples.len(),
            integrator = ?self.config.integrator,
            "starting adiabatic evolution"
        );

        let mut psi = self.hamiltonian.initial_state();
        let mut trace = EvolutionTrace::new();
        if let Some(j) = grid[0].1 {
            let norm = observables::norm(&psi);
            trace.push(self.sample_point(samples[j], Some((psi.as_slice(), norm))));
        }

        let mut steps = 0;
        for window in grid.windows(2) {
            let (t0, _) = window[0];
            let (t1, sample) = window[1];
            psi = self.step(&psi, t0, t1);
            steps += 1;

            let norm = observables::norm(&psi);
            if !norm.is_finite() || (norm - 1.0).abs() > self.config.norm_tolerance {
                warn!(step = steps, time = t1, norm, "state norm drifted, aborting run");
                return Err(EvolutionError::NumericalInstability {
                    step: steps,
                    time: t1,
                    norm,
                });
            }
            if let Some(j) = sample {
                trace.push(self.sample_point(samples[j], Some((psi.as_slice(), norm))));
            }
        }
        log_min_gap(&trace, self.config.degeneracy_tolerance);

        let outcome = self.finish(trace, &psi, steps);
        info!(
            ground_energy = outcome.ground_energy,
            ground_overlap = outcome.ground_overlap,
            dominant = %outcome.dominant_state,
            "adiabatic evolution finished"
        );
        Ok(outcome)
    }

    /// Uniform steps plus sample times, ascending. Each entry carries the
    /// index of the sample recorded there, if any.
    fn time_grid(&self, samples: &[f64]) -> Vec<(f64, Option<usize>)> {
        let total = self.config.total_time;
        let m = self.config.time_steps;
        let mut events: Vec<(f64, Option<usize>)> = (0..=m)
            .map(|k| (total * k as f64 / m as f64, None))
            .chain(samples.iter().enumerate().map(|(j, &s)| (s * total, Some(j))))
            .collect();
        events.sort_by(|a, b| a.0.total_cmp(&b.0));

        let eps = 1e-12 * total;
        let mut grid: Vec<(f64, Option<usize>)> = Vec::with_capacity(events.len());
        for (t, sample) in events {
            match grid.last_mut() {
                Some(last) if t - last.0 <= eps && !(last.1.is_some() && sample.is_some()) => {
                    last.1 = last.1.or(sample);
                }
                _ => grid.push((t, sample)),
            }
        }
        grid
    }

    fn step(&self, psi: &[C64], t0: f64, t1: f64) -> Vec<C64> {
        let total = self.config.total_time;
        let dt = t1 - t0;
        match self.config.integrator {
            Integrator::ExactExponential => {
                let s_mid = 0.5 * (t0 + t1) / total;
                Eigensystem::of(&self.hamiltonian.dense(s_mid)).propagate(psi, dt)
            }
            Integrator::RungeKutta4 => self.rk4(psi, t0 / total, t1 / total, dt),
        }
    }

    fn rk4(&self, psi: &[C64], s0: f64, s1: f64, dt: f64) -> Vec<C64> {
        let dim = psi.len();
        let minus_i = C64::new(0.0, -1.0);
        let deriv = |s: f64, x: &[C64]| -> Vec<C64> {
            let mut out = vec![C64::new(0.0, 0.0); dim];
            self.hamiltonian.apply(s, x, &mut out);
            for v in out.iter_mut() {
                *v *= minus_i;
            }
            out
        };
        let shifted = |k: &[C64], c: f64| -> Vec<C64> {
            psi.iter().zip(k).map(|(&p, &d)| p + d * c).collect()
        };

        let s_mid = 0.5 * (s0 + s1);
        let k1 = deriv(s0, psi);
        let k2 = deriv(s_mid, &shifted(&k1, 0.5 * dt));
        let k3 = deriv(s_mid, &shifted(&k2, 0.5 * dt));
        let k4 = deriv(s1, &shifted(&k3, dt));

        (0..dim)
            .map(|i| psi[i] + (k1[i] + k2[i] * 2.0 + k3[i] * 2.0 + k4[i]) * (dt / 6.0))
            .collect()
    }

    fn sample_point(&self, s: f64, state: Option<(&[C64], f64)>) -> EvolutionPoint {
        let eig = Eigensystem::of(&self.hamiltonian.dense(s));
        let tol = self.config.degeneracy_tolerance;
        let levels = self.config.levels.min(eig.dim());
        let gap = eig.gap();
        let point = EvolutionPoint {
            s,
            time: s * self.config.total_time,
            eigenvalues: eig.values()[..levels].to_vec(),
            max_eigenvalue: eig.values()[eig.dim() - 1],
            gap,
            relative_gap: eig.relative_gap(),
            gap_class: GapClass::classify(gap, tol),
            dominant_state: SpinConfiguration::from_basis_index(
                eig.dominant_state(),
                self.hamiltonian.num_spins(),
            ),
            ground_overlap: state.map(|(psi, _)| eig.overlap(psi, eig.ground_multiplicity(tol))),
            norm: state.map(|(_, norm)| norm),
        };
        debug!(
            s,
            gap = point.gap,
            ground = point.eigenvalues[0],
            overlap = ?point.ground_overlap,
            "sampled spectrum"
        );
        point
    }

    fn finish(&self, trace: EvolutionTrace, psi: &[C64], steps: usize) -> EvolutionOutcome {
        let n = self.hamiltonian.num_spins();
        let diagonal = self.hamiltonian.problem_diagonal();
        let tol = self.config.degeneracy_tolerance;

        let mut sorted = diagonal.to_vec();
        sorted.sort_by(f64::total_cmp);
        let ground_energy = sorted[0];
        let final_gap = match sorted.as_slice() {
            [e0, e1, ..] => e1 - e0,
            _ => 0.0,
        };
        let final_gap_class = GapClass::classify(final_gap, tol);
        if final_gap_class != GapClass::Resolved {
            warn!(
                gap = final_gap,
                class = ?final_gap_class,
                "problem ground state is not unique within tolerance"
            );
        }

        let ground: Vec<usize> = (0..diagonal.len())
            .filter(|&z| diagonal[z] - ground_energy <= tol)
            .collect();
        let probabilities = observables::probabilities(psi);
        let ground_overlap = ground.iter().map(|&z| probabilities[z]).sum();
        let dominant = observables::most_probable(psi);

        EvolutionOutcome {
            trace,
            ground_energy,
            ground_states: ground
                .iter()
                .map(|&z| SpinConfiguration::from_basis_index(z, n))
                .collect(),
            final_gap,
            final_gap_class,
            ground_overlap,
            dominant_state: SpinConfiguration::from_basis_index(dominant, n),
            dominant_probability: probabilities[dominant],
            energy_expectation: observables::expect_diagonal(psi, diagonal),
            magnetization: (0..n).map(|q| observables::expect_spin(psi, q)).collect(),
            probabilities,
            steps,
        }
    }
}

fn log_min_gap(trace: &EvolutionTrace, tolerance: f64) {
    if let Some(p) = trace.min_gap() {
        let class = GapClass::classify(p.gap, tolerance);
        if class == GapClass::Resolved {
            info!(s = p.s, gap = p.gap, "minimum gap along path");
        } else {
            warn!(s = p.s, gap = p.gap, class = ?class, "minimum gap is unresolved");
        }
    }
}
