//! Recorded evolution history and final results.

use ising::SpinConfiguration;
use serde::{Deserialize, Serialize};

use crate::spectrum::GapClass;

/// Spectrum (and, when evolving, state diagnostics) at one sampled `s`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionPoint {
    pub s: f64,
    /// `s * total_time`.
    pub time: f64,
    /// Lowest tracked eigenvalues of `H(s)`, ascending.
    pub eigenvalues: Vec<f64>,
    pub max_eigenvalue: f64,
    pub gap: f64,
    pub relative_gap: f64,
    pub gap_class: GapClass,
    /// Largest-weight basis state of the instantaneous ground state.
    pub dominant_state: SpinConfiguration,
    /// Squared overlap of `ψ(t)` with the instantaneous ground space.
    /// `None` for spectrum-only runs.
    pub ground_overlap: Option<f64>,
    pub norm: Option<f64>,
}

/// Append-only sequence of points in increasing `s`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionTrace {
    points: Vec<EvolutionPoint>,
}

impl EvolutionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, point: EvolutionPoint) {
        debug_assert!(self.points.last().map_or(true, |p| p.s < point.s));
        self.points.push(point);
    }

    pub fn points(&self) -> &[EvolutionPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn gap_curve(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.s, p.gap)).collect()
    }

    pub fn relative_gap_curve(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.s, p.relative_gap)).collect()
    }

    pub fn eigenvalue_curve(&self) -> Vec<(f64, Vec<f64>)> {
        self.points
            .iter()
            .map(|p| (p.s, p.eigenvalues.clone()))
            .collect()
    }

    /// Empty for spectrum-only traces.
    pub fn overlap_curve(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.ground_overlap.map(|o| (p.s, o)))
            .collect()
    }

    /// Point with the smallest gap; the earliest one on ties.
    pub fn min_gap(&self) -> Option<&EvolutionPoint> {
        self.points
            .iter()
            .reduce(|best, p| if p.gap < best.gap { p } else { best })
    }
}

/// Result of a full evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionOutcome {
    pub trace: EvolutionTrace,
    /// Minimum of the problem diagonal.
    pub ground_energy: f64,
    /// Basis states within the degeneracy tolerance of `ground_energy`,
    /// ascending by basis index.
    pub ground_states: Vec<SpinConfiguration>,
    /// Gap of `H_P` (`H(1)`).
    pub final_gap: f64,
    pub final_gap_class: GapClass,
    /// Probability of measuring `ψ(T)` in the ground space of `H_P`.
    pub ground_overlap: f64,
    pub dominant_state: SpinConfiguration,
    pub dominant_probability: f64,
    /// ⟨ψ(T)|H_P|ψ(T)⟩.
    pub energy_expectation: f64,
    /// ⟨s_q⟩ for every spin at `t = T`.
    pub magnetization: Vec<f64>,
    /// `|ψ_z(T)|²` per basis index.
    pub probabilities: Vec<f64>,
    pub steps: usize,
}

impl EvolutionOutcome {
    /// Whether the most probable final state is a ground state of `H_P`.
    pub fn found_ground_state(&self) -> bool {
        self.ground_states.contains(&self.dominant_state)
    }
}
