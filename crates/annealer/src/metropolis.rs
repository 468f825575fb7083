//! A single annealing trial.
//!
//! `Initialized → (per step, per sweep, per spin: propose → evaluate →
//! accept/reject) → Terminated`. The working buffer is private to the trial;
//! the caller only ever sees the finished [`SpinConfiguration`].

use ising::{IsingModel, SpinConfiguration};
use rng::StreamRng;
use serde::{Deserialize, Serialize};

use crate::schedule::AnnealingSchedule;

/// Upper bound on greedy polishing passes.
const MAX_POLISH_PASSES: usize = 10_000;

/// Result of one trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub configuration: SpinConfiguration,
    pub energy: f64,
    pub accepted: u64,
    pub rejected: u64,
    /// Accept/reject decision of every proposal, in order, when recorded.
    pub decisions: Option<Vec<bool>>,
}

/// Metropolis rule. At zero temperature every uphill move is rejected
/// without evaluating the exponential; a uniform draw is consumed only for
/// uphill moves at positive temperature.
pub fn metropolis_accept(delta: f64, temperature: f64, rng: &mut StreamRng) -> bool {
    if delta <= 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.next_f64(b"METROPOLIS") < (-delta / temperature).exp()
}

/// Spins plus cached effective fields `f_i = h_i + Σ_j J_ij s_j`, so a flip
/// is evaluated in O(1) and applied in O(N).
struct Sweeper<'m> {
    model: &'m IsingModel,
    spins: Vec<i8>,
    fields: Vec<f64>,
    order: Vec<usize>,
    accepted: u64,
    rejected: u64,
    decisions: Option<Vec<bool>>,
}

impl<'m> Sweeper<'m> {
    fn new(model: &'m IsingModel, spins: Vec<i8>, record: bool) -> Self {
        let n = spins.len();
        let fields = (0..n).map(|i| model.local_field(&spins, i)).collect();
        Self {
            model,
            spins,
            fields,
            order: (0..n).collect(),
            accepted: 0,
            rejected: 0,
            decisions: record.then(Vec::new),
        }
    }

    #[inline]
    fn delta(&self, i: usize) -> f64 {
        -2.0 * f64::from(self.spins[i]) * self.fields[i]
    }

    fn flip(&mut self, i: usize) {
        let change = -2.0 * f64::from(self.spins[i]);
        self.spins[i] = -self.spins[i];
        for (f, &jij) in self.fields.iter_mut().zip(self.model.coupling_row(i)) {
            *f += jij * change;
        }
    }

    fn sweep(&mut self, temperature: f64, randomize: bool, rng: &mut StreamRng) {
        if randomize {
            rng.shuffle(&mut self.order, b"ORDER");
        }
        for k in 0..self.order.len() {
            let i = self.order[k];
            let accept = metropolis_accept(self.delta(i), temperature, rng);
            if accept {
                self.flip(i);
                self.accepted += 1;
            } else {
                self.rejected += 1;
            }
            if let Some(d) = self.decisions.as_mut() {
                d.push(accept);
            }
        }
    }

    /// Strictly downhill single flips until none remains.
    fn polish(&mut self) {
        let eps = 1e-12 * (1.0 + self.model.max_abs_coefficient());
        for _ in 0..MAX_POLISH_PASSES {
            let mut improved = false;
            for i in 0..self.spins.len() {
                if self.delta(i) < -eps {
                    self.flip(i);
                    improved = true;
                }
            }
            if !improved {
                return;
            }
        }
    }

    fn finish(self) -> TrialOutcome {
        let energy = self.model.energy_of(&self.spins);
        TrialOutcome {
            configuration: SpinConfiguration::from_signs(&self.spins),
            energy,
            accepted: self.accepted,
            rejected: self.rejected,
            decisions: self.decisions,
        }
    }
}

/// Run one trial from `initial`, or from a uniform random configuration
/// drawn from `rng` when `initial` is `None`.
///
/// An empty schedule returns the initial configuration untouched; polishing
/// only follows a non-empty schedule.
pub fn run_trial(
    model: &IsingModel,
    schedule: &AnnealingSchedule,
    initial: Option<&SpinConfiguration>,
    rng: &mut StreamRng,
    randomize_order: bool,
    polish: bool,
    record_decisions: bool,
) -> TrialOutcome {
    let spins = match initial {
        Some(c) => c.spins().to_vec(),
        None => (0..model.num_spins()).map(|_| rng.next_spin(b"INIT")).collect(),
    };

    let mut sweeper = Sweeper::new(model, spins, record_decisions);
    for step in schedule.steps() {
        for _ in 0..step.sweeps {
            sweeper.sweep(step.temperature, randomize_order, rng);
        }
    }
    if polish && !schedule.is_empty() {
        sweeper.polish();
    }
    sweeper.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_temperature_never_goes_uphill() {
        let mut rng = StreamRng::new(b"greedy");
        assert!(metropolis_accept(-1.0, 0.0, &mut rng));
        assert!(metropolis_accept(0.0, 0.0, &mut rng));
        assert!(!metropolis_accept(1e-9, 0.0, &mut rng));
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn uphill_acceptance_follows_boltzmann_ratio() {
        let mut rng = StreamRng::new(b"boltzmann");
        let (delta, t) = (1.0, 2.0);
        let trials = 20_000;
        let hits = (0..trials).filter(|_| metropolis_accept(delta, t, &mut rng)).count();
        let rate = hits as f64 / trials as f64;
        let expected = (-delta / t).exp();
        assert!((rate - expected).abs() < 0.02, "rate {} vs {}", rate, expected);
    }

    #[test]
    fn cached_fields_track_energy() {
        let model = IsingModel::new(
            vec![0.3, -0.7, 0.1],
            vec![vec![0.0, 1.0, -0.5], vec![1.0, 0.0, 0.25], vec![-0.5, 0.25, 0.0]],
            1.0,
        )
        .unwrap();
        let mut sweeper = Sweeper::new(&model, vec![1, 1, -1], false);
        for i in [0usize, 2, 1, 0] {
            let before = model.energy_of(&sweeper.spins);
            let delta = sweeper.delta(i);
            sweeper.flip(i);
            let after = model.energy_of(&sweeper.spins);
            assert!((after - before - delta).abs() < 1e-12);
            for k in 0..3 {
                assert!((sweeper.fields[k] - model.local_field(&sweeper.spins, k)).abs() < 1e-12);
            }
        }
    }
}
