//! Independent restarts and their reduction.

use std::collections::HashMap;

use ising::{IsingModel, SpinConfiguration};
use rayon::prelude::*;
use rng::StreamRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnnealError, AnnealResult};
use crate::metropolis::run_trial;
use crate::sample::{CloudEntry, Sample};
use crate::schedule::AnnealingSchedule;

/// Solver settings. Trial `t` draws from `StreamRng::fork(seed, "trial", t)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealerConfig {
    pub restarts: usize,
    pub seed: String,
    /// Run restarts on the rayon pool.
    pub parallel: bool,
    /// Shuffle the spin visiting order every sweep.
    pub randomize_order: bool,
    /// Greedy descent after the schedule so samples are local minima.
    pub polish: bool,
    pub record_decisions: bool,
    /// Start every trial here instead of a random configuration.
    pub initial: Option<SpinConfiguration>,
}

impl Default for AnnealerConfig {
    fn default() -> Self {
        Self {
            restarts: 100,
            seed: "default-seed".to_string(),
            parallel: true,
            randomize_order: true,
            polish: true,
            record_decisions: false,
            initial: None,
        }
    }
}

/// All samples, the distinct-configuration cloud and the best sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealOutcome {
    /// In trial order.
    pub samples: Vec<Sample>,
    /// Distinct configurations by ascending energy; equal energies keep
    /// first-seen order.
    pub cloud: Vec<CloudEntry>,
    /// Index into `samples` of the first trial reaching the minimum energy.
    pub best_index: usize,
}

impl AnnealOutcome {
    pub fn best(&self) -> &Sample {
        &self.samples[self.best_index]
    }

    pub fn best_energy(&self) -> f64 {
        self.best().energy
    }

    pub fn best_configuration(&self) -> &SpinConfiguration {
        &self.best().configuration
    }

    /// Best energy among the first `k` restarts.
    pub fn best_energy_within(&self, k: usize) -> Option<f64> {
        self.samples
            .iter()
            .take(k)
            .map(|s| s.energy)
            .reduce(f64::min)
    }
}

/// Anneal `model` along `schedule` with `config.restarts` independent trials.
pub fn anneal(
    model: &IsingModel,
    schedule: &AnnealingSchedule,
    config: &AnnealerConfig,
) -> AnnealResult<AnnealOutcome> {
    if config.restarts == 0 {
        return Err(AnnealError::NoRestarts);
    }
    if let Some(init) = &config.initial {
        if init.len() != model.num_spins() {
            return Err(AnnealError::InitialLength {
                expected: model.num_spins(),
                found: init.len(),
            });
        }
    }

    debug!(
        spins = model.num_spins(),
        restarts = config.restarts,
        sweeps = schedule.total_sweeps(),
        parallel = config.parallel,
        "annealing"
    );

    let trial = |t: usize| {
        let mut rng = StreamRng::fork(&config.seed, "trial", t as u64);
        let out = run_trial(
            model,
            schedule,
            config.initial.as_ref(),
            &mut rng,
            config.randomize_order,
            config.polish,
            config.record_decisions,
        );
        Sample {
            trial: t,
            configuration: out.configuration,
            energy: out.energy,
            accepted: out.accepted,
            rejected: out.rejected,
            decisions: out.decisions,
        }
    };

    let samples: Vec<Sample> = if config.parallel {
        (0..config.restarts).into_par_iter().map(trial).collect()
    } else {
        (0..config.restarts).map(trial).collect()
    };

    let mut best_index = 0;
    for (i, s) in samples.iter().enumerate() {
        if s.energy < samples[best_index].energy {
            best_index = i;
        }
    }

    let cloud = solution_cloud(&samples);
    info!(
        best_energy = samples[best_index].energy,
        best_trial = best_index,
        distinct = cloud.len(),
        "annealing finished"
    );

    Ok(AnnealOutcome {
        samples,
        cloud,
        best_index,
    })
}

fn solution_cloud(samples: &[Sample]) -> Vec<CloudEntry> {
    let mut cloud: Vec<CloudEntry> = Vec::new();
    let mut seen: HashMap<&SpinConfiguration, usize> = HashMap::new();

    for s in samples {
        match seen.get(&s.configuration) {
            Some(&i) => cloud[i].occurrences += 1,
            None => {
                seen.insert(&s.configuration, cloud.len());
                cloud.push(CloudEntry {
                    configuration: s.configuration.clone(),
                    energy: s.energy,
                    occurrences: 1,
                    first_trial: s.trial,
                });
            }
        }
    }

    // stable: ties keep first-seen order
    cloud.sort_by(|a, b| a.energy.total_cmp(&b.energy));
    cloud
}
