//! Exhaustive enumeration over all `2^N` configurations.
//!
//! Used to validate the stochastic and quantum solvers on small instances
//! and to build the diagonal of the problem Hamiltonian.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IsingError, IsingResult};
use crate::model::IsingModel;
use crate::spin::SpinConfiguration;

/// Enumeration is refused above this many spins unless the caller says so.
pub const DEFAULT_ENUMERATION_LIMIT: usize = 24;

/// Minimum energy and every configuration attaining it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactSolution {
    pub energy: f64,
    /// Ground configurations in ascending basis-index order.
    pub ground_states: Vec<SpinConfiguration>,
    pub states_evaluated: usize,
}

impl ExactSolution {
    pub fn is_degenerate(&self) -> bool {
        self.ground_states.len() > 1
    }

    pub fn contains(&self, config: &SpinConfiguration) -> bool {
        self.ground_states.iter().any(|g| g == config)
    }
}

/// Energy of every basis state, indexed by basis index.
///
/// The caller is responsible for keeping `N` small; see
/// [`exact_ground_states`] for the guarded entry point.
pub fn basis_energies(model: &IsingModel) -> Vec<f64> {
    let n = model.num_spins();
    let dim = 1usize << n;
    let mut spins = vec![-1i8; n];
    let mut out = Vec::with_capacity(dim);

    for index in 0..dim {
        for (q, s) in spins.iter_mut().enumerate() {
            *s = if (index >> q) & 1 == 1 { 1 } else { -1 };
        }
        out.push(model.energy_of(&spins));
    }
    out
}

/// Brute-force ground states. Energies within `tolerance` of the minimum
/// count as ties.
pub fn exact_ground_states(
    model: &IsingModel,
    limit: usize,
    tolerance: f64,
) -> IsingResult<ExactSolution> {
    let n = model.num_spins();
    if n > limit {
        return Err(IsingError::TooManySpins { spins: n, limit });
    }

    let energies = basis_energies(model);
    let energy = energies.iter().copied().fold(f64::INFINITY, f64::min);
    let ground_states: Vec<SpinConfiguration> = energies
        .iter()
        .enumerate()
        .filter(|(_, &e)| e - energy <= tolerance)
        .map(|(index, _)| SpinConfiguration::from_basis_index(index, n))
        .collect();

    debug!(
        spins = n,
        energy,
        degeneracy = ground_states.len(),
        "exhaustive enumeration finished"
    );

    Ok(ExactSolution {
        energy,
        ground_states,
        states_evaluated: energies.len(),
    })
}
