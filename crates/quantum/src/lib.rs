//! Exact-state adiabatic evolution for small Ising problems.
//!
//! The interpolated Hamiltonian is
//!
//!   H(s) = (1 - s) H_0 + s H_P,   s ∈ [0, 1],
//!
//! where `H_P` is diagonal in the computational basis (the Ising energy of
//! each basis state, offset included) and `H_0 = -Σ_q g_q X_q` is a
//! transverse-field mixer. The full `2^N` state vector is held in memory, so
//! the engine refuses problems above a configurable spin count.

pub mod error;
pub mod evolution;
pub mod hamiltonian;
pub mod observables;
pub mod operators;
pub mod sampling;
pub mod spectrum;
pub mod trace;

use num_complex::Complex64;

pub type C64 = Complex64;

pub use error::{EvolutionError, EvolutionResult};
pub use evolution::{AdiabaticEvolution, EvolutionConfig, Integrator, DEFAULT_MAX_SPINS};
pub use hamiltonian::{AdiabaticHamiltonian, Mixer};
pub use sampling::SamplingPolicy;
pub use spectrum::{Eigensystem, GapClass};
pub use trace::{EvolutionOutcome, EvolutionPoint, EvolutionTrace};
