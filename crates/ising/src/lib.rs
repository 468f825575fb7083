//! Shared data model for the portfolio annealing pipeline.
//!
//! An [`IsingModel`] holds local fields `h`, a symmetric zero-diagonal
//! coupling matrix `J` and a constant offset, with energy
//!
//!   E(s) = offset + Σ_i h_i s_i + Σ_{i<j} J_ij s_i s_j,   s_i ∈ {-1, +1}.
//!
//! Spin `+1` corresponds to bit `1` (`b = (s + 1) / 2`), and bit `q` of a
//! computational-basis index is the bit of variable `q`.

pub mod error;
pub mod exact;
pub mod model;
pub mod qubo;
pub mod spin;

pub use error::{IsingError, IsingResult};
pub use exact::{basis_energies, exact_ground_states, ExactSolution, DEFAULT_ENUMERATION_LIMIT};
pub use model::IsingModel;
pub use qubo::Qubo;
pub use spin::SpinConfiguration;
