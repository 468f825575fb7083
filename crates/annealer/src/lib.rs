//! Simulated annealing on an [`ising::IsingModel`].
//!
//! Each restart owns its own [`rng::StreamRng`], forked from the run seed by
//! trial index, so restarts can run on a rayon pool or sequentially and
//! produce bit-identical results either way.

pub mod error;
pub mod metropolis;
pub mod sample;
pub mod schedule;
pub mod solver;

pub use error::{AnnealError, AnnealResult};
pub use metropolis::{run_trial, TrialOutcome};
pub use sample::{CloudEntry, Sample};
pub use schedule::{AnnealingSchedule, ScheduleStep};
pub use solver::{anneal, AnnealOutcome, AnnealerConfig};
