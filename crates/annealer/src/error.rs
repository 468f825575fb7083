//! Error types for annealing configuration.

use thiserror::Error;

/// Invalid schedules or solver settings. Annealing itself cannot fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnnealError {
    /// Temperature below zero.
    #[error("schedule step {step} has negative temperature {temperature}")]
    NegativeTemperature {
        /// Step index.
        step: usize,
        /// Offending temperature.
        temperature: f64,
    },

    /// NaN or infinite temperature.
    #[error("schedule step {step} has non-finite temperature")]
    NonFiniteTemperature {
        /// Step index.
        step: usize,
    },

    /// Temperature rises between consecutive steps.
    #[error("temperature increases at step {step}: {previous} -> {temperature}")]
    IncreasingTemperature {
        /// Step index.
        step: usize,
        /// Temperature of the preceding step.
        previous: f64,
        /// Temperature of this step.
        temperature: f64,
    },

    /// Geometric schedules need strictly positive end points.
    #[error("geometric schedule needs positive temperatures, got {hot} -> {cold}")]
    InvalidGeometricRange {
        /// Starting temperature.
        hot: f64,
        /// Final temperature.
        cold: f64,
    },

    /// Caller-supplied start state has the wrong size.
    #[error("initial configuration has {found} spins, model has {expected}")]
    InitialLength {
        /// Model size.
        expected: usize,
        /// Supplied size.
        found: usize,
    },

    /// At least one restart is required to report a best sample.
    #[error("restarts must be at least 1")]
    NoRestarts,
}

/// Result type for annealing configuration.
pub type AnnealResult<T> = Result<T, AnnealError>;
