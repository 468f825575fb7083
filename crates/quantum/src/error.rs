//! Error types for the evolution engine.

use thiserror::Error;

/// Configuration and numerical failures. Spectral degeneracy is not an
/// error; it is reported through [`crate::GapClass`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvolutionError {
    /// Refused before any state vector or matrix is allocated.
    #[error("{spins} spins exceed the exact-evolution limit of {max_spins}")]
    ProblemTooLarge { spins: usize, max_spins: usize },

    /// `| ‖ψ‖ - 1 |` above the configured tolerance, or a non-finite norm.
    #[error("state norm {norm} left tolerance after step {step} (t = {time})")]
    NumericalInstability { step: usize, time: f64, norm: f64 },

    #[error("model has no spins")]
    EmptyModel,

    #[error("total evolution time must be positive and finite, got {0}")]
    NonPositiveTime(f64),

    #[error("time_steps must be at least 1")]
    ZeroSteps,

    #[error("sampling needs at least {min} points, got {found}")]
    TooFewSamples { min: usize, found: usize },

    #[error("logarithmic min_distance must lie in (0, 1), got {0}")]
    InvalidMinDistance(f64),

    #[error("mixer strength for spin {spin} must be finite and non-zero, got {value}")]
    InvalidMixerStrength { spin: usize, value: f64 },

    #[error("mixer has {found} strengths for {expected} spins")]
    MixerLength { expected: usize, found: usize },

    #[error("{what} must be positive and finite, got {value}")]
    InvalidTolerance { what: &'static str, value: f64 },

    #[error("at least 2 tracked levels are needed to report a gap, got {0}")]
    TooFewLevels(usize),
}

/// Result type for evolution runs.
pub type EvolutionResult<T> = Result<T, EvolutionError>;
