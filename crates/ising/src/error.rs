//! Error types for the Ising data model.

use thiserror::Error;

/// Errors produced while constructing or enumerating Ising models.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IsingError {
    /// `h` and `J` disagree on the number of spins.
    #[error("coupling matrix has {found} entries, expected {expected} for {spins} spins")]
    DimensionMismatch {
        /// Number of spins implied by `h`.
        spins: usize,
        /// `spins * spins`.
        expected: usize,
        /// Entries actually supplied.
        found: usize,
    },

    /// `J[i][j] != J[j][i]`.
    #[error("coupling matrix is not symmetric at ({i}, {j}): {a} vs {b}")]
    AsymmetricCoupling {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// `J[i][j]`.
        a: f64,
        /// `J[j][i]`.
        b: f64,
    },

    /// A self-coupling was supplied; `s_i^2 = 1` makes it a constant.
    #[error("coupling matrix has non-zero diagonal entry {value} at spin {index}")]
    NonZeroDiagonal {
        /// Spin index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// NaN or infinite coefficient.
    #[error("non-finite coefficient in {what}")]
    NonFinite {
        /// Which coefficient group.
        what: &'static str,
    },

    /// A spin value outside `{-1, +1}`.
    #[error("spin value {value} at position {index} is not +1 or -1")]
    InvalidSpin {
        /// Position in the configuration.
        index: usize,
        /// Offending value.
        value: i8,
    },

    /// Configuration length differs from the model size.
    #[error("configuration has {found} spins, model has {expected}")]
    LengthMismatch {
        /// Model size.
        expected: usize,
        /// Configuration size.
        found: usize,
    },

    /// Exhaustive enumeration refused: `2^spins` states exceeds the limit.
    #[error("{spins} spins exceeds the enumeration limit of {limit}")]
    TooManySpins {
        /// Requested spins.
        spins: usize,
        /// Configured limit.
        limit: usize,
    },
}

/// Result type for Ising model operations.
pub type IsingResult<T> = Result<T, IsingError>;
