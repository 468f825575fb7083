//! Error types for problem definition.

use thiserror::Error;

/// Invalid portfolio definitions. Raised before any coefficient is built.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// No assets supplied.
    #[error("portfolio has no assets")]
    Empty,

    /// Two per-asset inputs disagree on the number of assets.
    #[error("{what} has length {found}, expected {expected}")]
    DimensionMismatch {
        /// Which input.
        what: &'static str,
        /// Number of assets.
        expected: usize,
        /// Supplied length.
        found: usize,
    },

    /// `σ_ij != σ_ji` beyond tolerance.
    #[error("covariance matrix is not symmetric at ({i}, {j}): {a} vs {b}")]
    AsymmetricCovariance {
        /// Row.
        i: usize,
        /// Column.
        j: usize,
        /// `σ_ij`.
        a: f64,
        /// `σ_ji`.
        b: f64,
    },

    /// Smallest covariance eigenvalue is meaningfully negative.
    #[error("covariance matrix is not positive semi-definite (smallest eigenvalue {min_eigenvalue})")]
    NotPositiveSemiDefinite {
        /// Smallest eigenvalue found.
        min_eigenvalue: f64,
    },

    /// NaN or infinity in an input.
    #[error("non-finite value in {what}")]
    NonFinite {
        /// Which input.
        what: &'static str,
    },

    /// Price must be strictly positive.
    #[error("asset {asset} has non-positive price {price}")]
    NonPositivePrice {
        /// Asset identifier.
        asset: String,
        /// Supplied price.
        price: f64,
    },

    /// Budget must be strictly positive.
    #[error("budget must be positive, got {0}")]
    NonPositiveBudget(f64),

    /// `α` or `λ` below zero.
    #[error("{what} must be non-negative, got {value}")]
    NegativeWeight {
        /// `risk_aversion` or `budget_penalty`.
        what: &'static str,
        /// Supplied value.
        value: f64,
    },

    /// Bit-width of zero or less.
    #[error("asset {asset} has invalid bit-width {bits}; at least one bit is required")]
    InvalidBitWidth {
        /// Asset identifier.
        asset: String,
        /// Supplied width.
        bits: i64,
    },

    /// Bit-width so large that `2^k` loses integer precision.
    #[error("asset {asset} bit-width {bits} exceeds the maximum of {max}")]
    BitWidthTooLarge {
        /// Asset identifier.
        asset: String,
        /// Supplied width.
        bits: i64,
        /// Largest accepted width.
        max: u32,
    },
}

/// Result type for problem construction.
pub type ConfigResult<T> = Result<T, ConfigurationError>;
