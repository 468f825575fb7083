//! Hamiltonian builder: discrete portfolio selection as an Ising model.
//!
//! Holdings are integers encoded in binary, `n_i = Σ_k 2^k b_{i,k}`, and the
//! objective
//!
//!   H(n) = −Σ μ_i n_i + α Σ σ_ij n_i n_j + λ (B − Σ p_i n_i)²
//!
//! is expanded into a [`ising::Qubo`] and substituted `b = (s + 1) / 2` into
//! an [`ising::IsingModel`] whose energy equals `H(n)` for every
//! configuration.
//!
//! ```rust
//! use portfolio::{PortfolioInput, PortfolioProblem};
//!
//! let input = PortfolioInput {
//!     asset_ids: vec!["AAA".into(), "BBB".into()],
//!     expected_returns: vec![0.10, 0.05],
//!     covariance: vec![vec![0.04, 0.01], vec![0.01, 0.02]],
//!     prices: vec![1.0, 1.0],
//!     budget: 1.0,
//!     bit_widths: Some(vec![1, 1]),
//!     risk_aversion: 0.5,
//!     budget_penalty: 1.0,
//! };
//! let problem = PortfolioProblem::new(input).unwrap();
//! let model = problem.to_ising();
//! assert_eq!(model.num_spins(), 2);
//! ```

pub mod asset;
pub mod builder;
pub mod encoding;
pub mod error;
pub mod metrics;
pub mod problem;

pub use asset::Asset;
pub use builder::HamiltonianBuilder;
pub use encoding::{BinaryEncoding, EncodedVariable};
pub use error::{ConfigResult, ConfigurationError};
pub use metrics::PortfolioMetrics;
pub use problem::{auto_bit_width, PortfolioInput, PortfolioProblem};
