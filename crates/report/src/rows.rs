//! Solver results as flat, serializable rows.

use annealer::CloudEntry;
use portfolio::{PortfolioMetrics, PortfolioProblem};
use serde::{Deserialize, Serialize};

/// One distinct configuration of an annealing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudRow {
    /// Position in the energy-sorted cloud, starting at 0.
    pub rank: usize,
    pub spins: Vec<i8>,
    /// Bit string, variable 0 first.
    pub bits: String,
    pub energy: f64,
    pub occurrences: usize,
    pub first_trial: usize,
}

pub fn cloud_rows(cloud: &[CloudEntry]) -> Vec<CloudRow> {
    cloud
        .iter()
        .enumerate()
        .map(|(rank, entry)| CloudRow {
            rank,
            spins: entry.configuration.spins().to_vec(),
            bits: entry.configuration.to_string(),
            energy: entry.energy,
            occurrences: entry.occurrences,
            first_trial: entry.first_trial,
        })
        .collect()
}

/// A cloud entry read back as a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRow {
    pub rank: usize,
    pub bits: String,
    pub occurrences: usize,
    pub metrics: PortfolioMetrics,
}

/// Decoded holdings for every cloud entry, best first. Lets the caller look
/// at near-optimal alternatives, not just the single best portfolio.
pub fn holding_rows(problem: &PortfolioProblem, cloud: &[CloudEntry]) -> Vec<HoldingRow> {
    cloud
        .iter()
        .enumerate()
        .map(|(rank, entry)| HoldingRow {
            rank,
            bits: entry.configuration.to_string(),
            occurrences: entry.occurrences,
            metrics: problem.metrics(&entry.configuration),
        })
        .collect()
}

/// One total-time setting of a gap sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapSweepRow {
    pub total_time: f64,
    pub min_gap: f64,
    /// `s` at which `min_gap` occurs.
    pub min_gap_s: f64,
    pub ground_overlap: f64,
    pub found_ground_state: bool,
}

/// Best annealed portfolio for one risk-aversion setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierRow {
    pub risk_aversion: f64,
    pub best_energy: f64,
    pub distinct_solutions: usize,
    pub metrics: PortfolioMetrics,
}
