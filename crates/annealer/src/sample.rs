use ising::SpinConfiguration;
use serde::{Deserialize, Serialize};

/// One restart's final configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    pub trial: usize,
    pub configuration: SpinConfiguration,
    pub energy: f64,
    pub accepted: u64,
    pub rejected: u64,
    pub decisions: Option<Vec<bool>>,
}

/// A distinct configuration in the solution cloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudEntry {
    pub configuration: SpinConfiguration,
    pub energy: f64,
    pub occurrences: usize,
    /// Lowest trial index that produced this configuration.
    pub first_trial: usize,
}
