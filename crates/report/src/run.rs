//! Serializable summary of one pipeline run.

use std::fs;
use std::path::Path;

use annealer::{AnnealOutcome, AnnealerConfig};
use ising::{ExactSolution, IsingModel};
use portfolio::{PortfolioInput, PortfolioProblem};
use quantum::{EvolutionConfig, EvolutionOutcome, EvolutionPoint, EvolutionTrace, GapClass};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ReportError, ReportResult};
use crate::rows::{cloud_rows, holding_rows, CloudRow, HoldingRow};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub spins: usize,
    pub fields: Vec<f64>,
    pub couplings: Vec<Vec<f64>>,
    pub offset: f64,
}

impl ModelSummary {
    pub fn of(model: &IsingModel) -> Self {
        Self {
            spins: model.num_spins(),
            fields: model.fields().to_vec(),
            couplings: model.couplings(),
            offset: model.offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExactSummary {
    pub energy: f64,
    pub ground_states: Vec<String>,
    pub states_evaluated: usize,
}

impl From<&ExactSolution> for ExactSummary {
    fn from(exact: &ExactSolution) -> Self {
        Self {
            energy: exact.energy,
            ground_states: exact.ground_states.iter().map(ToString::to_string).collect(),
            states_evaluated: exact.states_evaluated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnealingSummary {
    pub restarts: usize,
    pub seed: String,
    pub best_trial: usize,
    pub best_energy: f64,
    pub best_configuration: String,
    pub cloud: Vec<CloudRow>,
    /// Present when the model came from a portfolio problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holdings: Option<Vec<HoldingRow>>,
}

impl AnnealingSummary {
    pub fn new(
        config: &AnnealerConfig,
        outcome: &AnnealOutcome,
        problem: Option<&PortfolioProblem>,
    ) -> Self {
        let best = outcome.best();
        Self {
            restarts: config.restarts,
            seed: config.seed.clone(),
            best_trial: best.trial,
            best_energy: best.energy,
            best_configuration: best.configuration.to_string(),
            cloud: cloud_rows(&outcome.cloud),
            holdings: problem.map(|p| holding_rows(p, &outcome.cloud)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionSummary {
    pub config: EvolutionConfig,
    pub ground_energy: f64,
    pub ground_states: Vec<String>,
    pub final_gap: f64,
    pub final_gap_class: GapClass,
    pub ground_overlap: f64,
    pub dominant_state: String,
    pub dominant_probability: f64,
    pub energy_expectation: f64,
    pub magnetization: Vec<f64>,
    /// Final measurement distribution, indexed by basis state.
    pub probabilities: Vec<f64>,
    /// `(s, gap)` of the smallest sampled gap.
    pub min_gap: Option<(f64, f64)>,
    pub gap_trace: Vec<(f64, f64)>,
    pub steps: usize,
    pub trace: Vec<EvolutionPoint>,
}

impl EvolutionSummary {
    pub fn new(config: &EvolutionConfig, outcome: &EvolutionOutcome) -> Self {
        Self {
            config: config.clone(),
            ground_energy: outcome.ground_energy,
            ground_states: outcome.ground_states.iter().map(ToString::to_string).collect(),
            final_gap: outcome.final_gap,
            final_gap_class: outcome.final_gap_class,
            ground_overlap: outcome.ground_overlap,
            dominant_state: outcome.dominant_state.to_string(),
            dominant_probability: outcome.dominant_probability,
            energy_expectation: outcome.energy_expectation,
            magnetization: outcome.magnetization.clone(),
            probabilities: outcome.probabilities.clone(),
            min_gap: outcome.trace.min_gap().map(|p| (p.s, p.gap)),
            gap_trace: outcome.trace.gap_curve(),
            steps: outcome.steps,
            trace: outcome.trace.points().to_vec(),
        }
    }
}

/// Everything a run produced. Sections that were not computed are omitted
/// from the JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<PortfolioInput>,
    pub model: ModelSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<ExactSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annealing: Option<AnnealingSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolution: Option<EvolutionSummary>,
    /// Spectrum-only path analysis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum: Option<EvolutionTrace>,
}

impl RunReport {
    pub fn new(model: &IsingModel) -> Self {
        Self {
            problem: None,
            model: ModelSummary::of(model),
            exact: None,
            annealing: None,
            evolution: None,
            spectrum: None,
        }
    }

    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> ReportResult<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "wrote run report");
        Ok(())
    }
}
