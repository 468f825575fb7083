//! Temperature schedules.

use ising::IsingModel;
use serde::{Deserialize, Serialize};

use crate::error::{AnnealError, AnnealResult};

/// `sweeps` full passes over all spins at `temperature`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStep {
    pub temperature: f64,
    pub sweeps: usize,
}

/// Ordered steps with finite, non-negative, non-increasing temperatures.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct AnnealingSchedule {
    steps: Vec<ScheduleStep>,
}

#[derive(Deserialize)]
struct RawSchedule {
    steps: Vec<ScheduleStep>,
}

impl TryFrom<RawSchedule> for AnnealingSchedule {
    type Error = AnnealError;

    fn try_from(raw: RawSchedule) -> AnnealResult<Self> {
        Self::new(raw.steps)
    }
}

impl AnnealingSchedule {
    pub fn new(steps: Vec<ScheduleStep>) -> AnnealResult<Self> {
        let mut previous = f64::INFINITY;
        for (step, s) in steps.iter().enumerate() {
            let temperature = s.temperature;
            if !temperature.is_finite() {
                return Err(AnnealError::NonFiniteTemperature { step });
            }
            if temperature < 0.0 {
                return Err(AnnealError::NegativeTemperature { step, temperature });
            }
            if temperature > previous {
                return Err(AnnealError::IncreasingTemperature {
                    step,
                    previous,
                    temperature,
                });
            }
            previous = temperature;
        }
        Ok(Self { steps })
    }

    /// No steps; a trial returns its initial configuration.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn constant(temperature: f64, sweeps: usize) -> AnnealResult<Self> {
        Self::new(vec![ScheduleStep { temperature, sweeps }])
    }

    /// `steps` temperatures evenly spaced from `hot` to `cold` inclusive.
    pub fn linear(hot: f64, cold: f64, steps: usize, sweeps_per_step: usize) -> AnnealResult<Self> {
        let temps = (0..steps).map(|i| {
            if steps == 1 {
                hot
            } else {
                hot + (cold - hot) * i as f64 / (steps - 1) as f64
            }
        });
        Self::from_temperatures(temps, sweeps_per_step)
    }

    /// `steps` temperatures geometrically spaced from `hot` to `cold`.
    pub fn geometric(hot: f64, cold: f64, steps: usize, sweeps_per_step: usize) -> AnnealResult<Self> {
        if !(hot > 0.0 && cold > 0.0) {
            return Err(AnnealError::InvalidGeometricRange { hot, cold });
        }
        let ratio = cold / hot;
        let temps = (0..steps).map(|i| {
            if steps == 1 {
                hot
            } else {
                hot * ratio.powf(i as f64 / (steps - 1) as f64)
            }
        });
        Self::from_temperatures(temps, sweeps_per_step)
    }

    /// Geometric schedule sized to the model's energy scale.
    ///
    /// At the hot end the largest single-flip uphill move is accepted with
    /// probability 1/2, at the cold end the smallest with probability 1/100.
    pub fn auto(model: &IsingModel, steps: usize, sweeps_per_step: usize) -> Self {
        let (max_delta, min_delta) = flip_energy_range(model);
        let (hot, cold) = if max_delta > 0.0 {
            (max_delta / std::f64::consts::LN_2, min_delta / 100f64.ln())
        } else {
            (1.0, 1.0)
        };
        let temps = (0..steps).map(|i| {
            if steps <= 1 {
                hot
            } else {
                hot * (cold / hot).powf(i as f64 / (steps - 1) as f64)
            }
        });
        // hot ≥ cold > 0 by construction, so validation cannot fail
        Self::from_temperatures(temps, sweeps_per_step).unwrap_or_default()
    }

    pub fn steps(&self) -> &[ScheduleStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_sweeps(&self) -> usize {
        self.steps.iter().map(|s| s.sweeps).sum()
    }

    pub fn final_temperature(&self) -> Option<f64> {
        self.steps.last().map(|s| s.temperature)
    }

    fn from_temperatures(temps: impl Iterator<Item = f64>, sweeps: usize) -> AnnealResult<Self> {
        let mut steps: Vec<ScheduleStep> = Vec::new();
        for t in temps {
            // guard against powf rounding a later step above its predecessor
            let temperature = steps.last().map_or(t, |p| t.min(p.temperature));
            steps.push(ScheduleStep { temperature, sweeps });
        }
        Self::new(steps)
    }
}

/// Largest and smallest non-zero single-flip energy scale of `model`.
fn flip_energy_range(model: &IsingModel) -> (f64, f64) {
    let n = model.num_spins();
    let mut max_delta = 0.0f64;
    let mut min_coeff = f64::INFINITY;

    for i in 0..n {
        let h = model.fields()[i].abs();
        let row = model.coupling_row(i);
        let bound = h + row.iter().map(|j| j.abs()).sum::<f64>();
        max_delta = max_delta.max(2.0 * bound);

        for c in std::iter::once(h).chain(row.iter().map(|j| j.abs())) {
            if c > 0.0 {
                min_coeff = min_coeff.min(c);
            }
        }
    }

    if min_coeff.is_finite() {
        (max_delta, 2.0 * min_coeff)
    } else {
        (0.0, 0.0)
    }
}
