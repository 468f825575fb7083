//! Where along `s ∈ [0, 1]` the spectrum and state are recorded.

use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, EvolutionResult};

/// Sample-point layout. Both layouts start at exactly `s = 0` and end at
/// exactly `s = 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SamplingPolicy {
    /// `points` evenly spaced values.
    Linear { points: usize },
    /// `1 - s` geometrically spaced from `1` down to `min_distance`, then the
    /// endpoint `s = 1`. Concentrates samples where the minimum gap of
    /// optimization problems usually sits.
    Logarithmic { points: usize, min_distance: f64 },
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        SamplingPolicy::Logarithmic {
            points: 50,
            min_distance: 1e-6,
        }
    }
}

impl SamplingPolicy {
    pub fn points(&self) -> usize {
        match *self {
            SamplingPolicy::Linear { points } | SamplingPolicy::Logarithmic { points, .. } => points,
        }
    }

    pub fn validate(&self) -> EvolutionResult<()> {
        match *self {
            SamplingPolicy::Linear { points } if points < 2 => {
                Err(EvolutionError::TooFewSamples { min: 2, found: points })
            }
            SamplingPolicy::Logarithmic { points, .. } if points < 3 => {
                Err(EvolutionError::TooFewSamples { min: 3, found: points })
            }
            SamplingPolicy::Logarithmic { min_distance, .. }
                if !(min_distance > 0.0 && min_distance < 1.0) =>
            {
                Err(EvolutionError::InvalidMinDistance(min_distance))
            }
            _ => Ok(()),
        }
    }

    /// Strictly increasing sample values.
    pub fn sample_points(&self) -> EvolutionResult<Vec<f64>> {
        self.validate()?;
        let points = match *self {
            SamplingPolicy::Linear { points } => {
                let last = (points - 1) as f64;
                (0..points)
                    .map(|k| if k + 1 == points { 1.0 } else { k as f64 / last })
                    .collect()
            }
            SamplingPolicy::Logarithmic {
                points,
                min_distance,
            } => {
                let last = (points - 2) as f64;
                let mut s: Vec<f64> = (0..points - 1)
                    .map(|k| {
                        if k == 0 {
                            0.0
                        } else {
                            1.0 - min_distance.powf(k as f64 / last)
                        }
                    })
                    .collect();
                s.push(1.0);
                s.dedup_by(|next, prev| *next <= *prev);
                s
            }
        };
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_endpoints_and_spacing() {
        let s = SamplingPolicy::Linear { points: 5 }.sample_points().unwrap();
        assert_eq!(s, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn logarithmic_crowds_the_end() {
        let s = SamplingPolicy::Logarithmic {
            points: 6,
            min_distance: 1e-4,
        }
        .sample_points()
        .unwrap();
        assert_eq!(s.len(), 6);
        assert_eq!(s[0], 0.0);
        assert_eq!(*s.last().unwrap(), 1.0);
        assert!((1.0 - s[4] - 1e-4).abs() < 1e-12);
        assert!(s.windows(2).all(|w| w[0] < w[1]));
        // successive distances to s = 1 shrink by a constant factor
        let r1 = (1.0 - s[2]) / (1.0 - s[1]);
        let r2 = (1.0 - s[3]) / (1.0 - s[2]);
        assert!((r1 - r2).abs() < 1e-9);
    }

    #[test]
    fn rejects_degenerate_layouts() {
        assert!(matches!(
            SamplingPolicy::Linear { points: 1 }.sample_points(),
            Err(EvolutionError::TooFewSamples { min: 2, found: 1 })
        ));
        assert!(matches!(
            SamplingPolicy::Logarithmic { points: 10, min_distance: 1.0 }.sample_points(),
            Err(EvolutionError::InvalidMinDistance(_))
        ));
    }
}
