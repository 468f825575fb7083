//! Spin configurations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IsingError, IsingResult};

/// A fixed-length `±1` assignment, one entry per encoded variable.
///
/// Values are never patched in place: [`SpinConfiguration::with_flipped`]
/// and the conversions all return a new configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSpins")]
pub struct SpinConfiguration {
    spins: Vec<i8>,
}

#[derive(Deserialize)]
struct RawSpins {
    spins: Vec<i8>,
}

impl TryFrom<RawSpins> for SpinConfiguration {
    type Error = IsingError;

    fn try_from(raw: RawSpins) -> IsingResult<Self> {
        Self::new(raw.spins)
    }
}

impl SpinConfiguration {
    /// Validate and wrap a `±1` vector.
    pub fn new(spins: Vec<i8>) -> IsingResult<Self> {
        if let Some((index, &value)) = spins.iter().enumerate().find(|(_, &s)| s != 1 && s != -1) {
            return Err(IsingError::InvalidSpin { index, value });
        }
        Ok(Self { spins })
    }

    /// Sign pattern of `values`: non-negative entries become `+1`.
    pub fn from_signs(values: &[i8]) -> Self {
        Self {
            spins: values.iter().map(|&v| if v >= 0 { 1 } else { -1 }).collect(),
        }
    }

    /// Spins from bits, `b = 1 → +1`, `b = 0 → -1`.
    pub fn from_bits(bits: &[u8]) -> Self {
        Self {
            spins: bits.iter().map(|&b| if b != 0 { 1 } else { -1 }).collect(),
        }
    }

    /// Configuration of `n` spins encoded by a computational-basis index.
    pub fn from_basis_index(index: usize, n: usize) -> Self {
        Self {
            spins: (0..n).map(|q| if (index >> q) & 1 == 1 { 1 } else { -1 }).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.spins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spins.is_empty()
    }

    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    pub fn spin(&self, i: usize) -> i8 {
        self.spins[i]
    }

    pub fn bits(&self) -> Vec<u8> {
        self.spins.iter().map(|&s| u8::from(s > 0)).collect()
    }

    /// Computational-basis index; bit `q` is the bit of variable `q`.
    pub fn basis_index(&self) -> usize {
        self.spins
            .iter()
            .enumerate()
            .filter(|(_, &s)| s > 0)
            .fold(0usize, |acc, (q, _)| acc | (1 << q))
    }

    /// New configuration with spin `i` reversed.
    pub fn with_flipped(&self, i: usize) -> Self {
        let mut spins = self.spins.clone();
        spins[i] = -spins[i];
        Self { spins }
    }

    /// Number of positions where `self` and `other` differ.
    pub fn hamming_distance(&self, other: &Self) -> usize {
        self.spins
            .iter()
            .zip(&other.spins)
            .filter(|(a, b)| a != b)
            .count()
    }
}

/// Bit string in variable order, e.g. `0110`.
impl fmt::Display for SpinConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &s in &self.spins {
            f.write_str(if s > 0 { "1" } else { "0" })?;
        }
        Ok(())
    }
}
