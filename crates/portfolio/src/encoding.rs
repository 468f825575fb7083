//! Binary expansion of integer holdings onto spin variables.

use ising::SpinConfiguration;
use serde::{Deserialize, Serialize};

use crate::asset::Asset;

/// One spin variable: bit `power` of asset `asset`'s holding count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodedVariable {
    pub asset: usize,
    pub power: u32,
    /// `2^power` as a float, the weight of this bit in `n_asset`.
    pub weight: f64,
}

/// Global variable index → (asset, power). Asset 0's bits come first,
/// least significant bit first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryEncoding {
    variables: Vec<EncodedVariable>,
    num_assets: usize,
}

impl BinaryEncoding {
    pub fn new(assets: &[Asset]) -> Self {
        let variables = assets
            .iter()
            .enumerate()
            .flat_map(|(asset, a)| {
                (0..a.bits()).map(move |power| EncodedVariable {
                    asset,
                    power,
                    weight: (1u64 << power) as f64,
                })
            })
            .collect();
        Self {
            variables,
            num_assets: assets.len(),
        }
    }

    pub fn variables(&self) -> &[EncodedVariable] {
        &self.variables
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Global indices belonging to `asset`.
    pub fn asset_variables(&self, asset: usize) -> impl Iterator<Item = usize> + '_ {
        self.variables
            .iter()
            .enumerate()
            .filter(move |(_, v)| v.asset == asset)
            .map(|(q, _)| q)
    }

    /// Holding counts encoded by a configuration; spin `+1` is bit 1.
    ///
    /// # Panics
    ///
    /// Panics if `config` is shorter than the encoding.
    pub fn decode(&self, config: &SpinConfiguration) -> Vec<u64> {
        let mut shares = vec![0u64; self.num_assets];
        for (q, v) in self.variables.iter().enumerate() {
            if config.spin(q) > 0 {
                shares[v.asset] += 1u64 << v.power;
            }
        }
        shares
    }

    /// Inverse of [`decode`](Self::decode). Holdings above an asset's
    /// representable range are truncated to their low bits.
    pub fn encode(&self, shares: &[u64]) -> SpinConfiguration {
        let bits: Vec<u8> = self
            .variables
            .iter()
            .map(|v| ((shares[v.asset] >> v.power) & 1) as u8)
            .collect();
        SpinConfiguration::from_bits(&bits)
    }
}
