use serde::Serialize;

use crate::error::{ConfigResult, ConfigurationError};

/// Widest accepted binary encoding per asset.
pub const MAX_BIT_WIDTH: u32 = 31;

/// One tradable asset and the width of its holding-count encoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    id: String,
    expected_return: f64,
    price: f64,
    bits: u32,
}

impl Asset {
    pub fn new(id: impl Into<String>, expected_return: f64, price: f64, bits: i64) -> ConfigResult<Self> {
        let id = id.into();
        if !expected_return.is_finite() {
            return Err(ConfigurationError::NonFinite { what: "expected returns" });
        }
        if !price.is_finite() {
            return Err(ConfigurationError::NonFinite { what: "prices" });
        }
        if price <= 0.0 {
            return Err(ConfigurationError::NonPositivePrice { asset: id, price });
        }
        if bits <= 0 {
            return Err(ConfigurationError::InvalidBitWidth { asset: id, bits });
        }
        if bits > i64::from(MAX_BIT_WIDTH) {
            return Err(ConfigurationError::BitWidthTooLarge {
                asset: id,
                bits,
                max: MAX_BIT_WIDTH,
            });
        }
        Ok(Self {
            id,
            expected_return,
            price,
            bits: bits as u32,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn expected_return(&self) -> f64 {
        self.expected_return
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Largest holding the encoding can express, `2^k − 1`.
    pub fn max_representable(&self) -> u64 {
        (1u64 << self.bits) - 1
    }
}
