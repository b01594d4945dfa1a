//! Error types for configuration import and simulation setup.
//!
//! Planning and ranking never fail: unmakeable recipes are skipped and
//! below-minimum valuations come back flagged. Only rehydrating a
//! configuration and constructing a trial generator can be rejected.

use thiserror::Error;

use crate::types::{Quantity, Vendor};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("configuration is not valid base64: {0}")]
    Decode(String),

    #[error("configuration is not valid JSON: {0}")]
    Json(String),

    #[error("no version found")]
    MissingVersion,

    #[error("Unsupported configuration version: {0}")]
    UnsupportedVersion(u64),

    #[error("no state data found")]
    MissingState,

    /// One of `recipes`, `vendors` or `shop` is absent.
    #[error("missing required data: {0}")]
    MissingSection(&'static str),

    #[error("rates for {0:?} are filed under the wrong vendor")]
    MisfiledVendor(Vendor),

    #[error("{vendor:?} drop rates sum to {sum:.4}, more than 1.0")]
    InvalidVendorRates { vendor: Vendor, sum: f64 },

    #[error("{vendor:?} {category} rate {rate} is outside [0, 1]")]
    InvalidRate {
        vendor: Vendor,
        category: &'static str,
        rate: f64,
    },

    #[error("invalid recipe '{0}'")]
    InvalidRecipe(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

impl From<base64::DecodeError> for ConfigError {
    fn from(err: base64::DecodeError) -> Self {
        ConfigError::Decode(err.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Stew needs at least the minimum batch; `shortfall` is how many more are needed.
    #[error("need at least {minimum} ingredients to make stew ({shortfall} more)")]
    BelowMinimumBatch {
        total: Quantity,
        minimum: Quantity,
        shortfall: Quantity,
    },

    #[error("outcome probabilities sum to {0}, expected 1.0")]
    InvalidDistribution(f64),

    #[error("trial count must be positive")]
    NoTrials,

    #[error("no stele requirement for level {0}")]
    UnknownSteleLevel(u32),
}
