use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

// === CONSTANTS ===

pub const DEFAULT_TRIAL_COUNT: u32 = 10_000;
/// Trials between checkpoints.
pub const DEFAULT_BATCH_SIZE: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub trial_count: u32,
    pub batch_size: u32,
    /// Fixed seed for reproducible runs; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trial_count: DEFAULT_TRIAL_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_trials(mut self, trial_count: u32) -> Self {
        self.trial_count = trial_count;
        self
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.trial_count, 10_000);
        assert_eq!(config.batch_size, 1_000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = SimulationConfig::seeded(7);
        let a: u64 = config.rng().random();
        let b: u64 = config.rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SimulationConfig = serde_json::from_str(r#"{"seed": 3}"#).unwrap();
        assert_eq!(config.trial_count, 10_000);
        assert_eq!(config.seed, Some(3));
    }
}
