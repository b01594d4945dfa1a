// Trial generators - one random outcome per call

use std::collections::BTreeMap;
use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::error::SimulationError;
use crate::pool::IngredientPool;
use crate::types::{IngredientType, Quantity};

// === CONSTANTS ===

/// Draws after which a token trial gives up.
pub const TOKEN_DRAW_CAP: u32 = 10_000;

const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// One trial's outcome. `capped` marks a trial cut short by a safety cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trial {
    pub value: i64,
    pub capped: bool,
}

impl Trial {
    pub fn new(value: i64) -> Self {
        Self {
            value,
            capped: false,
        }
    }
}

pub trait TrialGenerator {
    fn trial<R: Rng + ?Sized>(&self, rng: &mut R) -> Trial;
}

// ============================================================================
// Stew - continuous sum of per-ingredient uniform payouts
// ============================================================================

/// Gold paid per ingredient unit in a stew: uniform on `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct IngredientRange {
    pub min: f64,
    pub max: f64,
    pub mid: f64,
}

impl IngredientRange {
    pub const fn new(min: f64, max: f64, mid: f64) -> Self {
        Self { min, max, mid }
    }
}

/// Payout bounds for stewing a whole pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct StewRange {
    pub total_quantity: Quantity,
    pub total_min: f64,
    pub total_max: f64,
    pub total_mid: f64,
    /// Average midpoint payout per ingredient; zero for an empty pool.
    pub mid_per_ingredient: f64,
}

impl StewRange {
    pub fn of(pool: &IngredientPool, ranges: &BTreeMap<IngredientType, IngredientRange>) -> Self {
        let mut range = StewRange {
            total_quantity: 0.0,
            total_min: 0.0,
            total_max: 0.0,
            total_mid: 0.0,
            mid_per_ingredient: 0.0,
        };
        for (ingredient, qty) in pool.iter() {
            let Some(r) = ranges.get(&ingredient) else {
                continue;
            };
            range.total_quantity += qty;
            range.total_min += qty * r.min;
            range.total_max += qty * r.max;
            range.total_mid += qty * r.mid;
        }
        if range.total_quantity > 0.0 {
            range.mid_per_ingredient = range.total_mid / range.total_quantity;
        }
        range
    }
}

/// Approximates the stew payout as a normal distribution spanning the full
/// `[total_min, total_max]` range at six sigma, sampled with Box-Muller and
/// clamped to the range. The clamp piles tail mass onto the bounds rather
/// than truncating; game payouts are compared against exactly this shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StewTrial {
    range: StewRange,
    mean: f64,
    std_dev: f64,
}

impl StewTrial {
    /// Fails when the pool holds fewer than `minimum_batch` ingredients.
    pub fn new(
        pool: &IngredientPool,
        ranges: &BTreeMap<IngredientType, IngredientRange>,
        minimum_batch: Quantity,
    ) -> Result<Self, SimulationError> {
        let total = pool.total();
        if total < minimum_batch {
            return Err(SimulationError::BelowMinimumBatch {
                total,
                minimum: minimum_batch,
                shortfall: minimum_batch - total,
            });
        }
        Ok(Self::from_range(StewRange::of(pool, ranges)))
    }

    pub fn from_range(range: StewRange) -> Self {
        Self {
            range,
            mean: (range.total_min + range.total_max) / 2.0,
            std_dev: (range.total_max - range.total_min) / 6.0,
        }
    }

    pub fn range(&self) -> &StewRange {
        &self.range
    }
}

impl TrialGenerator for StewTrial {
    fn trial<R: Rng + ?Sized>(&self, rng: &mut R) -> Trial {
        // u1 in (0, 1] keeps ln finite
        let u1 = 1.0 - rng.random::<f64>();
        let u2 = rng.random::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();

        let sample =
            (self.mean + z * self.std_dev).clamp(self.range.total_min, self.range.total_max);
        Trial::new(sample.round() as i64)
    }
}

// ============================================================================
// Tokens - draws until a cumulative threshold is reached
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct TokenOutcome {
    pub value: i64,
    pub probability: f64,
}

impl TokenOutcome {
    pub const fn new(value: i64, probability: f64) -> Self {
        Self { value, probability }
    }
}

/// Counts draws from a discrete distribution until their sum reaches `threshold`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTrial {
    outcomes: Vec<TokenOutcome>,
    threshold: i64,
    cap: u32,
}

impl TokenTrial {
    /// Probabilities must sum to 1.
    pub fn new(outcomes: Vec<TokenOutcome>, threshold: i64) -> Result<Self, SimulationError> {
        let total: f64 = outcomes.iter().map(|o| o.probability).sum();
        let negative = outcomes.iter().any(|o| o.probability < 0.0);
        if negative || (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(SimulationError::InvalidDistribution(total));
        }
        Ok(Self {
            outcomes,
            threshold,
            cap: TOKEN_DRAW_CAP,
        })
    }

    pub fn with_cap(mut self, cap: u32) -> Self {
        self.cap = cap;
        self
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Inverse-CDF draw; rounding slack at the top of the CDF yields 0.
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        let roll: f64 = rng.random();
        let mut cumulative = 0.0;
        for outcome in &self.outcomes {
            cumulative += outcome.probability;
            if roll <= cumulative {
                return outcome.value;
            }
        }
        0
    }
}

impl TrialGenerator for TokenTrial {
    fn trial<R: Rng + ?Sized>(&self, rng: &mut R) -> Trial {
        let mut total = 0i64;
        let mut draws = 0u32;
        while total < self.threshold {
            if draws >= self.cap {
                return Trial {
                    value: self.cap as i64,
                    capped: true,
                };
            }
            total += self.draw(rng);
            draws += 1;
        }
        Trial::new(draws as i64)
    }
}
