// Fallback (stew) conversion - values leftovers at a fixed per-unit price

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::pool::IngredientPool;
use crate::types::{CLOWN_MEAT, CLOWN_VEGETABLE, Category, Gold, IngredientType, Quantity};

// === CONSTANTS ===

/// Vegetables left for stew at or above this count are flagged.
pub const VEGETABLE_WASTE_THRESHOLD: Quantity = 30.0;
/// Meat left for stew at or above this count is flagged.
pub const MEAT_WASTE_THRESHOLD: Quantity = 40.0;
/// Below this the warning suggests gathering the other category.
const BALANCE_THRESHOLD: Quantity = 20.0;

/// Per-unit conversion values plus the global minimum batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackTable {
    pub unit_values: BTreeMap<IngredientType, Gold>,
    pub minimum_batch_size: Quantity,
}

/// Result of valuing a pool.
///
/// `value` is zero whenever `below_minimum` is set; `raw_value` is what the
/// pool would be worth with no minimum. An empty pool is also below the
/// minimum, `empty` tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct PoolValuation {
    pub value: Gold,
    pub raw_value: Gold,
    pub total_quantity: Quantity,
    pub below_minimum: bool,
    pub empty: bool,
    /// Ingredients still needed to reach the minimum batch.
    pub shortfall: Quantity,
}

impl FallbackTable {
    pub fn new(minimum_batch_size: Quantity) -> Self {
        Self {
            unit_values: BTreeMap::new(),
            minimum_batch_size,
        }
    }

    pub fn with_value(mut self, ingredient: IngredientType, value: Gold) -> Self {
        self.unit_values.insert(ingredient, value);
        self
    }

    pub fn unit_value(&self, ingredient: IngredientType) -> Gold {
        self.unit_values.get(&ingredient).copied().unwrap_or(0.0)
    }

    /// Ungated value of a pool.
    pub fn raw_value(&self, pool: &IngredientPool) -> Gold {
        pool.iter()
            .map(|(ingredient, qty)| qty * self.unit_value(ingredient))
            .sum()
    }

    /// Fallback cost of the ingredients one dish consumes.
    pub fn consumption_value(
        &self,
        consumption: impl IntoIterator<Item = (IngredientType, u32)>,
    ) -> Gold {
        consumption
            .into_iter()
            .map(|(ingredient, qty)| qty as f64 * self.unit_value(ingredient))
            .sum()
    }

    pub fn value_pool(&self, pool: &IngredientPool) -> PoolValuation {
        let total_quantity = pool.total();
        let raw_value = self.raw_value(pool);
        let below_minimum = total_quantity < self.minimum_batch_size;

        PoolValuation {
            value: if below_minimum { 0.0 } else { raw_value },
            raw_value,
            total_quantity,
            below_minimum,
            empty: pool.is_empty(),
            shortfall: (self.minimum_batch_size - total_quantity).max(0.0),
        }
    }

    /// Flag meat and vegetables about to be thrown into stew. Only applies when
    /// the pool can actually be stewed.
    pub fn waste_warning(&self, pool: &IngredientPool) -> Option<WasteWarning> {
        if pool.total() < self.minimum_batch_size {
            return None;
        }
        let vegetables = pool.category_total(Category::Vegetable);
        let meat = pool.category_total(Category::Meat);
        let vegetables_flagged = vegetables >= VEGETABLE_WASTE_THRESHOLD;
        let meat_flagged = meat >= MEAT_WASTE_THRESHOLD;
        if !vegetables_flagged && !meat_flagged {
            return None;
        }

        // Clown values stand in for both vendors
        Some(WasteWarning {
            vegetables,
            meat,
            vegetables_flagged,
            meat_flagged,
            vegetable_stew_value: vegetables * self.unit_value(CLOWN_VEGETABLE),
            meat_stew_value: meat * self.unit_value(CLOWN_MEAT),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WasteWarning {
    pub vegetables: Quantity,
    pub meat: Quantity,
    pub vegetables_flagged: bool,
    pub meat_flagged: bool,
    pub vegetable_stew_value: Gold,
    pub meat_stew_value: Gold,
}

impl WasteWarning {
    /// e.g. "32 vegetables (2768g in stew) and 45 meat (1305g in stew)"
    pub fn message(&self) -> String {
        let mut parts = Vec::new();
        if self.vegetables_flagged {
            parts.push(format!(
                "{} vegetables ({}g in stew)",
                self.vegetables,
                self.vegetable_stew_value.round()
            ));
        }
        if self.meat_flagged {
            parts.push(format!(
                "{} meat ({}g in stew)",
                self.meat,
                self.meat_stew_value.round()
            ));
        }
        parts.join(" and ")
    }

    /// What to gather before cooking instead of stewing.
    pub fn suggestion(&self) -> &'static str {
        if self.vegetables_flagged && self.meat < BALANCE_THRESHOLD {
            "meat"
        } else if self.meat_flagged && self.vegetables < BALANCE_THRESHOLD {
            "vegetables"
        } else {
            "balanced ingredients"
        }
    }
}
