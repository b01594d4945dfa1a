//! Production planning: turn a finite ingredient pool into an ordered list of
//! crafting steps, then value whatever is left as stew.
//!
//! Two selection policies share the same bookkeeping:
//! - [`PlanningPolicy::PhasePriority`] walks the g/Order ranking once, scarce
//!   categories first (used for projected daily pools).
//! - [`PlanningPolicy::GreedyProfit`] rescans every recipe after each step and
//!   takes the best profit over stew value (used for current holdings).

mod greedy;
mod phase;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::catalog::{CatalogEntry, RecipeCatalog, RecipeId};
use crate::fallback::{FallbackTable, PoolValuation, WasteWarning};
use crate::pool::IngredientPool;
use crate::ranking::Rankings;
use crate::types::{Category, Gold, IngredientType, Quantity};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PlanningPolicy {
    /// Recipes using any category other than `abundant` go first, then
    /// recipes using only `abundant`; each recipe is visited once.
    PhasePriority { abundant: Category },
    /// Repeatedly craft the makeable recipe with the highest
    /// `price - stew value of its ingredients`.
    GreedyProfit,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        PlanningPolicy::PhasePriority {
            abundant: Category::Meat,
        }
    }
}

impl PlanningPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            PlanningPolicy::PhasePriority { .. } => "phase_priority",
            PlanningPolicy::GreedyProfit => "greedy_profit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Phase 1: recipes using a scarce category.
    Scarce,
    /// Phase 2: recipes using only the abundant category.
    Abundant,
    /// Chosen by the greedy-profit rescan.
    Greedy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStep {
    /// 1-based position in the plan.
    pub step: u32,
    #[tsify(type = "string")]
    pub recipe_id: RecipeId,
    pub name: String,
    pub quantity: u32,
    #[tsify(type = "string")]
    pub limiting_ingredient: IngredientType,
    pub gold_value: Gold,
    /// Ingredient units consumed by the whole step.
    pub ingredients_used: Quantity,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlan {
    pub policy: PlanningPolicy,
    pub steps: Vec<ProductionStep>,
    #[tsify(type = "Record<string, number>")]
    pub residual: IngredientPool,
    pub crafted_value: Gold,
    pub residual_valuation: PoolValuation,
    /// Set when the leftovers would stew away a lot of meat or vegetables.
    pub stew_warning: Option<WasteWarning>,
}

impl ProductionPlan {
    /// Crafted gold plus stew value of the leftovers.
    pub fn total_value(&self) -> Gold {
        self.crafted_value + self.residual_valuation.value
    }

    pub fn total_dishes(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.quantity)).sum()
    }
}

// ============================================================================
// Bookkeeping shared by both policies
// ============================================================================

/// Pool being drawn down plus the steps taken so far.
struct PlanBuilder {
    pool: IngredientPool,
    steps: Vec<ProductionStep>,
    crafted_value: Gold,
}

impl PlanBuilder {
    fn new(pool: &IngredientPool) -> Self {
        Self {
            pool: pool.clone(),
            steps: Vec::new(),
            crafted_value: 0.0,
        }
    }

    /// Craft as many of `entry` as the pool allows. Returns false (and records
    /// nothing) when not even one fits.
    fn craft_max(&mut self, entry: &CatalogEntry, phase: Phase) -> bool {
        let Some((quantity, limiting)) = entry.recipe.max_batches(&self.pool) else {
            return false;
        };
        if quantity == 0 {
            return false;
        }

        entry.recipe.consume(&mut self.pool, quantity);
        let gold_value = quantity as f64 * entry.price();
        self.crafted_value += gold_value;
        self.steps.push(ProductionStep {
            step: self.steps.len() as u32 + 1,
            recipe_id: entry.recipe.id.clone(),
            name: entry.recipe.name.clone(),
            quantity,
            limiting_ingredient: limiting,
            gold_value,
            ingredients_used: entry.recipe.units_per_dish() as f64 * quantity as f64,
            phase,
        });
        true
    }

    fn finish(self, fallback: &FallbackTable, policy: PlanningPolicy) -> ProductionPlan {
        let residual = self.pool;
        let residual_valuation = fallback.value_pool(&residual);
        let stew_warning = fallback.waste_warning(&residual);

        #[cfg(feature = "instrument")]
        {
            for step in &self.steps {
                tracing::info!(
                    target: "plan_step",
                    policy = policy.label(),
                    step = step.step as u64,
                    recipe = step.recipe_id.as_str(),
                    quantity = step.quantity as u64,
                    limiting = %step.limiting_ingredient,
                    gold = step.gold_value,
                );
            }
            tracing::info!(
                target: "plan",
                policy = policy.label(),
                steps = self.steps.len() as u64,
                crafted_value = self.crafted_value,
                residual_total = residual_valuation.total_quantity,
                residual_value = residual_valuation.value,
                below_minimum = residual_valuation.below_minimum,
            );
        }
        ProductionPlan {
            policy,
            steps: self.steps,
            residual,
            crafted_value: self.crafted_value,
            residual_valuation,
            stew_warning,
        }
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Plans against an immutable catalog and stew table.
pub struct Planner<'a> {
    catalog: &'a RecipeCatalog,
    fallback: &'a FallbackTable,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a RecipeCatalog, fallback: &'a FallbackTable) -> Self {
        Self { catalog, fallback }
    }

    /// Plan production from `pool`. The input pool is not modified; the
    /// returned plan carries the residual.
    ///
    /// `rankings` drives the phase-priority order; the greedy policy ignores it
    /// and scans the catalog directly.
    pub fn plan(
        &self,
        pool: &IngredientPool,
        rankings: &Rankings,
        policy: PlanningPolicy,
    ) -> ProductionPlan {
        let mut builder = PlanBuilder::new(pool);
        match policy {
            PlanningPolicy::PhasePriority { abundant } => {
                phase::run(&mut builder, self.catalog, rankings, abundant)
            }
            PlanningPolicy::GreedyProfit => greedy::run(&mut builder, self.catalog, self.fallback),
        }
        builder.finish(self.fallback, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::AcquisitionModel;
    use crate::catalog::Recipe;
    use crate::ranking::rank_recipes;
    use crate::types::{CLOWN_MEAT, CLOWN_VEGETABLE};

    #[test]
    fn test_craft_max_records_step() {
        let catalog = RecipeCatalog::from_recipes([Recipe::new("pudding", "Rust Pudding")
            .with_ingredient(CLOWN_MEAT, 2)
            .with_ingredient(CLOWN_VEGETABLE, 1)
            .with_price(120.0)]);
        let entry = catalog.iter().next().unwrap();
        let mut builder =
            PlanBuilder::new(&IngredientPool::from([(CLOWN_MEAT, 7.0), (CLOWN_VEGETABLE, 5.0)]));

        assert!(builder.craft_max(entry, Phase::Scarce));
        assert!(!builder.craft_max(entry, Phase::Scarce));

        let step = &builder.steps[0];
        assert_eq!(step.step, 1);
        assert_eq!(step.quantity, 3);
        assert_eq!(step.limiting_ingredient, CLOWN_MEAT);
        assert_eq!(step.gold_value, 360.0);
        assert_eq!(step.ingredients_used, 9.0);
        assert_eq!(builder.pool.get(CLOWN_MEAT), 1.0);
        assert_eq!(builder.pool.get(CLOWN_VEGETABLE), 2.0);
    }

    #[test]
    fn test_plan_leaves_input_untouched() {
        let catalog = RecipeCatalog::from_recipes([Recipe::new("burger", "Goblin Burger")
            .with_ingredient(CLOWN_MEAT, 3)
            .with_price(90.0)]);
        let fallback = FallbackTable::new(100.0).with_value(CLOWN_MEAT, 29.0);
        let rankings = rank_recipes(&catalog, &AcquisitionModel::default(), &fallback, 30.0);
        let pool = IngredientPool::from([(CLOWN_MEAT, 10.0)]);

        let plan =
            Planner::new(&catalog, &fallback).plan(&pool, &rankings, PlanningPolicy::default());

        assert_eq!(pool.get(CLOWN_MEAT), 10.0);
        assert_eq!(plan.residual.get(CLOWN_MEAT), 1.0);
        assert_eq!(plan.crafted_value, 270.0);
        assert_eq!(plan.total_dishes(), 3);
        // One meat left is far below the stew minimum
        assert!(plan.residual_valuation.below_minimum);
        assert_eq!(plan.total_value(), 270.0);
    }

    #[test]
    fn test_large_pool_counts_units_as_quantity() {
        let catalog = RecipeCatalog::from_recipes([Recipe::new(
            "toad_egg_salad",
            "Toad Egg Salad",
        )
        .with_ingredient(CLOWN_MEAT, 5)
        .with_price(40.0)]);
        let fallback = FallbackTable::new(100.0).with_value(CLOWN_MEAT, 29.0);
        let pool = IngredientPool::from([(CLOWN_MEAT, 5e9)]);

        for policy in [PlanningPolicy::GreedyProfit, PlanningPolicy::default()] {
            let rankings = rank_recipes(&catalog, &AcquisitionModel::default(), &fallback, 30.0);
            let plan = Planner::new(&catalog, &fallback).plan(&pool, &rankings, policy);

            assert_eq!(plan.steps.len(), 1);
            assert_eq!(plan.steps[0].quantity, 1_000_000_000);
            assert_eq!(plan.steps[0].ingredients_used, 5e9);
            assert_eq!(plan.total_dishes(), 1_000_000_000);
            assert_eq!(plan.residual.get(CLOWN_MEAT), 0.0);
        }
    }

    #[test]
    fn test_policy_serde() {
        let json = serde_json::to_value(PlanningPolicy::default()).unwrap();
        assert_eq!(json["kind"], "phasePriority");
        assert_eq!(json["abundant"], "meat");

        let greedy: PlanningPolicy = serde_json::from_str(r#"{"kind":"greedyProfit"}"#).unwrap();
        assert_eq!(greedy, PlanningPolicy::GreedyProfit);
    }
}
