// Daily projection - what a day of supply orders and shop purchases turns into

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::acquisition::{AcquisitionModel, ShopConfig};
use crate::catalog::RecipeCatalog;
use crate::fallback::FallbackTable;
use crate::planner::{Phase, Planner, PlanningPolicy, ProductionPlan};
use crate::pool::IngredientPool;
use crate::ranking::Rankings;
use crate::types::{Gold, Quantity, Vendor};

// === CONSTANTS ===

/// Steps shown in the vendor comparison.
pub const TOP_STEPS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub vendor: Vendor,
    pub base_orders: Quantity,
    pub bonus_orders: Quantity,
    pub total_orders: Quantity,
    #[tsify(type = "Record<string, number>")]
    pub pool: IngredientPool,
    pub plan: ProductionPlan,
    pub shop_costs: Gold,
    /// Crafted gold plus stew value of leftovers, minus shop spending.
    pub net_profit: Gold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct TopStep {
    pub name: String,
    pub gold_per_order: Gold,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct VendorComparison {
    pub best: Vendor,
    pub clown_gold: Gold,
    pub miraculand_gold: Gold,
    pub difference: Gold,
    pub top_steps: Vec<TopStep>,
    /// Ingredients the best vendor's plan leaves over.
    pub leftover_total: Quantity,
}

/// Immutable inputs for projecting a day of play.
#[derive(Clone, Copy)]
pub struct Projection<'a> {
    pub catalog: &'a RecipeCatalog,
    pub acquisition: &'a AcquisitionModel,
    pub shop: &'a ShopConfig,
    pub fallback: &'a FallbackTable,
}

impl<'a> Projection<'a> {
    /// Expected ingredients from a day of orders spent at `vendor`, plus
    /// everything bought directly from the shop.
    pub fn daily_pool(&self, vendor: Vendor) -> IngredientPool {
        let mut pool = self
            .acquisition
            .expected_yield(vendor, self.shop.daily_orders());
        for (ingredient, qty) in self.shop.purchased_pool().iter() {
            pool.add(ingredient, qty);
        }
        pool
    }

    fn plan(&self, pool: &IngredientPool, rankings: &Rankings) -> ProductionPlan {
        Planner::new(self.catalog, self.fallback).plan(pool, rankings, PlanningPolicy::default())
    }

    pub fn daily_summary(&self, rankings: &Rankings, vendor: Vendor) -> DailySummary {
        let pool = self.daily_pool(vendor);
        let plan = self.plan(&pool, rankings);
        let shop_costs = self.shop.total_cost();
        let net_profit = plan.total_value() - shop_costs;

        DailySummary {
            vendor,
            base_orders: self.shop.base_daily_orders(),
            bonus_orders: self.shop.bonus_orders(),
            total_orders: self.shop.daily_orders(),
            pool,
            plan,
            shop_costs,
            net_profit,
        }
    }

    /// Compare spending the base daily orders (no shop) at each vendor.
    /// Clown wins ties.
    pub fn compare_vendors(&self, rankings: &Rankings) -> VendorComparison {
        let orders = self.shop.base_daily_orders();
        let clown_pool = self.acquisition.expected_yield(Vendor::Clown, orders);
        let mirac_pool = self.acquisition.expected_yield(Vendor::Miraculand, orders);
        let clown_plan = self.plan(&clown_pool, rankings);
        let mirac_plan = self.plan(&mirac_pool, rankings);
        let clown_gold = clown_plan.total_value();
        let miraculand_gold = mirac_plan.total_value();

        let (best, best_plan) = if clown_gold >= miraculand_gold {
            (Vendor::Clown, clown_plan)
        } else {
            (Vendor::Miraculand, mirac_plan)
        };

        let top_steps = best_plan
            .steps
            .iter()
            .take(TOP_STEPS)
            .map(|step| TopStep {
                name: step.name.clone(),
                gold_per_order: rankings
                    .get(&step.recipe_id)
                    .map(|r| r.gold_per_order)
                    .unwrap_or(0.0),
                phase: step.phase,
            })
            .collect();

        VendorComparison {
            best,
            clown_gold,
            miraculand_gold,
            difference: (clown_gold - miraculand_gold).abs(),
            top_steps,
            leftover_total: best_plan.residual.total(),
        }
    }
}
