// Efficiency ranking - gold earned per supply order spent, per recipe

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::acquisition::AcquisitionModel;
use crate::catalog::{CatalogEntry, RecipeCatalog, RecipeId};
use crate::fallback::FallbackTable;
use crate::types::{Gold, IngredientType, Vendor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct RankedRecipe {
    #[tsify(type = "string")]
    pub recipe_id: RecipeId,
    pub name: String,
    pub stars: u8,
    pub price: Gold,
    /// Supply orders needed to gather one dish's worth of the limiting ingredient.
    pub orders_needed: f64,
    #[tsify(type = "string")]
    pub limiting_ingredient: IngredientType,
    /// Stew value of everything else those orders drop.
    pub byproduct_value: Gold,
    pub total_value: Gold,
    pub gold_per_order: Gold,
    pub gold_per_hour: Gold,
    pub dishes_per_hour: f64,
    /// Miraculand for any recipe touching a Miraculand ingredient, otherwise Clown.
    pub vendor: Vendor,
}

/// Ranked recipes, best g/Order first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Rankings {
    pub recipes: Vec<RankedRecipe>,
}

impl Rankings {
    pub fn top_gold_per_order(&self) -> Option<Gold> {
        self.recipes.first().map(|r| r.gold_per_order)
    }

    pub fn get(&self, id: &RecipeId) -> Option<&RankedRecipe> {
        self.recipes.iter().find(|r| &r.recipe_id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }
}

/// Orders needed for one dish and the ingredient that sets that pace.
///
/// The pace is the maximum `requirement / rate` over the recipe's ingredients;
/// ties keep the first ingredient in canonical order.
fn orders_needed(
    entry: &CatalogEntry,
    acquisition: &AcquisitionModel,
) -> Option<(f64, IngredientType)> {
    let mut worst: Option<(f64, IngredientType)> = None;
    for (ingredient, qty) in entry.recipe.requirements() {
        let orders = qty as f64 * acquisition.order_cost(ingredient);
        if worst.is_none_or(|(highest, _)| orders > highest) {
            worst = Some((orders, ingredient));
        }
    }
    worst
}

/// Stew value of the excess each touched vendor drops while gathering `orders`.
fn byproduct_value(
    entry: &CatalogEntry,
    orders: f64,
    acquisition: &AcquisitionModel,
    fallback: &FallbackTable,
) -> Gold {
    Vendor::ALL
        .into_iter()
        .filter(|&vendor| entry.recipe.uses_vendor(vendor))
        .flat_map(IngredientType::of_vendor)
        .map(|ingredient| {
            let expected = orders * acquisition.effective_rate(ingredient);
            let excess = (expected - entry.recipe.requirement(ingredient) as f64).max(0.0);
            excess * fallback.unit_value(ingredient)
        })
        .sum()
}

fn rank_entry(
    entry: &CatalogEntry,
    acquisition: &AcquisitionModel,
    fallback: &FallbackTable,
    orders_per_hour: f64,
) -> Option<RankedRecipe> {
    let (orders, limiting) = orders_needed(entry, acquisition)?;
    if orders == 0.0 || !orders.is_finite() {
        return None;
    }

    let price = entry.price();
    let byproduct = byproduct_value(entry, orders, acquisition, fallback);
    let total_value = price + byproduct;
    let dishes_per_hour = orders_per_hour / orders;

    Some(RankedRecipe {
        recipe_id: entry.recipe.id.clone(),
        name: entry.recipe.name.clone(),
        stars: entry.settings.stars,
        price,
        orders_needed: orders,
        limiting_ingredient: limiting,
        byproduct_value: byproduct,
        total_value,
        gold_per_order: total_value / orders,
        gold_per_hour: dishes_per_hour * total_value,
        dishes_per_hour,
        vendor: if entry.recipe.uses_vendor(Vendor::Miraculand) {
            Vendor::Miraculand
        } else {
            Vendor::Clown
        },
    })
}

/// Rank every enabled recipe by gold per supply order.
///
/// Recipes that cannot be gathered (a required category never drops) are
/// left out. The sort is stable so equal g/Order keeps catalog order.
pub fn rank_recipes(
    catalog: &RecipeCatalog,
    acquisition: &AcquisitionModel,
    fallback: &FallbackTable,
    orders_per_hour: f64,
) -> Rankings {
    let mut recipes: Vec<RankedRecipe> = catalog
        .enabled()
        .filter_map(|entry| rank_entry(entry, acquisition, fallback, orders_per_hour))
        .collect();

    recipes.sort_by(|a, b| b.gold_per_order.total_cmp(&a.gold_per_order));

    #[cfg(feature = "instrument")]
    for (rank, r) in recipes.iter().enumerate() {
        tracing::info!(
            target: "rank",
            rank = rank as u64,
            recipe = r.recipe_id.as_str(),
            orders_needed = r.orders_needed,
            limiting = %r.limiting_ingredient,
            byproduct_value = r.byproduct_value,
            gold_per_order = r.gold_per_order,
            gold_per_hour = r.gold_per_hour,
        );
    }

    Rankings { recipes }
}
