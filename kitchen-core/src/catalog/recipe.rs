// Recipe definitions for dishes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pool::IngredientPool;
use crate::types::{Category, Gold, IngredientType, Vendor};

// === RECIPE ID ===

#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

// === RECIPE ===

/// A dish: what it consumes per unit and what it sells for by default.
///
/// Consumption is kept in canonical ingredient order, one entry per ingredient
/// type, so iteration (and therefore limiting-ingredient tie-breaks) is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub default_stars: u8,
    pub default_price: Gold,
    pub consumption: Vec<(IngredientType, u32)>,
}

impl Recipe {
    pub fn new(id: impl Into<RecipeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_stars: 1,
            default_price: 0.0,
            consumption: Vec::new(),
        }
    }

    pub fn with_price(mut self, price: Gold) -> Self {
        self.default_price = price;
        self
    }

    pub fn with_stars(mut self, stars: u8) -> Self {
        self.default_stars = stars;
        self
    }

    /// Add (or replace) the per-unit requirement for one ingredient.
    pub fn with_ingredient(mut self, ingredient: IngredientType, qty: u32) -> Self {
        self.consumption.retain(|(existing, _)| *existing != ingredient);
        self.consumption.push((ingredient, qty));
        self.consumption.sort_by_key(|(ingredient, _)| *ingredient);
        self
    }

    pub fn requirement(&self, ingredient: IngredientType) -> u32 {
        self.consumption
            .iter()
            .find(|(existing, _)| *existing == ingredient)
            .map(|(_, qty)| *qty)
            .unwrap_or(0)
    }

    /// Non-zero requirements only.
    pub fn requirements(&self) -> impl Iterator<Item = (IngredientType, u32)> + '_ {
        self.consumption
            .iter()
            .filter(|(_, qty)| *qty > 0)
            .map(|(ingredient, qty)| (*ingredient, *qty))
    }

    /// A recipe that consumes nothing cannot be planned or ranked.
    pub fn is_valid(&self) -> bool {
        self.requirements().next().is_some()
    }

    pub fn uses_vendor(&self, vendor: Vendor) -> bool {
        self.requirements()
            .any(|(ingredient, _)| ingredient.vendor == vendor)
    }

    pub fn uses_category(&self, category: Category) -> bool {
        self.requirements()
            .any(|(ingredient, _)| ingredient.category == category)
    }

    /// Total ingredient units consumed by one dish.
    pub fn units_per_dish(&self) -> u32 {
        self.requirements().map(|(_, qty)| qty).sum()
    }

    /// How many whole dishes the pool supports, and which ingredient runs out first.
    ///
    /// Returns `None` for an invalid recipe. The limiting ingredient is the one
    /// with the smallest `available / required` ratio; ties keep the first in
    /// canonical order. Counts past `u32::MAX` saturate.
    pub fn max_batches(&self, pool: &IngredientPool) -> Option<(u32, IngredientType)> {
        let mut best: Option<(f64, IngredientType)> = None;
        for (ingredient, qty) in self.requirements() {
            let ratio = pool.get(ingredient) / qty as f64;
            if best.is_none_or(|(lowest, _)| ratio < lowest) {
                best = Some((ratio, ingredient));
            }
        }
        best.map(|(ratio, ingredient)| (ratio.max(0.0).floor() as u32, ingredient))
    }

    /// Remove `batches` dishes worth of ingredients from the pool.
    pub fn consume(&self, pool: &mut IngredientPool, batches: u32) {
        for (ingredient, qty) in self.requirements() {
            pool.remove(ingredient, qty as f64 * batches as f64);
        }
    }
}
