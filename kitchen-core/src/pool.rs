// Ingredient pool - the multiset of ingredient quantities a plan draws from

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Category, IngredientType, Quantity, Vendor};

/// Quantities of each ingredient type on hand.
///
/// Never holds a negative quantity: removals are clamped to what is present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientPool {
    quantities: BTreeMap<IngredientType, Quantity>,
}

impl IngredientPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ingredient: IngredientType) -> Quantity {
        self.quantities.get(&ingredient).copied().unwrap_or(0.0)
    }

    /// Overwrite the quantity of one ingredient (negative input is stored as zero).
    pub fn set(&mut self, ingredient: IngredientType, amount: Quantity) {
        self.quantities.insert(ingredient, amount.max(0.0));
    }

    pub fn add(&mut self, ingredient: IngredientType, amount: Quantity) {
        let current = self.quantities.entry(ingredient).or_insert(0.0);
        *current = (*current + amount).max(0.0);
    }

    /// Remove up to `amount`, returning what was actually removed.
    pub fn remove(&mut self, ingredient: IngredientType, amount: Quantity) -> Quantity {
        let current = self.quantities.entry(ingredient).or_insert(0.0);
        let removed = amount.max(0.0).min(*current);
        *current = (*current - removed).max(0.0);
        removed
    }

    pub fn total(&self) -> Quantity {
        self.quantities.values().sum()
    }

    /// Total held in one category across both vendors.
    pub fn category_total(&self, category: Category) -> Quantity {
        self.quantities
            .iter()
            .filter(|(ingredient, _)| ingredient.category == category)
            .map(|(_, qty)| qty)
            .sum()
    }

    pub fn vendor_total(&self, vendor: Vendor) -> Quantity {
        self.quantities
            .iter()
            .filter(|(ingredient, _)| ingredient.vendor == vendor)
            .map(|(_, qty)| qty)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.values().all(|&q| q <= 0.0)
    }

    /// Non-zero entries in canonical ingredient order.
    pub fn iter(&self) -> impl Iterator<Item = (IngredientType, Quantity)> + '_ {
        self.quantities
            .iter()
            .filter(|(_, qty)| **qty > 0.0)
            .map(|(ingredient, qty)| (*ingredient, *qty))
    }
}

impl FromIterator<(IngredientType, Quantity)> for IngredientPool {
    fn from_iter<T: IntoIterator<Item = (IngredientType, Quantity)>>(iter: T) -> Self {
        let mut pool = IngredientPool::new();
        for (ingredient, qty) in iter {
            pool.add(ingredient, qty);
        }
        pool
    }
}

impl<const N: usize> From<[(IngredientType, Quantity); N]> for IngredientPool {
    fn from(entries: [(IngredientType, Quantity); N]) -> Self {
        entries.into_iter().collect()
    }
}
