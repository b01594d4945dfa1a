// Recipe catalog - base recipe records plus the player's edits

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use super::recipe::{Recipe, RecipeId};
use crate::types::Gold;

/// Player-editable fields for one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSettings {
    pub enabled: bool,
    pub stars: u8,
    pub price: Gold,
}

impl RecipeSettings {
    /// Settings for a recipe added straight to a catalog: enabled, at its
    /// default stars and price.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            enabled: true,
            stars: recipe.default_stars,
            price: recipe.default_price,
        }
    }

    /// Settings before the player has enabled the recipe.
    pub fn untouched(recipe: &Recipe) -> Self {
        Self {
            enabled: false,
            ..Self::from_recipe(recipe)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub recipe: Recipe,
    pub settings: RecipeSettings,
}

impl CatalogEntry {
    pub fn id(&self) -> &RecipeId {
        &self.recipe.id
    }

    pub fn price(&self) -> Gold {
        self.settings.price
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }
}

/// Ordered recipe records. Insertion order is the tie-break order everywhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeCatalog {
    entries: Vec<CatalogEntry>,
}

impl RecipeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from base records with default settings.
    pub fn from_recipes(recipes: impl IntoIterator<Item = Recipe>) -> Self {
        let mut catalog = Self::new();
        for recipe in recipes {
            catalog.insert(recipe);
        }
        catalog
    }

    /// Append a recipe with its default settings; replaces an existing entry with the same id
    /// in place, keeping its position.
    pub fn insert(&mut self, recipe: Recipe) {
        let settings = RecipeSettings::from_recipe(&recipe);
        self.insert_with(recipe, settings);
    }

    pub fn insert_with(&mut self, recipe: Recipe, settings: RecipeSettings) {
        match self.entries.iter_mut().find(|e| e.recipe.id == recipe.id) {
            Some(existing) => {
                existing.recipe = recipe;
                existing.settings = settings;
            }
            None => self.entries.push(CatalogEntry { recipe, settings }),
        }
    }

    pub fn get(&self, id: &RecipeId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| &e.recipe.id == id)
    }

    pub fn get_mut(&mut self, id: &RecipeId) -> Option<&mut CatalogEntry> {
        self.entries.iter_mut().find(|e| &e.recipe.id == id)
    }

    /// Returns false when the id is unknown.
    pub fn set_price(&mut self, id: &RecipeId, price: Gold) -> bool {
        self.get_mut(id)
            .map(|entry| entry.settings.price = price.max(0.0))
            .is_some()
    }

    pub fn set_enabled(&mut self, id: &RecipeId, enabled: bool) -> bool {
        self.get_mut(id)
            .map(|entry| entry.settings.enabled = enabled)
            .is_some()
    }

    pub fn set_stars(&mut self, id: &RecipeId, stars: u8) -> bool {
        self.get_mut(id)
            .map(|entry| entry.settings.stars = stars)
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Enabled recipes that consume at least one ingredient, in catalog order.
    pub fn enabled(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.settings.enabled && e.recipe.is_valid())
    }
}

impl FromIterator<Recipe> for RecipeCatalog {
    fn from_iter<T: IntoIterator<Item = Recipe>>(iter: T) -> Self {
        Self::from_recipes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CLOWN_MEAT, CLOWN_VEGETABLE};

    fn catalog() -> RecipeCatalog {
        RecipeCatalog::from_recipes([
            Recipe::new("burger", "Goblin Burger")
                .with_ingredient(CLOWN_MEAT, 3)
                .with_price(90.0),
            Recipe::new("pudding", "Rust Pudding")
                .with_ingredient(CLOWN_MEAT, 2)
                .with_ingredient(CLOWN_VEGETABLE, 1),
            Recipe::new("air", "Air Soup"),
        ])
    }

    #[test]
    fn test_defaults_from_recipe() {
        let catalog = catalog();
        let burger = catalog.get(&"burger".into()).unwrap();
        assert!(burger.is_enabled());
        assert_eq!(burger.price(), 90.0);
        assert_eq!(burger.settings.stars, 1);
    }

    #[test]
    fn test_untouched_settings_disabled() {
        let recipe = Recipe::new("burger", "Goblin Burger").with_stars(2);
        let settings = RecipeSettings::untouched(&recipe);
        assert!(!settings.enabled);
        assert_eq!(settings.stars, 2);
        assert_eq!(settings.price, 0.0);
    }

    #[test]
    fn test_enabled_skips_disabled_and_invalid() {
        let mut catalog = catalog();
        let ids: Vec<_> = catalog.enabled().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["burger", "pudding"]);

        assert!(catalog.set_enabled(&"burger".into(), false));
        let ids: Vec<_> = catalog.enabled().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["pudding"]);
    }

    #[test]
    fn test_setters() {
        let mut catalog = catalog();
        assert!(catalog.set_price(&"pudding".into(), 140.0));
        assert!(catalog.set_stars(&"pudding".into(), 3));
        assert!(!catalog.set_price(&"missing".into(), 1.0));

        let pudding = catalog.get(&"pudding".into()).unwrap();
        assert_eq!(pudding.price(), 140.0);
        assert_eq!(pudding.settings.stars, 3);

        // Negative prices are stored as zero
        catalog.set_price(&"pudding".into(), -5.0);
        assert_eq!(catalog.get(&"pudding".into()).unwrap().price(), 0.0);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut catalog = catalog();
        catalog.insert(Recipe::new("burger", "Better Burger").with_ingredient(CLOWN_MEAT, 1));

        assert_eq!(catalog.len(), 3);
        let first = catalog.iter().next().unwrap();
        assert_eq!(first.recipe.name, "Better Burger");
    }
}
