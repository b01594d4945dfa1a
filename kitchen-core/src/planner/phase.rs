// Phase-priority policy: one pass over the ranking, scarce categories first

use super::{Phase, PlanBuilder};
use crate::catalog::{CatalogEntry, RecipeCatalog};
use crate::ranking::Rankings;
use crate::types::Category;

fn uses_scarce(entry: &CatalogEntry, abundant: Category) -> bool {
    Category::ALL
        .into_iter()
        .filter(|&c| c != abundant)
        .any(|c| entry.recipe.uses_category(c))
}

/// Ranked entries in g/Order order. Rankings only hold enabled, makeable
/// recipes, so anything missing from the catalog is skipped.
fn ranked_entries<'a>(
    catalog: &'a RecipeCatalog,
    rankings: &'a Rankings,
) -> impl Iterator<Item = &'a CatalogEntry> + 'a {
    rankings
        .recipes
        .iter()
        .filter_map(|ranked| catalog.get(&ranked.recipe_id))
        .filter(|entry| entry.is_enabled() && entry.recipe.is_valid())
}

pub(super) fn run(
    builder: &mut PlanBuilder,
    catalog: &RecipeCatalog,
    rankings: &Rankings,
    abundant: Category,
) {
    // Phase 1: anything that needs a scarce category
    for entry in ranked_entries(catalog, rankings).filter(|e| uses_scarce(e, abundant)) {
        builder.craft_max(entry, Phase::Scarce);
    }

    // Phase 2: soak up the abundant category
    for entry in ranked_entries(catalog, rankings).filter(|e| !uses_scarce(e, abundant)) {
        builder.craft_max(entry, Phase::Abundant);
    }
}
