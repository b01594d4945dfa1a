// Greedy-profit policy: rescan everything after every step

use super::{Phase, PlanBuilder};
use crate::catalog::{CatalogEntry, RecipeCatalog};
use crate::fallback::FallbackTable;
use crate::types::Gold;

/// Gold gained per dish over stewing its ingredients instead.
fn profit_per_dish(entry: &CatalogEntry, fallback: &FallbackTable) -> Gold {
    entry.price() - fallback.consumption_value(entry.recipe.requirements())
}

/// Best makeable recipe against the current pool; ties keep catalog order.
fn best_candidate<'a>(
    builder: &PlanBuilder,
    candidates: &[(&'a CatalogEntry, Gold)],
) -> Option<&'a CatalogEntry> {
    let mut best: Option<(&CatalogEntry, Gold)> = None;
    for &(entry, profit) in candidates {
        let makeable = entry
            .recipe
            .max_batches(&builder.pool)
            .is_some_and(|(qty, _)| qty >= 1);
        if makeable && best.is_none_or(|(_, top)| profit > top) {
            best = Some((entry, profit));
        }
    }
    best.map(|(entry, _)| entry)
}

pub(super) fn run(builder: &mut PlanBuilder, catalog: &RecipeCatalog, fallback: &FallbackTable) {
    // Unpriced recipes are never worth cooking
    let candidates: Vec<(&CatalogEntry, Gold)> = catalog
        .enabled()
        .filter(|entry| entry.price() > 0.0)
        .map(|entry| (entry, profit_per_dish(entry, fallback)))
        .collect();

    // Every step consumes at least one unit, so this ends
    while let Some(entry) = best_candidate(builder, &candidates) {
        if !builder.craft_max(entry, Phase::Greedy) {
            break;
        }
    }
}
