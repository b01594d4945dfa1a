// Game data - recipes, stew values, shop offers and stele tables

use std::collections::BTreeMap;

use crate::acquisition::{OfferKind, ShopConfig, ShopOffer};
use crate::catalog::{Recipe, RecipeCatalog};
use crate::fallback::FallbackTable;
use crate::simulation::{IngredientRange, TokenOutcome};
use crate::types::{
    CLOWN_MEAT, CLOWN_SPICE, CLOWN_VEGETABLE, Gold, IngredientType, MIRAC_MEAT, MIRAC_SPICE,
    MIRAC_VEGETABLE, Quantity,
};

// === CONSTANTS ===

/// Fewest ingredients the stew pot accepts.
pub const MINIMUM_STEW_BATCH: Quantity = 100.0;

pub const DEFAULT_ORDERS_PER_HOUR: f64 = 30.0;

/// `(id, name, [clownMeat, clownVegetable, clownSpice, miracMeat, miracVegetable, miracSpice])`
/// in display order.
const RECIPES: [(&str, &str, [u32; 6]); 21] = [
    ("fried_stinkworm", "Fried Stinkworm", [1, 0, 0, 0, 0, 0]),
    ("goblin_burger", "Goblin Burger", [3, 0, 0, 0, 0, 0]),
    ("toad_egg_salad", "Toad Egg Salad", [5, 0, 0, 0, 0, 0]),
    ("rust_pudding", "Rust Pudding", [2, 1, 0, 0, 0, 0]),
    ("braised_gumball", "Braised Gumball", [3, 2, 0, 0, 0, 0]),
    ("garlic_dried_gecko", "Garlic Dried Gecko", [4, 2, 0, 0, 0, 0]),
    ("fried_demon_beef_rib", "Fried Demon Beef Rib", [6, 3, 0, 0, 0, 0]),
    ("teriyaki_blood_elf", "Teriyaki Blood Elf", [8, 4, 0, 0, 0, 0]),
    ("worm_cheese", "Worm Cheese", [10, 6, 0, 0, 0, 0]),
    ("spider_eyeball_soup", "Spider Eyeball Soup", [5, 2, 1, 0, 0, 0]),
    ("spicy_griffon_claw", "Spicy Griffon Claw", [8, 5, 3, 0, 0, 0]),
    ("gouda_grease_galette", "Gouda-Grease Galette", [20, 10, 5, 0, 0, 0]),
    ("nuclear_bbq_oyster", "Nuclear BBQ Oyster", [0, 0, 0, 1, 0, 0]),
    ("marinated_octopus", "Marinated Octopus", [0, 0, 0, 3, 0, 0]),
    ("manta_ray_sashimi", "Manta Ray Sashimi", [0, 0, 0, 5, 0, 0]),
    ("braised_dire_shrimp", "Braised Dire Shrimp", [0, 0, 0, 2, 1, 0]),
    ("stir_fried_sea_dragon", "Stir-fried Sea Dragon", [0, 0, 0, 3, 2, 0]),
    ("sea_salt_cheese", "Sea Salt Cheese", [0, 0, 0, 4, 2, 0]),
    ("mosasaur_teppanyaki", "Mosasaur Teppanyaki", [0, 0, 0, 6, 3, 0]),
    ("stir_fried_sea_snake", "Stir-fried Sea Snake", [0, 0, 0, 8, 4, 0]),
    ("sour_merman_fin", "Sour Merman Fin", [0, 0, 0, 5, 2, 1]),
];

/// Gold per ingredient from the stew pot: `(ingredient, min, max, mid)`.
/// The midpoint doubles as the fallback unit value.
const STEW_VALUES: [(IngredientType, f64, f64, Gold); 6] = [
    (CLOWN_MEAT, 10.0, 48.0, 29.0),
    (CLOWN_VEGETABLE, 29.0, 144.0, 86.5),
    (CLOWN_SPICE, 72.0, 240.0, 156.0),
    (MIRAC_MEAT, 12.0, 60.0, 36.0),
    (MIRAC_VEGETABLE, 36.0, 180.0, 108.0),
    (MIRAC_SPICE, 90.0, 300.0, 195.0),
];

/// Stele level to energy required.
pub const STELE_REQUIREMENTS: [(u32, i64); 5] =
    [(5, 1000), (8, 2000), (10, 2900), (12, 4000), (15, 6000)];

/// Energy granted by one token.
pub const TOKEN_OUTCOMES: [TokenOutcome; 4] = [
    TokenOutcome::new(0, 0.537),
    TokenOutcome::new(15, 0.331),
    TokenOutcome::new(30, 0.075),
    TokenOutcome::new(50, 0.057),
];

// ============================================================================
// Builders
// ============================================================================

pub fn recipes() -> Vec<Recipe> {
    RECIPES
        .iter()
        .map(|&(id, name, counts)| {
            IngredientType::all()
                .zip(counts)
                .filter(|&(_, qty)| qty > 0)
                .fold(Recipe::new(id, name), |recipe, (ingredient, qty)| {
                    recipe.with_ingredient(ingredient, qty)
                })
        })
        .collect()
}

pub fn catalog() -> RecipeCatalog {
    RecipeCatalog::from_recipes(recipes())
}

pub fn fallback_table() -> FallbackTable {
    STEW_VALUES
        .iter()
        .fold(FallbackTable::new(MINIMUM_STEW_BATCH), |table, &(ingredient, _, _, mid)| {
            table.with_value(ingredient, mid)
        })
}

pub fn ingredient_ranges() -> BTreeMap<IngredientType, IngredientRange> {
    STEW_VALUES
        .iter()
        .map(|&(ingredient, min, max, mid)| (ingredient, IngredientRange::new(min, max, mid)))
        .collect()
}

pub fn shop() -> ShopConfig {
    ShopConfig {
        supply_orders_per_hour: DEFAULT_ORDERS_PER_HOUR,
        offers: vec![
            ShopOffer::new(OfferKind::SupplyOrders, 100.0, 20.0),
            ShopOffer::new(OfferKind::SkillBook, 5000.0, 0.0),
            ShopOffer::new(OfferKind::Ingredient { ingredient: CLOWN_VEGETABLE }, 220.0, 1.0),
            ShopOffer::new(OfferKind::Ingredient { ingredient: CLOWN_SPICE }, 360.0, 1.0),
            ShopOffer::new(OfferKind::Ingredient { ingredient: MIRAC_VEGETABLE }, 270.0, 1.0),
            ShopOffer::new(OfferKind::Ingredient { ingredient: MIRAC_SPICE }, 450.0, 1.0),
        ],
    }
}

pub fn stele_requirement(level: u32) -> Option<i64> {
    STELE_REQUIREMENTS
        .iter()
        .find(|&&(l, _)| l == level)
        .map(|&(_, energy)| energy)
}
