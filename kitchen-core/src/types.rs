use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tsify_next::Tsify;

// ============================================================================
// Scalars
// ============================================================================

/// Ingredient amount. Fractional while projecting vendor rates, whole while crafting.
pub type Quantity = f64;

/// In-game currency.
pub type Gold = f64;

// ============================================================================
// Vendors - Where supply orders are spent
// ============================================================================

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum Vendor {
    #[default]
    Clown,
    Miraculand,
}

impl Vendor {
    pub const ALL: [Vendor; 2] = [Vendor::Clown, Vendor::Miraculand];

    /// Short key used as the prefix of ingredient keys (`clownMeat`, `miracSpice`).
    pub fn key(self) -> &'static str {
        match self {
            Vendor::Clown => "clown",
            Vendor::Miraculand => "mirac",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Vendor::Clown => "Clown",
            Vendor::Miraculand => "Miraculand",
        }
    }

    pub fn other(self) -> Vendor {
        match self {
            Vendor::Clown => Vendor::Miraculand,
            Vendor::Miraculand => Vendor::Clown,
        }
    }
}

// ============================================================================
// Categories - What a supply order can drop
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Tsify,
)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Meat,
    Vegetable,
    Spice,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Meat, Category::Vegetable, Category::Spice];

    pub fn label(self) -> &'static str {
        match self {
            Category::Meat => "Meat",
            Category::Vegetable => "Vegetable",
            Category::Spice => "Spice",
        }
    }
}

// ============================================================================
// Ingredient Type - (vendor, category)
// ============================================================================

/// An ingredient is identified by the vendor that drops it and its category.
///
/// Serialized as a flat camelCase key (`clownMeat`, `miracVegetable`) so pools
/// round-trip as plain JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct IngredientType {
    pub vendor: Vendor,
    pub category: Category,
}

impl IngredientType {
    pub const fn new(vendor: Vendor, category: Category) -> Self {
        Self { vendor, category }
    }

    /// All six ingredient types, vendor-major.
    pub fn all() -> impl Iterator<Item = IngredientType> {
        Vendor::ALL.into_iter().flat_map(|vendor| {
            Category::ALL
                .into_iter()
                .map(move |category| IngredientType::new(vendor, category))
        })
    }

    /// Ingredient types dropped by one vendor.
    pub fn of_vendor(vendor: Vendor) -> impl Iterator<Item = IngredientType> {
        Category::ALL
            .into_iter()
            .map(move |category| IngredientType::new(vendor, category))
    }

    /// Human-readable name, e.g. "Clown Meat".
    pub fn label(&self) -> String {
        format!("{} {}", self.vendor.label(), self.category.label())
    }
}

pub const CLOWN_MEAT: IngredientType = IngredientType::new(Vendor::Clown, Category::Meat);
pub const CLOWN_VEGETABLE: IngredientType =
    IngredientType::new(Vendor::Clown, Category::Vegetable);
pub const CLOWN_SPICE: IngredientType = IngredientType::new(Vendor::Clown, Category::Spice);
pub const MIRAC_MEAT: IngredientType = IngredientType::new(Vendor::Miraculand, Category::Meat);
pub const MIRAC_VEGETABLE: IngredientType =
    IngredientType::new(Vendor::Miraculand, Category::Vegetable);
pub const MIRAC_SPICE: IngredientType = IngredientType::new(Vendor::Miraculand, Category::Spice);

impl fmt::Display for IngredientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.vendor.key(), self.category.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown ingredient key '{0}'")]
pub struct UnknownIngredient(pub String);

impl FromStr for IngredientType {
    type Err = UnknownIngredient;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IngredientType::all()
            .find(|ingredient| ingredient.to_string() == s)
            .ok_or_else(|| UnknownIngredient(s.to_string()))
    }
}

impl From<IngredientType> for String {
    fn from(ingredient: IngredientType) -> Self {
        ingredient.to_string()
    }
}

impl TryFrom<String> for IngredientType {
    type Error = UnknownIngredient;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
