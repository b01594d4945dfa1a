// Shop - deterministic purchases of supply orders and ingredients

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use super::vendor::AcquisitionModel;
use crate::fallback::FallbackTable;
use crate::pool::IngredientPool;
use crate::types::{Category, Gold, IngredientType, Quantity, Vendor};

// === CONSTANTS ===

/// g/Order used to value purchases when no recipe ranks.
pub const FALLBACK_GOLD_PER_ORDER: Gold = 50.0;

pub const HOURS_PER_DAY: f64 = 24.0;

/// Orders per ingredient assumed when the vendor's rate for it is zero.
pub fn reference_order_cost(vendor: Vendor) -> f64 {
    match vendor {
        Vendor::Clown => 4.0,
        Vendor::Miraculand => 3.6,
    }
}

// ============================================================================
// Offers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum OfferKind {
    /// Bundles of extra supply orders.
    SupplyOrders,
    /// Direct ingredient purchase, bypassing vendor rates.
    Ingredient { ingredient: IngredientType },
    /// Pure expense with no ingredient yield.
    SkillBook,
}

impl OfferKind {
    pub fn label(&self) -> String {
        match self {
            OfferKind::SupplyOrders => "Supply Deals".to_string(),
            OfferKind::Ingredient { ingredient } => format!("{} Purchase", ingredient.label()),
            OfferKind::SkillBook => "Skill Books".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopOffer {
    pub kind: OfferKind,
    pub enabled: bool,
    pub quantity: u32,
    pub unit_cost: Gold,
    /// Orders (supply deals) or ingredients (purchases) per unit bought.
    pub unit_yield: Quantity,
}

impl ShopOffer {
    pub fn new(kind: OfferKind, unit_cost: Gold, unit_yield: Quantity) -> Self {
        Self {
            kind,
            enabled: false,
            quantity: 0,
            unit_cost,
            unit_yield,
        }
    }

    /// Whether this offer currently buys anything.
    pub fn is_active(&self) -> bool {
        self.enabled && self.quantity > 0
    }

    pub fn cost(&self) -> Gold {
        if self.is_active() {
            self.quantity as f64 * self.unit_cost
        } else {
            0.0
        }
    }

    pub fn total_yield(&self) -> Quantity {
        if self.is_active() {
            self.quantity as f64 * self.unit_yield
        } else {
            0.0
        }
    }
}

// ============================================================================
// Shop Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopConfig {
    /// Supply orders gathered per hour of play.
    pub supply_orders_per_hour: f64,
    pub offers: Vec<ShopOffer>,
}

impl ShopConfig {
    pub fn offer(&self, kind: OfferKind) -> Option<&ShopOffer> {
        self.offers.iter().find(|o| o.kind == kind)
    }

    pub fn offer_mut(&mut self, kind: OfferKind) -> Option<&mut ShopOffer> {
        self.offers.iter_mut().find(|o| o.kind == kind)
    }

    /// Enable the offer and set how many to buy. Returns false for an unknown offer.
    pub fn buy(&mut self, kind: OfferKind, quantity: u32) -> bool {
        self.offer_mut(kind)
            .map(|offer| {
                offer.enabled = true;
                offer.quantity = quantity;
            })
            .is_some()
    }

    pub fn base_daily_orders(&self) -> Quantity {
        self.supply_orders_per_hour.max(0.0) * HOURS_PER_DAY
    }

    pub fn bonus_orders(&self) -> Quantity {
        self.offers
            .iter()
            .filter(|o| o.kind == OfferKind::SupplyOrders)
            .map(ShopOffer::total_yield)
            .sum()
    }

    pub fn daily_orders(&self) -> Quantity {
        self.base_daily_orders() + self.bonus_orders()
    }

    /// Units of one ingredient bought directly.
    pub fn purchased(&self, ingredient: IngredientType) -> Quantity {
        self.offers
            .iter()
            .filter(|o| o.kind == OfferKind::Ingredient { ingredient })
            .map(ShopOffer::total_yield)
            .sum()
    }

    /// Every ingredient bought directly, as a pool.
    pub fn purchased_pool(&self) -> IngredientPool {
        IngredientType::all()
            .map(|ingredient| (ingredient, self.purchased(ingredient)))
            .collect()
    }

    pub fn total_cost(&self) -> Gold {
        self.offers.iter().map(ShopOffer::cost).sum()
    }
}

// ============================================================================
// Return on Investment
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct OfferRoi {
    pub label: String,
    pub cost: Gold,
    pub value: Gold,
    pub profit: Gold,
    pub roi_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct ShopRoi {
    pub offers: Vec<OfferRoi>,
    pub total_cost: Gold,
    pub total_profit: Gold,
    pub total_roi_percent: f64,
}

fn roi_percent(value: Gold, cost: Gold) -> f64 {
    if cost > 0.0 {
        (value / cost - 1.0) * 100.0
    } else {
        0.0
    }
}

/// Value each active purchase against the best g/Order recipe.
///
/// Supply deals are worth their orders at `top_gold_per_order`. Meat and
/// vegetable purchases are worth the orders they save. Spice purchases are
/// worth their stew value. Skill books are left out.
pub fn shop_roi(
    shop: &ShopConfig,
    acquisition: &AcquisitionModel,
    fallback: &FallbackTable,
    top_gold_per_order: Option<Gold>,
) -> ShopRoi {
    let gold_per_order = top_gold_per_order.unwrap_or(FALLBACK_GOLD_PER_ORDER);
    let mut offers = Vec::new();

    for offer in shop.offers.iter().filter(|o| o.is_active()) {
        let units = offer.total_yield();
        let value = match offer.kind {
            OfferKind::SupplyOrders => units * gold_per_order,
            OfferKind::Ingredient { ingredient } if ingredient.category == Category::Spice => {
                units * fallback.unit_value(ingredient)
            }
            OfferKind::Ingredient { ingredient } => {
                let rate = acquisition.effective_rate(ingredient);
                let orders_saved = if rate > 0.0 {
                    1.0 / rate
                } else {
                    reference_order_cost(ingredient.vendor)
                };
                units * orders_saved * gold_per_order
            }
            OfferKind::SkillBook => continue,
        };
        let cost = offer.cost();
        offers.push(OfferRoi {
            label: offer.kind.label(),
            cost,
            value,
            profit: value - cost,
            roi_percent: roi_percent(value, cost),
        });
    }

    let total_cost: Gold = offers.iter().map(|o| o.cost).sum();
    let total_profit: Gold = offers.iter().map(|o| o.profit).sum();
    ShopRoi {
        offers,
        total_cost,
        total_profit,
        total_roi_percent: if total_cost > 0.0 {
            total_profit / total_cost * 100.0
        } else {
            0.0
        },
    }
}
