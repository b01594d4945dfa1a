use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::error::ConfigError;
use crate::pool::IngredientPool;
use crate::types::{Category, IngredientType, Quantity, Vendor};

// === CONSTANTS ===

/// Slack allowed when checking that a vendor's enabled rates sum to at most 1.
pub const RATE_SUM_TOLERANCE: f64 = 1e-6;

// ============================================================================
// Presets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "kebab-case")]
pub enum VendorPreset {
    /// Vendor not unlocked.
    None,
    MeatOnly,
    MeatVegetable,
    #[default]
    AllThree,
    /// Rates edited by hand.
    Custom,
}

impl VendorPreset {
    /// `(meat, vegetable, spice)` rates; `None` means the category is disabled.
    pub fn rates(self) -> Option<[Option<f64>; 3]> {
        match self {
            VendorPreset::None => Some([None, None, None]),
            VendorPreset::MeatOnly => Some([Some(1.0), None, None]),
            VendorPreset::MeatVegetable => Some([Some(0.7222), Some(0.2778), None]),
            VendorPreset::AllThree => Some([Some(0.65), Some(0.25), Some(0.10)]),
            VendorPreset::Custom => None,
        }
    }
}

// ============================================================================
// Rates
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct CategoryRate {
    pub enabled: bool,
    pub rate: f64,
}

impl CategoryRate {
    pub fn enabled(rate: f64) -> Self {
        Self { enabled: true, rate }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    /// Probability actually used: zero when the category is switched off.
    pub fn effective(&self) -> f64 {
        if self.enabled { self.rate.max(0.0) } else { 0.0 }
    }
}

/// Drop rates of one vendor, per category, per supply order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct VendorRates {
    pub vendor: Vendor,
    pub preset: VendorPreset,
    pub meat: CategoryRate,
    pub vegetable: CategoryRate,
    pub spice: CategoryRate,
}

impl VendorRates {
    pub fn from_preset(vendor: Vendor, preset: VendorPreset) -> Self {
        let mut rates = Self {
            vendor,
            preset: VendorPreset::Custom,
            meat: CategoryRate::disabled(),
            vegetable: CategoryRate::disabled(),
            spice: CategoryRate::disabled(),
        };
        rates.apply_preset(preset);
        rates
    }

    /// Overwrite every category from the preset. `Custom` only relabels.
    pub fn apply_preset(&mut self, preset: VendorPreset) {
        if let Some(table) = preset.rates() {
            for (category, rate) in Category::ALL.into_iter().zip(table) {
                *self.rate_mut(category) = match rate {
                    Some(r) => CategoryRate::enabled(r),
                    None => CategoryRate::disabled(),
                };
            }
        }
        self.preset = preset;
    }

    pub fn with_rate(mut self, category: Category, rate: f64) -> Self {
        *self.rate_mut(category) = CategoryRate::enabled(rate);
        self.preset = VendorPreset::Custom;
        self
    }

    pub fn rate(&self, category: Category) -> &CategoryRate {
        match category {
            Category::Meat => &self.meat,
            Category::Vegetable => &self.vegetable,
            Category::Spice => &self.spice,
        }
    }

    fn rate_mut(&mut self, category: Category) -> &mut CategoryRate {
        match category {
            Category::Meat => &mut self.meat,
            Category::Vegetable => &mut self.vegetable,
            Category::Spice => &mut self.spice,
        }
    }

    pub fn effective_rate(&self, category: Category) -> f64 {
        self.rate(category).effective()
    }

    /// True when at least one category drops anything.
    pub fn is_active(&self) -> bool {
        Category::ALL
            .into_iter()
            .any(|c| self.effective_rate(c) > 0.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in Category::ALL {
            let rate = self.rate(category);
            if !rate.rate.is_finite() || rate.rate < 0.0 || rate.rate > 1.0 {
                return Err(ConfigError::InvalidRate {
                    vendor: self.vendor,
                    category: category.label(),
                    rate: rate.rate,
                });
            }
        }
        let sum: f64 = Category::ALL
            .into_iter()
            .map(|c| self.effective_rate(c))
            .sum();
        if sum > 1.0 + RATE_SUM_TOLERANCE {
            return Err(ConfigError::InvalidVendorRates {
                vendor: self.vendor,
                sum,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Acquisition Model
// ============================================================================

/// Both vendors' drop rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct AcquisitionModel {
    pub clown: VendorRates,
    pub miraculand: VendorRates,
}

impl Default for AcquisitionModel {
    fn default() -> Self {
        Self {
            clown: VendorRates::from_preset(Vendor::Clown, VendorPreset::AllThree),
            miraculand: VendorRates::from_preset(Vendor::Miraculand, VendorPreset::MeatOnly),
        }
    }
}

impl AcquisitionModel {
    pub fn vendor(&self, vendor: Vendor) -> &VendorRates {
        match vendor {
            Vendor::Clown => &self.clown,
            Vendor::Miraculand => &self.miraculand,
        }
    }

    pub fn vendor_mut(&mut self, vendor: Vendor) -> &mut VendorRates {
        match vendor {
            Vendor::Clown => &mut self.clown,
            Vendor::Miraculand => &mut self.miraculand,
        }
    }

    pub fn effective_rate(&self, ingredient: IngredientType) -> f64 {
        self.vendor(ingredient.vendor)
            .effective_rate(ingredient.category)
    }

    /// Expected supply orders per unit of an ingredient (`1 / rate`, infinite when it never drops).
    pub fn order_cost(&self, ingredient: IngredientType) -> f64 {
        let rate = self.effective_rate(ingredient);
        if rate > 0.0 { 1.0 / rate } else { f64::INFINITY }
    }

    /// Expected ingredients from spending `orders` at one vendor.
    pub fn expected_yield(&self, vendor: Vendor, orders: Quantity) -> IngredientPool {
        IngredientType::of_vendor(vendor)
            .map(|ingredient| (ingredient, orders * self.effective_rate(ingredient)))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for vendor in Vendor::ALL {
            if self.vendor(vendor).vendor != vendor {
                return Err(ConfigError::MisfiledVendor(vendor));
            }
        }
        self.clown.validate()?;
        self.miraculand.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CLOWN_MEAT, CLOWN_SPICE, CLOWN_VEGETABLE, MIRAC_MEAT, MIRAC_VEGETABLE};

    #[test]
    fn test_presets() {
        let rates = VendorRates::from_preset(Vendor::Clown, VendorPreset::MeatVegetable);
        assert_eq!(rates.effective_rate(Category::Meat), 0.7222);
        assert_eq!(rates.effective_rate(Category::Vegetable), 0.2778);
        assert!(!rates.spice.enabled);

        let none = VendorRates::from_preset(Vendor::Miraculand, VendorPreset::None);
        assert!(!none.is_active());
        assert!(none.validate().is_ok());
    }

    #[test]
    fn test_default_model() {
        let model = AcquisitionModel::default();
        assert_eq!(model.clown.preset, VendorPreset::AllThree);
        assert_eq!(model.miraculand.preset, VendorPreset::MeatOnly);
        assert_eq!(model.effective_rate(MIRAC_MEAT), 1.0);
        assert_eq!(model.effective_rate(MIRAC_VEGETABLE), 0.0);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_order_cost() {
        let model = AcquisitionModel::default();
        assert!((model.order_cost(CLOWN_VEGETABLE) - 4.0).abs() < 1e-9);
        assert!((model.order_cost(CLOWN_SPICE) - 10.0).abs() < 1e-9);
        assert!(model.order_cost(MIRAC_VEGETABLE).is_infinite());
    }

    #[test]
    fn test_disabled_category_has_zero_rate() {
        let mut model = AcquisitionModel::default();
        model.clown.meat.enabled = false;
        assert_eq!(model.effective_rate(CLOWN_MEAT), 0.0);
        assert!(model.order_cost(CLOWN_MEAT).is_infinite());
    }

    #[test]
    fn test_expected_yield() {
        let model = AcquisitionModel::default();
        let pool = model.expected_yield(Vendor::Clown, 100.0);
        assert!((pool.get(CLOWN_MEAT) - 65.0).abs() < 1e-9);
        assert!((pool.get(CLOWN_VEGETABLE) - 25.0).abs() < 1e-9);
        assert!((pool.get(CLOWN_SPICE) - 10.0).abs() < 1e-9);
        assert_eq!(pool.get(MIRAC_MEAT), 0.0);
    }

    #[test]
    fn test_validate_rejects_excess_mass() {
        let rates = VendorRates::from_preset(Vendor::Clown, VendorPreset::AllThree)
            .with_rate(Category::Spice, 0.2);
        assert!(matches!(
            rates.validate(),
            Err(ConfigError::InvalidVendorRates { vendor: Vendor::Clown, .. })
        ));

        // Disabled categories do not count toward the sum
        let mut rates = rates;
        rates.spice.enabled = false;
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_rate() {
        let rates = VendorRates::from_preset(Vendor::Clown, VendorPreset::None)
            .with_rate(Category::Meat, -0.5);
        assert!(matches!(rates.validate(), Err(ConfigError::InvalidRate { .. })));
    }

    #[test]
    fn test_preset_serde_names() {
        let json = serde_json::to_string(&VendorPreset::MeatVegetable).unwrap();
        assert_eq!(json, "\"meat-vegetable\"");
    }
}
