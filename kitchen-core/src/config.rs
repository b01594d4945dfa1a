//! The player's editable configuration and its import/export blob.
//!
//! Export wraps the configuration as `{version, timestamp, state}` JSON and
//! base64-encodes it. Import runs the checks in the same order and only
//! hands back a configuration once every check has passed, so a rejected
//! blob never replaces the active one.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::acquisition::{AcquisitionModel, ShopConfig};
use crate::catalog::{Recipe, RecipeCatalog, RecipeSettings};
use crate::defaults;
use crate::error::ConfigError;
use crate::pool::IngredientPool;
use crate::types::Vendor;

// === CONSTANTS ===

pub const CONFIG_VERSION: u64 = 1;

/// Sections every imported state must carry.
const REQUIRED_SECTIONS: [&str; 3] = ["recipes", "vendors", "shop"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenConfig {
    /// Per-recipe edits keyed by recipe id.
    pub recipes: BTreeMap<String, RecipeSettings>,
    pub vendors: AcquisitionModel,
    pub shop: ShopConfig,
    #[serde(default)]
    pub current_ingredients: IngredientPool,
    #[serde(default)]
    pub daily_summary_vendor: Vendor,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            recipes: defaults::recipes()
                .iter()
                .map(|recipe| (recipe.id.to_string(), RecipeSettings::untouched(recipe)))
                .collect(),
            vendors: AcquisitionModel::default(),
            shop: defaults::shop(),
            current_ingredients: IngredientPool::new(),
            daily_summary_vendor: Vendor::Clown,
        }
    }
}

#[derive(Serialize)]
struct ConfigEnvelope {
    version: u64,
    timestamp: String,
    state: KitchenConfig,
}

impl KitchenConfig {
    /// Overlay the player's settings onto base recipe records. Settings for
    /// ids not in `base` are ignored; recipes without settings start disabled.
    pub fn catalog(&self, base: impl IntoIterator<Item = Recipe>) -> RecipeCatalog {
        let mut catalog = RecipeCatalog::new();
        for recipe in base {
            let settings = self
                .recipes
                .get(recipe.id.as_str())
                .copied()
                .unwrap_or_else(|| RecipeSettings::untouched(&recipe));
            catalog.insert_with(recipe, settings);
        }
        catalog
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.vendors.validate()?;
        for (id, settings) in &self.recipes {
            if !settings.price.is_finite() || settings.price < 0.0 {
                return Err(ConfigError::InvalidRecipe(id.clone()));
            }
        }
        Ok(())
    }

    pub fn export(&self, timestamp: &str) -> Result<String, ConfigError> {
        let envelope = ConfigEnvelope {
            version: CONFIG_VERSION,
            timestamp: timestamp.to_string(),
            state: self.clone(),
        };
        let json = serde_json::to_string(&envelope)?;
        Ok(STANDARD.encode(json))
    }

    pub fn import(blob: &str) -> Result<Self, ConfigError> {
        let result = Self::decode(blob);

        #[cfg(feature = "instrument")]
        match &result {
            Ok(config) => tracing::info!(
                target: "config",
                accepted = true,
                recipes = config.recipes.len() as u64,
            ),
            Err(err) => tracing::info!(
                target: "config",
                accepted = false,
                error = %err,
            ),
        }

        result
    }

    fn decode(blob: &str) -> Result<Self, ConfigError> {
        let bytes = STANDARD.decode(blob.trim())?;
        let envelope: Value = serde_json::from_slice(&bytes)?;

        match envelope.get("version").and_then(Value::as_u64) {
            None | Some(0) => return Err(ConfigError::MissingVersion),
            Some(CONFIG_VERSION) => {}
            Some(other) => return Err(ConfigError::UnsupportedVersion(other)),
        }

        let state = match envelope.get("state") {
            Some(state) if state.is_object() => state,
            _ => return Err(ConfigError::MissingState),
        };
        for section in REQUIRED_SECTIONS {
            if state.get(section).is_none_or(Value::is_null) {
                return Err(ConfigError::MissingSection(section));
            }
        }

        let config = KitchenConfig::deserialize(state)?;
        config.validate()?;
        Ok(config)
    }
}
