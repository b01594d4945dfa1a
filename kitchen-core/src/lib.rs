use std::collections::BTreeMap;
use std::ops::ControlFlow;

use wasm_bindgen::prelude::*;

pub mod acquisition;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod error;
pub mod fallback;
pub mod planner;
pub mod pool;
pub mod projection;
pub mod ranking;
pub mod simulation;
pub mod types;

pub use acquisition::{AcquisitionModel, ShopConfig, ShopRoi, shop_roi};
pub use catalog::{Recipe, RecipeCatalog, RecipeId, RecipeSettings};
pub use config::KitchenConfig;
pub use error::{ConfigError, SimulationError};
pub use fallback::{FallbackTable, PoolValuation};
pub use planner::{Planner, PlanningPolicy, ProductionPlan};
pub use pool::IngredientPool;
pub use projection::{DailySummary, Projection, VendorComparison};
pub use ranking::{Rankings, rank_recipes};
pub use simulation::{SimulationConfig, SimulationOutcome, SimulationResult};
pub use types::*;

#[cfg(feature = "instrument")]
pub use instrument;

use simulation::{
    IngredientRange, Percentile, Progress, StewRange, StewTrial, TokenTrial, TrialGenerator,
    run_with_checkpoint,
};

// ============================================================================
// Kitchen - one player's calculator session
// ============================================================================

/// Owns the editable configuration plus the static game tables, and keeps
/// the last simulation run for percentile queries.
#[wasm_bindgen]
pub struct Kitchen {
    config: KitchenConfig,
    base_recipes: Vec<Recipe>,
    fallback: FallbackTable,
    ranges: BTreeMap<IngredientType, IngredientRange>,
    last_run: Option<SimulationResult>,
}

impl Default for Kitchen {
    fn default() -> Self {
        Self::with_config(KitchenConfig::default())
    }
}

// Native API - usable from Rust and tests without a JS host
impl Kitchen {
    pub fn with_config(config: KitchenConfig) -> Self {
        Self {
            config,
            base_recipes: defaults::recipes(),
            fallback: defaults::fallback_table(),
            ranges: defaults::ingredient_ranges(),
            last_run: None,
        }
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Replace the configuration after validating it. On error the current
    /// configuration is kept.
    pub fn replace_config(&mut self, config: KitchenConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn import_config(&mut self, blob: &str) -> Result<(), ConfigError> {
        self.config = KitchenConfig::import(blob)?;
        Ok(())
    }

    /// Set how much of one ingredient is held, never below zero.
    pub fn hold(&mut self, ingredient: IngredientType, quantity: f64) {
        self.config
            .current_ingredients
            .set(ingredient, quantity.max(0.0));
    }

    pub fn catalog(&self) -> RecipeCatalog {
        self.config.catalog(self.base_recipes.iter().cloned())
    }

    pub fn fallback(&self) -> &FallbackTable {
        &self.fallback
    }

    pub fn last_run(&self) -> Option<&SimulationResult> {
        self.last_run.as_ref()
    }

    pub fn last_percentile(&self, threshold: f64) -> Option<Percentile> {
        self.last_run.as_ref().map(|run| run.percentile(threshold))
    }

    pub fn stew_trial(&self) -> Result<StewTrial, SimulationError> {
        StewTrial::new(
            &self.config.current_ingredients,
            &self.ranges,
            self.fallback.minimum_batch_size,
        )
    }

    pub fn stele_trial(level: u32) -> Result<TokenTrial, SimulationError> {
        let threshold =
            defaults::stele_requirement(level).ok_or(SimulationError::UnknownSteleLevel(level))?;
        TokenTrial::new(defaults::TOKEN_OUTCOMES.to_vec(), threshold)
    }

    /// Run `generator` and keep the result as the last run unless cancelled.
    pub fn run<G, F>(
        &mut self,
        generator: &G,
        config: &SimulationConfig,
        checkpoint: F,
    ) -> Result<Option<&SimulationResult>, SimulationError>
    where
        G: TrialGenerator,
        F: FnMut(Progress) -> ControlFlow<()>,
    {
        match run_with_checkpoint(generator, config, checkpoint)? {
            SimulationOutcome::Completed(result) => {
                self.last_run = Some(result);
                Ok(self.last_run.as_ref())
            }
            SimulationOutcome::Cancelled { .. } => Ok(None),
        }
    }

    fn with_projection<T>(&self, f: impl FnOnce(Projection<'_>, &Rankings) -> T) -> T {
        let catalog = self.catalog();
        let rankings = self.rank(&catalog);
        let projection = Projection {
            catalog: &catalog,
            acquisition: &self.config.vendors,
            shop: &self.config.shop,
            fallback: &self.fallback,
        };
        f(projection, &rankings)
    }

    fn rank(&self, catalog: &RecipeCatalog) -> Rankings {
        rank_recipes(
            catalog,
            &self.config.vendors,
            &self.fallback,
            self.config.shop.supply_orders_per_hour,
        )
    }
}

/// Seed for one browser simulation run.
#[cfg(target_arch = "wasm32")]
fn fresh_seed() -> Option<u64> {
    let half = || (js_sys::Math::random() * 4_294_967_296.0) as u64;
    Some((half() << 32) | half())
}

#[cfg(not(target_arch = "wasm32"))]
fn fresh_seed() -> Option<u64> {
    None
}

/// Adapt an optional JS progress callback to a checkpoint. The callback gets
/// the completed fraction; returning `false` (or throwing) cancels.
fn js_checkpoint(callback: Option<js_sys::Function>) -> impl FnMut(Progress) -> ControlFlow<()> {
    move |progress| {
        let Some(callback) = &callback else {
            return ControlFlow::Continue(());
        };
        match callback.call1(&JsValue::NULL, &JsValue::from_f64(progress.fraction())) {
            Ok(answer) if answer.as_bool() == Some(false) => ControlFlow::Break(()),
            Ok(_) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }
}

// ============================================================================
// WASM API
// ============================================================================

#[wasm_bindgen]
impl Kitchen {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();
        Self::default()
    }

    #[wasm_bindgen]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.config)?)
    }

    #[wasm_bindgen]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let config: KitchenConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(self.replace_config(config)?)
    }

    /// Set one held ingredient, keyed like `clownMeat`.
    #[wasm_bindgen]
    pub fn set_holding(&mut self, ingredient: &str, quantity: f64) -> Result<(), JsError> {
        self.hold(ingredient.parse()?, quantity);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn import(&mut self, blob: &str) -> Result<(), JsError> {
        Ok(self.import_config(blob)?)
    }

    #[wasm_bindgen]
    pub fn export(&self) -> Result<String, JsError> {
        let timestamp = String::from(js_sys::Date::new_0().to_iso_string());
        Ok(self.config.export(&timestamp)?)
    }

    #[wasm_bindgen]
    pub fn rankings(&self) -> Rankings {
        self.rank(&self.catalog())
    }

    /// Plan the ingredients currently held.
    #[wasm_bindgen]
    pub fn plan_holdings(&self, policy: PlanningPolicy) -> ProductionPlan {
        let catalog = self.catalog();
        let rankings = self.rank(&catalog);
        Planner::new(&catalog, &self.fallback).plan(
            &self.config.current_ingredients,
            &rankings,
            policy,
        )
    }

    #[wasm_bindgen]
    pub fn daily_summary(&self) -> DailySummary {
        let vendor = self.config.daily_summary_vendor;
        self.with_projection(|projection, rankings| projection.daily_summary(rankings, vendor))
    }

    #[wasm_bindgen]
    pub fn compare_vendors(&self) -> VendorComparison {
        self.with_projection(|projection, rankings| projection.compare_vendors(rankings))
    }

    #[wasm_bindgen]
    pub fn shop_roi(&self) -> ShopRoi {
        let top = self.rankings().top_gold_per_order();
        shop_roi(&self.config.shop, &self.config.vendors, &self.fallback, top)
    }

    #[wasm_bindgen]
    pub fn value_holdings(&self) -> PoolValuation {
        self.fallback.value_pool(&self.config.current_ingredients)
    }

    #[wasm_bindgen]
    pub fn stew_range(&self) -> StewRange {
        StewRange::of(&self.config.current_ingredients, &self.ranges)
    }

    /// Simulate stewing the current holdings. Returns `undefined` when
    /// cancelled from the progress callback.
    #[wasm_bindgen]
    pub fn simulate_stew(
        &mut self,
        progress: Option<js_sys::Function>,
    ) -> Result<JsValue, JsError> {
        let trial = self.stew_trial()?;
        self.simulate(&trial, progress)
    }

    /// Simulate tokens needed to reach a stele level (5, 8, 10, 12 or 15).
    #[wasm_bindgen]
    pub fn simulate_stele(
        &mut self,
        level: u32,
        progress: Option<js_sys::Function>,
    ) -> Result<JsValue, JsError> {
        let trial = Self::stele_trial(level)?;
        self.simulate(&trial, progress)
    }

    #[wasm_bindgen]
    pub fn percentile(&self, threshold: f64) -> Result<Percentile, JsError> {
        self.last_percentile(threshold)
            .ok_or_else(|| JsError::new("no simulation has been run"))
    }

    /// Normal overlay for the last run's histogram, scaled to the bars.
    #[wasm_bindgen]
    pub fn normal_curve(&self) -> Vec<f64> {
        self.last_run
            .as_ref()
            .map(SimulationResult::scaled_normal_curve)
            .unwrap_or_default()
    }
}

impl Kitchen {
    fn simulate<G: TrialGenerator>(
        &mut self,
        generator: &G,
        progress: Option<js_sys::Function>,
    ) -> Result<JsValue, JsError> {
        let config = SimulationConfig {
            seed: fresh_seed(),
            ..SimulationConfig::default()
        };
        let result = self.run(generator, &config, js_checkpoint(progress))?;
        Ok(serde_wasm_bindgen::to_value(&result)?)
    }
}
