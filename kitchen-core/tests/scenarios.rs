use std::ops::ControlFlow;

use kitchen_core::acquisition::{AcquisitionModel, OfferKind};
use kitchen_core::simulation::{
    SimulationConfig, TokenOutcome, TokenTrial, TrialGenerator, run_simulation,
};
use kitchen_core::{
    CLOWN_MEAT, CLOWN_SPICE, CLOWN_VEGETABLE, FallbackTable, IngredientPool, Kitchen,
    KitchenConfig, MIRAC_MEAT, Planner, PlanningPolicy, Recipe, RecipeCatalog, SimulationError,
    Vendor, rank_recipes,
};

fn priced_config() -> KitchenConfig {
    let mut config = KitchenConfig::default();
    for (id, price) in [
        ("goblin_burger", 160.0),
        ("rust_pudding", 210.0),
        ("spider_eyeball_soup", 900.0),
        ("marinated_octopus", 180.0),
        ("braised_dire_shrimp", 240.0),
    ] {
        if let Some(settings) = config.recipes.get_mut(id) {
            settings.enabled = true;
            settings.price = price;
        }
    }
    config
}

fn keep_going(_: kitchen_core::simulation::Progress) -> ControlFlow<()> {
    ControlFlow::Continue(())
}

#[test]
fn test_single_recipe_uses_everything() {
    let catalog = RecipeCatalog::from_recipes([Recipe::new("goblin_burger", "Goblin Burger")
        .with_ingredient(CLOWN_MEAT, 2)
        .with_price(50.0)]);
    let fallback = FallbackTable::new(100.0).with_value(CLOWN_MEAT, 5.0);
    let rankings = rank_recipes(&catalog, &AcquisitionModel::default(), &fallback, 30.0);

    let plan = Planner::new(&catalog, &fallback).plan(
        &IngredientPool::from([(CLOWN_MEAT, 10.0)]),
        &rankings,
        PlanningPolicy::default(),
    );

    assert_eq!(plan.steps.len(), 1);
    assert_eq!(plan.steps[0].quantity, 5);
    assert_eq!(plan.crafted_value, 250.0);
    assert_eq!(plan.residual.get(CLOWN_MEAT), 0.0);
    assert_eq!(plan.residual_valuation.value, 0.0);
    assert_eq!(plan.total_value(), 250.0);
}

#[test]
fn test_two_successes_needed() {
    let trial = TokenTrial::new(
        vec![TokenOutcome::new(0, 0.5), TokenOutcome::new(10, 0.5)],
        20,
    )
    .unwrap();
    let config = SimulationConfig::seeded(2024).with_trials(10_000);
    let result = run_simulation(&trial, &config).unwrap();

    // Negative binomial: two successes at p = 0.5 take four draws on average
    assert!(
        (result.stats.mean - 4.0).abs() < 0.5,
        "mean {}",
        result.stats.mean
    );
    assert_eq!(result.stats.min, 2);
    assert_eq!(result.capped_trials, 0);
    assert_eq!(result.outcomes.len(), 10_000);
}

#[test]
fn test_stele_simulation_through_kitchen() {
    let mut kitchen = Kitchen::default();
    let trial = Kitchen::stele_trial(10).unwrap();
    assert_eq!(trial.threshold(), 2900);

    let config = SimulationConfig::seeded(7).with_trials(2_000);
    let result = kitchen.run(&trial, &config, keep_going).unwrap().unwrap();

    // The best token grants 50 energy
    assert!(result.stats.min >= 58);
    assert_eq!(result.capped_trials, 0);
    let median = result.stats.median as f64;

    let p = kitchen.last_percentile(median).unwrap();
    assert!(p.at_or_below_fraction >= 0.5);
    assert!(kitchen.last_run().is_some());

    assert_eq!(
        Kitchen::stele_trial(7).err(),
        Some(SimulationError::UnknownSteleLevel(7))
    );
}

#[test]
fn test_cancelled_run_keeps_previous_result() {
    let mut kitchen = Kitchen::default();
    let trial = Kitchen::stele_trial(5).unwrap();
    let config = SimulationConfig::seeded(11).with_trials(3_000);

    let first = kitchen.run(&trial, &config, keep_going).unwrap().cloned();
    assert!(first.is_some());

    let cancelled = kitchen
        .run(&trial, &config.with_trials(5_000), |progress| {
            if progress.completed >= 1_000 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
    assert!(cancelled.is_none());
    assert_eq!(kitchen.last_run(), first.as_ref());
}

#[test]
fn test_stew_needs_minimum_batch() {
    let mut kitchen = Kitchen::default();
    kitchen.hold(CLOWN_MEAT, 50.0);
    assert_eq!(
        kitchen.stew_trial().err(),
        Some(SimulationError::BelowMinimumBatch {
            total: 50.0,
            minimum: 100.0,
            shortfall: 50.0,
        })
    );

    kitchen.hold(CLOWN_MEAT, 120.0);
    kitchen.hold(CLOWN_SPICE, 10.0);
    let stew = kitchen.stew_trial().unwrap();
    let range = *stew.range();
    // 120 * 10 + 10 * 72 and 120 * 48 + 10 * 240
    assert_eq!(range.total_min, 1920.0);
    assert_eq!(range.total_max, 8160.0);

    let config = SimulationConfig::seeded(3).with_trials(1_000);
    let result = kitchen.run(&stew, &config, keep_going).unwrap().unwrap();
    assert!(result.stats.min as f64 >= range.total_min);
    assert!(result.stats.max as f64 <= range.total_max);
}

#[test]
fn test_holdings_plan_and_value() {
    let mut kitchen = Kitchen::with_config(priced_config());
    kitchen.hold(CLOWN_MEAT, 40.0);
    kitchen.hold(CLOWN_VEGETABLE, 12.0);
    kitchen.hold(CLOWN_SPICE, 3.0);

    let plan = kitchen.plan_holdings(PlanningPolicy::default());
    assert!(!plan.steps.is_empty());
    // Soup uses the spice before anything else gets the meat
    assert_eq!(plan.steps[0].recipe_id.as_str(), "spider_eyeball_soup");
    assert_eq!(plan.steps[0].quantity, 3);
    assert!(plan.residual.total() < 55.0);

    let valuation = kitchen.value_holdings();
    assert_eq!(valuation.total_quantity, 55.0);
    assert!(valuation.below_minimum);
    assert_eq!(valuation.shortfall, 45.0);
}

#[test]
fn test_default_day_stews_everything() {
    let kitchen = Kitchen::default();
    assert!(kitchen.rankings().is_empty());

    let summary = kitchen.daily_summary();
    assert!(summary.plan.steps.is_empty());
    assert_eq!(summary.plan.crafted_value, 0.0);
    assert_eq!(summary.plan.residual, summary.pool);

    // 468 meat, 180 vegetables and 72 spice at the stew midpoints
    let stewed = kitchen.fallback().value_pool(&summary.pool).value;
    assert!((stewed - 40_374.0).abs() < 1e-6, "stewed {stewed}");
    assert_eq!(summary.plan.residual_valuation.value, stewed);
    assert_eq!(summary.net_profit, stewed);
}

#[test]
fn test_daily_projection_with_defaults() {
    let mut config = priced_config();
    config.shop.buy(OfferKind::SupplyOrders, 2);
    let kitchen = Kitchen::with_config(config);

    let summary = kitchen.daily_summary();
    assert_eq!(summary.vendor, Vendor::Clown);
    assert_eq!(summary.base_orders, 720.0);
    assert_eq!(summary.bonus_orders, 40.0);
    assert_eq!(summary.total_orders, 760.0);
    assert_eq!(summary.shop_costs, 200.0);
    assert_eq!(summary.net_profit, summary.plan.total_value() - 200.0);
    assert!((summary.pool.get(CLOWN_MEAT) - 760.0 * 0.65).abs() < 1e-9);

    let comparison = kitchen.compare_vendors();
    assert_eq!(
        comparison.difference,
        (comparison.clown_gold - comparison.miraculand_gold).abs()
    );
    let best_gold = comparison.clown_gold.max(comparison.miraculand_gold);
    let best = match comparison.best {
        Vendor::Clown => comparison.clown_gold,
        Vendor::Miraculand => comparison.miraculand_gold,
    };
    assert_eq!(best, best_gold);
    assert!(comparison.top_steps.len() <= 3);
}

#[test]
fn test_rankings_skip_unreachable_recipes() {
    let kitchen = Kitchen::with_config(priced_config());
    let rankings = kitchen.rankings();

    // Miraculand only drops meat by default
    assert!(rankings.get(&"marinated_octopus".into()).is_some());
    assert!(rankings.get(&"braised_dire_shrimp".into()).is_none());
    let top = rankings.recipes.first().unwrap();
    assert_eq!(rankings.top_gold_per_order(), Some(top.gold_per_order));

    let roi = kitchen.shop_roi();
    assert_eq!(roi.total_cost, 0.0);
}

#[test]
fn test_config_round_trip_through_kitchen() {
    let mut config = priced_config();
    config.current_ingredients.set(MIRAC_MEAT, 33.0);
    let blob = config.export("2026-10-18T00:00:00.000Z").unwrap();

    let mut kitchen = Kitchen::default();
    kitchen.import_config(&blob).unwrap();
    assert_eq!(kitchen.config(), &config);
    assert_eq!(
        kitchen
            .catalog()
            .get(&"spider_eyeball_soup".into())
            .map(|e| e.price()),
        Some(900.0)
    );

    // A rejected blob leaves the active configuration alone
    assert!(kitchen.import_config("garbage").is_err());
    assert_eq!(kitchen.config(), &config);
}

#[test]
fn test_generators_are_interchangeable() {
    fn mean_of(generator: &impl TrialGenerator) -> f64 {
        let config = SimulationConfig::seeded(99).with_trials(500);
        run_simulation(generator, &config).unwrap().stats.mean
    }

    let token = Kitchen::stele_trial(5).unwrap();
    let mut kitchen = Kitchen::default();
    kitchen.hold(CLOWN_MEAT, 100.0);
    let stew = kitchen.stew_trial().unwrap();

    assert!(mean_of(&token) > 0.0);
    assert!((mean_of(&stew) - 2900.0).abs() < 200.0);
}
