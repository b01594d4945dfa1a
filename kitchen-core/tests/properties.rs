//! Property tests for planning, valuation and simulation invariants
//!
//! Each property is checked over a batch of seeded random catalogs and
//! pools, so failures are reproducible from the printed case index.

use kitchen_core::acquisition::{AcquisitionModel, VendorPreset, VendorRates};
use kitchen_core::defaults;
use kitchen_core::simulation::{SimulationConfig, StewTrial, TrialGenerator, run_simulation};
use kitchen_core::{
    CLOWN_MEAT, CLOWN_SPICE, Category, IngredientPool, IngredientType, Planner, PlanningPolicy,
    ProductionPlan, Recipe, RecipeCatalog, Vendor, rank_recipes,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// === TEST FIXTURES ===

const CASES: u64 = 64;

fn both_vendors_open() -> AcquisitionModel {
    AcquisitionModel {
        clown: VendorRates::from_preset(Vendor::Clown, VendorPreset::AllThree),
        miraculand: VendorRates::from_preset(Vendor::Miraculand, VendorPreset::AllThree),
    }
}

fn random_catalog(rng: &mut StdRng) -> RecipeCatalog {
    let ingredients: Vec<IngredientType> = IngredientType::all().collect();
    (0..rng.random_range(1..10))
        .map(|i| {
            let mut recipe = Recipe::new(format!("recipe_{i}").as_str(), format!("Recipe {i}"))
                .with_price(rng.random_range(0..500) as f64);
            for _ in 0..rng.random_range(1..=3) {
                let ingredient = ingredients[rng.random_range(0..ingredients.len())];
                recipe = recipe.with_ingredient(ingredient, rng.random_range(1..=5));
            }
            recipe
        })
        .collect()
}

/// Whole-number quantities so conservation can be checked exactly.
fn random_pool(rng: &mut StdRng, max: u32) -> IngredientPool {
    IngredientType::all()
        .map(|ingredient| (ingredient, rng.random_range(0..=max) as f64))
        .collect()
}

/// Fractional quantities, like a day of expected vendor drops.
fn fractional_pool(rng: &mut StdRng) -> IngredientPool {
    let orders = rng.random_range(10.0..800.0);
    let mut pool = both_vendors_open().expected_yield(Vendor::Clown, orders);
    for ingredient in IngredientType::all() {
        pool.add(ingredient, rng.random_range(0.0..25.0));
    }
    pool
}

fn consumed(catalog: &RecipeCatalog, plan: &ProductionPlan, ingredient: IngredientType) -> f64 {
    plan.steps
        .iter()
        .map(|step| {
            let recipe = &catalog.get(&step.recipe_id).unwrap().recipe;
            recipe.requirement(ingredient) as f64 * step.quantity as f64
        })
        .sum()
}

fn plan(catalog: &RecipeCatalog, pool: &IngredientPool, policy: PlanningPolicy) -> ProductionPlan {
    let fallback = defaults::fallback_table();
    let rankings = rank_recipes(catalog, &both_vendors_open(), &fallback, 30.0);
    Planner::new(catalog, &fallback).plan(pool, &rankings, policy)
}

fn policies() -> [PlanningPolicy; 3] {
    [
        PlanningPolicy::default(),
        PlanningPolicy::PhasePriority {
            abundant: Category::Vegetable,
        },
        PlanningPolicy::GreedyProfit,
    ]
}

// === PROPERTIES ===

#[test]
fn test_plans_conserve_ingredients() {
    for case in 0..CASES {
        let mut rng = StdRng::seed_from_u64(case);
        let catalog = random_catalog(&mut rng);
        let pool = random_pool(&mut rng, 60);

        for policy in policies() {
            let plan = plan(&catalog, &pool, policy);
            for ingredient in IngredientType::all() {
                assert_eq!(
                    consumed(&catalog, &plan, ingredient) + plan.residual.get(ingredient),
                    pool.get(ingredient),
                    "case {case} {policy:?}: {ingredient} not conserved"
                );
            }
        }
    }
}

#[test]
fn test_plans_conserve_fractional_ingredients() {
    for case in 0..CASES {
        let mut rng = StdRng::seed_from_u64(500 + case);
        let catalog = random_catalog(&mut rng);
        let pool = fractional_pool(&mut rng);

        for policy in policies() {
            let plan = plan(&catalog, &pool, policy);
            for ingredient in IngredientType::all() {
                let initial = pool.get(ingredient);
                let accounted =
                    consumed(&catalog, &plan, ingredient) + plan.residual.get(ingredient);
                assert!(
                    (accounted - initial).abs() <= 1e-9 * initial.max(1.0),
                    "case {case} {policy:?}: {ingredient} {accounted} vs {initial}"
                );
            }
        }
    }
}

#[test]
fn test_residual_never_negative() {
    for case in 0..CASES {
        let mut rng = StdRng::seed_from_u64(1_000 + case);
        let catalog = random_catalog(&mut rng);
        let pool = random_pool(&mut rng, 40);

        for policy in policies() {
            let plan = plan(&catalog, &pool, policy);
            assert!(
                plan.residual.iter().all(|(_, qty)| qty >= 0.0),
                "case {case} {policy:?}: negative residual"
            );
            assert!(plan.steps.iter().all(|step| step.quantity >= 1));
        }
    }
}

#[test]
fn test_greedy_stops_when_nothing_fits() {
    for case in 0..CASES {
        let mut rng = StdRng::seed_from_u64(2_000 + case);
        let catalog = random_catalog(&mut rng);
        let pool = random_pool(&mut rng, 30);

        let plan = plan(&catalog, &pool, PlanningPolicy::GreedyProfit);
        for entry in catalog.enabled().filter(|e| e.price() > 0.0) {
            let fits = entry.recipe.max_batches(&plan.residual).map_or(0, |(n, _)| n);
            assert_eq!(fits, 0, "case {case}: {} still makeable", entry.id());
        }
    }
}

#[test]
fn test_rankings_sorted_by_gold_per_order() {
    for case in 0..CASES {
        let mut rng = StdRng::seed_from_u64(3_000 + case);
        let catalog = random_catalog(&mut rng);
        let rankings = rank_recipes(
            &catalog,
            &AcquisitionModel::default(),
            &defaults::fallback_table(),
            30.0,
        );
        for pair in rankings.recipes.windows(2) {
            assert!(
                pair[0].gold_per_order >= pair[1].gold_per_order,
                "case {case}: ranking out of order"
            );
        }
        assert!(rankings.recipes.iter().all(|r| r.orders_needed.is_finite()));
    }
}

#[test]
fn test_value_pool_is_pure() {
    let fallback = defaults::fallback_table();
    for case in 0..CASES {
        let mut rng = StdRng::seed_from_u64(4_000 + case);
        let pool = random_pool(&mut rng, 50);
        assert_eq!(fallback.value_pool(&pool), fallback.value_pool(&pool));
    }
}

#[test]
fn test_minimum_batch_gate() {
    let fallback = defaults::fallback_table();
    let minimum = fallback.minimum_batch_size;

    for ingredient in IngredientType::all() {
        let just_under = IngredientPool::from([(ingredient, minimum - 1.0)]);
        let valuation = fallback.value_pool(&just_under);
        assert!(valuation.below_minimum);
        assert_eq!(valuation.value, 0.0);
        assert_eq!(valuation.shortfall, 1.0);

        let exact = IngredientPool::from([(ingredient, minimum)]);
        let valuation = fallback.value_pool(&exact);
        assert!(!valuation.below_minimum);
        assert_eq!(valuation.value, minimum * fallback.unit_value(ingredient));
    }
}

#[test]
fn test_stew_outcomes_within_range() {
    let ranges = defaults::ingredient_ranges();
    for case in 0..16 {
        let mut rng = StdRng::seed_from_u64(5_000 + case);
        let mut pool = random_pool(&mut rng, 50);
        // Guarantee the minimum batch
        pool.add(CLOWN_MEAT, 100.0);

        let stew = StewTrial::new(&pool, &ranges, 100.0).unwrap();
        let (lo, hi) = (stew.range().total_min, stew.range().total_max);
        for _ in 0..500 {
            let value = stew.trial(&mut rng).value as f64;
            assert!(lo <= value && value <= hi, "case {case}: {value} outside [{lo}, {hi}]");
        }
    }
}

#[test]
fn test_percentile_consistency() {
    let pool = IngredientPool::from([(CLOWN_MEAT, 80.0), (CLOWN_SPICE, 40.0)]);
    let stew = StewTrial::new(&pool, &defaults::ingredient_ranges(), 100.0).unwrap();
    let config = SimulationConfig::seeded(17).with_trials(2_000);
    let result = run_simulation(&stew, &config).unwrap();

    let mut previous = 0.0;
    let (lo, hi) = (result.stats.min as f64 - 10.0, result.stats.max as f64 + 10.0);
    for step in 0..=100 {
        let threshold = lo + (hi - lo) * step as f64 / 100.0;
        let p = result.percentile(threshold);
        assert!((p.at_or_below_fraction + p.above_fraction - 1.0).abs() < 1e-12);
        assert!(p.at_or_below_fraction >= previous);
        previous = p.at_or_below_fraction;
    }
    assert_eq!(previous, 1.0);
}
