//! Repeated-trial estimation of a random cumulative quantity.
//!
//! A [`TrialGenerator`] produces one integer outcome per call; the runner
//! collects `trial_count` of them in batches (checkpointing between batches)
//! and [`SimulationResult`] derives statistics, a fixed 50-bin histogram and
//! percentile queries. Nothing in the statistics depends on which generator
//! produced the outcomes.

pub mod config;
pub mod generators;
pub mod runner;
pub mod stats;

pub use config::SimulationConfig;
pub use generators::{
    IngredientRange, StewRange, StewTrial, TokenOutcome, TokenTrial, Trial, TrialGenerator,
};
pub use runner::{Progress, SimulationOutcome, run_simulation, run_with_checkpoint};
pub use stats::{Histogram, Luck, Percentile, SimulationResult, SimulationStats, percentile};
