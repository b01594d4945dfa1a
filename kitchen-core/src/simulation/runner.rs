// Trial runner - collects outcomes in batches with a checkpoint between each

use std::convert::Infallible;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use super::config::SimulationConfig;
use super::generators::TrialGenerator;
use super::stats::SimulationResult;
use crate::error::SimulationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
pub struct Progress {
    pub completed: u32,
    pub total: u32,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationOutcome {
    Completed(SimulationResult),
    /// Stopped at a checkpoint; partial outcomes are discarded.
    Cancelled { trials_completed: u32 },
}

impl SimulationOutcome {
    pub fn completed(self) -> Option<SimulationResult> {
        match self {
            SimulationOutcome::Completed(result) => Some(result),
            SimulationOutcome::Cancelled { .. } => None,
        }
    }
}

/// Run every trial without interruption.
pub fn run_simulation<G: TrialGenerator>(
    generator: &G,
    config: &SimulationConfig,
) -> Result<SimulationResult, SimulationError> {
    match run_batches(generator, config, |_| ControlFlow::<Infallible>::Continue(()))? {
        ControlFlow::Continue(result) => Ok(result),
        ControlFlow::Break((never, _)) => match never {},
    }
}

/// Run trials in batches of `config.batch_size`, calling `checkpoint` after
/// each batch. Returning `Break` stops the run before the next batch.
pub fn run_with_checkpoint<G, F>(
    generator: &G,
    config: &SimulationConfig,
    checkpoint: F,
) -> Result<SimulationOutcome, SimulationError>
where
    G: TrialGenerator,
    F: FnMut(Progress) -> ControlFlow<()>,
{
    Ok(match run_batches(generator, config, checkpoint)? {
        ControlFlow::Continue(result) => SimulationOutcome::Completed(result),
        ControlFlow::Break(((), trials_completed)) => {
            SimulationOutcome::Cancelled { trials_completed }
        }
    })
}

fn run_batches<G, B, F>(
    generator: &G,
    config: &SimulationConfig,
    mut checkpoint: F,
) -> Result<ControlFlow<(B, u32), SimulationResult>, SimulationError>
where
    G: TrialGenerator,
    F: FnMut(Progress) -> ControlFlow<B>,
{
    if config.trial_count == 0 {
        return Err(SimulationError::NoTrials);
    }

    let total = config.trial_count;
    let batch = config.batch_size.max(1);
    let mut rng = config.rng();
    let mut outcomes = Vec::with_capacity(total as usize);
    let mut capped = 0u32;

    while (outcomes.len() as u32) < total {
        let remaining = total - outcomes.len() as u32;
        for _ in 0..batch.min(remaining) {
            let trial = generator.trial(&mut rng);
            if trial.capped {
                capped += 1;
            }
            outcomes.push(trial.value);
        }

        let progress = Progress {
            completed: outcomes.len() as u32,
            total,
        };
        if let ControlFlow::Break(reason) = checkpoint(progress) {
            #[cfg(feature = "instrument")]
            tracing::info!(
                target: "simulation",
                trials = progress.completed as u64,
                capped = capped as u64,
                cancelled = true,
            );
            return Ok(ControlFlow::Break((reason, progress.completed)));
        }
    }

    let result = SimulationResult::from_outcomes(outcomes, capped);

    #[cfg(feature = "instrument")]
    tracing::info!(
        target: "simulation",
        trials = total as u64,
        capped = capped as u64,
        min = result.stats.min,
        max = result.stats.max,
        mean = result.stats.mean,
        cancelled = false,
    );

    Ok(ControlFlow::Continue(result))
}
