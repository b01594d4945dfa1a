// Outcome statistics - summary, histogram and percentile lookup

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

// === CONSTANTS ===

pub const HISTOGRAM_BINS: usize = 50;

/// Height of the overlaid normal curve relative to the tallest bin.
const NORMAL_CURVE_SCALE: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStats {
    pub min: i64,
    pub max: i64,
    pub mean: f64,
    pub median: i64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Most frequent outcome; ties go to the smallest.
    pub mode: i64,
}

impl SimulationStats {
    /// `sorted` must be ascending and non-empty.
    fn of_sorted(sorted: &[i64]) -> Self {
        let n = sorted.len() as f64;
        let mean = sorted.iter().map(|&v| v as f64).sum::<f64>() / n;
        let variance = sorted
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        // Runs of equal values; strict > keeps the first (smallest) on ties
        let mut mode = sorted[0];
        let mut best_run = 0;
        for run in sorted.chunk_by(|a, b| a == b) {
            if run.len() > best_run {
                best_run = run.len();
                mode = run[0];
            }
        }

        Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            median: sorted[sorted.len() / 2],
            std_dev: variance.sqrt(),
            mode,
        }
    }
}

/// Fixed-width bins spanning `[min, max]`; the max lands in the last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    pub bins: Vec<u32>,
    /// Rounded lower edge of each bin.
    pub labels: Vec<i64>,
    pub bin_size: f64,
}

impl Histogram {
    fn of_sorted(sorted: &[i64], min: i64, max: i64) -> Self {
        let bin_size = (max - min) as f64 / HISTOGRAM_BINS as f64;
        let labels = (0..HISTOGRAM_BINS)
            .map(|i| (min as f64 + i as f64 * bin_size).round() as i64)
            .collect();

        let mut bins = vec![0u32; HISTOGRAM_BINS];
        for &value in sorted {
            // A zero-width range puts everything in the first bin
            let index = if bin_size > 0.0 {
                (((value - min) as f64 / bin_size).floor() as usize).min(HISTOGRAM_BINS - 1)
            } else {
                0
            };
            bins[index] += 1;
        }

        Self {
            bins,
            labels,
            bin_size,
        }
    }

    pub fn tallest(&self) -> u32 {
        self.bins.iter().copied().max().unwrap_or(0)
    }
}

// ============================================================================
// Percentile
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Luck {
    /// More outcomes needed more than the threshold.
    Luckier { percent: f64 },
    Unluckier { percent: f64 },
    Median,
}

impl Luck {
    pub fn describe(&self) -> String {
        match self {
            Luck::Luckier { percent } => format!("luckier than {percent:.2}% of outcomes"),
            Luck::Unluckier { percent } => format!("unluckier than {percent:.2}% of outcomes"),
            Luck::Median => "exactly median luck".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct Percentile {
    pub threshold: f64,
    pub at_or_below_fraction: f64,
    pub above_fraction: f64,
}

impl Percentile {
    pub fn luck(&self) -> Luck {
        let above = self.above_fraction;
        if above > 0.5 {
            Luck::Luckier {
                percent: above * 100.0,
            }
        } else if above < 0.5 {
            Luck::Unluckier {
                percent: 100.0 - above * 100.0,
            }
        } else {
            Luck::Median
        }
    }
}

/// Fractions of `sorted` at or below and above `threshold`.
///
/// An empty slice reports everything above.
pub fn percentile(sorted: &[i64], threshold: f64) -> Percentile {
    if sorted.is_empty() {
        return Percentile {
            threshold,
            at_or_below_fraction: 0.0,
            above_fraction: 1.0,
        };
    }
    let at_or_below = sorted.partition_point(|&v| v as f64 <= threshold);
    let at_or_below_fraction = at_or_below as f64 / sorted.len() as f64;
    Percentile {
        threshold,
        at_or_below_fraction,
        above_fraction: 1.0 - at_or_below_fraction,
    }
}

// ============================================================================
// Simulation Result
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Every trial outcome, ascending.
    pub outcomes: Vec<i64>,
    /// Trials cut short by a safety cap.
    pub capped_trials: u32,
    pub stats: SimulationStats,
    pub histogram: Histogram,
}

impl SimulationResult {
    /// `outcomes` must be non-empty; the runner rejects zero trials before
    /// getting here.
    pub(crate) fn from_outcomes(mut outcomes: Vec<i64>, capped_trials: u32) -> Self {
        outcomes.sort_unstable();
        let stats = SimulationStats::of_sorted(&outcomes);
        let histogram = Histogram::of_sorted(&outcomes, stats.min, stats.max);
        Self {
            outcomes,
            capped_trials,
            stats,
            histogram,
        }
    }

    pub fn percentile(&self, threshold: f64) -> Percentile {
        percentile(&self.outcomes, threshold)
    }

    /// Normal density at each bin label, using the run's mean and std-dev.
    /// All zeros when the outcomes have no spread.
    pub fn normal_curve(&self) -> Vec<f64> {
        let (mean, std_dev) = (self.stats.mean, self.stats.std_dev);
        if std_dev == 0.0 {
            return vec![0.0; self.histogram.labels.len()];
        }
        let norm = 1.0 / (std_dev * (2.0 * PI).sqrt());
        self.histogram
            .labels
            .iter()
            .map(|&label| norm * (-0.5 * ((label as f64 - mean) / std_dev).powi(2)).exp())
            .collect()
    }

    /// Normal curve rescaled so its peak sits at 80% of the tallest bin.
    pub fn scaled_normal_curve(&self) -> Vec<f64> {
        let curve = self.normal_curve();
        let peak = curve.iter().copied().fold(0.0, f64::max);
        if peak == 0.0 {
            return curve;
        }
        let scale = self.histogram.tallest() as f64 / peak * NORMAL_CURVE_SCALE;
        curve.into_iter().map(|y| y * scale).collect()
    }
}
