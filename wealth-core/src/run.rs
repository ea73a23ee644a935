//! Simulation driver: one run from uniform wealth to an averaged Gini.
//!
//! A run warms up for `warmup_steps` timesteps, then measures the Gini
//! coefficient after each of the next [`MEASUREMENT_WINDOW`] timesteps and
//! reports their mean.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::config::{MEASUREMENT_WINDOW, SimConfig};
use crate::gini::gini;
use crate::income::income_distribution;
use crate::tick::timestep;

/// Where a run is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub enum RunPhase {
    WarmingUp,
    Measuring,
    Done,
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct RunSummary {
    pub config: SimConfig,
    /// Mean Gini over the measurement window
    pub mean_gini: f64,
    /// Gini after the last timestep (last entry of `gini_trace`)
    pub final_gini: f64,
    /// Per-step Gini values of the measurement window, in order
    pub gini_trace: Vec<f64>,
}

/// A single simulation run.
///
/// Owns the wealth vector exclusively. Each [`Run::step`] borrows it mutably
/// for exactly one timestep.
#[derive(Debug, Clone)]
pub struct Run<R> {
    config: SimConfig,
    rng: R,
    wealth: Vec<f64>,
    incomes: Vec<f64>,
    steps_taken: usize,
    gini_trace: Vec<f64>,
}

impl<R: Rng> Run<R> {
    /// Set up a run: everyone starts at wealth 1.0 and the income vector is
    /// drawn once from `rng`.
    ///
    /// Panics if `config.individuals` is odd. Use [`SimConfig::validate`] for
    /// untrusted input.
    pub fn new(config: SimConfig, mut rng: R) -> Self {
        let n = config.individuals;
        let wealth = vec![1.0; n];
        let incomes = income_distribution(&mut rng, n, config.growth);

        Self {
            config,
            rng,
            wealth,
            incomes,
            steps_taken: 0,
            gini_trace: Vec::with_capacity(MEASUREMENT_WINDOW),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn wealth(&self) -> &[f64] {
        &self.wealth
    }

    pub fn incomes(&self) -> &[f64] {
        &self.incomes
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    /// Gini values measured so far.
    pub fn gini_trace(&self) -> &[f64] {
        &self.gini_trace
    }

    pub fn phase(&self) -> RunPhase {
        if self.steps_taken < self.config.warmup_steps {
            RunPhase::WarmingUp
        } else if self.steps_taken < self.config.total_steps() {
            RunPhase::Measuring
        } else {
            RunPhase::Done
        }
    }

    /// Advance one timestep and return the phase afterwards.
    ///
    /// Steps taken while measuring record a Gini value. Stepping a finished
    /// run is a no-op.
    pub fn step(&mut self) -> RunPhase {
        let phase = self.phase();
        if phase == RunPhase::Done {
            return phase;
        }

        timestep(
            &mut self.rng,
            &mut self.wealth,
            &self.incomes,
            self.config.return_on_capital,
        );
        self.steps_taken += 1;

        if phase == RunPhase::Measuring {
            let g = gini(&self.wealth);
            self.gini_trace.push(g);

            #[cfg(feature = "instrument")]
            tracing::info!(
                target: "gini",
                step = self.steps_taken as u64,
                return_on_capital = self.config.return_on_capital,
                growth = self.config.growth,
                gini = g,
            );
        }

        self.phase()
    }

    /// Mean of the Gini values recorded so far, `None` before measurement.
    pub fn mean_gini(&self) -> Option<f64> {
        if self.gini_trace.is_empty() {
            return None;
        }
        let sum: f64 = self.gini_trace.iter().sum();
        Some(sum / self.gini_trace.len() as f64)
    }

    /// Run to completion and summarize.
    pub fn finish(mut self) -> RunSummary {
        while self.step() != RunPhase::Done {}

        let mean_gini = self.mean_gini().unwrap_or(f64::NAN);
        let final_gini = self.gini_trace.last().copied().unwrap_or(f64::NAN);
        RunSummary {
            config: self.config,
            mean_gini,
            final_gini,
            gini_trace: self.gini_trace,
        }
    }
}

/// Mean Gini over the [`MEASUREMENT_WINDOW`] timesteps following `warmup_steps`
/// timesteps of warm-up.
pub fn simulate<R: Rng>(
    rng: &mut R,
    individuals: usize,
    warmup_steps: usize,
    return_on_capital: f64,
    growth: f64,
) -> f64 {
    let config = SimConfig::new(individuals, warmup_steps, return_on_capital, growth);
    Run::new(config, rng).finish().mean_gini
}
