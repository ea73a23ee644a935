//! Run and sweep configuration.
//!
//! Engine functions panic on contract violations. These configs are the
//! boundary where untrusted input (JSON, JS) is checked first, so callers
//! get a [`ConfigError`] instead of a panic.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tsify_next::Tsify;

/// Number of trailing timesteps whose Gini values are averaged.
pub const MEASUREMENT_WINDOW: usize = 50;

pub const DEFAULT_INDIVIDUALS: usize = 50_000;
pub const DEFAULT_WARMUP_STEPS: usize = 100;
pub const DEFAULT_GROWTH: f64 = 0.05;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("individual count must be positive and even, got {0}")]
    OddOrEmptyPopulation(usize),
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("return on capital must be greater than -1, got {0}")]
    ReturnTooLow(f64),
    #[error("sweep has no return-on-capital values")]
    EmptySweep,
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn check_population(individuals: usize) -> Result<(), ConfigError> {
    if individuals == 0 || individuals % 2 != 0 {
        return Err(ConfigError::OddOrEmptyPopulation(individuals));
    }
    Ok(())
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { name, value });
    }
    Ok(())
}

fn check_return(r: f64) -> Result<(), ConfigError> {
    check_finite("return_on_capital", r)?;
    // r = -1 wipes all wealth and normalization divides by zero
    if r <= -1.0 {
        return Err(ConfigError::ReturnTooLow(r));
    }
    Ok(())
}

/// Parameters of a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct SimConfig {
    /// Population size N (positive, even)
    pub individuals: usize,
    /// Timesteps run before measurement starts (T)
    pub warmup_steps: usize,
    /// Per-step return on capital (r)
    pub return_on_capital: f64,
    /// Mean per-step income (g)
    pub growth: f64,
    /// Seed for the run's generator; `None` draws one from the thread rng
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            individuals: DEFAULT_INDIVIDUALS,
            warmup_steps: DEFAULT_WARMUP_STEPS,
            return_on_capital: 0.0,
            growth: DEFAULT_GROWTH,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn new(individuals: usize, warmup_steps: usize, return_on_capital: f64, growth: f64) -> Self {
        Self {
            individuals,
            warmup_steps,
            return_on_capital,
            growth,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_population(self.individuals)?;
        check_return(self.return_on_capital)?;
        check_finite("growth", self.growth)
    }

    /// Total timesteps a run takes: warm-up plus the measurement window.
    /// Saturates, so an absurd warm-up never wraps into a short run.
    pub fn total_steps(&self) -> usize {
        self.warmup_steps.saturating_add(MEASUREMENT_WINDOW)
    }
}

/// Parameters of a return-on-capital sweep.
///
/// Defaults reproduce the reference study: 50 000 individuals, 100 warm-up
/// steps, 5% growth, r from 0% to 19% in 1% steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(default)]
pub struct SweepConfig {
    pub individuals: usize,
    pub warmup_steps: usize,
    pub growth: f64,
    /// Return-on-capital values, one run each
    pub returns: Vec<f64>,
    /// Base seed; point `i` uses `seed + i`
    pub seed: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            individuals: DEFAULT_INDIVIDUALS,
            warmup_steps: DEFAULT_WARMUP_STEPS,
            growth: DEFAULT_GROWTH,
            returns: Self::percent_range(0, 19),
            seed: None,
        }
    }
}

impl SweepConfig {
    /// Whole-percent returns `from..=to`, as fractions.
    pub fn percent_range(from: u32, to: u32) -> Vec<f64> {
        (from..=to).map(|p| p as f64 / 100.0).collect()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_population(self.individuals)?;
        check_finite("growth", self.growth)?;
        if self.returns.is_empty() {
            return Err(ConfigError::EmptySweep);
        }
        for r in &self.returns {
            check_return(*r)?;
        }
        Ok(())
    }

    /// Seed used by the `index`-th swept value.
    pub fn point_seed(base_seed: u64, index: usize) -> u64 {
        base_seed.wrapping_add(index as u64)
    }

    /// Run config for the `index`-th swept value, or `None` past the end of
    /// `returns`.
    pub fn point(&self, index: usize, base_seed: u64) -> Option<SimConfig> {
        Some(SimConfig {
            individuals: self.individuals,
            warmup_steps: self.warmup_steps,
            return_on_capital: *self.returns.get(index)?,
            growth: self.growth,
            seed: Some(Self::point_seed(base_seed, index)),
        })
    }
}
