//! Return-on-capital sweep.
//!
//! Runs the driver once per swept `r`. Each point owns its own generator and
//! its own wealth/income vectors, so points are independent and any single
//! point can be replayed from `base_seed + index`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tsify_next::Tsify;

use crate::config::SweepConfig;
use crate::run::Run;

/// Mean Gini at one swept return on capital.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct SweepPoint {
    pub return_on_capital: f64,
    pub mean_gini: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi)]
pub struct SweepResult {
    /// Seed of point 0; point `i` used `base_seed + i`
    pub base_seed: u64,
    pub growth: f64,
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    /// `(r, mean_gini)` pairs in sweep order.
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.return_on_capital, p.mean_gini))
            .collect()
    }
}

/// Run every point of `config`.
///
/// Panics on an odd population; call [`SweepConfig::validate`] first for
/// untrusted input.
pub fn run_sweep(config: &SweepConfig) -> SweepResult {
    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());

    let points = (0..config.returns.len())
        .filter_map(|index| {
            let point = config.point(index, base_seed)?;
            let seed = SweepConfig::point_seed(base_seed, index);
            let summary = Run::new(point, StdRng::seed_from_u64(seed)).finish();

            #[cfg(feature = "instrument")]
            tracing::info!(
                target: "sweep",
                index = index as u64,
                seed = seed,
                return_on_capital = summary.config.return_on_capital,
                growth = summary.config.growth,
                mean_gini = summary.mean_gini,
            );

            Some(SweepPoint {
                return_on_capital: summary.config.return_on_capital,
                mean_gini: summary.mean_gini,
            })
        })
        .collect();

    SweepResult {
        base_seed,
        growth: config.growth,
        points,
    }
}
