// Kinetic wealth-exchange simulation
//
// Module structure:
// - pairing    Random partition of the population into pairs
// - exchange   Kinetic exchange operator
// - income     Heterogeneous income vector
// - gini       Gini coefficient
// - tick       One timestep (return, exchange, income, normalization)
// - run        Driver: warm-up, measurement window, averaged Gini
// - sweep      Return-on-capital sweep over independent runs
// - config     Run/sweep parameters and boundary validation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::prelude::*;

pub mod config;
pub mod exchange;
pub mod gini;
pub mod income;
pub mod pairing;
pub mod run;
pub mod sweep;
pub mod tick;

#[cfg(feature = "instrument")]
pub use instrument;

pub use config::{ConfigError, MEASUREMENT_WINDOW, SimConfig, SweepConfig};
pub use exchange::{exchange_in_place, kinetic_exchange};
pub use gini::gini;
pub use income::income_distribution;
pub use pairing::{Pairing, random_pairing};
pub use run::{Run, RunPhase, RunSummary, simulate};
pub use sweep::{SweepPoint, SweepResult, run_sweep};
pub use tick::timestep;

fn to_js_error(err: ConfigError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ============================================================================
// WASM API - Single run
// ============================================================================

#[wasm_bindgen]
pub struct WealthSimulation {
    run: Run<StdRng>,
}

#[wasm_bindgen]
impl WealthSimulation {
    /// Build a run from a JSON `SimConfig`. Missing fields take defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WealthSimulation, JsValue> {
        let config = SimConfig::from_json(config_json).map_err(to_js_error)?;
        Ok(Self::start(config))
    }

    /// Build a run from a config object.
    #[wasm_bindgen]
    pub fn from_config(config: SimConfig) -> Result<WealthSimulation, JsValue> {
        config.validate().map_err(to_js_error)?;
        Ok(Self::start(config))
    }

    /// Advance one timestep
    #[wasm_bindgen]
    pub fn advance_step(&mut self) -> RunPhase {
        self.run.step()
    }

    /// Advance up to `count` timesteps, stopping early when the run is done
    #[wasm_bindgen]
    pub fn advance_steps(&mut self, count: u32) -> RunPhase {
        let mut phase = self.run.phase();
        for _ in 0..count {
            phase = self.run.step();
            if phase == RunPhase::Done {
                break;
            }
        }
        phase
    }

    #[wasm_bindgen]
    pub fn get_step(&self) -> u64 {
        self.run.steps_taken() as u64
    }

    #[wasm_bindgen]
    pub fn get_phase(&self) -> RunPhase {
        self.run.phase()
    }

    /// Seed the run was started with; pass it back in to replay the run
    #[wasm_bindgen]
    pub fn get_seed(&self) -> u64 {
        self.run.config().seed.unwrap_or_default()
    }

    #[wasm_bindgen]
    pub fn current_gini(&self) -> f64 {
        gini(self.run.wealth())
    }

    /// Mean Gini over the measurements taken so far
    #[wasm_bindgen]
    pub fn mean_gini(&self) -> Option<f64> {
        self.run.mean_gini()
    }

    /// Copy of the current wealth vector
    #[wasm_bindgen]
    pub fn wealth_snapshot(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(self.run.wealth())
    }

    /// Summary of this run played to completion. Works on a copy, so this
    /// simulation does not advance.
    #[wasm_bindgen]
    pub fn get_summary(&self) -> RunSummary {
        self.run.clone().finish()
    }
}

impl WealthSimulation {
    fn start(config: SimConfig) -> Self {
        // Better panic messages in browser console
        console_error_panic_hook::set_once();

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        let config = config.with_seed(seed);
        Self {
            run: Run::new(config, StdRng::seed_from_u64(seed)),
        }
    }
}

// ============================================================================
// WASM API - Sweep
// ============================================================================

/// Run a return-on-capital sweep from a `SweepConfig` object.
#[wasm_bindgen(js_name = runSweep)]
pub fn run_sweep_js(config: JsValue) -> Result<SweepResult, JsValue> {
    console_error_panic_hook::set_once();

    let config: SweepConfig = serde_wasm_bindgen::from_value(config)?;
    config.validate().map_err(to_js_error)?;
    Ok(run_sweep(&config))
}

/// Run a return-on-capital sweep from a JSON `SweepConfig`.
#[wasm_bindgen(js_name = runSweepJson)]
pub fn run_sweep_json(config_json: &str) -> Result<SweepResult, JsValue> {
    console_error_panic_hook::set_once();

    let config = SweepConfig::from_json(config_json).map_err(to_js_error)?;
    Ok(run_sweep(&config))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Error paths build a JsValue, which only works on wasm targets, so these
    // stick to inputs that succeed.
    const SMALL_RUN: &str = r#"{"individuals": 100, "warmup_steps": 3, "seed": 9}"#;

    #[test]
    fn test_new_from_json_starts_warming_up() {
        let sim = WealthSimulation::new(SMALL_RUN).unwrap();
        assert_eq!(sim.get_phase(), RunPhase::WarmingUp);
        assert_eq!(sim.get_step(), 0);
        assert_eq!(sim.get_seed(), 9);
        assert_eq!(sim.mean_gini(), None);
        assert!(sim.current_gini().abs() < 1e-12);
    }

    #[test]
    fn test_advance_steps_stops_at_done() {
        let mut sim = WealthSimulation::new(SMALL_RUN).unwrap();
        assert_eq!(sim.advance_step(), RunPhase::WarmingUp);
        assert_eq!(sim.advance_steps(1000), RunPhase::Done);
        assert_eq!(sim.get_step(), 3 + MEASUREMENT_WINDOW as u64);

        // Further stepping is a no-op
        assert_eq!(sim.advance_steps(5), RunPhase::Done);
        assert_eq!(sim.get_step(), 3 + MEASUREMENT_WINDOW as u64);
    }

    #[test]
    fn test_summary_does_not_advance_simulation() {
        let mut sim = WealthSimulation::new(SMALL_RUN).unwrap();
        sim.advance_steps(10);
        let summary = sim.get_summary();

        assert_eq!(sim.get_step(), 10);
        assert_eq!(sim.get_phase(), RunPhase::Measuring);
        assert_eq!(summary.gini_trace.len(), MEASUREMENT_WINDOW);

        // The copy played the same future this simulation will
        sim.advance_steps(1000);
        assert_eq!(sim.mean_gini(), Some(summary.mean_gini));
    }

    #[test]
    fn test_same_seed_replays_bit_identically() {
        let mut a = WealthSimulation::new(SMALL_RUN).unwrap();
        let config = SimConfig::new(100, 3, 0.0, config::DEFAULT_GROWTH).with_seed(9);
        let mut b = WealthSimulation::from_config(config).unwrap();

        a.advance_steps(1000);
        b.advance_steps(1000);
        let (ga, gb) = (a.mean_gini().unwrap(), b.mean_gini().unwrap());
        assert_eq!(ga.to_bits(), gb.to_bits());
    }

    #[test]
    fn test_unseeded_run_reports_replayable_seed() {
        let mut first = WealthSimulation::new(r#"{"individuals": 50, "warmup_steps": 2}"#).unwrap();
        let replay_json = format!(
            r#"{{"individuals": 50, "warmup_steps": 2, "seed": {}}}"#,
            first.get_seed()
        );
        let mut replay = WealthSimulation::new(&replay_json).unwrap();

        first.advance_steps(1000);
        replay.advance_steps(1000);
        assert_eq!(first.mean_gini(), replay.mean_gini());
    }

    #[test]
    fn test_sweep_json_one_point_per_return() {
        let result = run_sweep_json(
            r#"{"individuals": 100, "warmup_steps": 5, "returns": [0.0, 0.02, 0.04], "seed": 5}"#,
        )
        .unwrap();
        assert_eq!(result.base_seed, 5);
        assert_eq!(
            result.pairs().iter().map(|(r, _)| *r).collect::<Vec<_>>(),
            vec![0.0, 0.02, 0.04]
        );
    }
}
