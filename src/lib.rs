// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite

pub mod types;
pub mod error;
pub mod config;
pub mod rng;
pub mod exogenous;
pub mod trove;
pub mod history;
pub mod lifecycle;
pub mod stability;
pub mod peg;
pub mod governance;
pub mod conservation;
pub mod simulation;

// Decimal fee policy and its f64 bridge
pub mod policy;
pub mod adapter;

pub use config::SimConfig;
pub use error::{BreakdownCause, SimError, SimResult};
pub use exogenous::{FixedPaths, GeneratedPaths, PricePaths};
pub use policy::{FeePolicy, FeeSchedule};
pub use simulation::{run_policy_comparison, PolicyComparison, RunOutcome, Simulation, Termination};
pub use trove::{Trove, TrovePopulation, TroveView};
pub use types::*;

use std::sync::Arc;
use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl Simulation {
    /// Reference calibration with generated paths for `seed`, under the
    /// fixed-fee policy or, with `base_rate`, the feedback policy.
    #[wasm_bindgen(constructor)]
    pub fn create(seed: u32, base_rate: bool) -> Result<Simulation, JsError> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let policy = if base_rate { FeePolicy::base_rate() } else { FeePolicy::default() };
        let config = SimConfig { run_seed: seed as u64, fee_policy: policy, ..SimConfig::default() };
        Ok(Simulation::with_generated_paths(config)?)
    }

    /// Advance one step. Returns the new record (the terminal record on
    /// breakdown) or null once the run has ended.
    pub fn tick(&mut self) -> JsValue {
        let stepped = self.step().map(|record| serde_wasm_bindgen::to_value(record).unwrap_or(JsValue::NULL));
        match stepped {
            Ok(value) => value,
            Err(SimError::ModelBreakdown { .. }) => self
                .records()
                .last()
                .and_then(|r| serde_wasm_bindgen::to_value(r).ok())
                .unwrap_or(JsValue::NULL),
            Err(_) => JsValue::NULL,
        }
    }

    /// Run N steps without returning results (fast batch mode).
    pub fn run_batch(&mut self, steps: u32) {
        // Breakdown is visible through the status of the last record.
        let _ = self.advance(steps as u64);
    }

    pub fn get_records(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.records()).unwrap_or(JsValue::NULL)
    }

    pub fn get_troves(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.troves().snapshot()).unwrap_or(JsValue::NULL)
    }

    pub fn current_step(&self) -> u32 {
        self.records().len().saturating_sub(1) as u32
    }

    /// Reset simulation to its bootstrap state
    pub fn reset(&mut self) -> Result<(), JsError> {
        *self = Simulation::new(self.config.clone(), Arc::clone(&self.paths))?;
        Ok(())
    }
}
