// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Exogenous Price Paths

//! Price paths the kernel consumes by step index: the collateral price, the
//! "natural" rate stability pool deposits compare their yield against, and
//! the governance token price used during the bootstrap window.
//!
//! Paths have no dependency on kernel state. [`GeneratedPaths`] runs the
//! multiplicative-shock recurrences; [`FixedPaths`] injects explicit series.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::SimResult;
use crate::rng::{normal, SeedStream};

/// Read-only source of exogenous series, addressed by step.
///
/// Implementations must be shareable across threads so that parallel runs
/// can consume a single set of paths.
pub trait PricePaths: Send + Sync {
    /// Number of steps the collateral and natural-rate series cover.
    fn len(&self) -> usize;

    fn collateral_price(&self, step: u64) -> f64;

    fn natural_rate(&self, step: u64) -> f64;

    /// Governance token price before it becomes earnings-driven.
    fn governance_bootstrap_price(&self, step: u64) -> f64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Look up `series[step]`, holding the last value past the end.
fn at(series: &[f64], step: u64) -> f64 {
    let idx = (step as usize).min(series.len().saturating_sub(1));
    series.get(idx).copied().unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// GeneratedPaths
// ---------------------------------------------------------------------------

/// Paths produced by the i.i.d. shock recurrences
/// `x_t = x_{t-1} * (1 + shock_t) * (1 + drift)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPaths {
    collateral: Vec<f64>,
    natural_rate: Vec<f64>,
    governance: Vec<f64>,
}

impl GeneratedPaths {
    pub fn generate(config: &SimConfig) -> SimResult<Self> {
        let e = &config.exogenous;
        let len = config.horizon_steps.max(config.num_steps) as usize;
        let seed = config.run_seed;

        let mut collateral = Vec::with_capacity(len);
        collateral.push(e.collateral_price_initial);
        for i in 1..len as u64 {
            let mut rng = SeedStream::CollateralPath.rng(seed, i, 0);
            let shock = normal(&mut rng, 0.0, e.collateral_sd)?;
            let prev = collateral[i as usize - 1];
            collateral.push(prev * (1.0 + shock) * (1.0 + e.collateral_drift));
        }

        let mut natural_rate = Vec::with_capacity(len);
        natural_rate.push(e.natural_rate_initial);
        for i in 1..len as u64 {
            let mut rng = SeedStream::NaturalRatePath.rng(seed, i, 0);
            let shock = normal(&mut rng, 0.0, e.natural_rate_sd)?;
            natural_rate.push(natural_rate[i as usize - 1] * (1.0 + shock));
        }

        let bootstrap_len = config.month as usize;
        let mut governance = Vec::with_capacity(bootstrap_len);
        governance.push(e.governance_price_initial);
        for i in 1..bootstrap_len as u64 {
            let mut rng = SeedStream::GovernanceBootstrapPath.rng(seed, i, 0);
            let shock = normal(&mut rng, 0.0, e.governance_sd)?;
            let prev = governance[i as usize - 1];
            governance.push(prev * (1.0 + shock) * (1.0 + e.governance_drift));
        }

        Ok(Self { collateral, natural_rate, governance })
    }

    pub fn collateral_series(&self) -> &[f64] {
        &self.collateral
    }
}

impl PricePaths for GeneratedPaths {
    fn len(&self) -> usize {
        self.collateral.len().min(self.natural_rate.len())
    }

    fn collateral_price(&self, step: u64) -> f64 {
        at(&self.collateral, step)
    }

    fn natural_rate(&self, step: u64) -> f64 {
        at(&self.natural_rate, step)
    }

    fn governance_bootstrap_price(&self, step: u64) -> f64 {
        at(&self.governance, step)
    }
}

// ---------------------------------------------------------------------------
// FixedPaths
// ---------------------------------------------------------------------------

/// Explicit series, for tests and scripted scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedPaths {
    pub collateral: Vec<f64>,
    pub natural_rate: Vec<f64>,
    pub governance: Vec<f64>,
}

impl FixedPaths {
    /// Flat paths of `len` steps.
    pub fn constant(collateral_price: f64, natural_rate: f64, governance_price: f64, len: usize) -> Self {
        Self {
            collateral: vec![collateral_price; len],
            natural_rate: vec![natural_rate; len],
            governance: vec![governance_price; len],
        }
    }

    /// Replace the collateral series, keeping the other two.
    pub fn with_collateral(mut self, collateral: Vec<f64>) -> Self {
        self.collateral = collateral;
        self
    }

    /// Copy another source's series over `len` steps.
    pub fn snapshot(paths: &dyn PricePaths, len: usize) -> Self {
        let steps = 0..len as u64;
        Self {
            collateral: steps.clone().map(|s| paths.collateral_price(s)).collect(),
            natural_rate: steps.clone().map(|s| paths.natural_rate(s)).collect(),
            governance: steps.map(|s| paths.governance_bootstrap_price(s)).collect(),
        }
    }
}

impl PricePaths for FixedPaths {
    fn len(&self) -> usize {
        self.collateral.len().min(self.natural_rate.len())
    }

    fn collateral_price(&self, step: u64) -> f64 {
        at(&self.collateral, step)
    }

    fn natural_rate(&self, step: u64) -> f64 {
        at(&self.natural_rate, step)
    }

    fn governance_bootstrap_price(&self, step: u64) -> f64 {
        at(&self.governance, step)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig { num_steps: 200, horizon_steps: 100, ..SimConfig::default() }
    }

    #[test]
    fn generated_paths_cover_num_steps() {
        let paths = GeneratedPaths::generate(&small_config()).expect("test: generate");
        assert_eq!(paths.len(), 200);
        assert_eq!(paths.collateral_price(0), 1000.0);
        assert_eq!(paths.natural_rate(0), 0.2);
        assert_eq!(paths.governance_bootstrap_price(0), 1.0);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = GeneratedPaths::generate(&small_config()).expect("test: generate");
        let b = GeneratedPaths::generate(&small_config()).expect("test: generate");
        assert_eq!(a.collateral_series(), b.collateral_series());
    }

    #[test]
    fn zero_volatility_with_drift_compounds() {
        let mut config = small_config();
        config.exogenous.governance_sd = 0.0;
        let paths = GeneratedPaths::generate(&config).expect("test: generate");
        let expected = 1.0035_f64.powi(10);
        assert!((paths.governance_bootstrap_price(10) - expected).abs() < 1e-12);
    }

    #[test]
    fn lookups_past_the_end_hold_last_value() {
        let paths = FixedPaths::constant(1000.0, 0.2, 1.0, 5).with_collateral(vec![1.0, 2.0, 3.0]);
        assert_eq!(paths.collateral_price(10), 3.0);
        assert_eq!(paths.len(), 3);
    }

    #[test]
    fn snapshot_copies_series() {
        let generated = GeneratedPaths::generate(&small_config()).expect("test: generate");
        let fixed = FixedPaths::snapshot(&generated, 50);
        assert_eq!(fixed.collateral_price(49), generated.collateral_price(49));
        assert_eq!(fixed.len(), 50);
    }
}
