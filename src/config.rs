// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Configuration

//! Named numeric parameters for a run.
//!
//! `SimConfig::default()` reproduces the reference calibration: hourly
//! steps, a 8760-step horizon of which 8640 are simulated, an ether-like
//! collateral starting at 1000 and a 1% issuance/redemption fee. Files
//! loaded with [`SimConfig::from_json`] only need to name the fields they
//! override.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{SimError, SimResult};
use crate::policy::FeePolicy;

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Length of the valuation horizon in steps (one year of hours).
    pub horizon_steps: u64,
    /// Number of steps to simulate, including the bootstrap step 0.
    pub num_steps: u64,
    /// Steps per day; the short yield window.
    pub day: u64,
    /// Steps per month; the long yield window and the bootstrap window.
    pub month: u64,
    /// Before this step the close count is a uniform draw.
    pub close_warmup_steps: u64,
    /// Mixed into every stream seed so ensembles differ per run.
    pub run_seed: u64,

    pub exogenous: ExogenousParams,
    pub stability: StabilityParams,
    pub pools: PoolParams,
    pub troves: TroveParams,
    pub governance: GovernanceParams,
    pub fee_policy: FeePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon_steps: 24 * 365,
            num_steps: 8640,
            day: 24,
            month: 24 * 30,
            close_warmup_steps: 240,
            run_seed: 0,
            exogenous: ExogenousParams::default(),
            stability: StabilityParams::default(),
            pools: PoolParams::default(),
            troves: TroveParams::default(),
            governance: GovernanceParams::default(),
            fee_policy: FeePolicy::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(text: &str) -> SimResult<Self> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Same configuration with a different policy.
    pub fn with_policy(&self, policy: FeePolicy) -> Self {
        Self { fee_policy: policy, ..self.clone() }
    }

    /// Reject parameter sets the distributions or recurrences cannot use.
    pub fn validate(&self) -> SimResult<()> {
        if self.num_steps == 0 {
            return Err(SimError::config("num_steps", "must be at least 1"));
        }
        if self.horizon_steps == 0 {
            return Err(SimError::config("horizon_steps", "must be at least 1"));
        }
        if self.day == 0 || self.day >= self.month {
            return Err(SimError::config("day", "must be positive and shorter than month"));
        }

        let e = &self.exogenous;
        non_negative("exogenous.collateral_sd", e.collateral_sd)?;
        non_negative("exogenous.natural_rate_sd", e.natural_rate_sd)?;
        non_negative("exogenous.governance_sd", e.governance_sd)?;
        positive("exogenous.collateral_price_initial", e.collateral_price_initial)?;

        let s = &self.stability;
        non_negative("stability.yield_sd", s.yield_sd)?;
        non_negative("stability.pool_sd", s.pool_sd)?;
        non_negative("stability.theta", s.theta)?;
        non_negative("stability.max_bootstrap_yield", s.max_bootstrap_yield)?;

        let p = &self.pools;
        non_negative("pools.liquidity_sd", p.liquidity_sd)?;
        non_negative("pools.redemption_sd", p.redemption_sd)?;
        positive("pools.liquidity_drift", p.liquidity_drift)?;
        if p.delta == 0.0 || !p.delta.is_finite() {
            return Err(SimError::config("pools.delta", "must be finite and non-zero"));
        }

        let t = &self.troves;
        positive("troves.quantity_shape", t.quantity_shape)?;
        positive("troves.quantity_scale", t.quantity_scale)?;
        positive("troves.ratio_dof", t.ratio_dof)?;
        positive("troves.inattention_shape", t.inattention_shape)?;
        positive("troves.inattention_scale", t.inattention_scale)?;
        positive("troves.liquidation_ratio", t.liquidation_ratio)?;
        positive("troves.ceiling_trove_ratio", t.ceiling_trove_ratio)?;
        non_negative("troves.close_sd", t.close_sd)?;
        non_negative("troves.open_sd", t.open_sd)?;
        if t.lower_deviation >= t.upper_deviation {
            return Err(SimError::config(
                "troves.lower_deviation",
                "must be below troves.upper_deviation",
            ));
        }

        let g = &self.governance;
        positive("governance.total_supply", g.total_supply)?;
        non_negative("governance.bootstrap_earnings_sd", g.bootstrap_earnings_sd)?;

        self.fee_policy.validate()
    }
}

fn positive(field: &'static str, value: f64) -> SimResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::config(field, format!("must be positive, got {}", value)))
    }
}

fn non_negative(field: &'static str, value: f64) -> SimResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimError::config(field, format!("must be non-negative, got {}", value)))
    }
}

// ---------------------------------------------------------------------------
// Parameter groups
// ---------------------------------------------------------------------------

/// Multiplicative-shock recurrences for the exogenous paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExogenousParams {
    pub collateral_price_initial: f64,
    pub collateral_sd: f64,
    pub collateral_drift: f64,
    pub natural_rate_initial: f64,
    pub natural_rate_sd: f64,
    pub governance_price_initial: f64,
    pub governance_sd: f64,
    pub governance_drift: f64,
}

impl Default for ExogenousParams {
    fn default() -> Self {
        Self {
            collateral_price_initial: 1000.0,
            collateral_sd: 0.02,
            collateral_drift: 0.0,
            natural_rate_initial: 0.2,
            natural_rate_sd: 0.002,
            governance_price_initial: 1.0,
            governance_sd: 0.005,
            governance_drift: 0.0035,
        }
    }
}

/// Stability pool yield and size dynamics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityParams {
    /// Annualized yield used for the first day.
    pub initial_yield: f64,
    pub yield_sd: f64,
    /// Cap on the day-window yield estimate during the first month.
    pub max_bootstrap_yield: f64,
    pub pool_sd: f64,
    /// Per-step growth applied during the first month.
    pub pool_drift: f64,
    /// Elasticity of deposits to the yield spread over the natural rate.
    pub theta: f64,
    /// Governance tokens airdropped to depositors each step.
    pub airdrop_quantity: f64,
}

impl Default for StabilityParams {
    fn default() -> Self {
        Self {
            initial_yield: 0.2,
            yield_sd: 0.001,
            max_bootstrap_yield: 0.5,
            pool_sd: 0.001,
            pool_drift: 1.002,
            theta: 0.001,
            airdrop_quantity: 500.0,
        }
    }
}

/// Liquidity pool and redemption arbitrage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolParams {
    pub liquidity_sd: f64,
    pub liquidity_drift: f64,
    pub redemption_sd: f64,
    /// Baseline share of the liquidity pool floor arbitrageurs can redeem.
    pub redemption_star: f64,
    /// Price elasticity of the debt-to-liquidity ratio (negative).
    pub delta: f64,
    /// Ceiling sits at `ceiling_base + issuance_rate`.
    pub ceiling_base: f64,
    /// Floor sits at `floor_base - redemption_rate`.
    pub floor_base: f64,
}

impl Default for PoolParams {
    fn default() -> Self {
        Self {
            liquidity_sd: 0.001,
            liquidity_drift: 1.0003,
            redemption_sd: 0.001,
            redemption_star: 0.8,
            delta: -20.0,
            ceiling_base: 1.1,
            floor_base: 1.0,
        }
    }
}

/// Trove draws and lifecycle thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TroveParams {
    pub liquidation_ratio: f64,
    pub initial_open: u32,
    pub n_steady: f64,
    pub open_sd: f64,
    /// Sensitivity of openings to an above-par peg.
    pub alpha: f64,
    pub close_sd: f64,
    /// Sensitivity of closings to a below-par peg.
    pub beta: f64,
    pub quantity_shape: f64,
    pub quantity_scale: f64,
    pub ratio_base: f64,
    pub ratio_scale: f64,
    pub ratio_dof: f64,
    pub inattention_shape: f64,
    pub inattention_scale: f64,
    /// Deviation below which a borrower reacts.
    pub lower_deviation: f64,
    /// Deviation above which a borrower reacts.
    pub upper_deviation: f64,
    pub ceiling_trove_ratio: f64,
    pub ceiling_trove_inattention: f64,
}

impl Default for TroveParams {
    fn default() -> Self {
        Self {
            liquidation_ratio: 1.1,
            initial_open: 10,
            n_steady: 0.5,
            open_sd: 0.5,
            alpha: 0.3,
            close_sd: 0.5,
            beta: 0.2,
            quantity_shape: 10.0,
            quantity_scale: 500.0,
            ratio_base: 1.1,
            ratio_scale: 0.1,
            ratio_dof: 16.0,
            inattention_shape: 4.0,
            inattention_scale: 0.08,
            lower_deviation: -1.0,
            upper_deviation: 2.0,
            ceiling_trove_ratio: 1.1,
            ceiling_trove_inattention: 0.1,
        }
    }
}

/// Governance token valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceParams {
    pub total_supply: f64,
    pub pe_ratio: f64,
    pub bootstrap_earnings_mean: f64,
    pub bootstrap_earnings_sd: f64,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            total_supply: 100_000_000.0,
            pe_ratio: 50.0,
            bootstrap_earnings_mean: 200_000_000.0,
            bootstrap_earnings_sd: 500_000.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
