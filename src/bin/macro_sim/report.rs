// Run Summary Report Types
// Structured end-of-run output; no statistics, only final state per run

use macro_engine::{RunOutcome, Termination};
use serde::Serialize;

// ─── Single-Run Summary ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub policy: String,
    pub run_seed: u64,
    pub termination: Termination,
    pub steps_completed: usize,
    pub final_peg_price: f64,
    pub final_collateral_price: f64,
    pub final_supply: f64,
    pub final_stability_pool: f64,
    pub final_liquidity_pool: f64,
    pub final_troves: u32,
    pub final_governance_price: f64,
    pub total_issuance_fee: f64,
    pub total_redemption_fee: f64,
    pub total_liquidated: u32,
    pub total_redeemed: u32,
    pub max_conservation_error: f64,
    pub time_series_path: Option<String>,
}

impl RunSummary {
    pub fn from_outcome(outcome: &RunOutcome, time_series_path: Option<String>) -> Self {
        let last = outcome.last().cloned().unwrap_or_default();
        let records = &outcome.records;
        Self {
            policy: outcome.policy.clone(),
            run_seed: outcome.run_seed,
            termination: outcome.termination,
            steps_completed: records.len(),
            final_peg_price: last.peg_price,
            final_collateral_price: last.collateral_price,
            final_supply: last.debt_supply,
            final_stability_pool: last.stability_pool,
            final_liquidity_pool: last.liquidity_pool,
            final_troves: last.n_troves,
            final_governance_price: last.governance_price,
            total_issuance_fee: records.iter().map(|r| r.issuance_fee).sum(),
            total_redemption_fee: records.iter().map(|r| r.redemption_fee).sum(),
            total_liquidated: records.iter().map(|r| r.n_liquidated).sum(),
            total_redeemed: records.iter().map(|r| r.n_redeemed).sum(),
            max_conservation_error: records.iter().map(|r| r.conservation_error).fold(0.0_f64, f64::max),
            time_series_path,
        }
    }

    pub fn completed(&self) -> bool {
        matches!(self.termination, Termination::Completed { .. })
    }
}

// ─── Full Report ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EnsembleReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub scenario: String,
    pub num_steps: u64,
    pub base_seed: u64,
    pub runs: Vec<RunSummary>,
}
