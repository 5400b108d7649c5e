// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Type Definitions

use serde::{Deserialize, Serialize};

use crate::error::BreakdownCause;

// ─── Step Status ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Running,
    /// Terminal record: the run stopped after this step.
    Breakdown(BreakdownCause),
}

impl Default for StepStatus {
    fn default() -> Self { StepStatus::Running }
}

impl StepStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Breakdown(_))
    }
}

// ─── StepRecord ─────────────────────────────────────────────────────────────

/// Aggregate state after one step. Append-only; index order is time order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: u64,
    #[serde(default)]
    pub status: StepStatus,

    // prices
    pub peg_price: f64,
    pub collateral_price: f64,

    // trove counts
    pub n_opened: u32,
    pub n_closed: u32,
    pub close_requested: u32,
    /// Closings requested beyond the available population.
    pub close_shortfall: u32,
    pub n_liquidated: u32,
    pub n_redeemed: u32,
    pub n_troves: u32,

    // pools
    pub stability_pool: f64,
    pub liquidity_pool: f64,
    /// Debt extinguished by floor arbitrage this step (a flow).
    pub redemption_pool: f64,
    /// Redemption target left unfilled because the population ran out.
    pub redemption_shortfall: f64,
    pub debt_supply: f64,

    // stability pool returns
    pub stability_yield: f64,
    pub liquidation_gain: f64,
    pub airdrop_gain: f64,

    // fees
    pub issuance_fee: f64,
    pub redemption_fee: f64,
    pub issuance_rate: f64,
    pub redemption_rate: f64,

    // governance token
    pub governance_price: f64,
    pub governance_market_cap: f64,
    pub governance_circulating: f64,
    pub annualized_earnings: f64,

    /// Absolute debt conservation error over the step.
    pub conservation_error: f64,
}

impl StepRecord {
    /// Inflows credited to stability pool depositors.
    pub fn depositor_gain(&self) -> f64 {
        self.liquidation_gain + self.airdrop_gain
    }

    /// Protocol fee revenue.
    pub fn fee_revenue(&self) -> f64 {
        self.issuance_fee + self.redemption_fee
    }
}

// ─── Debt Flows ─────────────────────────────────────────────────────────────

/// Debt created and destroyed within one step, by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DebtFlows {
    pub liquidated: f64,
    pub closed: f64,
    pub adjusted_up: f64,
    pub adjusted_down: f64,
    pub opened: f64,
    pub ceiling_minted: f64,
    pub redeemed: f64,
}

impl DebtFlows {
    pub fn created(&self) -> f64 {
        self.adjusted_up + self.opened + self.ceiling_minted
    }

    pub fn destroyed(&self) -> f64 {
        self.liquidated + self.closed + self.adjusted_down + self.redeemed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debt_flow_totals() {
        let flows = DebtFlows {
            liquidated: 1.0,
            closed: 2.0,
            adjusted_up: 3.0,
            adjusted_down: 4.0,
            opened: 5.0,
            ceiling_minted: 6.0,
            redeemed: 7.0,
        };
        assert_eq!(flows.created(), 14.0);
        assert_eq!(flows.destroyed(), 14.0);
    }

    #[test]
    fn status_serializes_cause() {
        let status = StepStatus::Breakdown(BreakdownCause::InvalidPegPrice);
        let json = serde_json::to_string(&status).expect("test: serialize");
        assert_eq!(json, r#"{"Breakdown":"InvalidPegPrice"}"#);
        assert!(status.is_terminal());
        assert!(!StepStatus::default().is_terminal());
    }
}
