// Copyright © 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Fee policy inputs and the per-step fee schedule they produce.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

// ---------------------------------------------------------------------------
// FeePolicy
// ---------------------------------------------------------------------------

/// How issuance and redemption fee rates are set each step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeePolicy {
    /// Constant rates for the whole run.
    Fixed { issuance_rate: f64, redemption_rate: f64 },
    /// Both rates equal a base rate that decays geometrically and is pushed
    /// up by redemption volume relative to outstanding debt.
    BaseRate { initial: f64, decay: f64, sensitivity: f64 },
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self::Fixed { issuance_rate: 0.01, redemption_rate: 0.01 }
    }
}

impl FeePolicy {
    /// Feedback policy with the reference gains: decay 0.98, sensitivity 0.5.
    pub fn base_rate() -> Self {
        Self::BaseRate { initial: 0.0, decay: 0.98, sensitivity: 0.5 }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "fixed",
            Self::BaseRate { .. } => "base-rate",
        }
    }

    /// Rates in force at step 0, before any feedback.
    pub fn initial_schedule(&self) -> FeeSchedule {
        match *self {
            Self::Fixed { issuance_rate, redemption_rate } => FeeSchedule { issuance_rate, redemption_rate },
            Self::BaseRate { initial, .. } => FeeSchedule::uniform(initial),
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        match *self {
            Self::Fixed { issuance_rate, redemption_rate } => {
                rate("fee_policy.issuance_rate", issuance_rate)?;
                rate("fee_policy.redemption_rate", redemption_rate)
            }
            Self::BaseRate { initial, decay, sensitivity } => {
                rate("fee_policy.initial", initial)?;
                rate("fee_policy.decay", decay)?;
                if sensitivity < 0.0 || !sensitivity.is_finite() {
                    return Err(SimError::config("fee_policy.sensitivity", "must be non-negative"));
                }
                Ok(())
            }
        }
    }
}

fn rate(field: &'static str, value: f64) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::config(field, format!("must lie in [0, 1], got {}", value)))
    }
}

// ---------------------------------------------------------------------------
// FeeSchedule
// ---------------------------------------------------------------------------

/// Fee rates applied during one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub issuance_rate: f64,
    pub redemption_rate: f64,
}

impl FeeSchedule {
    pub fn uniform(rate: f64) -> Self {
        Self { issuance_rate: rate, redemption_rate: rate }
    }

    /// Peg price above which minting is arbitrage-profitable.
    pub fn mint_threshold(&self) -> f64 {
        1.0 + self.issuance_rate
    }
}

// ===========================================================================
// Tests
// ===========================================================================
