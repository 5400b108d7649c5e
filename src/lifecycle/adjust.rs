// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Trove Adjustment

//! Owners whose ratio has drifted too far from target rebalance.
//!
//! Drift is measured as `(ratio - initial_ratio) / (initial_ratio *
//! inattention)`. Below the lower bound the trove is at risk, above the
//! upper bound capital sits idle. A per-step threshold splits owners
//! between fixing the ratio through debt and fixing it through collateral.

use rand::Rng;

use super::StepContext;
use crate::error::SimResult;
use crate::rng::SeedStream;
use crate::trove::{Trove, TrovePopulation};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdjustOutcome {
    /// Troves rebalanced by changing debt.
    pub debt_side: u32,
    /// Troves rebalanced by changing collateral.
    pub collateral_side: u32,
    /// New debt minted by troves levering back up.
    pub debt_added: f64,
    /// Debt repaid by troves deleveraging.
    pub debt_removed: f64,
    /// Issuance fees on `debt_added`, in issued-asset units.
    pub issuance: f64,
}

pub fn adjust(troves: &mut TrovePopulation, ctx: &StepContext<'_>) -> SimResult<AdjustOutcome> {
    let seed = ctx.config.run_seed;
    let bounds = &ctx.config.troves;
    let price = troves.collateral_price();
    let threshold: f64 = SeedStream::AdjustThreshold.rng(seed, ctx.step, 0).gen();

    let mut out = AdjustOutcome::default();
    for (i, trove) in troves.iter_mut().enumerate() {
        let deviation = trove.deviation(price);
        let below = deviation < bounds.lower_deviation;
        let above = deviation > bounds.upper_deviation;
        if !below && !above {
            continue;
        }

        let p: f64 = SeedStream::AdjustTrove.rng(seed, ctx.step, i as u64).gen();
        let lever = if p < threshold { Lever::Debt } else { Lever::Collateral };
        rebalance(trove, price, below, lever, ctx.fees.issuance_rate, &mut out);
    }

    if out.debt_side + out.collateral_side > 0 {
        log::debug!(
            "step {}: adjusted {} troves by debt, {} by collateral",
            ctx.step,
            out.debt_side,
            out.collateral_side
        );
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lever {
    Debt,
    Collateral,
}

/// Restore one out-of-band trove to its initial ratio.
fn rebalance(trove: &mut Trove, price: f64, below: bool, lever: Lever, issuance_rate: f64, out: &mut AdjustOutcome) {
    match lever {
        Lever::Debt => {
            let target = price * trove.collateral / trove.initial_ratio;
            if below {
                out.debt_removed += trove.debt - target;
            } else {
                let increment = target - trove.debt;
                out.debt_added += increment;
                out.issuance += issuance_rate * increment;
            }
            trove.debt = target;
            out.debt_side += 1;
        }
        Lever::Collateral => {
            trove.collateral = trove.initial_ratio * trove.debt / price;
            out.collateral_side += 1;
        }
    }
}
