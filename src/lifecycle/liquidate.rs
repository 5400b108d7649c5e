// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Liquidation

use super::StepContext;
use crate::trove::TrovePopulation;

/// Result of one liquidation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LiquidationOutcome {
    pub count: u32,
    /// Debt absorbed by the stability pool.
    pub debt: f64,
    /// Collateral seized and handed to depositors.
    pub collateral: f64,
    /// Collateral value at the current price less debt valued at the
    /// previous peg price.
    pub liquidation_gain: f64,
    /// Governance tokens distributed to depositors, valued at the previous
    /// governance price.
    pub airdrop_gain: f64,
}

/// Remove every trove whose ratio has fallen below the liquidation ratio.
///
/// The airdrop gain is credited whether or not anything was liquidated.
pub fn liquidate(troves: &mut TrovePopulation, ctx: &StepContext<'_>) -> LiquidationOutcome {
    let threshold = ctx.config.troves.liquidation_ratio;
    let removed = troves.extract_where(|ratio| ratio < threshold);

    let debt: f64 = removed.iter().map(|t| t.debt).sum();
    let collateral: f64 = removed.iter().map(|t| t.collateral).sum();
    let liquidation_gain = collateral * troves.collateral_price() - debt * ctx.previous.peg_price;
    let airdrop_gain = ctx.previous.governance_price * ctx.config.stability.airdrop_quantity;

    if !removed.is_empty() {
        log::debug!(
            "step {}: liquidated {} troves, debt {:.2}, gain {:.2}",
            ctx.step,
            removed.len(),
            debt,
            liquidation_gain
        );
    }

    LiquidationOutcome {
        count: removed.len() as u32,
        debt,
        collateral,
        liquidation_gain,
        airdrop_gain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::history::TimeSeries;
    use crate::lifecycle::test_support::{ctx, previous, trove};

    #[test]
    fn removes_only_undercollateralized() {
        let config = SimConfig::default();
        let prev = previous(1.0);
        let history = TimeSeries::default();
        // Ratios at price 1000: 1.05, 1.2, 2.0.
        let mut troves = TrovePopulation::from_troves(
            vec![
                trove(1.05, 1000.0, 1.5, 0.3),
                trove(1.2, 1000.0, 1.5, 0.3),
                trove(2.0, 1000.0, 1.5, 0.3),
            ],
            1000.0,
        );
        let (debt_before, collateral_before) = (troves.total_debt(), troves.total_collateral());
        let out = liquidate(&mut troves, &ctx(5, &config, &prev, &history));
        assert_eq!(out.count, 1);
        assert!((out.debt + troves.total_debt() - debt_before).abs() < 1e-9);
        assert!((out.collateral + troves.total_collateral() - collateral_before).abs() < 1e-12);
        assert_eq!(troves.len(), 2);
        assert!(troves.ratios().iter().all(|r| *r >= 1.1));
        assert!((out.debt - 1000.0).abs() < 1e-9);
        assert!((out.liquidation_gain - (1050.0 - 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn gain_uses_previous_peg_price() {
        let config = SimConfig::default();
        let prev = previous(0.9);
        let history = TimeSeries::default();
        let mut troves = TrovePopulation::from_troves(vec![trove(1.0, 1000.0, 1.5, 0.3)], 1000.0);
        let out = liquidate(&mut troves, &ctx(5, &config, &prev, &history));
        assert!((out.liquidation_gain - (1000.0 - 900.0)).abs() < 1e-9);
    }

    #[test]
    fn airdrop_paid_with_nothing_to_liquidate() {
        let config = SimConfig::default();
        let mut prev = previous(1.0);
        prev.governance_price = 2.0;
        let history = TimeSeries::default();
        let mut troves = TrovePopulation::from_troves(vec![trove(2.0, 1000.0, 1.5, 0.3)], 1000.0);
        let out = liquidate(&mut troves, &ctx(5, &config, &prev, &history));
        assert_eq!(out.count, 0);
        assert_eq!(out.liquidation_gain, 0.0);
        assert!((out.airdrop_gain - 1000.0).abs() < 1e-9);
    }
}
