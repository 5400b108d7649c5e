// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Peg Stabilization

//! Price discovery for the issued asset and the two arbitrage corrections.
//!
//! The liquidity pool holds all debt not parked in the stability pool. Its
//! ratio to a drifting liquidity target sets the price through a constant
//! elasticity `delta`:
//!
//! ```text
//! price = previous_price * ((supply - stability_pool) / target) ^ (1 / delta)
//! ```
//!
//! Above the ceiling arbitrageurs mint new debt until the price falls back to
//! it. Below the floor they redeem debt against the riskiest troves.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::SimResult;
use crate::policy::FeeSchedule;
use crate::rng::{normal, SeedStream};
use crate::trove::{Trove, TrovePopulation};

/// Which correction, if any, ran this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arbitrage {
    None,
    Ceiling,
    /// `clamped` is false when redemption capacity ran out before the price
    /// reached the floor.
    Floor { clamped: bool },
}

/// Inputs to the corrective branches for one step.
#[derive(Debug, Clone, Copy)]
pub struct MarketState {
    pub step: u64,
    /// Price from the elasticity relation, before correction.
    pub price: f64,
    pub previous_price: f64,
    /// Total trove debt.
    pub supply: f64,
    pub stability_pool: f64,
    /// This step's liquidity target.
    pub liquidity_target: f64,
    pub fees: FeeSchedule,
}

impl MarketState {
    pub fn liquidity_pool(&self) -> f64 {
        self.supply - self.stability_pool
    }
}

/// Debt extinguished by floor arbitrage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Redemption {
    /// Amount arbitrageurs set out to redeem.
    pub target: f64,
    /// Amount actually redeemed: `evicted_debt + residual`.
    pub redeemed: f64,
    pub evicted: u32,
    pub evicted_debt: f64,
    /// Partial redemption charged to the first surviving trove.
    pub residual: f64,
    /// Part of `target` left unredeemed because every trove was evicted.
    pub shortfall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PegOutcome {
    pub price: f64,
    pub liquidity_pool: f64,
    pub arbitrage: Arbitrage,
    /// Debt minted for the synthesized ceiling trove.
    pub ceiling_debt: f64,
    pub ceiling_troves: u32,
    pub redemption: Redemption,
    /// Issuance fees on `ceiling_debt`, in issued-asset units.
    pub issuance: f64,
    pub redemption_fee: f64,
}

pub struct PegStabilizer<'a> {
    config: &'a SimConfig,
}

impl<'a> PegStabilizer<'a> {
    pub fn new(config: &'a SimConfig) -> Self {
        Self { config }
    }

    /// Price at which minting becomes profitable.
    pub fn ceiling(&self, fees: &FeeSchedule) -> f64 {
        self.config.pools.ceiling_base + fees.issuance_rate
    }

    /// Price at which redeeming becomes profitable.
    pub fn floor(&self, fees: &FeeSchedule) -> f64 {
        self.config.pools.floor_base - fees.redemption_rate
    }

    /// Discover this step's price and apply any correction.
    pub fn settle(
        &self,
        troves: &mut TrovePopulation,
        step: u64,
        previous_price: f64,
        previous_liquidity: f64,
        stability_pool: f64,
        fees: FeeSchedule,
    ) -> SimResult<PegOutcome> {
        let p = &self.config.pools;
        let mut rng = SeedStream::Liquidity.rng(self.config.run_seed, step, 0);
        let liquidity_target = previous_liquidity * (p.liquidity_drift + normal(&mut rng, 0.0, p.liquidity_sd)?);
        let supply = troves.total_debt();
        let price = previous_price * ((supply - stability_pool) / liquidity_target).powf(1.0 / p.delta);

        self.correct(
            troves,
            MarketState { step, price, previous_price, supply, stability_pool, liquidity_target, fees },
        )
    }

    /// Apply ceiling or floor arbitrage to an already-discovered price.
    pub fn correct(&self, troves: &mut TrovePopulation, market: MarketState) -> SimResult<PegOutcome> {
        let mut out = PegOutcome {
            price: market.price,
            liquidity_pool: market.liquidity_pool(),
            arbitrage: Arbitrage::None,
            ceiling_debt: 0.0,
            ceiling_troves: 0,
            redemption: Redemption::default(),
            issuance: 0.0,
            redemption_fee: 0.0,
        };

        let ceiling = self.ceiling(&market.fees);
        let floor = self.floor(&market.fees);
        if market.price > ceiling {
            self.mint_to_ceiling(troves, &market, ceiling, &mut out);
        } else if market.price < floor {
            self.redeem_to_floor(troves, &market, floor, &mut out)?;
        }
        Ok(out)
    }

    /// Synthesize one trove holding exactly the debt that brings the price
    /// down to the ceiling.
    fn mint_to_ceiling(&self, troves: &mut TrovePopulation, market: &MarketState, ceiling: f64, out: &mut PegOutcome) {
        let p = &self.config.pools;
        let t = &self.config.troves;
        let wanted = market.stability_pool
            + market.liquidity_target * (ceiling / market.previous_price).powf(p.delta);
        let minted = wanted - market.supply;

        out.arbitrage = Arbitrage::Ceiling;
        out.price = ceiling;
        out.liquidity_pool = wanted - market.stability_pool;

        if minted <= 0.0 {
            log::warn!("step {}: ceiling breached but no debt to mint ({:.4})", market.step, minted);
            return;
        }
        let collateral_price = troves.collateral_price();
        troves.push(Trove {
            collateral: minted * t.ceiling_trove_ratio / collateral_price,
            debt: minted,
            initial_ratio: t.ceiling_trove_ratio,
            inattention: t.ceiling_trove_inattention,
            opened_at: market.step,
        });
        out.ceiling_debt = minted;
        out.ceiling_troves = 1;
        out.issuance = market.fees.issuance_rate * minted;
        log::debug!("step {}: minted {:.2} to hold the ceiling at {:.4}", market.step, minted, ceiling);
    }

    fn redeem_to_floor(
        &self,
        troves: &mut TrovePopulation,
        market: &MarketState,
        floor: f64,
        out: &mut PegOutcome,
    ) -> SimResult<()> {
        let p = &self.config.pools;
        let mut rng = SeedStream::Redemption.rng(self.config.run_seed, market.step, 0);
        let intensity = p.redemption_star * (1.0 + normal(&mut rng, 0.0, p.redemption_sd)?);
        let liquidity = market.liquidity_pool();
        let capacity = intensity * liquidity;

        let supply_at_floor = market.stability_pool
            + market.liquidity_target * (floor / market.previous_price).powf(p.delta);
        let needed = market.supply - supply_at_floor;

        let (target, clamped) = if needed < capacity { (needed, true) } else { (capacity, false) };
        out.arbitrage = Arbitrage::Floor { clamped };

        out.redemption = redeem(troves, target.max(0.0));
        out.redemption_fee = market.fees.redemption_rate * out.redemption.redeemed;
        // Redeemed debt leaves the float; the price settles on what remains.
        out.liquidity_pool = liquidity - out.redemption.redeemed;
        out.price = if clamped {
            floor
        } else {
            market.previous_price * (out.liquidity_pool / market.liquidity_target).powf(1.0 / p.delta)
        };
        if out.redemption.shortfall > 0.0 {
            log::warn!(
                "step {}: troves exhausted, {:.2} of redemption target unfilled",
                market.step,
                out.redemption.shortfall
            );
        }
        Ok(())
    }
}

/// Redeem `target` of debt, riskiest troves first.
///
/// Troves are evicted whole while the running total stays within `target`;
/// the remainder comes out of the next trove's debt and, at the current
/// collateral price, its collateral. Leaves the population sorted by ratio.
pub fn redeem(troves: &mut TrovePopulation, target: f64) -> Redemption {
    let mut out = Redemption { target, ..Redemption::default() };
    if target <= 0.0 {
        return out;
    }
    troves.sort_by_ratio();

    let mut cumulative = 0.0;
    let mut evicted = 0usize;
    for trove in troves.iter() {
        if cumulative + trove.debt > target {
            break;
        }
        cumulative += trove.debt;
        evicted += 1;
    }
    troves.drain_front(evicted);
    out.evicted = evicted as u32;
    out.evicted_debt = cumulative;

    let remaining = target - cumulative;
    let price = troves.collateral_price();
    match troves.get_mut(0) {
        Some(next) => {
            next.debt -= remaining;
            next.collateral -= remaining / price;
            out.residual = remaining;
        }
        None => out.shortfall = remaining,
    }
    out.redeemed = out.evicted_debt + out.residual;
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
