// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Governance Token Valuation

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::error::SimResult;
use crate::exogenous::PricePaths;
use crate::history::TimeSeries;
use crate::rng::{normal, SeedStream};
use crate::types::StepRecord;

/// Governance token valuation for one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GovernanceQuote {
    pub price: f64,
    pub annualized_earnings: f64,
    pub circulating: f64,
    pub market_cap: f64,
}

/// Tokens in circulation: one third of supply unlocks over a half-life of
/// one horizon, `total / 3 * (1 - 0.5^(step / horizon))`.
pub fn circulating_supply(step: u64, horizon: u64, total_supply: f64) -> f64 {
    total_supply / 3.0 * (1.0 - 0.5f64.powf(step as f64 / horizon as f64))
}

/// Value the governance token at `step`.
///
/// During the first month the price follows the exogenous bootstrap path and
/// earnings are a scaled noisy draw. Afterwards earnings annualize trailing
/// fee revenue, and price is a discounted price-earnings multiple per token.
pub fn quote(config: &SimConfig, paths: &dyn PricePaths, step: u64, history: &TimeSeries) -> SimResult<GovernanceQuote> {
    let g = &config.governance;
    let circulating = circulating_supply(step, config.horizon_steps, g.total_supply);

    let (price, annualized_earnings) = if step <= config.month {
        let mut rng = SeedStream::GovernanceEarnings.rng(config.run_seed, step, 0);
        let draw = normal(&mut rng, g.bootstrap_earnings_mean, g.bootstrap_earnings_sd)?;
        let earnings = (step as f64 / config.month as f64).sqrt() * draw;
        (paths.governance_bootstrap_price(step.saturating_sub(1)), earnings)
    } else {
        let days_per_month = config.month as f64 / config.day as f64;
        let revenue = history.trailing_sum(config.month as usize, StepRecord::fee_revenue);
        let earnings = 365.0 * revenue / days_per_month;
        let discount = step as f64 / config.horizon_steps as f64;
        (discount * g.pe_ratio * earnings / g.total_supply, earnings)
    };

    Ok(GovernanceQuote { price, annualized_earnings, circulating, market_cap: price * circulating })
}
