// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Simulation Core

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::config::SimConfig;
use crate::conservation::ConservationLaw;
use crate::error::{BreakdownCause, SimError, SimResult};
use crate::exogenous::{GeneratedPaths, PricePaths};
use crate::governance;
use crate::history::TimeSeries;
use crate::lifecycle::{self, StepContext};
use crate::peg::PegStabilizer;
use crate::policy::{FeeController, FeePolicy};
use crate::stability::StabilityPoolModel;
use crate::trove::TrovePopulation;
use crate::types::{DebtFlows, StepRecord, StepStatus};

// ─── Run results ─────────────────────────────────────────────────────────────

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    /// Every configured step ran.
    Completed { steps: u64 },
    /// The run stopped at `step`, whose record carries the breakdown status.
    Breakdown { step: u64, cause: BreakdownCause },
}

/// Everything a finished run exports: the record sequence and the final
/// trove population.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub policy: String,
    pub run_seed: u64,
    pub termination: Termination,
    pub records: Vec<StepRecord>,
    pub troves: TrovePopulation,
}

impl RunOutcome {
    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }
}

/// Both fee policies run over the same exogenous paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyComparison {
    pub fixed: RunOutcome,
    pub base_rate: RunOutcome,
}

// ─── Simulation struct ──────────────────────────────────────────────────────

#[wasm_bindgen]
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) paths: Arc<dyn PricePaths>,
    pub(crate) troves: TrovePopulation,
    pub(crate) history: TimeSeries,
    pub(crate) fees: FeeController,
    pub(crate) conservation: ConservationLaw,
    /// Step of the terminal breakdown record, once one has been written.
    pub(crate) terminated_at: Option<u64>,
}

impl Simulation {
    /// Validate `config`, check path coverage and run the bootstrap step 0.
    pub fn new(config: SimConfig, paths: Arc<dyn PricePaths>) -> SimResult<Self> {
        config.validate()?;
        let needed = config.horizon_steps.max(config.num_steps) as usize;
        if paths.len() < needed {
            return Err(SimError::PathTooShort { needed, available: paths.len() });
        }

        let mut sim = Self {
            fees: FeeController::new(&config.fee_policy),
            troves: TrovePopulation::new(paths.collateral_price(0)),
            history: TimeSeries::with_capacity(config.num_steps as usize),
            conservation: ConservationLaw::default(),
            terminated_at: None,
            config,
            paths,
        };
        sim.bootstrap()?;
        Ok(sim)
    }

    /// Generate the exogenous paths from `config` itself.
    pub fn with_generated_paths(config: SimConfig) -> SimResult<Self> {
        let paths = GeneratedPaths::generate(&config)?;
        Self::new(config, Arc::new(paths))
    }

    fn bootstrap(&mut self) -> SimResult<()> {
        let fees = self.config.fee_policy.initial_schedule();
        let seed_record = StepRecord { peg_price: 1.0, ..StepRecord::default() };
        let ctx = StepContext {
            step: 0,
            config: &self.config,
            fees,
            previous: &seed_record,
            history: &self.history,
        };
        let opened = lifecycle::open(&mut self.troves, &ctx)?;
        let supply = self.troves.total_debt();

        let record = StepRecord {
            step: 0,
            status: StepStatus::Running,
            peg_price: 1.0,
            collateral_price: self.troves.collateral_price(),
            n_opened: opened.opened,
            n_troves: self.troves.len() as u32,
            stability_pool: 0.5 * supply,
            liquidity_pool: 0.5 * supply,
            debt_supply: supply,
            stability_yield: self.config.stability.initial_yield,
            issuance_fee: opened.issuance,
            issuance_rate: fees.issuance_rate,
            redemption_rate: fees.redemption_rate,
            governance_price: self.paths.governance_bootstrap_price(0),
            ..StepRecord::default()
        };
        log::info!(
            "run {} ({}): bootstrapped {} troves, supply {:.2}",
            self.config.run_seed,
            self.config.fee_policy.name(),
            record.n_troves,
            supply
        );
        self.history.push(record);
        Ok(())
    }

    // ─── Stepping ───────────────────────────────────────────────────────────

    /// Advance one step and return its record.
    ///
    /// On model breakdown the terminal record is appended first and then
    /// `ModelBreakdown` is returned. Every later call, and any call past
    /// the configured horizon, returns `Terminated`.
    pub fn step(&mut self) -> SimResult<&StepRecord> {
        if let Some(step) = self.terminated_at {
            return Err(SimError::Terminated(step));
        }
        let step = self.history.len() as u64;
        if step >= self.config.num_steps {
            return Err(SimError::Terminated(step.saturating_sub(1)));
        }
        let previous = match self.history.last() {
            Some(record) => record.clone(),
            None => return Err(SimError::Terminated(step)),
        };

        let collateral_price = self.paths.collateral_price(step);
        self.troves.set_collateral_price(collateral_price);
        let debt_before = self.troves.total_debt();
        let fees = self.fees.next_schedule(previous.redemption_pool, debt_before);

        let ctx = StepContext {
            step,
            config: &self.config,
            fees,
            previous: &previous,
            history: &self.history,
        };

        // 1. Lifecycle
        let liquidated = lifecycle::liquidate(&mut self.troves, &ctx);
        let stability = StabilityPoolModel::new(&self.config);
        let stability_yield = stability.estimate_yield(step, &previous, &self.history)?;
        let closed = lifecycle::close(&mut self.troves, &ctx)?;
        let adjusted = lifecycle::adjust(&mut self.troves, &ctx)?;
        let opened = lifecycle::open(&mut self.troves, &ctx)?;

        // 2. Pools and price
        let stability_pool =
            stability.next_pool(step, previous.stability_pool, stability_yield, self.paths.natural_rate(step))?;
        let peg = PegStabilizer::new(&self.config).settle(
            &mut self.troves,
            step,
            previous.peg_price,
            previous.liquidity_pool,
            stability_pool,
            fees,
        )?;

        // 3. Governance token
        let quote = governance::quote(&self.config, &*self.paths, step, &self.history)?;

        // 4. Debt audit
        let flows = DebtFlows {
            liquidated: liquidated.debt,
            closed: closed.debt,
            adjusted_up: adjusted.debt_added,
            adjusted_down: adjusted.debt_removed,
            opened: opened.debt,
            ceiling_minted: peg.ceiling_debt,
            redeemed: peg.redemption.redeemed,
        };
        let debt_after = self.troves.total_debt();
        let audit = self.conservation.verify_step(debt_before, &flows, debt_after);
        if !audit.balanced {
            log::warn!("step {}: debt ledger off by {:.6e}", step, audit.error);
        }

        let status = if peg.liquidity_pool < 0.0 {
            StepStatus::Breakdown(BreakdownCause::NegativeLiquidityPool)
        } else if !peg.price.is_finite() || peg.price <= 0.0 {
            StepStatus::Breakdown(BreakdownCause::InvalidPegPrice)
        } else {
            StepStatus::Running
        };

        let record = StepRecord {
            step,
            status,
            peg_price: peg.price,
            collateral_price,
            n_opened: opened.opened + peg.ceiling_troves,
            n_closed: closed.closed,
            close_requested: closed.requested,
            close_shortfall: closed.shortfall(),
            n_liquidated: liquidated.count,
            n_redeemed: peg.redemption.evicted,
            n_troves: self.troves.len() as u32,
            stability_pool,
            liquidity_pool: peg.liquidity_pool,
            redemption_pool: peg.redemption.redeemed,
            redemption_shortfall: peg.redemption.shortfall,
            debt_supply: debt_after,
            stability_yield,
            liquidation_gain: liquidated.liquidation_gain,
            airdrop_gain: liquidated.airdrop_gain,
            issuance_fee: peg.price * (adjusted.issuance + opened.issuance + peg.issuance),
            redemption_fee: peg.redemption_fee,
            issuance_rate: fees.issuance_rate,
            redemption_rate: fees.redemption_rate,
            governance_price: quote.price,
            governance_market_cap: quote.market_cap,
            governance_circulating: quote.circulating,
            annualized_earnings: quote.annualized_earnings,
            conservation_error: audit.error,
        };
        log::debug!(
            "step {}: peg {:.4}, supply {:.2}, troves {}, sp {:.2}, lp {:.2}",
            step,
            record.peg_price,
            record.debt_supply,
            record.n_troves,
            record.stability_pool,
            record.liquidity_pool
        );
        self.history.push(record);

        if let StepStatus::Breakdown(cause) = status {
            self.terminated_at = Some(step);
            log::error!("run {}: model breakdown at step {}: {}", self.config.run_seed, step, cause);
            return Err(SimError::ModelBreakdown { step, cause });
        }
        self.history.last().ok_or(SimError::Terminated(step))
    }

    /// Advance up to `steps` steps, stopping early at breakdown or horizon.
    pub fn advance(&mut self, steps: u64) -> SimResult<()> {
        for _ in 0..steps {
            if self.is_finished() {
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    /// Run to the horizon or to breakdown.
    pub fn run(mut self) -> SimResult<RunOutcome> {
        log::info!(
            "run {} ({}): simulating {} steps",
            self.config.run_seed,
            self.config.fee_policy.name(),
            self.config.num_steps
        );
        let termination = loop {
            if self.is_finished() {
                break Termination::Completed { steps: self.history.len() as u64 };
            }
            match self.step() {
                Ok(_) => {}
                Err(SimError::ModelBreakdown { step, cause }) => break Termination::Breakdown { step, cause },
                Err(e) => return Err(e),
            }
        };
        if self.conservation.is_tripped() {
            log::warn!(
                "run {}: cumulative debt ledger error {:.6e}",
                self.config.run_seed,
                self.conservation.cumulative_error
            );
        }
        log::info!("run {} ({}): {:?}", self.config.run_seed, self.config.fee_policy.name(), termination);
        Ok(self.into_outcome(termination))
    }

    fn into_outcome(self, termination: Termination) -> RunOutcome {
        RunOutcome {
            policy: self.config.fee_policy.name().to_string(),
            run_seed: self.config.run_seed,
            termination,
            records: self.history.into_records(),
            troves: self.troves,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn is_finished(&self) -> bool {
        self.terminated_at.is_some() || self.history.len() as u64 >= self.config.num_steps
    }

    pub fn records(&self) -> &[StepRecord] {
        self.history.records()
    }

    pub fn history(&self) -> &TimeSeries {
        &self.history
    }

    pub fn troves(&self) -> &TrovePopulation {
        &self.troves
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn conservation(&self) -> &ConservationLaw {
        &self.conservation
    }
}

// ─── Policy comparison ──────────────────────────────────────────────────────

/// Run the fixed-fee and base-rate policies side by side on two scoped
/// threads, sharing one set of exogenous paths.
///
/// The policy named in `config` is used for its side; the other side gets
/// the reference parameters.
pub fn run_policy_comparison(config: &SimConfig, paths: Arc<dyn PricePaths>) -> SimResult<PolicyComparison> {
    let (fixed_policy, base_policy) = match config.fee_policy {
        p @ FeePolicy::Fixed { .. } => (p, FeePolicy::base_rate()),
        p @ FeePolicy::BaseRate { .. } => (FeePolicy::default(), p),
    };
    let fixed_config = config.with_policy(fixed_policy);
    let base_config = config.with_policy(base_policy);

    std::thread::scope(|scope| {
        let fixed_paths = Arc::clone(&paths);
        let fixed = scope.spawn(move || Simulation::new(fixed_config, fixed_paths).and_then(Simulation::run));
        let base_paths = Arc::clone(&paths);
        let base = scope.spawn(move || Simulation::new(base_config, base_paths).and_then(Simulation::run));

        let fixed = fixed.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload))?;
        let base_rate = base.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload))?;
        Ok(PolicyComparison { fixed, base_rate })
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
