// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Trove Closing

use rand::seq::index;
use rand::Rng;

use super::{round_count, StepContext};
use crate::error::SimResult;
use crate::rng::{normal, SeedStream};
use crate::trove::TrovePopulation;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CloseOutcome {
    /// Closings the demand model asked for.
    pub requested: u32,
    /// Closings actually performed.
    pub closed: u32,
    /// Debt repaid by the closed troves.
    pub debt: f64,
}

impl CloseOutcome {
    pub fn shortfall(&self) -> u32 {
        self.requested - self.closed
    }
}

/// Number of troves owners want to close this step.
///
/// During warm-up the count is a uniform draw in `[0, 1)` (so it rounds to
/// zero or one). Afterwards it is a noisy steady rate, boosted in proportion
/// to the population when the previous peg price was below par.
pub fn close_count(ctx: &StepContext<'_>, population: usize) -> SimResult<u32> {
    let t = &ctx.config.troves;
    let mut rng = SeedStream::CloseCount.rng(ctx.config.run_seed, ctx.step, 0);
    let shock = normal(&mut rng, 0.0, t.close_sd)?;

    let raw = if ctx.step <= ctx.config.close_warmup_steps {
        rng.gen::<f64>()
    } else {
        let steady = (t.n_steady * (1.0 + shock)).max(0.0);
        let peg = ctx.previous.peg_price;
        if peg >= 1.0 {
            steady
        } else {
            steady + t.beta * (1.0 - peg) * population as f64
        }
    };
    Ok(round_count(raw))
}

/// Close a uniformly sampled subset of troves, without replacement.
///
/// A request larger than the population closes everything; the difference
/// is reported as a shortfall.
pub fn close(troves: &mut TrovePopulation, ctx: &StepContext<'_>) -> SimResult<CloseOutcome> {
    let requested = close_count(ctx, troves.len())?;
    let closed = (requested as usize).min(troves.len());
    if closed < requested as usize {
        log::warn!(
            "step {}: {} closings requested, only {} troves open",
            ctx.step,
            requested,
            troves.len()
        );
    }
    if closed == 0 {
        return Ok(CloseOutcome { requested, closed: 0, debt: 0.0 });
    }

    let mut rng = SeedStream::CloseSample.rng(ctx.config.run_seed, ctx.step, 0);
    let picks = index::sample(&mut rng, troves.len(), closed).into_vec();
    let removed = troves.remove_indices(&picks);
    let debt = removed.iter().map(|t| t.debt).sum();

    Ok(CloseOutcome { requested, closed: removed.len() as u32, debt })
}
