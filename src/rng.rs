// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Seeded Random Streams

//! Every random draw comes from a fresh `ChaCha8Rng` whose seed is a fixed
//! linear function of the step index (and, for per-trove draws, the trove
//! index). Nothing carries generator state across steps, so any step can be
//! replayed in isolation and two runs with the same `run_seed` are identical.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{ChiSquared, Distribution, Gamma, Normal};

use crate::error::{SimError, SimResult};

/// Odd multiplier used to spread `run_seed` across the seed space.
const RUN_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// One independent random stream per stochastic quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStream {
    CollateralPath,
    NaturalRatePath,
    GovernanceBootstrapPath,
    StabilityYield,
    CloseCount,
    CloseSample,
    AdjustThreshold,
    AdjustTrove,
    OpenCount,
    OpenRatio,
    OpenQuantity,
    OpenInattention,
    StabilityPool,
    Liquidity,
    Redemption,
    GovernanceEarnings,
}

impl SeedStream {
    /// Raw seed for step `step` and item `i` (0 for per-step streams).
    pub fn raw_seed(&self, step: u64, i: u64) -> i64 {
        let s = step as i64;
        let i = i as i64;
        match self {
            Self::CollateralPath => 2_019_375 + 10_000 * s,
            Self::NaturalRatePath => 201_597 + 10 * s,
            Self::GovernanceBootstrapPath => 2 + 13 * s,
            Self::StabilityYield => 2 + s,
            Self::CloseCount => 208 + s,
            Self::CloseSample => 293 + 100 * s,
            Self::AdjustThreshold => 57_984 - 3 * s,
            Self::AdjustTrove => 187 * s + 3 * i,
            Self::OpenCount => 2019 * s,
            Self::OpenRatio => 2033 + s + i * i,
            Self::OpenQuantity => 20 + 10 * i + s,
            Self::OpenInattention => 209_870 - s + i * i,
            Self::StabilityPool => 27 + 3 * s,
            Self::Liquidity => 20 * s,
            Self::Redemption => 30 * s,
            Self::GovernanceEarnings => 2 + 3 * s,
        }
    }

    /// Generator for this stream at `(step, i)` within run `run_seed`.
    pub fn rng(&self, run_seed: u64, step: u64, i: u64) -> ChaCha8Rng {
        let seed = (self.raw_seed(step, i) as u64).wrapping_add(run_seed.wrapping_mul(RUN_SEED_MIX));
        ChaCha8Rng::seed_from_u64(seed)
    }
}

// ---------------------------------------------------------------------------
// Draw helpers
// ---------------------------------------------------------------------------

/// Gaussian draw. A zero standard deviation returns `mean` exactly.
pub fn normal(rng: &mut ChaCha8Rng, mean: f64, sd: f64) -> SimResult<f64> {
    if sd == 0.0 {
        return Ok(mean);
    }
    let dist = Normal::new(mean, sd).map_err(|e| SimError::Distribution {
        name: "normal",
        reason: e.to_string(),
    })?;
    Ok(dist.sample(rng))
}

/// Gamma draw parameterised by shape and scale.
pub fn gamma(rng: &mut ChaCha8Rng, shape: f64, scale: f64) -> SimResult<f64> {
    let dist = Gamma::new(shape, scale).map_err(|e| SimError::Distribution {
        name: "gamma",
        reason: e.to_string(),
    })?;
    Ok(dist.sample(rng))
}

pub fn chi_squared(rng: &mut ChaCha8Rng, dof: f64) -> SimResult<f64> {
    let dist = ChiSquared::new(dof).map_err(|e| SimError::Distribution {
        name: "chi-squared",
        reason: e.to_string(),
    })?;
    Ok(dist.sample(rng))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
