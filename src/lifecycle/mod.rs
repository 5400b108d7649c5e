//! Trove lifecycle operations, applied each step in the order
//! liquidate, close, adjust, open.
//!
//! Every operation reads the population's shared collateral price, the
//! previous step's record and the fee schedule in force, mutates the
//! population in place and reports the debt it created or destroyed.

pub mod adjust;
pub mod close;
pub mod liquidate;
pub mod open;

pub use adjust::{adjust, AdjustOutcome};
pub use close::{close, CloseOutcome};
pub use liquidate::{liquidate, LiquidationOutcome};
pub use open::{draw_trove, open, OpenOutcome};

use crate::config::SimConfig;
use crate::history::TimeSeries;
use crate::policy::FeeSchedule;
use crate::types::StepRecord;

/// Read-only inputs shared by every component during one step.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub step: u64,
    pub config: &'a SimConfig,
    pub fees: FeeSchedule,
    /// Record of step `step - 1`.
    pub previous: &'a StepRecord,
    /// Records `0..step`.
    pub history: &'a TimeSeries,
}

/// Round to nearest, ties to even, and clamp into `u32`.
pub(crate) fn round_count(x: f64) -> u32 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    x.round_ties_even().min(u32::MAX as f64) as u32
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_count_ties_to_even() {
        assert_eq!(round_count(0.5), 0);
        assert_eq!(round_count(1.5), 2);
        assert_eq!(round_count(2.5), 2);
        assert_eq!(round_count(2.6), 3);
    }

    #[test]
    fn round_count_clamps_negative_and_nan() {
        assert_eq!(round_count(-3.0), 0);
        assert_eq!(round_count(f64::NAN), 0);
    }
}
