//! Fee policies: fixed rates or the base-rate feedback controller.

pub mod base_rate;
pub mod params;

pub use base_rate::BaseRateController;
pub use params::{FeePolicy, FeeSchedule};

use serde::{Deserialize, Serialize};

use crate::adapter::{rate_to_schedule, to_decimal};

/// Stateful per-run fee controller built from a [`FeePolicy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FeeController {
    Fixed(FeeSchedule),
    BaseRate(BaseRateController),
}

impl FeeController {
    pub fn new(policy: &FeePolicy) -> Self {
        match *policy {
            FeePolicy::Fixed { .. } => Self::Fixed(policy.initial_schedule()),
            FeePolicy::BaseRate { initial, decay, sensitivity } => Self::BaseRate(
                BaseRateController::with_gains(to_decimal(initial), to_decimal(decay), to_decimal(sensitivity)),
            ),
        }
    }

    /// Rates for the coming step, given last step's redemption flow and the
    /// debt outstanding at the start of this step.
    pub fn next_schedule(&mut self, previous_redemption: f64, current_debt: f64) -> FeeSchedule {
        match self {
            Self::Fixed(schedule) => *schedule,
            Self::BaseRate(controller) => {
                rate_to_schedule(controller.update(to_decimal(previous_redemption), to_decimal(current_debt)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_controller_never_moves() {
        let mut c = FeeController::new(&FeePolicy::default());
        let s = c.next_schedule(1e6, 1.0);
        assert_eq!(s, FeeSchedule::uniform(0.01));
    }

    #[test]
    fn base_rate_controller_reacts_to_redemptions() {
        let mut c = FeeController::new(&FeePolicy::base_rate());
        let quiet = c.next_schedule(0.0, 1000.0);
        assert_eq!(quiet.issuance_rate, 0.0);
        let busy = c.next_schedule(40.0, 1000.0);
        assert!((busy.issuance_rate - 0.02).abs() < 1e-12);
        assert_eq!(busy.issuance_rate, busy.redemption_rate);
    }
}
