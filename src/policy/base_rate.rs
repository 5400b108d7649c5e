// Copyright © 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Base-rate feedback controller.
//!
//! Each step the base rate decays geometrically and is pushed up by the
//! previous step's redemption volume relative to current outstanding debt:
//!
//! ```text
//! base_t = decay * base_{t-1} + sensitivity * redemption_{t-1} / debt_t
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Rates are never allowed past 100%.
const MAX_RATE: Decimal = dec!(1);

/// Controller producing the shared issuance/redemption rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseRateController {
    base_rate: Decimal,
    decay: Decimal,
    sensitivity: Decimal,
}

impl BaseRateController {
    /// Create with the reference gains: decay 0.98, sensitivity 0.5.
    pub fn new(initial: Decimal) -> Self {
        Self { base_rate: initial, decay: dec!(0.98), sensitivity: dec!(0.5) }
    }

    pub fn with_gains(initial: Decimal, decay: Decimal, sensitivity: Decimal) -> Self {
        Self { base_rate: initial, decay, sensitivity }
    }

    /// Rate produced by the last update (or the initial rate).
    pub fn base_rate(&self) -> Decimal {
        self.base_rate
    }

    /// Run one control cycle. Zero outstanding debt contributes no
    /// redemption pressure.
    pub fn update(&mut self, previous_redemption: Decimal, current_debt: Decimal) -> Decimal {
        let pressure = if current_debt.is_zero() {
            Decimal::ZERO
        } else {
            previous_redemption.checked_div(current_debt).unwrap_or(Decimal::ZERO)
        };
        let next = self.decay * self.base_rate + self.sensitivity * pressure;
        self.base_rate = next.clamp(Decimal::ZERO, MAX_RATE);
        self.base_rate
    }
}

impl Default for BaseRateController {
    fn default() -> Self { Self::new(Decimal::ZERO) }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_without_redemptions() {
        let mut c = BaseRateController::new(dec!(0.1));
        assert_eq!(c.update(dec!(0), dec!(1000)), dec!(0.098));
        assert_eq!(c.update(dec!(0), dec!(1000)), dec!(0.09604));
    }

    #[test]
    fn redemptions_push_rate_up() {
        let mut c = BaseRateController::default();
        // 0.5 * 20 / 1000 = 0.01
        assert_eq!(c.update(dec!(20), dec!(1000)), dec!(0.01));
    }

    #[test]
    fn zero_debt_adds_no_pressure() {
        let mut c = BaseRateController::new(dec!(0.05));
        assert_eq!(c.update(dec!(500), dec!(0)), dec!(0.049));
    }

    #[test]
    fn rate_is_capped_at_one() {
        let mut c = BaseRateController::default();
        assert_eq!(c.update(dec!(10000), dec!(1)), dec!(1));
    }

    #[test]
    fn custom_gains() {
        let mut c = BaseRateController::with_gains(dec!(0.2), dec!(0.5), dec!(1));
        assert_eq!(c.update(dec!(1), dec!(10)), dec!(0.2));
        assert_eq!(c.base_rate(), dec!(0.2));
    }
}
