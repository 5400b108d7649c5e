//! Adapter layer: converts between the kernel's f64 world and the policy
//! controller's Decimal types.

use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::policy::FeeSchedule;

/// Convert f64 to Decimal (lossy but sufficient for simulation).
/// Non-finite or out-of-range values map to zero.
pub fn to_decimal(v: f64) -> Decimal {
    Decimal::from_f64(v).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal to f64.
pub fn from_decimal(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Both fee rates set to one Decimal base rate.
pub fn rate_to_schedule(rate: Decimal) -> FeeSchedule {
    FeeSchedule::uniform(from_decimal(rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn round_trip_is_close() {
        let v = 0.012_345;
        assert!((from_decimal(to_decimal(v)) - v).abs() < 1e-12);
    }

    #[test]
    fn non_finite_maps_to_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn schedule_from_rate() {
        let schedule = rate_to_schedule(dec!(0.025));
        assert_eq!(schedule.issuance_rate, 0.025);
        assert_eq!(schedule.redemption_rate, 0.025);
    }
}
