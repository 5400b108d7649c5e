// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Conservation Logic

use serde::{Deserialize, Serialize};

use crate::types::DebtFlows;

/// Relative tolerance: an error below this share of the opening debt is
/// considered balanced.
const TOLERANCE: f64 = 1e-9;

/// Outcome of a single per-step check.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ConservationResult {
    pub balanced: bool,
    /// Absolute error for this check.
    pub error: f64,
    pub circuit_breaker_tripped: bool,
}

/// Audits the debt ledger each step:
///
/// `debt_before + created == debt_after + destroyed`
///
/// Violations accumulate; once the cumulative error passes the threshold the
/// breaker trips. Tripping is reported, it never stops the run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConservationLaw {
    pub cumulative_error: f64,
    pub circuit_breaker_threshold: f64,
    pub circuit_breaker_tripped: bool,
    pub consecutive_violations: u32,
}

impl ConservationLaw {
    pub fn new(threshold: f64) -> Self {
        Self {
            cumulative_error: 0.0,
            circuit_breaker_threshold: threshold,
            circuit_breaker_tripped: false,
            consecutive_violations: 0,
        }
    }

    pub fn verify_step(&mut self, debt_before: f64, flows: &DebtFlows, debt_after: f64) -> ConservationResult {
        let expected = debt_before + flows.created() - flows.destroyed();
        let error = (expected - debt_after).abs();
        let scale = debt_before.abs().max(debt_after.abs()).max(1.0);
        let balanced = error <= TOLERANCE * scale;

        if balanced {
            self.consecutive_violations = 0;
        } else {
            self.cumulative_error += error;
            self.consecutive_violations += 1;
        }

        if self.cumulative_error > self.circuit_breaker_threshold {
            self.circuit_breaker_tripped = true;
        }

        ConservationResult {
            balanced,
            error,
            circuit_breaker_tripped: self.circuit_breaker_tripped,
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.circuit_breaker_tripped
    }
}

impl Default for ConservationLaw {
    fn default() -> Self {
        Self::new(1.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_step() {
        let mut law = ConservationLaw::default();
        let flows = DebtFlows { opened: 300.0, liquidated: 100.0, redeemed: 50.0, ..DebtFlows::default() };
        let result = law.verify_step(1000.0, &flows, 1150.0);
        assert!(result.balanced);
        assert_eq!(law.consecutive_violations, 0);
    }

    #[test]
    fn float_noise_is_tolerated_at_scale() {
        let mut law = ConservationLaw::default();
        let flows = DebtFlows { closed: 1.0, ..DebtFlows::default() };
        assert!(law.verify_step(1e9, &flows, 1e9 - 1.0 + 1e-3).balanced);
    }

    #[test]
    fn leak_accumulates_and_trips() {
        let mut law = ConservationLaw::new(5.0);
        let flows = DebtFlows::default();
        let first = law.verify_step(1000.0, &flows, 997.0);
        assert!(!first.balanced);
        assert!(!first.circuit_breaker_tripped);
        let second = law.verify_step(997.0, &flows, 994.0);
        assert!(second.circuit_breaker_tripped);
        assert_eq!(law.consecutive_violations, 2);
        assert!(law.is_tripped());
    }
}
