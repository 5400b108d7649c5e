// Copyright 2026 Hypermesh Foundation. All rights reserved.
// ZSUSD Macro Model Simulation Suite - Error Types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a run was stopped. Both causes mean the price model has left the
/// region where it is meaningful; neither is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakdownCause {
    /// Aggregate debt fell below the stability pool balance.
    NegativeLiquidityPool,
    /// The elasticity relation produced a peg price that is zero, negative
    /// or not finite.
    InvalidPegPrice,
}

impl fmt::Display for BreakdownCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeLiquidityPool => write!(f, "liquidity pool went negative"),
            Self::InvalidPegPrice => write!(f, "peg price left the positive reals"),
        }
    }
}

/// Errors raised by configuration, path generation and the step driver.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("{name} distribution rejected its parameters: {reason}")]
    Distribution { name: &'static str, reason: String },

    #[error("exogenous path too short: need {needed} steps, have {available}")]
    PathTooShort { needed: usize, available: usize },

    #[error("model breakdown at step {step}: {cause}")]
    ModelBreakdown { step: u64, cause: BreakdownCause },

    #[error("simulation already terminated at step {0}")]
    Terminated(u64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig { field, reason: reason.into() }
    }
}

pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_message_names_step_and_cause() {
        let err = SimError::ModelBreakdown {
            step: 42,
            cause: BreakdownCause::NegativeLiquidityPool,
        };
        assert_eq!(
            err.to_string(),
            "model breakdown at step 42: liquidity pool went negative"
        );
    }

    #[test]
    fn config_helper_builds_invalid_config() {
        let err = SimError::config("pools.delta", "must be non-zero");
        assert!(matches!(err, SimError::InvalidConfig { field: "pools.delta", .. }));
    }
}
