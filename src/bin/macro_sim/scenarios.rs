// Scenario Definitions — collateral price overrides applied on top of the
// generated exogenous paths. The kernel itself is never modified.

use macro_engine::{FixedPaths, GeneratedPaths, SimConfig, SimResult};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    /// Multiplier applied to the generated collateral price at each step.
    /// `None` keeps the generated path untouched.
    pub collateral_curve: Option<fn(u64) -> f64>,
}

impl Scenario {
    /// Generate the run's paths and apply this scenario's collateral shape.
    pub fn build_paths(&self, config: &SimConfig) -> SimResult<FixedPaths> {
        let generated = GeneratedPaths::generate(config)?;
        let len = config.horizon_steps.max(config.num_steps) as usize;
        let paths = FixedPaths::snapshot(&generated, len);
        Ok(match self.collateral_curve {
            None => paths,
            Some(curve) => {
                let shaped = paths
                    .collateral
                    .iter()
                    .enumerate()
                    .map(|(step, price)| price * curve(step as u64))
                    .collect();
                paths.with_collateral(shaped)
            }
        })
    }
}

// ─── Curve Functions ────────────────────────────────────────────────────────

/// 50% drop over two days at the end of the second month, recovered over
/// the following week.
fn flash_crash(step: u64) -> f64 {
    let t = step as f64;
    if step < 1440 { 1.0 }
    else if step < 1488 { 1.0 - 0.5 * (t - 1440.0) / 48.0 }
    else if step < 1656 { 0.5 + 0.5 * (t - 1488.0) / 168.0 }
    else { 1.0 }
}

/// Linear slide to half the generated price over the year.
fn gradual_decline(step: u64) -> f64 {
    1.0 - 0.5 * (step as f64 / 8640.0).min(1.0)
}

/// 40% drawdown over four months, then a four-month recovery.
fn recovery(step: u64) -> f64 {
    let t = step as f64;
    if step < 2880 { 1.0 - 0.4 * t / 2880.0 }
    else if step < 5760 { 0.6 + 0.4 * (t - 2880.0) / 2880.0 }
    else { 1.0 }
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario { name: "baseline", label: "Generated paths", collateral_curve: None },
        Scenario { name: "flash-crash", label: "Flash crash (-50% in 48h)", collateral_curve: Some(flash_crash) },
        Scenario { name: "gradual-decline", label: "Gradual decline (-50% over year)", collateral_curve: Some(gradual_decline) },
        Scenario { name: "recovery", label: "Drawdown and recovery", collateral_curve: Some(recovery) },
    ]
}

pub fn find(name: &str) -> Option<Scenario> {
    let name = name.to_lowercase();
    scenarios().into_iter().find(|s| s.name == name)
}
