// Ensemble Runner — N runs over consecutive seeds base_seed..base_seed+N
// Each seed gets its own exogenous paths; both policies share them

use macro_engine::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::report::RunSummary;
use crate::scenarios::Scenario;
use crate::time_series::{write_jsonl, write_troves};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyChoice {
    Fixed,
    BaseRate,
    Both,
}

impl PolicyChoice {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(Self::Fixed),
            "base-rate" | "base_rate" => Some(Self::BaseRate),
            "both" => Some(Self::Both),
            _ => None,
        }
    }
}

/// Run a single seed under the chosen policies and export its outputs.
pub fn run_seed(
    config: &SimConfig,
    scenario: &Scenario,
    policy: PolicyChoice,
    seed: u64,
    out_dir: &Path,
) -> SimResult<Vec<RunSummary>> {
    let start = Instant::now();
    let config = SimConfig { run_seed: seed, ..config.clone() };
    let paths: Arc<dyn PricePaths> = Arc::new(scenario.build_paths(&config)?);

    let outcomes = match policy {
        PolicyChoice::Fixed => {
            let fixed = match config.fee_policy {
                FeePolicy::Fixed { .. } => config.fee_policy,
                FeePolicy::BaseRate { .. } => FeePolicy::default(),
            };
            vec![Simulation::new(config.with_policy(fixed), paths)?.run()?]
        }
        PolicyChoice::BaseRate => {
            let base = match config.fee_policy {
                FeePolicy::BaseRate { .. } => config.fee_policy,
                FeePolicy::Fixed { .. } => FeePolicy::base_rate(),
            };
            vec![Simulation::new(config.with_policy(base), paths)?.run()?]
        }
        PolicyChoice::Both => {
            let cmp = run_policy_comparison(&config, paths)?;
            vec![cmp.fixed, cmp.base_rate]
        }
    };

    let mut summaries = Vec::with_capacity(outcomes.len());
    for outcome in &outcomes {
        let stem = format!("{}-{}-seed{}", scenario.name, outcome.policy, seed);
        let ts_path = out_dir.join("time-series").join(format!("{}.jsonl", stem));
        write_jsonl(&outcome.records, &ts_path)?;
        write_troves(&outcome.troves, &out_dir.join("troves").join(format!("{}.json", stem)))?;
        summaries.push(RunSummary::from_outcome(outcome, Some(ts_path.display().to_string())));
    }
    log::info!(
        "seed {}: {} run(s) in {:.0}ms",
        seed,
        summaries.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(summaries)
}

/// Run `runs` consecutive seeds starting at `base_seed`.
pub fn run_ensemble(
    config: &SimConfig,
    scenario: &Scenario,
    policy: PolicyChoice,
    runs: usize,
    base_seed: u64,
    out_dir: &Path,
) -> SimResult<Vec<RunSummary>> {
    let mut all = Vec::with_capacity(runs * 2);
    for i in 0..runs {
        all.extend(run_seed(config, scenario, policy, base_seed + i as u64, out_dir)?);
    }
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_names_parse() {
        assert_eq!(PolicyChoice::parse("fixed"), Some(PolicyChoice::Fixed));
        assert_eq!(PolicyChoice::parse("base-rate"), Some(PolicyChoice::BaseRate));
        assert_eq!(PolicyChoice::parse("both"), Some(PolicyChoice::Both));
        assert_eq!(PolicyChoice::parse("pid"), None);
    }
}
