// ZSUSD Macro Model Runner — seeded ensembles over scripted collateral paths
// Writes per-run JSONL time series, trove snapshots and a summary report
//
// Usage:
//   cargo run --release --bin macro_sim                          # One baseline run, fixed fees
//   cargo run --release --bin macro_sim -- --policy both         # Fixed vs base-rate, shared paths
//   cargo run --release --bin macro_sim -- --runs 10 --seed 42   # Seeds 42..51
//   cargo run --release --bin macro_sim -- --scenario flash-crash --steps 2000
//   cargo run --release --bin macro_sim -- --config model.json --out results/
//
// RUST_LOG controls verbosity (default: info).

mod ensemble;
mod report;
mod scenarios;
mod time_series;

use ensemble::{run_ensemble, PolicyChoice};
use macro_engine::{SimConfig, SimError, SimResult};
use report::EnsembleReport;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    config: Option<PathBuf>,
    steps: Option<u64>,
    seed: u64,
    runs: usize,
    policy: PolicyChoice,
    scenario: String,
    out: PathBuf,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        config: None,
        steps: None,
        seed: 0,
        runs: 1,
        policy: PolicyChoice::Fixed,
        scenario: "baseline".to_string(),
        out: PathBuf::from("macro-results"),
    };

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "--config" => {
                cli.config = value.map(PathBuf::from);
                i += 1;
            }
            "--steps" => {
                cli.steps = value.and_then(|v| v.parse().ok());
                i += 1;
            }
            "--seed" => {
                cli.seed = value.and_then(|v| v.parse().ok()).unwrap_or(0);
                i += 1;
            }
            "--runs" => {
                cli.runs = value.and_then(|v| v.parse().ok()).unwrap_or(1);
                i += 1;
            }
            "--policy" => {
                match value.and_then(|v| PolicyChoice::parse(v)) {
                    Some(p) => cli.policy = p,
                    None => eprintln!("Unknown policy {:?}, using fixed", value),
                }
                i += 1;
            }
            "--scenario" => {
                if let Some(v) = value {
                    cli.scenario = v.clone();
                }
                i += 1;
            }
            "--out" => {
                if let Some(v) = value {
                    cli.out = PathBuf::from(v);
                }
                i += 1;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = parse_args();
    if let Err(e) = run(&cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &CliArgs) -> SimResult<()> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(steps) = cli.steps {
        config.num_steps = steps;
    }
    config.validate()?;

    let scenario = scenarios::find(&cli.scenario).ok_or_else(|| SimError::InvalidConfig {
        field: "scenario",
        reason: format!("unknown scenario {:?}", cli.scenario),
    })?;

    println!("\n  ZSUSD Macro Model Runner");
    println!("  PRNG: ChaCha8Rng | Runs: {} | Base seed: {} | Steps: {}", cli.runs, cli.seed, config.num_steps);
    println!("  Scenario: {} ({})\n", scenario.name, scenario.label);

    let suite_start = Instant::now();
    let runs = run_ensemble(&config, &scenario, cli.policy, cli.runs, cli.seed, &cli.out)?;

    println!("  {:<10} {:>6} {:>8} {:>10} {:>14} {:>8}", "Policy", "Seed", "Steps", "Peg", "Supply", "Status");
    println!("  {}", "-".repeat(62));
    for r in &runs {
        println!(
            "  {:<10} {:>6} {:>8} {:>10.4} {:>14.2} {:>8}",
            r.policy,
            r.run_seed,
            r.steps_completed,
            r.final_peg_price,
            r.final_supply,
            if r.completed() { "OK" } else { "BREAK" },
        );
    }
    println!("  {}", "-".repeat(62));
    println!("  Suite time: {:.1}s\n", suite_start.elapsed().as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string();
    let report = EnsembleReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        scenario: scenario.name.to_string(),
        num_steps: config.num_steps,
        base_seed: cli.seed,
        runs,
    };

    std::fs::create_dir_all(&cli.out)?;
    let path = cli.out.join(format!("summary-{}.json", timestamp));
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    println!("  Results saved to: {}\n", path.display());
    Ok(())
}
