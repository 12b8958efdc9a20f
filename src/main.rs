//! Corebench CLI runner.
//!
//! Usage: corebench [TIER] [--workers N] [--seed HEX] [--timeout SECS] [--json]
//!
//! TIER is one of test|slow|mid|flagship (default mid). Progress and logs
//! go to stderr; the final summary JSON goes to stdout so it can be piped
//! straight into history storage.

use anyhow::{bail, Context, Result};
use corebench::orchestrator::{Orchestrator, SuiteConfig};
use corebench::params::DeviceTier;
use corebench::{initialize_logging, topology, ProgressPhase};
use std::sync::Arc;
use std::time::Duration;

struct CliOptions {
    tier: DeviceTier,
    workers: Option<usize>,
    seed: Option<u64>,
    timeout: Option<Duration>,
    json_only: bool,
}

fn parse_args() -> Result<CliOptions> {
    let mut options = CliOptions {
        tier: DeviceTier::Mid,
        workers: None,
        seed: None,
        timeout: None,
        json_only: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--workers" => {
                let value = args.next().context("--workers requires a value")?;
                options.workers = Some(value.parse().context("--workers expects a number")?);
            }
            "--seed" => {
                let value = args.next().context("--seed requires a value")?;
                let digits = value.trim_start_matches("0x");
                options.seed =
                    Some(u64::from_str_radix(digits, 16).context("--seed expects hex digits")?);
            }
            "--timeout" => {
                let value = args.next().context("--timeout requires a value")?;
                let secs: u64 = value.parse().context("--timeout expects seconds")?;
                options.timeout = Some(Duration::from_secs(secs));
            }
            "--json" => options.json_only = true,
            "--help" | "-h" => {
                eprintln!(
                    "Usage: corebench [TIER] [--workers N] [--seed HEX] [--timeout SECS] [--json]"
                );
                std::process::exit(0);
            }
            tier if !tier.starts_with('-') => {
                options.tier = tier.parse().map_err(anyhow::Error::msg)?;
            }
            unknown => bail!("unknown argument '{}'", unknown),
        }
    }

    Ok(options)
}

fn main() -> Result<()> {
    initialize_logging();
    let options = parse_args()?;

    let mut config = SuiteConfig::new(options.tier);
    config.worker_count = options.workers;
    config.seed = options.seed;
    config.deadline = options.timeout;

    let workers = config.worker_count.unwrap_or_else(topology::worker_count);
    let total_phases = Orchestrator::total_phases();

    if !options.json_only {
        eprintln!("=== Corebench CPU Benchmark Suite ===");
        eprintln!(
            "Tier: {}, Workers: {}, Phases: {}",
            options.tier, workers, total_phases
        );
        eprintln!();
    }

    let orchestrator = Arc::new(Orchestrator::new(config));
    let handle = Orchestrator::spawn(Arc::clone(&orchestrator))
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;

    // The spawned thread holds the only other reference; dropping ours
    // lets the event channel disconnect once the run finishes.
    drop(orchestrator);

    let mut phase_index = 0usize;
    for event in handle.events().iter() {
        if event.phase == ProgressPhase::Started {
            phase_index += 1;
            if !options.json_only {
                eprintln!("[{:>2}/{}] {}", phase_index, total_phases, event.test_name);
            }
        }
    }

    let summary = handle
        .join()
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;

    if !options.json_only {
        eprintln!();
        eprintln!("=== Results ===");
        if let Some(reason) = &summary.interrupted {
            eprintln!("Run interrupted ({}); scores are partial.", reason);
        }
        eprintln!("Single-Core Score: {:.1}", summary.single_core_score);
        eprintln!("Multi-Core Score:  {:.1}", summary.multi_core_score);
        eprintln!("Core Ratio:        {:.2}x", summary.core_ratio);
        eprintln!("Final Score:       {:.1}", summary.final_weighted_score);
        eprintln!("Normalized Score:  {:.1}", summary.normalized_score);
        eprintln!("Rating:            {}", summary.rating);
        eprintln!();
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
