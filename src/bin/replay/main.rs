// Dashboard Demo Replay Runner: seeded scenario replays with invariant checks
// Writes results to demo-results/replay-{timestamp}.json

mod report;
mod runner;
mod scenarios;
mod time_series;

use report::*;
use scenarios::{scenarios, Scenario};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// ─── CLI Argument Parsing ───────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    time_series: bool,
    verbose: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 10,
        seed: 0,
        time_series: false,
        verbose: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(10);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            "--verbose" | "-v" => {
                cli.verbose = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
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
    let cli = parse_args();
    let log_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let all_scenarios = scenarios();
    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    let ts_dir = if cli.time_series {
        Some(std::path::Path::new("demo-results/time-series").to_path_buf())
    } else {
        None
    };

    println!("\n  Dashboard Demo Replay v{}", env!("CARGO_PKG_VERSION"));
    println!("  PRNG: ChaCha8Rng | Runs/scenario: {} | Base seed: {}", cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<32} {:>5} {:>8} {:>7} {:>9} {:>7}",
        "Scenario", "Pass%", "Changes", "Alerts", "Dispatch", "Time");
    println!("  {}", "-".repeat(76));

    let suite_start = Instant::now();
    let mut reports = Vec::new();

    for scenario in &to_run {
        let report = runner::run_scenario(scenario, cli.runs, cli.seed, ts_dir.as_deref());
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<32} {:>4}% {:>8.1} {:>7.1} {:>9.1} {:>5.0}ms  {}",
            report.label,
            (report.pass_rate * 100.0) as u32,
            report.status_changes.mean,
            report.alert_entries.mean,
            report.dispatched_at_end.mean,
            report.elapsed_ms.mean,
            status,
        );
        for run in report.individual_runs.iter().filter(|r| !r.pass) {
            println!("      seed {}: {}", run.seed, run.failures.join("; "));
        }

        reports.push(report);
    }

    let total: usize = reports.iter().map(|r| r.n_runs).sum();
    let passed: usize = reports.iter()
        .map(|r| r.individual_runs.iter().filter(|run| run.pass).count())
        .sum();
    let failed = total - passed;

    println!("  {}", "-".repeat(76));
    println!("  Runs: {}  Passed: {}  Failed: {}  ({:.1}s)\n",
        total, passed, failed, suite_start.elapsed().as_secs_f64());

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let timestamp = format!("{}", ts);

    let report = ReplayReport {
        timestamp: timestamp.clone(),
        version: env!("CARGO_PKG_VERSION"),
        prng: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: if total > 0 { passed as f64 / total as f64 } else { 0.0 },
        },
        scenarios: reports,
    };

    let dir = std::path::Path::new("demo-results");
    if !dir.exists() {
        std::fs::create_dir_all(dir).expect("Failed to create demo-results/");
    }
    let path = dir.join(format!("replay-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize");
    std::fs::write(&path, &json).expect("Failed to write replay report");
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
}
