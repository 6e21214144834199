// Scenario Runner: N seeded runs per scenario with aggregation
// Every tick is checked against the engine invariants

use stasy_engine::invariants;
use stasy_engine::{ContactStatus, DashboardDemo, LogKind, SystemStatus};

use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series::TimeSeriesRecorder;

use std::time::Instant;

/// Run a single scenario with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u64,
    time_series_dir: Option<&std::path::Path>,
) -> RunResult {
    let start = Instant::now();
    let mut failures = Vec::new();

    let mut demo = match DashboardDemo::from_config(scenario.config.clone(), seed) {
        Ok(demo) => demo,
        Err(e) => {
            failures.push(format!("config rejected: {}", e));
            return RunResult {
                scenario: scenario.name.to_string(),
                seed,
                pass: false,
                failures,
                ticks: 0,
                ticks_skipped: 0,
                final_status: SystemStatus::Error,
                peak_status: SystemStatus::Error,
                status_changes: 0,
                warning_entries: 0,
                alert_entries: 0,
                first_dispatch_tick: None,
                dispatched_at_end: 0,
                max_log_len: 0,
                invariant_violations: 0,
                contact_regressions: 0,
                elapsed_ms: start.elapsed().as_millis(),
            };
        }
    };

    let mut time_series = time_series_dir.map(|_| TimeSeriesRecorder::new());
    let mut peak_status = demo.state().status();
    let mut status_changes = 0u32;
    let mut ticks_skipped = 0u64;
    let mut first_dispatch_tick = None;
    let mut max_log_len = demo.state().log().len();
    let mut invariant_violations = 0u32;
    let mut contact_regressions = 0u32;
    let mut last_seq = demo.state().log().total_pushed();
    let mut warning_entries = 0u32;
    let mut alert_entries = 0u32;
    let mut prev_contacts: Vec<ContactStatus> =
        demo.state().contacts().iter().map(|c| c.status).collect();
    let mut prev_tick = demo.state().tick();

    for tick in 0..scenario.ticks {
        if let Some(event) = &scenario.mid_event {
            event(&mut demo, tick);
        }

        // A reset starts a new run: the log and roster begin again.
        if demo.state().tick() < prev_tick || demo.state().log().total_pushed() < last_seq {
            prev_contacts = demo.state().contacts().iter().map(|c| c.status).collect();
            last_seq = 0;
        }

        match demo.tick_core() {
            Some(report) => {
                if report.status_changed() {
                    status_changes += 1;
                }
                if report.status.rank() > peak_status.rank() {
                    peak_status = report.status;
                }
                if first_dispatch_tick.is_none()
                    && report.contact_changes.iter().any(|c| c.to == ContactStatus::Dispatched)
                {
                    first_dispatch_tick = Some(tick);
                }
            }
            None => ticks_skipped += 1,
        }

        let state = demo.state();
        if let Err(violation) = invariants::check(state, demo.config()) {
            invariant_violations += 1;
            tracing::warn!("{} seed {} tick {}: {}", scenario.name, seed, tick, violation);
        }

        for entry in state.log().entries() {
            let seq = entry.sequence().unwrap_or(0);
            if seq > last_seq {
                match entry.kind {
                    LogKind::Warning => warning_entries += 1,
                    LogKind::Alert => alert_entries += 1,
                    _ => {}
                }
            }
        }
        last_seq = state.log().total_pushed();
        max_log_len = max_log_len.max(state.log().len());

        let contacts: Vec<ContactStatus> = state.contacts().iter().map(|c| c.status).collect();
        contact_regressions += contacts
            .iter()
            .zip(&prev_contacts)
            .filter(|(now, before)| now < before)
            .count() as u32;
        prev_contacts = contacts;
        prev_tick = state.tick();

        if let Some(ts) = time_series.as_mut() {
            ts.record(state);
        }
    }

    if let (Some(dir), Some(ts)) = (time_series_dir, &time_series) {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(e) = ts.write_jsonl(&path) {
            tracing::warn!("could not write {}: {}", path.display(), e);
        }
    }

    let state = demo.state();
    let final_status = state.status();
    let dispatched_at_end = state
        .contacts()
        .iter()
        .filter(|c| c.status == ContactStatus::Dispatched)
        .count();

    if invariant_violations > 0 {
        failures.push(format!("{} invariant violations", invariant_violations));
    }
    if contact_regressions > 0 {
        failures.push(format!("{} contact regressions", contact_regressions));
    }
    let criteria = &scenario.criteria;
    if criteria.require_dispatch && first_dispatch_tick.is_none() {
        failures.push("no responder dispatched".to_string());
    }
    if criteria.forbid_dispatch && first_dispatch_tick.is_some() {
        failures.push("responder dispatched unexpectedly".to_string());
    }
    if let Some((at, within)) = criteria.dispatch_within {
        match first_dispatch_tick {
            Some(t) if t >= at && t <= at + within => {}
            other => failures.push(format!(
                "first dispatch at {:?}, expected within {} ticks of {}",
                other, within, at
            )),
        }
    }
    if let Some(expected) = criteria.final_status {
        if final_status != expected {
            failures.push(format!("final status {}, expected {}", final_status, expected));
        }
    }
    if criteria.forbid_error_at_end && (final_status == SystemStatus::Error || demo.is_faulted()) {
        failures.push("engine still faulted at end".to_string());
    }

    RunResult {
        scenario: scenario.name.to_string(),
        seed,
        pass: failures.is_empty(),
        failures,
        ticks: scenario.ticks,
        ticks_skipped,
        final_status,
        peak_status,
        status_changes,
        warning_entries,
        alert_entries,
        first_dispatch_tick,
        dispatched_at_end,
        max_log_len,
        invariant_violations,
        contact_regressions,
        elapsed_ms: start.elapsed().as_millis(),
    }
}

/// N seeded runs of a scenario, aggregated.
pub fn run_scenario(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_base: Option<&std::path::Path>,
) -> ScenarioReport {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let results: Vec<RunResult> = (0..n_runs)
        .map(|i| run_single(scenario, base_seed + i as u64, ts_dir.as_deref()))
        .collect();

    aggregate(scenario, results)
}

fn aggregate(scenario: &Scenario, results: Vec<RunResult>) -> ScenarioReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let sample = |f: &dyn Fn(&RunResult) -> f64| {
        Stats::from_samples(&results.iter().map(f).collect::<Vec<_>>())
    };

    ScenarioReport {
        scenario_name: scenario.name.to_string(),
        label: scenario.label.to_string(),
        n_runs: n,
        pass_rate: if n > 0 { passed as f64 / n as f64 } else { 0.0 },
        status_changes: sample(&|r| r.status_changes as f64),
        alert_entries: sample(&|r| r.alert_entries as f64),
        dispatched_at_end: sample(&|r| r.dispatched_at_end as f64),
        elapsed_ms: sample(&|r| r.elapsed_ms as f64),
        individual_runs: results,
    }
}
