// Per-Tick JSONL Time Series Recorder
// One JSON line per tick for frame-by-frame review

use serde::Serialize;
use stasy_engine::{CellStatus, ContactStatus, DemoState, SystemStatus};
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub status: SystemStatus,
    pub people_tracked: usize,
    pub peak_cell_count: u32,
    pub high_cells: usize,
    pub critical_cells: usize,
    pub log_len: usize,
    pub notified: usize,
    pub dispatched: usize,
}

impl TickSnapshot {
    pub fn from_state(state: &DemoState) -> Self {
        let grid = state.grid();
        let count_contacts = |status: ContactStatus| {
            state.contacts().iter().filter(|c| c.status == status).count()
        };
        Self {
            tick: state.tick(),
            elapsed_ms: state.elapsed_ms(),
            status: state.status(),
            people_tracked: state.boxes().len(),
            peak_cell_count: grid.peak_count(),
            high_cells: grid.count_with(CellStatus::High),
            critical_cells: grid.count_with(CellStatus::Critical),
            log_len: state.log().len(),
            notified: count_contacts(ContactStatus::Notified),
            dispatched: count_contacts(ContactStatus::Dispatched),
        }
    }
}

/// Time series recorder that accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<TickSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, state: &DemoState) {
        self.snapshots.push(TickSnapshot::from_state(state));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}
