// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Invariant Checks

//! Consistency checks over a [`DemoState`].
//!
//! A failure here is a bug in the engine, never a runtime condition: the
//! tick path runs these under `debug_assert!` and the test suites call them
//! directly.

use crate::config::DemoConfig;
use crate::density::classify;
use crate::motion::{FIELD_MAX, FIELD_MIN};
use crate::simulation::DemoState;
use crate::status::derive_status;
use crate::types::{DensityGrid, SystemStatus};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("box {id} left the field at ({x}, {y})")]
    OutOfField { id: u32, x: f64, y: f64 },
    #[error("grid holds {counted} people but {tracked} are tracked")]
    CountMismatch { counted: u32, tracked: u32 },
    #[error("grid is {cols}x{rows} with {cells} cells, expected {expected_cols}x{expected_rows}")]
    GridShape { cols: u32, rows: u32, cells: usize, expected_cols: u32, expected_rows: u32 },
    #[error("grid cell {index} does not match a fresh binning")]
    StaleCell { index: usize },
    #[error("status is {actual} but the grid implies {expected}")]
    StatusMismatch { actual: SystemStatus, expected: SystemStatus },
    #[error("log holds {len} entries, cap is {cap}")]
    LogOverflow { len: usize, cap: usize },
    #[error("log entry {id} is out of insertion order")]
    LogOrder { id: String },
}

pub fn check(state: &DemoState, config: &DemoConfig) -> Result<(), InvariantViolation> {
    for b in state.boxes() {
        let in_field = |v: f64| (FIELD_MIN..=FIELD_MAX).contains(&v);
        if !in_field(b.x) || !in_field(b.y) {
            return Err(InvariantViolation::OutOfField { id: b.id, x: b.x, y: b.y });
        }
    }

    let grid = state.grid();
    if grid.cols != config.grid_cols
        || grid.rows != config.grid_rows
        || grid.cells.len() != config.cell_count()
    {
        return Err(InvariantViolation::GridShape {
            cols: grid.cols,
            rows: grid.rows,
            cells: grid.cells.len(),
            expected_cols: config.grid_cols,
            expected_rows: config.grid_rows,
        });
    }

    let counted = grid.total_count();
    let tracked = state.boxes().len() as u32;
    if counted != tracked {
        return Err(InvariantViolation::CountMismatch { counted, tracked });
    }

    // Before the first tick the grid is the all-NORMAL placeholder.
    if state.tick() > 0 {
        let fresh = DensityGrid::from_boxes(state.boxes(), config);
        for (index, (cell, expected)) in grid.cells.iter().zip(&fresh.cells).enumerate() {
            if cell != expected || cell.status != classify(cell.count, config) {
                return Err(InvariantViolation::StaleCell { index });
            }
        }
        let expected = derive_status(grid, config);
        let actual = state.status();
        if actual != SystemStatus::Error && actual != expected {
            return Err(InvariantViolation::StatusMismatch { actual, expected });
        }
    }

    check_log(state, config)
}

fn check_log(state: &DemoState, config: &DemoConfig) -> Result<(), InvariantViolation> {
    let log = state.log();
    if log.len() > config.log_capacity {
        return Err(InvariantViolation::LogOverflow { len: log.len(), cap: config.log_capacity });
    }
    let mut last = 0;
    for entry in log.entries() {
        match entry.sequence() {
            Some(seq) if seq > last => last = seq,
            _ => return Err(InvariantViolation::LogOrder { id: entry.id.clone() }),
        }
    }
    Ok(())
}
