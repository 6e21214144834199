// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Density Grid
//
// Bins tracked positions into a fixed grid and classifies each cell against
// the configured thresholds. The grid is always rebuilt from scratch; cells
// are never edited in place.

use crate::config::DemoConfig;
use crate::motion::FIELD_MAX;
use crate::types::{BoundingBox, CellStatus, DensityGrid, GridCell, Severity};

impl DensityGrid {
    /// All-NORMAL grid with zero counts.
    pub fn empty(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            cells: vec![GridCell::default(); cols as usize * rows as usize],
        }
    }

    /// Count boxes per cell and classify every cell.
    pub fn from_boxes(boxes: &[BoundingBox], config: &DemoConfig) -> Self {
        let mut grid = Self::empty(config.grid_cols, config.grid_rows);
        for b in boxes {
            let idx = grid.index_of(b.x, b.y);
            grid.cells[idx].count += 1;
        }
        for cell in grid.cells.iter_mut() {
            cell.status = classify(cell.count, config);
        }
        grid
    }

    /// Cell index for a position. `100` falls into the last row/column.
    pub fn index_of(&self, x: f64, y: f64) -> usize {
        let col = bucket(x, self.cols);
        let row = bucket(y, self.rows);
        row * self.cols as usize + col
    }

    /// Center of a cell in frame percentages; out-of-range indices clamp.
    pub fn cell_center(&self, col: u32, row: u32) -> (f64, f64) {
        let col = col.min(self.cols.saturating_sub(1));
        let row = row.min(self.rows.saturating_sub(1));
        let w = FIELD_MAX / self.cols as f64;
        let h = FIELD_MAX / self.rows as f64;
        ((col as f64 + 0.5) * w, (row as f64 + 0.5) * h)
    }

    pub fn cell(&self, col: u32, row: u32) -> Option<&GridCell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize)
    }

    pub fn total_count(&self) -> u32 {
        self.cells.iter().map(|c| c.count).sum()
    }

    pub fn peak_count(&self) -> u32 {
        self.cells.iter().map(|c| c.count).max().unwrap_or(0)
    }

    /// Worst cell on the escalation ordering.
    pub fn worst(&self) -> Severity {
        self.cells
            .iter()
            .map(|c| c.status.severity())
            .max()
            .unwrap_or(Severity::Normal)
    }

    pub fn count_with(&self, status: CellStatus) -> usize {
        self.cells.iter().filter(|c| c.status == status).count()
    }
}

/// Dashboard zone name: column letter, 1-based row (`A1` is top-left).
pub fn zone_label(col: u32, row: u32) -> String {
    let letter = (b'A' + col.min(25) as u8) as char;
    format!("{}{}", letter, row + 1)
}

pub fn classify(count: u32, config: &DemoConfig) -> CellStatus {
    if count >= config.critical_threshold {
        CellStatus::Critical
    } else if count >= config.high_threshold {
        CellStatus::High
    } else {
        CellStatus::Normal
    }
}

fn bucket(pos: f64, buckets: u32) -> usize {
    let last = buckets.saturating_sub(1) as usize;
    if pos.is_nan() || pos <= 0.0 {
        return 0;
    }
    let idx = (pos / FIELD_MAX * buckets as f64).floor() as usize;
    idx.min(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> BoundingBox {
        BoundingBox { id: 0, x, y, vx: 0.0, vy: 0.0 }
    }

    #[test]
    fn test_boundary_100_lands_in_last_cell() {
        let grid = DensityGrid::empty(4, 4);
        assert_eq!(grid.index_of(100.0, 100.0), 15);
        assert_eq!(grid.index_of(0.0, 0.0), 0);
        assert_eq!(grid.index_of(100.0, 0.0), 3);
        assert_eq!(grid.index_of(0.0, 100.0), 12);
    }

    #[test]
    fn test_cell_edges_belong_to_next_cell() {
        let grid = DensityGrid::empty(4, 4);
        assert_eq!(grid.index_of(24.999, 0.0), 0);
        assert_eq!(grid.index_of(25.0, 0.0), 1);
        assert_eq!(grid.index_of(0.0, 50.0), 8);
    }

    #[test]
    fn test_counts_sum_to_box_count() {
        let config = DemoConfig::default();
        let boxes: Vec<_> = (0..=100).map(|i| at(i as f64, 100.0 - i as f64)).collect();
        let grid = DensityGrid::from_boxes(&boxes, &config);
        assert_eq!(grid.total_count(), 101);
        assert_eq!(grid.cells.len(), 16);
    }

    #[test]
    fn test_classify_thresholds() {
        let config = DemoConfig::default();
        assert_eq!(classify(0, &config), CellStatus::Normal);
        assert_eq!(classify(3, &config), CellStatus::Normal);
        assert_eq!(classify(4, &config), CellStatus::High);
        assert_eq!(classify(6, &config), CellStatus::High);
        assert_eq!(classify(7, &config), CellStatus::Critical);
        assert_eq!(classify(70, &config), CellStatus::Critical);
    }

    #[test]
    fn test_worst_and_peak() {
        let config = DemoConfig::default();
        let mut boxes = vec![at(10.0, 10.0); 5];
        boxes.extend(vec![at(90.0, 90.0); 8]);
        let grid = DensityGrid::from_boxes(&boxes, &config);
        assert_eq!(grid.worst(), Severity::Critical);
        assert_eq!(grid.peak_count(), 8);
        assert_eq!(grid.count_with(CellStatus::High), 1);
        assert_eq!(grid.count_with(CellStatus::Critical), 1);
        assert_eq!(grid.cell(0, 0).map(|c| c.count), Some(5));
        assert_eq!(grid.cell(3, 3).map(|c| c.status), Some(CellStatus::Critical));
        assert!(grid.cell(4, 0).is_none());
    }

    #[test]
    fn test_empty_grid_is_normal() {
        let grid = DensityGrid::from_boxes(&[], &DemoConfig::default());
        assert_eq!(grid.worst(), Severity::Normal);
        assert_eq!(grid.peak_count(), 0);
    }

    #[test]
    fn test_zone_label() {
        assert_eq!(zone_label(0, 0), "A1");
        assert_eq!(zone_label(2, 3), "C4");
    }

    #[test]
    fn test_cell_center_clamps() {
        let grid = DensityGrid::empty(4, 2);
        assert_eq!(grid.cell_center(0, 0), (12.5, 25.0));
        assert_eq!(grid.cell_center(9, 9), (87.5, 75.0));
    }
}
