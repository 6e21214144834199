// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Status Derivation

use crate::config::DemoConfig;
use crate::types::{CellStatus, DensityGrid, LogKind, Severity, SystemStatus};

/// Map the grid onto the dashboard vocabulary. The worst cell picks the
/// tier; the spread (or intensity) inside that tier picks the label.
///
/// A critical cell holding everyone tracked is a crowd rush and always
/// counts as `CRITICAL RISK`, whatever `risk_threshold` says.
pub fn derive_status(grid: &DensityGrid, config: &DemoConfig) -> SystemStatus {
    match grid.worst() {
        Severity::Normal => SystemStatus::Normal,
        Severity::High => {
            if grid.count_with(CellStatus::High) >= 2 {
                SystemStatus::HighDensityWarning
            } else {
                SystemStatus::HighDensityCell
            }
        }
        Severity::Critical => {
            let critical = grid.count_with(CellStatus::Critical);
            let peak = grid.peak_count();
            if critical >= 2 || peak >= config.risk_threshold || peak == grid.total_count() {
                SystemStatus::CriticalRisk
            } else {
                SystemStatus::CriticalDensityCell
            }
        }
    }
}

/// Log lines for a status change, empty when nothing changed.
///
/// The first analysed frame also announces that the engine is online; the
/// tier entry follows it unless the venue starts out calm.
pub fn transition_entries(
    previous: SystemStatus,
    next: SystemStatus,
    grid: &DensityGrid,
) -> Vec<(LogKind, String)> {
    let mut entries = Vec::new();
    if previous == next {
        return entries;
    }
    if previous == SystemStatus::Initializing {
        entries.push((
            LogKind::System,
            format!(
                "Crowd density analysis online: {} people tracked, status {}",
                grid.total_count(),
                next
            ),
        ));
        if next == SystemStatus::Normal {
            return entries;
        }
    }

    let kind = match next.severity() {
        Some(Severity::Normal) => LogKind::Info,
        Some(Severity::High) => LogKind::Warning,
        Some(Severity::Critical) => LogKind::Alert,
        None => return entries,
    };
    let peak = grid.peak_count();
    let message = match next {
        SystemStatus::HighDensityCell => {
            format!("High density cell detected ({} people in one zone)", peak)
        }
        SystemStatus::HighDensityWarning => format!(
            "High density warning: {} zones above threshold",
            grid.count_with(CellStatus::High)
        ),
        SystemStatus::CriticalDensityCell => {
            format!("Critical density cell detected ({} people in one zone)", peak)
        }
        SystemStatus::CriticalRisk => format!(
            "CRITICAL RISK: compression risk in {} zone(s), peak {} people",
            grid.count_with(CellStatus::Critical),
            peak
        ),
        _ => "Density back to normal levels".to_string(),
    };
    entries.push((kind, message));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn grid_with(groups: &[(f64, f64, usize)]) -> DensityGrid {
        let boxes: Vec<BoundingBox> = groups
            .iter()
            .flat_map(|&(x, y, n)| {
                std::iter::repeat(BoundingBox { id: 0, x, y, vx: 0.0, vy: 0.0 }).take(n)
            })
            .collect();
        DensityGrid::from_boxes(&boxes, &DemoConfig::default())
    }

    #[test]
    fn test_normal() {
        let grid = grid_with(&[(10.0, 10.0, 3), (60.0, 60.0, 3)]);
        assert_eq!(derive_status(&grid, &DemoConfig::default()), SystemStatus::Normal);
    }

    #[test]
    fn test_single_high_cell() {
        let grid = grid_with(&[(10.0, 10.0, 4)]);
        assert_eq!(derive_status(&grid, &DemoConfig::default()), SystemStatus::HighDensityCell);
    }

    #[test]
    fn test_multiple_high_cells() {
        let grid = grid_with(&[(10.0, 10.0, 4), (90.0, 10.0, 5)]);
        assert_eq!(derive_status(&grid, &DemoConfig::default()), SystemStatus::HighDensityWarning);
    }

    #[test]
    fn test_critical_cell_below_risk() {
        let grid = grid_with(&[(10.0, 10.0, 8), (90.0, 10.0, 5), (90.0, 90.0, 5)]);
        assert_eq!(derive_status(&grid, &DemoConfig::default()), SystemStatus::CriticalDensityCell);
    }

    #[test]
    fn test_critical_risk_by_intensity() {
        let grid = grid_with(&[(50.0, 50.0, 24)]);
        assert_eq!(derive_status(&grid, &DemoConfig::default()), SystemStatus::CriticalRisk);
    }

    #[test]
    fn test_critical_risk_by_spread() {
        let grid = grid_with(&[(10.0, 10.0, 7), (90.0, 90.0, 7)]);
        assert_eq!(derive_status(&grid, &DemoConfig::default()), SystemStatus::CriticalRisk);
    }

    #[test]
    fn test_lone_critical_cell_with_everyone_is_risk() {
        // 8 people: above critical (7), below risk (10)
        let grid = grid_with(&[(10.0, 10.0, 8)]);
        assert_eq!(derive_status(&grid, &DemoConfig::default()), SystemStatus::CriticalRisk);
    }

    fn kinds(entries: &[(LogKind, String)]) -> Vec<LogKind> {
        entries.iter().map(|(kind, _)| *kind).collect()
    }

    #[test]
    fn test_transition_kinds() {
        let grid = grid_with(&[(50.0, 50.0, 24)]);
        let entries = transition_entries(SystemStatus::Normal, SystemStatus::CriticalRisk, &grid);
        assert_eq!(kinds(&entries), vec![LogKind::Alert]);
        assert!(entries[0].1.contains("peak 24"));

        let entries = transition_entries(SystemStatus::Normal, SystemStatus::HighDensityCell, &grid);
        assert_eq!(kinds(&entries), vec![LogKind::Warning]);

        let entries = transition_entries(SystemStatus::CriticalRisk, SystemStatus::Normal, &grid);
        assert_eq!(kinds(&entries), vec![LogKind::Info]);

        let entries = transition_entries(SystemStatus::Initializing, SystemStatus::Normal, &grid);
        assert_eq!(kinds(&entries), vec![LogKind::System]);

        assert!(transition_entries(SystemStatus::Normal, SystemStatus::Normal, &grid).is_empty());
    }

    #[test]
    fn test_first_frame_critical_still_alerts() {
        let grid = grid_with(&[(50.0, 50.0, 24)]);
        let entries =
            transition_entries(SystemStatus::Initializing, SystemStatus::CriticalRisk, &grid);
        assert_eq!(kinds(&entries), vec![LogKind::System, LogKind::Alert]);

        let entries =
            transition_entries(SystemStatus::Initializing, SystemStatus::HighDensityWarning, &grid);
        assert_eq!(kinds(&entries), vec![LogKind::System, LogKind::Warning]);
    }
}
