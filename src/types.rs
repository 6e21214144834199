// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Type Definitions

use serde::{Deserialize, Serialize};

// ─── Severity ────────────────────────────────────────────────────────────────

/// Escalation ordering shared by cells and the overall status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Normal = 0,
    High = 1,
    Critical = 2,
}

// ─── Cell Status ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CellStatus {
    Normal,
    High,
    Critical,
}

impl Default for CellStatus {
    fn default() -> Self { CellStatus::Normal }
}

impl CellStatus {
    pub fn severity(&self) -> Severity {
        match self {
            Self::Normal => Severity::Normal,
            Self::High => Severity::High,
            Self::Critical => Severity::Critical,
        }
    }
}

// ─── GridCell ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridCell {
    pub count: u32,
    pub status: CellStatus,
}

// ─── BoundingBox ─────────────────────────────────────────────────────────────

/// One tracked person. Coordinates are percentages of the video frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl BoundingBox {
    pub fn speed(&self) -> f64 {
        self.vx.hypot(self.vy)
    }
}

// ─── System Status ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SystemStatus {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "High Density Cell Detected")]
    HighDensityCell,
    #[serde(rename = "High Density Warning")]
    HighDensityWarning,
    #[serde(rename = "Critical Density Cell Detected")]
    CriticalDensityCell,
    #[serde(rename = "CRITICAL RISK")]
    CriticalRisk,
    #[serde(rename = "Initializing")]
    Initializing,
    #[serde(rename = "Error")]
    Error,
}

impl SystemStatus {
    /// Tier on the escalation ordering. `Initializing` and `Error` carry none.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::Normal => Some(Severity::Normal),
            Self::HighDensityCell | Self::HighDensityWarning => Some(Severity::High),
            Self::CriticalDensityCell | Self::CriticalRisk => Some(Severity::Critical),
            Self::Initializing | Self::Error => None,
        }
    }

    /// Position on the escalation scale used to track the worst status of a
    /// run. `Initializing` and `Error` sit below `Normal`.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Initializing | Self::Error => 0,
            Self::Normal => 1,
            Self::HighDensityCell => 2,
            Self::HighDensityWarning => 3,
            Self::CriticalDensityCell => 4,
            Self::CriticalRisk => 5,
        }
    }

    /// Display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::HighDensityCell => "High Density Cell Detected",
            Self::HighDensityWarning => "High Density Warning",
            Self::CriticalDensityCell => "Critical Density Cell Detected",
            Self::CriticalRisk => "CRITICAL RISK",
            Self::Initializing => "Initializing",
            Self::Error => "Error",
        }
    }
}

impl std::fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ─── Log Entry ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Warning,
    Alert,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
}

impl LogEntry {
    /// Insertion sequence encoded in the id (`log-<n>`).
    pub fn sequence(&self) -> Option<u64> {
        self.id.strip_prefix("log-").and_then(|n| n.parse().ok())
    }
}

// ─── Emergency Contact ───────────────────────────────────────────────────────

/// Ordered: a contact only ever moves forward within one run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactStatus {
    Idle = 0,
    Notified = 1,
    Dispatched = 2,
}

impl Default for ContactStatus {
    fn default() -> Self { ContactStatus::Idle }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyContact {
    pub role: String,
    pub status: ContactStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
}

// ─── DensityGrid ─────────────────────────────────────────────────────────────

/// Row-major grid of cells; `cells[row * cols + col]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DensityGrid {
    pub cols: u32,
    pub rows: u32,
    pub cells: Vec<GridCell>,
}

// ─── ContactChange ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContactChange {
    pub role: String,
    pub from: ContactStatus,
    pub to: ContactStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta: Option<String>,
}

// ─── TickReport ──────────────────────────────────────────────────────────────

/// What one tick changed, for hosts that only want the deltas.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub previous_status: SystemStatus,
    pub status: SystemStatus,
    pub new_log_entries: usize,
    pub contact_changes: Vec<ContactChange>,
}

impl TickReport {
    pub fn status_changed(&self) -> bool {
        self.previous_status != self.status
    }
}

// ─── DemoSnapshot ────────────────────────────────────────────────────────────

/// Everything the dashboard renders for one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoSnapshot {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub running: bool,
    pub status: SystemStatus,
    pub people_tracked: u32,
    pub peak_cell_count: u32,
    pub boxes: Vec<BoundingBox>,
    pub grid: DensityGrid,
    pub logs: Vec<LogEntry>,
    pub contacts: Vec<EmergencyContact>,
}
