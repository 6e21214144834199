// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Simulation Core

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::config::{ConfigError, DemoConfig};
use crate::density::zone_label;
use crate::dispatch::ContactRoster;
use crate::event_log::EventLog;
use crate::invariants;
use crate::motion;
use crate::status::{derive_status, transition_entries};
use crate::types::*;

// ─── DemoState ───────────────────────────────────────────────────────────────

/// The whole mock dataset behind the dashboard preview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoState {
    tick: u64,
    elapsed_ms: u64,
    status: SystemStatus,
    boxes: Vec<BoundingBox>,
    grid: DensityGrid,
    log: EventLog,
    roster: ContactRoster,
}

impl DemoState {
    /// Fresh state as the dashboard mounts: `Initializing`, scattered
    /// people, idle responders and one startup log line.
    pub fn initialize<R: Rng + ?Sized>(config: &DemoConfig, rng: &mut R) -> Self {
        let boxes = motion::spawn_boxes(config, rng);

        // Counts are binned right away; statuses stay NORMAL until the first
        // tick analyses the frame.
        let mut grid = DensityGrid::from_boxes(&boxes, config);
        for cell in grid.cells.iter_mut() {
            cell.status = CellStatus::Normal;
        }

        let mut log = EventLog::new(config.log_capacity);
        log.push(
            LogKind::System,
            format!(
                "Crowd Density Engine starting: {} zones, {} responders on standby",
                config.cell_count(),
                config.contacts.len()
            ),
            0,
        );

        Self {
            tick: 0,
            elapsed_ms: 0,
            status: SystemStatus::Initializing,
            boxes,
            grid,
            log,
            roster: ContactRoster::new(&config.contacts),
        }
    }

    /// Advance one tick in place.
    pub fn step<R: Rng + ?Sized>(&mut self, config: &DemoConfig, rng: &mut R) -> TickReport {
        self.tick += 1;
        self.elapsed_ms = self.tick * config.tick_interval_ms as u64;
        let pushed_before = self.log.total_pushed();

        // 1-2. Motion
        motion::advance(&mut self.boxes);
        motion::perturb(&mut self.boxes, config.jitter, config.max_speed, rng);

        // 3. Density
        self.grid = DensityGrid::from_boxes(&self.boxes, config);

        // 4-5. Status, transition log, responders
        let previous = self.status;
        let status = derive_status(&self.grid, config);
        self.status = status;
        if previous != status {
            tracing::info!("tick {}: {} -> {}", self.tick, previous, status);
        }
        for (kind, message) in transition_entries(previous, status, &self.grid) {
            self.log.push(kind, message, self.elapsed_ms);
        }

        let contact_changes = self.roster.advance(status, rng);
        for change in &contact_changes {
            let message = match (&change.to, &change.eta) {
                (ContactStatus::Dispatched, Some(eta)) => {
                    format!("{} dispatched, ETA {}", change.role, eta)
                }
                (ContactStatus::Dispatched, None) => format!("{} dispatched", change.role),
                _ => format!("{} notified", change.role),
            };
            tracing::info!("tick {}: {}", self.tick, message);
            self.log.push(LogKind::Info, message, self.elapsed_ms);
        }

        if config.heartbeat_every > 0 && self.tick % config.heartbeat_every as u64 == 0 {
            let message = format!(
                "Frame analysed: {} people tracked, peak {} per zone",
                self.boxes.len(),
                self.grid.peak_count()
            );
            tracing::debug!("tick {}: {}", self.tick, message);
            self.log.push(LogKind::Info, message, self.elapsed_ms);
        }

        // 6. The log enforces its own cap on every push.
        TickReport {
            tick: self.tick,
            previous_status: previous,
            status,
            new_log_entries: (self.log.total_pushed() - pushed_before) as usize,
            contact_changes,
        }
    }

    /// Move everyone into one zone and stop them there.
    pub fn surge(&mut self, col: u32, row: u32) {
        let col = col.min(self.grid.cols.saturating_sub(1));
        let row = row.min(self.grid.rows.saturating_sub(1));
        let (x, y) = self.grid.cell_center(col, row);
        motion::cluster_at(&mut self.boxes, x, y);
        let message = format!("Surge simulation: crowd rushing zone {}", zone_label(col, row));
        tracing::info!("tick {}: {}", self.tick, message);
        self.log.push(LogKind::Info, message, self.elapsed_ms);
    }

    /// Mark the engine as failed. Only `reset` leaves this state.
    pub fn fault(&mut self, message: &str) {
        tracing::warn!("tick {}: engine fault: {}", self.tick, message);
        self.status = SystemStatus::Error;
        self.log.push(LogKind::System, format!("Engine fault: {}", message), self.elapsed_ms);
    }

    pub fn tick(&self) -> u64 { self.tick }
    pub fn elapsed_ms(&self) -> u64 { self.elapsed_ms }
    pub fn status(&self) -> SystemStatus { self.status }
    pub fn boxes(&self) -> &[BoundingBox] { &self.boxes }
    pub fn grid(&self) -> &DensityGrid { &self.grid }
    pub fn log(&self) -> &EventLog { &self.log }
    pub fn contacts(&self) -> &[EmergencyContact] { self.roster.contacts() }

    pub fn snapshot(&self, running: bool) -> DemoSnapshot {
        DemoSnapshot {
            tick: self.tick,
            elapsed_ms: self.elapsed_ms,
            running,
            status: self.status,
            people_tracked: self.boxes.len() as u32,
            peak_cell_count: self.grid.peak_count(),
            boxes: self.boxes.clone(),
            grid: self.grid.clone(),
            logs: self.log.to_vec(),
            contacts: self.roster.contacts().to_vec(),
        }
    }

    /// Direct access for scripted scenarios.
    pub fn boxes_mut(&mut self) -> &mut [BoundingBox] { &mut self.boxes }
}

/// Pure form of [`DemoState::step`]: the next state from the current one.
pub fn tick<R: Rng + ?Sized>(state: &DemoState, config: &DemoConfig, rng: &mut R) -> DemoState {
    let mut next = state.clone();
    next.step(config, rng);
    next
}

// ─── DashboardDemo struct ────────────────────────────────────────────────────

/// Simulator handle owned by the page: config, seeded randomness, state and
/// the start/stop/reset controls.
#[wasm_bindgen]
pub struct DashboardDemo {
    pub(crate) config: DemoConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) seed: u64,
    pub(crate) state: DemoState,
    pub(crate) running: bool,
    pub(crate) faulted: bool,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl DashboardDemo {
    pub fn from_config(config: DemoConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::mount(config, seed))
    }

    /// Caller guarantees `config` is valid.
    pub(crate) fn mount(config: DemoConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = DemoState::initialize(&config, &mut rng);
        tracing::info!(
            "dashboard demo mounted: seed {}, {} people, {}x{} grid",
            seed, config.box_count, config.grid_cols, config.grid_rows
        );
        Self { config, rng, seed, state, running: true, faulted: false }
    }

    /// One timer callback. Returns `None` (and changes nothing) while stopped.
    pub fn tick_core(&mut self) -> Option<TickReport> {
        if !self.running {
            return None;
        }
        let report = self.state.step(&self.config, &mut self.rng);
        debug_assert_eq!(invariants::check(&self.state, &self.config), Ok(()));
        Some(report)
    }

    pub fn snapshot_core(&self) -> DemoSnapshot {
        self.state.snapshot(self.running)
    }

    pub fn state(&self) -> &DemoState { &self.state }
    pub fn state_mut(&mut self) -> &mut DemoState { &mut self.state }
    pub fn config(&self) -> &DemoConfig { &self.config }
    pub fn seed(&self) -> u64 { self.seed }
    pub fn is_faulted(&self) -> bool { self.faulted }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> DemoConfig {
        DemoConfig { jitter: 0.0, heartbeat_every: 0, ..DemoConfig::default() }
    }

    #[test]
    fn test_initialize_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = DemoConfig::default();
        let state = DemoState::initialize(&config, &mut rng);
        assert_eq!(state.status(), SystemStatus::Initializing);
        assert_eq!(state.boxes().len(), 24);
        assert_eq!(state.grid().total_count(), 24);
        assert!(state.grid().cells.iter().all(|c| c.status == CellStatus::Normal));
        assert!(state.contacts().iter().all(|c| c.status == ContactStatus::Idle));
        assert_eq!(state.log().len(), 1);
        assert_eq!(state.log().latest().map(|e| e.kind), Some(LogKind::System));
        assert_eq!(invariants::check(&state, &config), Ok(()));
    }

    #[test]
    fn test_first_tick_leaves_initializing() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let config = quiet();
        let mut state = DemoState::initialize(&config, &mut rng);
        let report = state.step(&config, &mut rng);
        assert_eq!(report.previous_status, SystemStatus::Initializing);
        assert_ne!(state.status(), SystemStatus::Initializing);
        assert!(report.status_changed());
        assert_eq!(state.elapsed_ms(), 500);
        let kinds: Vec<_> = state.log().entries().map(|e| e.kind).collect();
        assert_eq!(kinds[1], LogKind::System);
    }

    #[test]
    fn test_pure_tick_does_not_touch_input() {
        let config = DemoConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let state = DemoState::initialize(&config, &mut rng);
        let before = serde_json::to_string(&state).unwrap();
        let next = tick(&state, &config, &mut rng);
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
        assert_eq!(next.tick(), 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = DemoConfig::default();
        let mut a = DashboardDemo::from_config(config.clone(), 99).unwrap();
        let mut b = DashboardDemo::from_config(config, 99).unwrap();
        for _ in 0..50 {
            assert_eq!(a.tick_core(), b.tick_core());
        }
        assert_eq!(a.state().boxes(), b.state().boxes());
    }

    #[test]
    fn test_surge_clusters_in_zone() {
        let config = quiet();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = DemoState::initialize(&config, &mut rng);
        state.surge(1, 2);
        assert!(state.boxes().iter().all(|b| b.x == 37.5 && b.y == 62.5));
        state.step(&config, &mut rng);
        let cell = state.grid().cell(1, 2).copied().unwrap();
        assert_eq!(cell.count, 24);
        assert_eq!(cell.status, CellStatus::Critical);
        assert_eq!(state.status(), SystemStatus::CriticalRisk);
    }

    #[test]
    fn test_fault_sets_error() {
        let config = DemoConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut state = DemoState::initialize(&config, &mut rng);
        state.fault("upload rejected");
        assert_eq!(state.status(), SystemStatus::Error);
        let last = state.log().latest().unwrap();
        assert_eq!(last.kind, LogKind::System);
        assert!(last.message.contains("upload rejected"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DemoConfig { grid_cols: 0, ..DemoConfig::default() };
        assert!(DashboardDemo::from_config(config, 1).is_err());
    }
}
