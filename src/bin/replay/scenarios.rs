// Scenario Definitions
// Each scenario is a config plus optional scripted host events

use stasy_engine::{DashboardDemo, DemoConfig, SystemStatus};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub ticks: u64,
    pub config: DemoConfig,
    pub criteria: PassCriteria,
    /// Host events before a given tick (surge buttons, faults, resets)
    pub mid_event: Option<Box<dyn Fn(&mut DashboardDemo, u64) + Send + Sync>>,
}

pub struct PassCriteria {
    /// At least one responder dispatched by the end
    pub require_dispatch: bool,
    /// No responder may ever be dispatched
    pub forbid_dispatch: bool,
    /// First dispatch must land within this many ticks of the given tick
    pub dispatch_within: Option<(u64, u64)>,
    pub final_status: Option<SystemStatus>,
    pub forbid_error_at_end: bool,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            require_dispatch: false,
            forbid_dispatch: false,
            dispatch_within: None,
            final_status: None,
            forbid_error_at_end: true,
        }
    }
}

// ─── Scenario List ──────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "CALM_FLOOR",
            label: "Calm floor (8 people)",
            ticks: 400,
            config: DemoConfig { box_count: 8, ..DemoConfig::default() },
            criteria: PassCriteria { forbid_dispatch: true, ..PassCriteria::default() },
            mid_event: None,
        },
        Scenario {
            name: "EMPTY_VENUE",
            label: "Empty venue",
            ticks: 50,
            config: DemoConfig { box_count: 0, ..DemoConfig::default() },
            criteria: PassCriteria {
                forbid_dispatch: true,
                final_status: Some(SystemStatus::Normal),
                ..PassCriteria::default()
            },
            mid_event: None,
        },
        Scenario {
            name: "STAGE_RUSH",
            label: "Stage rush at tick 30",
            ticks: 120,
            config: DemoConfig::default(),
            criteria: PassCriteria {
                require_dispatch: true,
                dispatch_within: Some((30, 2)),
                ..PassCriteria::default()
            },
            mid_event: Some(Box::new(|demo: &mut DashboardDemo, tick: u64| {
                if tick == 30 {
                    demo.trigger_surge(1, 0);
                }
            })),
        },
        Scenario {
            name: "DENSE_FESTIVAL",
            label: "Dense festival (120 people)",
            ticks: 200,
            config: DemoConfig { box_count: 120, ..DemoConfig::default() },
            criteria: PassCriteria { require_dispatch: true, ..PassCriteria::default() },
            mid_event: None,
        },
        Scenario {
            name: "FAULT_RECOVERY",
            label: "Upload fault then reset",
            ticks: 100,
            config: DemoConfig::default(),
            criteria: PassCriteria::default(),
            mid_event: Some(Box::new(|demo: &mut DashboardDemo, tick: u64| {
                match tick {
                    20 => demo.report_fault("footage upload rejected"),
                    25 => {
                        // Must stay stopped until the reset below
                        demo.start();
                    }
                    30 => demo.reset(),
                    _ => {}
                }
            })),
        },
    ]
}
