// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine ("Dashboard Demo")

pub mod types;
pub mod config;
pub mod motion;
pub mod density;
pub mod status;
pub mod event_log;
pub mod dispatch;
pub mod invariants;
pub mod simulation;

pub use types::*;
pub use config::{ConfigError, ContactSpec, DemoConfig};
pub use simulation::{DashboardDemo, DemoState};

use wasm_bindgen::prelude::*;

fn install_hooks() {
    #[cfg(target_arch = "wasm32")]
    {
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));
        // A second mount on the same page keeps the first subscriber.
        let _ = tracing_wasm::try_set_as_global_default();
    }
}

// ─── WASM Interface ──────────────────────────────────────────────────────────

#[wasm_bindgen]
impl DashboardDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        install_hooks();
        DashboardDemo::mount(DemoConfig::default(), seed)
    }

    /// Build from a partial config object; missing fields take defaults.
    pub fn with_config(config: JsValue, seed: u64) -> Result<DashboardDemo, JsError> {
        install_hooks();
        let config: DemoConfig = if config.is_undefined() || config.is_null() {
            DemoConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        Ok(DashboardDemo::from_config(config, seed)?)
    }

    /// Timer callback: advance once (if running) and return the new frame.
    pub fn tick(&mut self) -> JsValue {
        self.tick_core();
        self.snapshot()
    }

    pub fn snapshot(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.snapshot_core()).unwrap_or(JsValue::NULL)
    }

    /// Resume ticking. Refused while a reported fault is outstanding.
    pub fn start(&mut self) -> bool {
        if self.faulted {
            tracing::warn!("start refused: engine faulted, reset first");
            return false;
        }
        self.running = true;
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Discard everything and mount again. The random stream continues, so a
    /// whole session stays reproducible from the original seed.
    pub fn reset(&mut self) {
        self.state = DemoState::initialize(&self.config, &mut self.rng);
        self.running = true;
        self.faulted = false;
        tracing::info!("dashboard demo reset (seed {})", self.seed);
    }

    /// Demo control: send the whole crowd into one zone.
    pub fn trigger_surge(&mut self, col: u32, row: u32) {
        if self.faulted {
            return;
        }
        self.state.surge(col, row);
    }

    /// Host-side failure (e.g. a rejected upload). Stops the engine.
    pub fn report_fault(&mut self, message: &str) {
        self.state.fault(message);
        self.running = false;
        self.faulted = true;
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.config.tick_interval_ms
    }

    pub fn get_boxes(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.state.boxes()).unwrap_or(JsValue::NULL)
    }

    pub fn get_grid(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.state.grid()).unwrap_or(JsValue::NULL)
    }

    pub fn get_log(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.state.log().to_vec()).unwrap_or(JsValue::NULL)
    }

    pub fn get_contacts(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.state.contacts()).unwrap_or(JsValue::NULL)
    }

    pub fn get_status(&self) -> String {
        self.state.status().label().to_string()
    }

    /// Run N ticks without returning frames (fast-forward)
    pub fn run_batch(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick_core();
        }
    }
}
