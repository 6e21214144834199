#![cfg(target_arch = "wasm32")]

use stasy_engine::DashboardDemo;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn tick_returns_frame_object() {
    let mut demo = DashboardDemo::new(3);
    let frame = demo.tick();
    assert!(frame.is_object());
    assert!(!demo.get_status().is_empty());
}

#[wasm_bindgen_test]
fn with_config_accepts_undefined() {
    let demo = DashboardDemo::with_config(JsValue::UNDEFINED, 1).ok().expect("default config");
    assert_eq!(demo.tick_interval_ms(), 500);
}
