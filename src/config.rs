// Copyright 2026 Hypermesh Foundation. All rights reserved.
// STASY Crowd Safety Demo Engine - Configuration

//! Tunables for the dashboard demo.
//!
//! Grid resolution, density thresholds, motion limits, log cap and the
//! responder roster all live here so the page (or the replay runner) can
//! override them without touching the tick logic.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating a [`DemoConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("grid must have at least one column and one row (got {cols}x{rows})")]
    EmptyGrid { cols: u32, rows: u32 },
    #[error("high threshold must be at least 1")]
    ZeroHighThreshold,
    #[error("thresholds must satisfy high < critical <= risk (got {high}, {critical}, {risk})")]
    ThresholdOrder { high: u32, critical: u32, risk: u32 },
    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidSpeed { field: &'static str, value: f64 },
    #[error("log capacity must be at least 1")]
    ZeroLogCapacity,
    #[error("tick interval must be at least 1 ms")]
    ZeroTickInterval,
    #[error("contact #{index} has an empty role")]
    EmptyRole { index: usize },
    #[error("contact '{role}' has an inverted ETA range {min}..{max}")]
    EtaRange { role: String, min: u32, max: u32 },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// ContactSpec
// ---------------------------------------------------------------------------

/// One responder role on the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactSpec {
    pub role: String,
    /// Inclusive range the simulated ETA is drawn from once dispatched.
    pub eta_minutes: [u32; 2],
}

impl ContactSpec {
    pub fn new(role: &str, min: u32, max: u32) -> Self {
        Self { role: role.to_string(), eta_minutes: [min, max] }
    }
}

pub fn default_contacts() -> Vec<ContactSpec> {
    vec![
        ContactSpec::new("Police Control", 3, 6),
        ContactSpec::new("Medical Response", 4, 8),
        ContactSpec::new("Fire & Rescue", 6, 10),
        ContactSpec::new("Venue Security", 1, 3),
    ]
}

// ---------------------------------------------------------------------------
// DemoConfig
// ---------------------------------------------------------------------------

/// Simulator configuration. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of tracked people. Zero is allowed (empty venue).
    pub box_count: u32,
    pub grid_cols: u32,
    pub grid_rows: u32,
    /// `count >= high_threshold` marks a cell HIGH.
    pub high_threshold: u32,
    /// `count >= critical_threshold` marks a cell CRITICAL.
    pub critical_threshold: u32,
    /// A lone critical cell at or above this count is a CRITICAL RISK.
    pub risk_threshold: u32,
    /// Largest initial velocity component, in percent per tick.
    pub initial_speed: f64,
    /// Velocity magnitude cap.
    pub max_speed: f64,
    /// Largest per-tick perturbation applied to each velocity component.
    pub jitter: f64,
    pub log_capacity: usize,
    pub tick_interval_ms: u32,
    /// Emit a heartbeat log line every N ticks; 0 disables it.
    pub heartbeat_every: u32,
    pub contacts: Vec<ContactSpec>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            box_count: 24,
            grid_cols: 4,
            grid_rows: 4,
            high_threshold: 4,
            critical_threshold: 7,
            risk_threshold: 10,
            initial_speed: 0.8,
            max_speed: 1.5,
            jitter: 0.12,
            log_capacity: 40,
            tick_interval_ms: 500,
            heartbeat_every: 20,
            contacts: default_contacts(),
        }
    }
}

impl DemoConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_cols == 0 || self.grid_rows == 0 {
            return Err(ConfigError::EmptyGrid { cols: self.grid_cols, rows: self.grid_rows });
        }
        if self.high_threshold == 0 {
            return Err(ConfigError::ZeroHighThreshold);
        }
        if self.high_threshold >= self.critical_threshold
            || self.critical_threshold > self.risk_threshold
        {
            return Err(ConfigError::ThresholdOrder {
                high: self.high_threshold,
                critical: self.critical_threshold,
                risk: self.risk_threshold,
            });
        }
        for (field, value) in [
            ("initial_speed", self.initial_speed),
            ("max_speed", self.max_speed),
            ("jitter", self.jitter),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidSpeed { field, value });
            }
        }
        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        for (index, contact) in self.contacts.iter().enumerate() {
            if contact.role.trim().is_empty() {
                return Err(ConfigError::EmptyRole { index });
            }
            let [min, max] = contact.eta_minutes;
            if min > max {
                return Err(ConfigError::EtaRange { role: contact.role.clone(), min, max });
            }
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.grid_cols as usize * self.grid_rows as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DemoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cell_count(), 16);
        assert_eq!(config.contacts.len(), 4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DemoConfig::from_json(r#"{ "box_count": 0, "grid_cols": 2 }"#).unwrap();
        assert_eq!(config.box_count, 0);
        assert_eq!(config.grid_cols, 2);
        assert_eq!(config.grid_rows, 4);
        assert_eq!(config.log_capacity, 40);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = DemoConfig { grid_rows: 0, ..DemoConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyGrid { cols: 4, rows: 0 })));
    }

    #[test]
    fn test_rejects_threshold_order() {
        let config = DemoConfig { high_threshold: 7, critical_threshold: 7, ..DemoConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ThresholdOrder { .. })));

        let config = DemoConfig { risk_threshold: 5, ..DemoConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ThresholdOrder { .. })));

        let config = DemoConfig { high_threshold: 0, ..DemoConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroHighThreshold)));
    }

    #[test]
    fn test_rejects_bad_speed() {
        let config = DemoConfig { max_speed: f64::NAN, ..DemoConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpeed { field: "max_speed", .. })
        ));
        let config = DemoConfig { jitter: -0.1, ..DemoConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_caps() {
        let config = DemoConfig { log_capacity: 0, ..DemoConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLogCapacity)));
        let config = DemoConfig { tick_interval_ms: 0, ..DemoConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTickInterval)));
    }

    #[test]
    fn test_rejects_bad_contacts() {
        let mut config = DemoConfig::default();
        config.contacts.push(ContactSpec::new("  ", 1, 2));
        assert!(matches!(config.validate(), Err(ConfigError::EmptyRole { index: 4 })));

        let config = DemoConfig {
            contacts: vec![ContactSpec::new("Medical Response", 9, 2)],
            ..DemoConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EtaRange { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let err = DemoConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("invalid config JSON"));
    }
}
