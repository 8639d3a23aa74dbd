//! Simulator configuration management.
//!
//! Handles loading of the simulator configuration from TOML files with
//! environment variable override support (`FBM_SIM_*`).

use serde::{Deserialize, Serialize};
use sim_core::{validate, SimulationParameters};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::machine::SchedulerTiming;

/// Configuration file used when none is named explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "fbm-sim.toml";

/// Upper bound accepted for any of the timing values, in milliseconds.
const MAX_TIMING_MS: u64 = 60_000;

/// Upper bound accepted for the request history size.
const MAX_HISTORY_LIMIT: usize = 10_000;

/// Scheduler timing section (`[timing]`).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimingConfig {
    /// Quiet period after a parameter change before generating (ms)
    pub debounce_ms: u64,
    /// Fixed delay before the computation of a generation starts (ms)
    pub compute_delay_ms: u64,
    /// Minimum spacing between parameter-driven generations (ms)
    pub throttle_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            compute_delay_ms: 100,
            throttle_ms: 2000,
        }
    }
}

impl TimingConfig {
    /// Convert into the durations used by the scheduler.
    pub fn to_timing(&self) -> SchedulerTiming {
        SchedulerTiming {
            debounce: Duration::from_millis(self.debounce_ms),
            compute_delay: Duration::from_millis(self.compute_delay_ms),
            throttle: Duration::from_millis(self.throttle_ms),
        }
    }
}

/// Simulator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulatorConfig {
    /// Initial simulation parameters (`[parameters]`)
    #[serde(default)]
    pub parameters: SimulationParameters,

    /// Scheduler timing (`[timing]`)
    #[serde(default)]
    pub timing: TimingConfig,

    /// Fixed seed for the Gaussian source; entropy-seeded when absent
    pub seed: Option<u64>,

    /// Directory that receives exported CSV files
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of request records kept in the session history
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Compute R/S and DFA Hurst estimates for every generation
    #[serde(default = "default_estimate_hurst")]
    pub estimate_hurst: bool,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("./exports")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_history_limit() -> usize {
    32
}

fn default_estimate_hurst() -> bool {
    true
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            parameters: SimulationParameters::default(),
            timing: TimingConfig::default(),
            seed: None,
            export_dir: default_export_dir(),
            log_level: default_log_level(),
            history_limit: default_history_limit(),
            estimate_hurst: default_estimate_hurst(),
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn with_env_override(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Keys are the `FBM_SIM_*` environment variable names. Values that
    /// fail to parse leave the current setting unchanged.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hurst) = lookup("FBM_SIM_HURST").and_then(|v| v.parse().ok()) {
            self.parameters.hurst = hurst;
        }

        if let Some(num_points) = lookup("FBM_SIM_NUM_POINTS").and_then(|v| v.parse().ok()) {
            self.parameters.num_points = num_points;
        }

        if let Some(time_length) = lookup("FBM_SIM_TIME_LENGTH").and_then(|v| v.parse().ok()) {
            self.parameters.time_length = time_length;
        }

        if let Some(ms) = lookup("FBM_SIM_DEBOUNCE_MS").and_then(|v| v.parse().ok()) {
            self.timing.debounce_ms = ms;
        }

        if let Some(ms) = lookup("FBM_SIM_COMPUTE_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.timing.compute_delay_ms = ms;
        }

        if let Some(ms) = lookup("FBM_SIM_THROTTLE_MS").and_then(|v| v.parse().ok()) {
            self.timing.throttle_ms = ms;
        }

        if let Some(seed) = lookup("FBM_SIM_SEED") {
            self.seed = seed.parse().ok();
        }

        if let Some(export_dir) = lookup("FBM_SIM_EXPORT_DIR") {
            self.export_dir = PathBuf::from(export_dir);
        }

        if let Some(log_level) = lookup("FBM_SIM_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(enabled) = lookup("FBM_SIM_ESTIMATE_HURST").and_then(|v| v.parse().ok()) {
            self.estimate_hurst = enabled;
        }

        self
    }

    /// Validate the configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.log_level, valid_log_levels
            ));
        }

        for (name, value) in [
            ("timing.debounce_ms", self.timing.debounce_ms),
            ("timing.compute_delay_ms", self.timing.compute_delay_ms),
            ("timing.throttle_ms", self.timing.throttle_ms),
        ] {
            if value > MAX_TIMING_MS {
                errors.push(format!(
                    "{} {} exceeds maximum allowed ({})",
                    name, value, MAX_TIMING_MS
                ));
            }
        }

        if self.history_limit == 0 {
            errors.push("history_limit must be greater than 0".to_string());
        }
        if self.history_limit > MAX_HISTORY_LIMIT {
            errors.push(format!(
                "history_limit {} exceeds maximum allowed ({})",
                self.history_limit, MAX_HISTORY_LIMIT
            ));
        }

        if self.export_dir.as_os_str().is_empty() {
            errors.push("export_dir cannot be empty".to_string());
        }

        errors.extend(
            validate(&self.parameters)
                .into_iter()
                .map(|e| format!("parameters.{}", e)),
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error in the config file
    #[error("Parse error: {0}")]
    Parse(String),

    /// One or more invalid settings
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
