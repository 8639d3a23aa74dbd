//! Configuration loading for the CLI
//!
//! The configuration file is optional. When it is absent the defaults are
//! used; `FBM_SIM_*` environment variables apply in both cases.

use sim_session::config::SimulatorConfig;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::Result;

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Loaded from this file
    File(PathBuf),
    /// File missing, built-in defaults used
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Load the configuration from `path` (if it exists) and apply environment overrides.
///
/// The result is not validated; callers decide when to validate.
pub fn load(path: &Path) -> Result<(SimulatorConfig, ConfigSource)> {
    let (config, source) = if path.exists() {
        (
            SimulatorConfig::load(path)?,
            ConfigSource::File(path.to_path_buf()),
        )
    } else {
        (SimulatorConfig::default(), ConfigSource::Defaults)
    };
    Ok((config.with_env_override(), source))
}
