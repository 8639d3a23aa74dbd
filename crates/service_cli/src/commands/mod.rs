//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod check;
pub mod export;
pub mod generate;
pub mod session;

use sim_core::GenerationResult;
use sim_session::config::SimulatorConfig;
use sim_session::scheduler::GenerationScheduler;
use std::sync::Arc;
use tracing::info;

use crate::{CliError, Result};

/// Validate `config`, mount a session and wait for its first commit.
async fn generate_once(
    config: &SimulatorConfig,
) -> Result<(GenerationScheduler, Arc<GenerationResult>)> {
    config.validate()?;
    info!(parameters = %config.parameters, seed = ?config.seed, "Generating paths");

    let scheduler = GenerationScheduler::from_config(config);
    scheduler.mount();
    let snapshot = scheduler.wait_until_settled().await;

    if let Some(message) = snapshot.error {
        return Err(CliError::Generation(message));
    }
    let committed = scheduler
        .committed()
        .ok_or_else(|| CliError::Generation("no result was committed".to_string()))?;
    Ok((scheduler, committed))
}
