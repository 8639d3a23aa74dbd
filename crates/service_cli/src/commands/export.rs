//! Export command implementation
//!
//! Generates one set of paths and writes the CSV artifact.

use sim_session::config::SimulatorConfig;
use std::path::PathBuf;
use tracing::info;

use crate::Result;

/// Run the export command
pub async fn run(config: SimulatorConfig, output_dir: Option<PathBuf>) -> Result<()> {
    let (scheduler, committed) = super::generate_once(&config).await?;

    let artifact = scheduler.export()?;
    let dir = output_dir.unwrap_or_else(|| config.export_dir.clone());
    let path = artifact.write_to(&dir)?;

    info!(
        request_id = committed.request.id,
        points = committed.series().len(),
        "Export complete"
    );
    println!("{}", path.display());
    Ok(())
}
