//! Check command implementation
//!
//! Prints the effective configuration and validates it.

use sim_session::config::SimulatorConfig;
use tracing::info;

use crate::config::ConfigSource;
use crate::Result;

/// Run the check command
pub fn run(config: &SimulatorConfig, source: &ConfigSource) -> Result<()> {
    info!("Checking configuration...");

    println!("Configuration source: {}", source);
    println!("  Parameters:        {}", config.parameters);
    println!("  Debounce:          {} ms", config.timing.debounce_ms);
    println!("  Compute delay:     {} ms", config.timing.compute_delay_ms);
    println!("  Throttle:          {} ms", config.timing.throttle_ms);
    println!(
        "  Seed:              {}",
        config
            .seed
            .map_or_else(|| "entropy".to_string(), |s| s.to_string())
    );
    println!("  Export directory:  {}", config.export_dir.display());
    println!("  Log level:         {}", config.log_level);
    println!("  History limit:     {}", config.history_limit);
    println!("  Hurst estimates:   {}", config.estimate_hurst);

    config.validate()?;
    println!("Configuration OK");
    Ok(())
}
