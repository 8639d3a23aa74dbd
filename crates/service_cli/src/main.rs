//! fbm-sim - Command Line Front End for the Fractional Path Simulator
//!
//! # Commands
//!
//! - `fbm-sim generate` - Generate three fractional paths and print their statistics
//! - `fbm-sim export` - Generate and write the CSV artifact
//! - `fbm-sim session` - Interactive session driven by stdin, with debounce and throttling
//! - `fbm-sim check` - Show and validate the effective configuration
//!
//! # Architecture
//!
//! As the **S**ervice layer, this crate wires configuration, the path engine
//! and the session scheduler together behind a command-line interface.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

use sim_session::config::SimulatorConfig;

/// Fractional Brownian motion path simulator
#[derive(Parser)]
#[command(name = "fbm-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = sim_session::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Parameter overrides shared by the one-shot commands
#[derive(Args, Debug, Clone, Default)]
pub struct ParameterArgs {
    /// Hurst exponent in [0.1, 0.9]
    #[arg(long)]
    pub hurst: Option<f64>,

    /// Number of points per path in [128, 4096]
    #[arg(short = 'n', long)]
    pub num_points: Option<usize>,

    /// Time horizon in (0, 20]
    #[arg(short = 't', long)]
    pub time_length: Option<f64>,

    /// Seed for reproducible paths
    #[arg(short, long)]
    pub seed: Option<u64>,
}

impl ParameterArgs {
    /// Apply the overrides on top of the configuration
    pub fn apply(&self, mut config: SimulatorConfig) -> SimulatorConfig {
        if let Some(hurst) = self.hurst {
            config.parameters.hurst = hurst;
        }
        if let Some(num_points) = self.num_points {
            config.parameters.num_points = num_points;
        }
        if let Some(time_length) = self.time_length {
            config.parameters.time_length = time_length;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config
    }
}

/// Output format of the generate command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Box-drawn table
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate three paths and print their statistics
    Generate {
        #[command(flatten)]
        parameters: ParameterArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Also project each path onto a geometric price path starting here
        #[arg(long)]
        initial_price: Option<f64>,
    },

    /// Generate three paths and write them as CSV
    Export {
        #[command(flatten)]
        parameters: ParameterArgs,

        /// Output directory (defaults to the configured export_dir)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Interactive session reading commands from stdin
    Session {
        /// Seed for reproducible paths
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Check the effective configuration
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = config::load(&cli.config)?;

    // Initialise tracing
    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }
    info!(source = %source, "Configuration loaded");

    match cli.command {
        Commands::Generate {
            parameters,
            format,
            initial_price,
        } => commands::generate::run(parameters.apply(config), format, initial_price).await?,
        Commands::Export {
            parameters,
            output_dir,
        } => commands::export::run(parameters.apply(config), output_dir).await?,
        Commands::Session { seed } => {
            let config = ParameterArgs {
                seed,
                ..ParameterArgs::default()
            }
            .apply(config);
            commands::session::run(config).await?
        }
        Commands::Check => commands::check::run(&config, &source)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "fbm-sim", "generate", "--hurst", "0.7", "-n", "1024", "--format", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate {
                parameters, format, ..
            } => {
                assert_eq!(parameters.hurst, Some(0.7));
                assert_eq!(parameters.num_points, Some(1024));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected generate command"),
        }
        assert_eq!(cli.config, PathBuf::from("fbm-sim.toml"));
    }

    #[test]
    fn test_parameter_args_apply() {
        let args = ParameterArgs {
            hurst: Some(0.3),
            time_length: Some(5.0),
            seed: Some(9),
            ..ParameterArgs::default()
        };
        let config = args.apply(SimulatorConfig::default());

        assert_eq!(config.parameters.hurst, 0.3);
        assert_eq!(config.parameters.num_points, 512);
        assert_eq!(config.parameters.time_length, 5.0);
        assert_eq!(config.seed, Some(9));
    }
}
