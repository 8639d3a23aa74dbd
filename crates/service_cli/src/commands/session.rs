//! Session command implementation
//!
//! Line-oriented interactive session. Each input line becomes one scheduler
//! event, so parameter edits are debounced and throttled exactly as in a
//! live control panel. State changes are printed as they are published.

use sim_core::types::params::{HURST_PRESETS, NUM_POINTS_CHOICES, TIME_LENGTH_PRESETS};
use sim_session::config::SimulatorConfig;
use sim_session::scheduler::GenerationScheduler;
use sim_session::state::{GenerationState, SessionSnapshot};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::{CliError, Result};

const HELP: &str = "\
Commands:
  hurst <h>        set the Hurst exponent (0.1 - 0.9)
  points <n>       set the number of points (128 - 4096)
  length <t>       set the time horizon (0 - 20]
  preset <name>    anti-persistent | random-walk | persistent
  resolution <n>   pick a preset point count (see 'presets')
  length-preset <t> pick a preset time horizon (see 'presets')
  presets          list the preset values
  generate         generate now, skipping the debounce delay
  reset            clear committed paths
  export [dir]     write the committed paths as CSV
  status           print the session state
  dismiss          clear the visible error
  help             show this help
  quit             leave the session";

/// One parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Set the Hurst exponent
    Hurst(f64),
    /// Set the number of points
    Points(usize),
    /// Set the time horizon
    Length(f64),
    /// Generate immediately
    Generate,
    /// Clear committed data
    Reset,
    /// Export, optionally into a specific directory
    Export(Option<PathBuf>),
    /// Print the current snapshot
    Status,
    /// Clear the visible error
    Dismiss,
    /// List the preset values
    Presets,
    /// Print the help text
    Help,
    /// End the session
    Quit,
}

/// Hurst exponent of a named preset
pub fn preset_hurst(name: &str) -> Option<f64> {
    let [anti, random, persistent] = HURST_PRESETS;
    match name {
        "anti-persistent" | "anti" => Some(anti),
        "random-walk" | "random" | "brownian" => Some(random),
        "persistent" | "trending" => Some(persistent),
        _ => None,
    }
}

/// Render the preset values offered by `preset`, `resolution` and `length-preset`
pub fn render_presets() -> String {
    let join = |values: Vec<String>| values.join(", ");
    format!(
        "Hurst: {}\nPoints: {}\nTime length: {}",
        join(HURST_PRESETS.iter().map(|h| h.to_string()).collect()),
        join(NUM_POINTS_CHOICES.iter().map(|n| n.to_string()).collect()),
        join(TIME_LENGTH_PRESETS.iter().map(|t| t.to_string()).collect()),
    )
}

/// Parse one input line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let argument = words.next();

    let command = match verb.to_lowercase().as_str() {
        "hurst" | "h" => SessionCommand::Hurst(parse_number(verb, argument)?),
        "points" | "n" => SessionCommand::Points(parse_number(verb, argument)?),
        "length" | "t" => SessionCommand::Length(parse_number(verb, argument)?),
        "preset" => {
            let name = argument.ok_or_else(|| missing_argument(verb))?;
            let hurst = preset_hurst(name).ok_or_else(|| {
                CliError::InvalidArgument(format!(
                    "Unknown preset: {}. Supported: anti-persistent, random-walk, persistent",
                    name
                ))
            })?;
            SessionCommand::Hurst(hurst)
        }
        "resolution" => {
            let points: usize = parse_number(verb, argument)?;
            if !NUM_POINTS_CHOICES.contains(&points) {
                return Err(not_a_preset(verb, points));
            }
            SessionCommand::Points(points)
        }
        "length-preset" => {
            let length: f64 = parse_number(verb, argument)?;
            if !TIME_LENGTH_PRESETS.contains(&length) {
                return Err(not_a_preset(verb, length));
            }
            SessionCommand::Length(length)
        }
        "presets" => SessionCommand::Presets,
        "generate" | "g" => SessionCommand::Generate,
        "reset" => SessionCommand::Reset,
        "export" => SessionCommand::Export(argument.map(PathBuf::from)),
        "status" | "s" => SessionCommand::Status,
        "dismiss" => SessionCommand::Dismiss,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" | "q" => SessionCommand::Quit,
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown command: {}. Type 'help' for a list",
                other
            )))
        }
    };
    Ok(Some(command))
}

fn parse_number<T: std::str::FromStr>(verb: &str, argument: Option<&str>) -> Result<T> {
    let raw = argument.ok_or_else(|| missing_argument(verb))?;
    raw.parse()
        .map_err(|_| CliError::InvalidArgument(format!("'{}' expects a number, got '{}'", verb, raw)))
}

fn not_a_preset(verb: &str, value: impl std::fmt::Display) -> CliError {
    CliError::InvalidArgument(format!(
        "{} is not a '{}' choice. Type 'presets' for a list",
        value, verb
    ))
}

fn missing_argument(verb: &str) -> CliError {
    CliError::InvalidArgument(format!("'{}' expects an argument", verb))
}

/// One-line rendering of a snapshot
pub fn render_status(snapshot: &SessionSnapshot) -> String {
    let state = match &snapshot.state {
        GenerationState::Idle => "idle".to_string(),
        GenerationState::Validating => "validating".to_string(),
        GenerationState::Scheduled { request_id } => format!("scheduled #{}", request_id),
        GenerationState::Generating { request_id } => format!("generating #{}", request_id),
        GenerationState::Committed { request_id } => format!("committed #{}", request_id),
        GenerationState::Superseded { request_id } => format!("superseded #{}", request_id),
        GenerationState::Failed { .. } => "failed".to_string(),
    };

    let mut line = format!("[{}] {}", state, snapshot.parameters);
    if let Some(committed) = &snapshot.committed_parameters {
        if committed != &snapshot.parameters {
            line.push_str(&format!(" (showing {})", committed));
        }
    }
    if let Some(error) = &snapshot.error {
        line.push_str(&format!(" error: {}", error));
    }
    line
}

/// Apply one command; returns `false` when the session should end
fn apply(
    scheduler: &GenerationScheduler,
    command: SessionCommand,
    export_dir: &std::path::Path,
) -> bool {
    match command {
        SessionCommand::Hurst(hurst) => scheduler.set_hurst(hurst),
        SessionCommand::Points(points) => scheduler.set_num_points(points),
        SessionCommand::Length(length) => scheduler.set_time_length(length),
        SessionCommand::Generate => scheduler.generate(),
        SessionCommand::Reset => scheduler.reset(),
        SessionCommand::Export(dir) => {
            let dir = dir.unwrap_or_else(|| export_dir.to_path_buf());
            match scheduler.export().and_then(|artifact| artifact.write_to(&dir)) {
                Ok(path) => println!("exported {}", path.display()),
                Err(e) => println!("export failed: {}", e),
            }
        }
        SessionCommand::Status => println!("{}", render_status(&scheduler.snapshot())),
        SessionCommand::Dismiss => scheduler.dismiss_error(),
        SessionCommand::Presets => println!("{}", render_presets()),
        SessionCommand::Help => println!("{}", HELP),
        SessionCommand::Quit => return false,
    }
    true
}

/// Run the session command
pub async fn run(config: SimulatorConfig) -> Result<()> {
    config.validate()?;
    info!(parameters = %config.parameters, "Starting interactive session");

    // The status line never shows Hurst estimates
    let scheduler = GenerationScheduler::from_config(&SimulatorConfig {
        estimate_hurst: false,
        ..config.clone()
    });

    // Print every settled state change
    let mut updates = scheduler.subscribe();
    let printer = tokio::spawn(async move {
        let mut last_printed: Option<GenerationState> = None;
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            if snapshot.state.is_settled() && last_printed.as_ref() != Some(&snapshot.state) {
                println!("{}", render_status(&snapshot));
                last_printed = Some(snapshot.state);
            }
        }
    });

    println!("{}", HELP);
    scheduler.mount();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Some(command)) => {
                if !apply(&scheduler, command, &config.export_dir) {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Rejected input");
                println!("{}", e);
            }
        }
    }

    printer.abort();
    let counters = scheduler.snapshot().counters;
    info!(
        issued = counters.issued,
        committed = counters.committed,
        superseded = counters.superseded,
        throttled = counters.throttled,
        "Session ended"
    );
    Ok(())
}
