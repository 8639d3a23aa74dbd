//! # sim_session: Generation Scheduling and Export (Layer 3)
//!
//! Coordinates path generation for one interactive session:
//! - [`config`]: TOML configuration with environment overrides
//! - [`state`]: Lifecycle states, events, actions and snapshots
//! - [`machine`]: Pure state machine (validation, debounce, throttle, compare-and-commit)
//! - [`scheduler`]: Tokio driver running debounce timers and background generations
//! - [`export`]: CSV artifact of the committed paths
//!
//! ## Commit Rule
//!
//! Every accepted parameter change or manual trigger issues a request with
//! a strictly increasing id. A finished generation commits only if its id
//! is still the accepted one; the comparison and the commit happen under
//! the same lock. Older results are discarded as superseded.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sim_core::SimulationParameters;
//! use sim_paths::PathEngine;
//! use sim_session::config::SimulatorConfig;
//! use sim_session::scheduler::GenerationScheduler;
//!
//! # async fn run() {
//! let scheduler = GenerationScheduler::new(&SimulatorConfig::default(), PathEngine::from_entropy());
//! scheduler.mount();
//! scheduler.set_parameters(SimulationParameters::default().with_hurst(0.7));
//!
//! let snapshot = scheduler.wait_until_settled().await;
//! println!("{:?}", snapshot.state);
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod export;
pub mod machine;
pub mod scheduler;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigError, SimulatorConfig, TimingConfig};
    pub use crate::export::{ExportArtifact, Exporter};
    pub use crate::machine::{SchedulerTiming, SessionMachine};
    pub use crate::scheduler::GenerationScheduler;
    pub use crate::state::{
        GenerationState, SchedulerAction, SchedulerEvent, SessionCounters, SessionSnapshot,
    };
}
