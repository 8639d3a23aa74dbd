//! Lifecycle states, scheduler events and actions, and session snapshots.

use serde::Serialize;
use sim_core::{GenerationError, GenerationOutput, GenerationRequest, SimulationParameters};
use std::time::Duration;

// =========================================================================
// Generation lifecycle
// =========================================================================

/// Lifecycle state of a generation request, and of the session as a whole.
///
/// The session state follows the most recently issued request, except that
/// a rejected parameter set moves it to `Failed` without issuing one and a
/// reset returns it to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GenerationState {
    /// Nothing scheduled, nothing committed.
    Idle,

    /// Parameters are being checked.
    Validating,

    /// Waiting for the debounce delay to elapse.
    Scheduled {
        /// Request id.
        request_id: u64,
    },

    /// Computation running in the background.
    Generating {
        /// Request id.
        request_id: u64,
    },

    /// Result is the visible one.
    Committed {
        /// Request id.
        request_id: u64,
    },

    /// A newer request (or a reset) took over before this one committed.
    Superseded {
        /// Request id.
        request_id: u64,
    },

    /// Validation or generation failed.
    Failed {
        /// Error description.
        message: String,
    },
}

impl GenerationState {
    /// Check if a computation is running.
    pub fn is_generating(&self) -> bool {
        matches!(self, GenerationState::Generating { .. })
    }

    /// Check if the state is terminal for a request.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationState::Committed { .. }
                | GenerationState::Superseded { .. }
                | GenerationState::Failed { .. }
        )
    }

    /// Check if nothing is pending: no debounce timer and no running computation.
    pub fn is_settled(&self) -> bool {
        !matches!(
            self,
            GenerationState::Validating
                | GenerationState::Scheduled { .. }
                | GenerationState::Generating { .. }
        )
    }

    /// Request id carried by the state, if any.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            GenerationState::Scheduled { request_id }
            | GenerationState::Generating { request_id }
            | GenerationState::Committed { request_id }
            | GenerationState::Superseded { request_id } => Some(*request_id),
            _ => None,
        }
    }
}

// =========================================================================
// Events and actions
// =========================================================================

/// Input to the session state machine.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// The session became active.
    Mounted,
    /// The user changed the parameter set.
    ParameterChanged(SimulationParameters),
    /// The user asked for a generation now.
    ManualGenerateRequested,
    /// A debounce timer fired.
    DebounceElapsed {
        /// Request the timer was armed for.
        request_id: u64,
    },
    /// A background computation returned.
    GenerationFinished {
        /// Request the computation ran for.
        request_id: u64,
        /// Computed output or the failure.
        outcome: Result<GenerationOutput, GenerationError>,
    },
    /// Clear committed data and invalidate in-flight work.
    Reset,
    /// Clear the visible error.
    ErrorDismissed,
}

/// Side effect requested by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerAction {
    /// Start a debounce timer that reports back with `DebounceElapsed`.
    ArmDebounce {
        /// Request to generate when the timer fires.
        request: GenerationRequest,
        /// Timer duration.
        delay: Duration,
    },
    /// Abort the pending debounce timer.
    CancelDebounce,
    /// Run a generation in the background and report back with `GenerationFinished`.
    StartGeneration(GenerationRequest),
}

// =========================================================================
// Observability
// =========================================================================

/// Running totals for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    /// Request ids issued.
    pub issued: u64,
    /// Computations started.
    pub started: u64,
    /// Results committed.
    pub committed: u64,
    /// Requests discarded in favour of newer work.
    pub superseded: u64,
    /// Validation or generation failures.
    pub failed: u64,
    /// Valid parameter changes dropped by the throttle window.
    pub throttled: u64,
}

/// Point-in-time view of a session, published after every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Session lifecycle state.
    pub state: GenerationState,
    /// Current (possibly uncommitted) parameters.
    pub parameters: SimulationParameters,
    /// Visible error message.
    pub error: Option<String>,
    /// Whether a computation for the current request is running.
    pub is_generating: bool,
    /// Highest request id issued so far (0 before the first).
    pub last_issued_id: u64,
    /// Id of the committed request, if any.
    pub committed_id: Option<u64>,
    /// Parameters of the committed request, if any.
    pub committed_parameters: Option<SimulationParameters>,
    /// Running totals.
    pub counters: SessionCounters,
}
