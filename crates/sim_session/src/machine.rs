//! Pure session state machine.
//!
//! [`SessionMachine::handle`] consumes one [`SchedulerEvent`] at a time and
//! returns the side effects the driver must perform. Time is passed in, so
//! every transition can be exercised without a runtime.
//!
//! # Request ids
//!
//! Each accepted parameter change, manual trigger or mount issues a new id,
//! one higher than the previous. The latest issued id is the only one
//! allowed to commit. A reset withdraws that permission, so whatever is in
//! flight at that point is discarded when it lands.

use chrono::{DateTime, Utc};
use sim_core::{
    first_error, ExportError, GenerationError, GenerationOutput, GenerationRequest,
    GenerationResult, SimulationParameters,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{SimulatorConfig, TimingConfig};
use crate::export::{ExportArtifact, Exporter};
use crate::state::{
    GenerationState, SchedulerAction, SchedulerEvent, SessionCounters, SessionSnapshot,
};

/// Delays applied by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerTiming {
    /// Quiet period after a parameter change before generating.
    pub debounce: Duration,
    /// Fixed delay before a generation starts computing.
    pub compute_delay: Duration,
    /// Parameter-driven generations closer than this to the last commit are dropped.
    pub throttle: Duration,
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        TimingConfig::default().to_timing()
    }
}

/// One entry of the request history.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    /// The issued request.
    pub request: GenerationRequest,
    /// Where the request is in its lifecycle.
    pub state: GenerationState,
}

/// Session state: parameters, committed result, request history.
#[derive(Debug)]
pub struct SessionMachine {
    timing: SchedulerTiming,
    history_limit: usize,
    parameters: SimulationParameters,
    state: GenerationState,
    error: Option<String>,
    mounted: bool,
    last_issued: u64,
    /// Request allowed to commit.
    accepted: Option<GenerationRequest>,
    /// Request waiting on the debounce timer.
    pending: Option<GenerationRequest>,
    committed: Option<Arc<GenerationResult>>,
    last_commit_at: Option<Instant>,
    history: BTreeMap<u64, RequestRecord>,
    counters: SessionCounters,
}

impl SessionMachine {
    /// Create a machine holding `parameters`, with nothing committed.
    pub fn new(
        parameters: SimulationParameters,
        timing: SchedulerTiming,
        history_limit: usize,
    ) -> Self {
        Self {
            timing,
            history_limit: history_limit.max(1),
            parameters,
            state: GenerationState::Idle,
            error: None,
            mounted: false,
            last_issued: 0,
            accepted: None,
            pending: None,
            committed: None,
            last_commit_at: None,
            history: BTreeMap::new(),
            counters: SessionCounters::default(),
        }
    }

    /// Create a machine from the simulator configuration.
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(
            config.parameters,
            config.timing.to_timing(),
            config.history_limit,
        )
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    /// Session lifecycle state.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// Current parameters (possibly not yet committed).
    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Visible error message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Committed result.
    pub fn committed(&self) -> Option<&Arc<GenerationResult>> {
        self.committed.as_ref()
    }

    /// Whether the current request is computing.
    pub fn is_generating(&self) -> bool {
        self.state.is_generating()
    }

    /// Highest id issued so far (0 before the first request).
    pub fn last_issued_id(&self) -> u64 {
        self.last_issued
    }

    /// Timing in effect.
    pub fn timing(&self) -> SchedulerTiming {
        self.timing
    }

    /// Lifecycle state of a request still held in the history.
    pub fn request_state(&self, request_id: u64) -> Option<&GenerationState> {
        self.history.get(&request_id).map(|r| &r.state)
    }

    /// Request history, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &RequestRecord> {
        self.history.values()
    }

    /// Running totals.
    pub fn counters(&self) -> SessionCounters {
        self.counters
    }

    /// Point-in-time view of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            parameters: self.parameters,
            error: self.error.clone(),
            is_generating: self.is_generating(),
            last_issued_id: self.last_issued,
            committed_id: self.committed.as_ref().map(|c| c.request.id),
            committed_parameters: self.committed.as_ref().map(|c| *c.parameters()),
            counters: self.counters,
        }
    }

    // =====================================================================
    // Transitions
    // =====================================================================

    /// Apply one event at time `now`, returning the side effects to perform.
    pub fn handle(&mut self, event: SchedulerEvent, now: Instant) -> Vec<SchedulerAction> {
        let mut actions = Vec::new();

        match event {
            SchedulerEvent::Mounted => {
                if self.mounted {
                    debug!("Repeated mount ignored");
                } else {
                    self.mounted = true;
                    if self.committed.is_none() {
                        self.start_immediate(&mut actions);
                    }
                }
            }

            SchedulerEvent::ParameterChanged(parameters) => {
                self.parameters = parameters;
                self.cancel_pending(&mut actions);
                self.state = GenerationState::Validating;

                if let Some(invalid) = first_error(&parameters) {
                    self.fail(invalid.message);
                } else {
                    self.error = None;
                    if self.is_throttled(now) {
                        self.counters.throttled += 1;
                        self.state = self.settled_state();
                        debug!(parameters = %parameters, "Parameter change throttled");
                    } else {
                        let request = self.issue(parameters);
                        self.pending = Some(request);
                        self.state = GenerationState::Scheduled {
                            request_id: request.id,
                        };
                        actions.push(SchedulerAction::ArmDebounce {
                            request,
                            delay: self.timing.debounce,
                        });
                        debug!(request_id = request.id, parameters = %parameters, "Generation scheduled");
                    }
                }
            }

            SchedulerEvent::ManualGenerateRequested => {
                self.cancel_pending(&mut actions);
                self.start_immediate(&mut actions);
            }

            SchedulerEvent::DebounceElapsed { request_id } => match self.pending {
                Some(request) if request.id == request_id => {
                    self.pending = None;
                    self.start(request, &mut actions);
                }
                _ => debug!(request_id, "Stale debounce timer ignored"),
            },

            SchedulerEvent::GenerationFinished {
                request_id,
                outcome,
            } => self.finish(request_id, outcome, now),

            SchedulerEvent::Reset => {
                self.cancel_pending(&mut actions);
                self.committed = None;
                self.last_commit_at = None;
                self.accepted = None;
                self.error = None;
                self.state = GenerationState::Idle;
                info!(last_issued_id = self.last_issued, "Session reset");
            }

            SchedulerEvent::ErrorDismissed => self.clear_error(),
        }

        actions
    }

    /// Export the committed result, updating the visible error.
    pub fn export(
        &mut self,
        exporter: &Exporter,
        timestamp: DateTime<Utc>,
    ) -> Result<ExportArtifact, ExportError> {
        let outcome = exporter.export_at(self.committed.as_deref(), timestamp);
        match &outcome {
            Ok(_) => self.clear_error(),
            Err(e) => {
                warn!(error = %e, "Export failed");
                self.error = Some(e.to_string());
            }
        }
        outcome
    }

    // =====================================================================
    // Internals
    // =====================================================================

    fn issue(&mut self, parameters: SimulationParameters) -> GenerationRequest {
        self.last_issued += 1;
        self.counters.issued += 1;

        let request = GenerationRequest::new(self.last_issued, parameters);
        self.accepted = Some(request);
        self.history.insert(
            request.id,
            RequestRecord {
                request,
                state: GenerationState::Scheduled {
                    request_id: request.id,
                },
            },
        );
        while self.history.len() > self.history_limit {
            self.history.pop_first();
        }
        request
    }

    fn start_immediate(&mut self, actions: &mut Vec<SchedulerAction>) {
        self.state = GenerationState::Validating;
        match first_error(&self.parameters) {
            Some(invalid) => self.fail(invalid.message),
            None => {
                self.error = None;
                let request = self.issue(self.parameters);
                self.start(request, actions);
            }
        }
    }

    fn start(&mut self, request: GenerationRequest, actions: &mut Vec<SchedulerAction>) {
        let generating = GenerationState::Generating {
            request_id: request.id,
        };
        self.set_request_state(request.id, generating.clone());
        self.state = generating;
        self.counters.started += 1;
        actions.push(SchedulerAction::StartGeneration(request));
        debug!(request_id = request.id, "Generation started");
    }

    fn finish(
        &mut self,
        request_id: u64,
        outcome: Result<GenerationOutput, GenerationError>,
        now: Instant,
    ) {
        let request = match self.accepted {
            Some(request) if request.id == request_id => request,
            _ => {
                self.set_request_state(request_id, GenerationState::Superseded { request_id });
                self.counters.superseded += 1;
                debug!(request_id, last_issued_id = self.last_issued, "Superseded result discarded");
                return;
            }
        };

        match outcome {
            Ok(output) => {
                self.committed = Some(Arc::new(GenerationResult {
                    request,
                    output,
                    committed_at: Utc::now(),
                }));
                self.last_commit_at = Some(now);
                self.error = None;

                let committed = GenerationState::Committed { request_id };
                self.set_request_state(request_id, committed.clone());
                self.state = committed;
                self.counters.committed += 1;
                info!(request_id, parameters = %request.parameters, "Generation committed");
            }
            Err(e) => {
                let message = e.to_string();
                self.set_request_state(
                    request_id,
                    GenerationState::Failed {
                        message: message.clone(),
                    },
                );
                self.fail(message);
            }
        }
    }

    fn cancel_pending(&mut self, actions: &mut Vec<SchedulerAction>) {
        if let Some(request) = self.pending.take() {
            self.set_request_state(
                request.id,
                GenerationState::Superseded {
                    request_id: request.id,
                },
            );
            self.counters.superseded += 1;
            actions.push(SchedulerAction::CancelDebounce);
            debug!(request_id = request.id, "Pending generation cancelled");
        }
    }

    fn fail(&mut self, message: String) {
        warn!(error = %message, "Generation failed");
        self.counters.failed += 1;
        self.error = Some(message.clone());
        self.state = GenerationState::Failed { message };
    }

    fn clear_error(&mut self) {
        self.error = None;
        if matches!(self.state, GenerationState::Failed { .. }) {
            self.state = self.settled_state();
        }
    }

    fn set_request_state(&mut self, request_id: u64, state: GenerationState) {
        if let Some(record) = self.history.get_mut(&request_id) {
            record.state = state;
        }
    }

    fn is_throttled(&self, now: Instant) -> bool {
        self.committed.is_some()
            && self
                .last_commit_at
                .is_some_and(|at| now.saturating_duration_since(at) <= self.timing.throttle)
    }

    /// State to show when no new request was issued.
    fn settled_state(&self) -> GenerationState {
        if let Some(request) = self.accepted {
            if let Some(record) = self.history.get(&request.id) {
                if !record.state.is_terminal() {
                    return record.state.clone();
                }
            }
        }
        match &self.committed {
            Some(result) => GenerationState::Committed {
                request_id: result.request.id,
            },
            None => GenerationState::Idle,
        }
    }
}
