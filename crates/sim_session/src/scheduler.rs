//! Async driver for the session state machine.
//!
//! [`GenerationScheduler`] owns a [`SessionMachine`] behind a mutex and
//! performs the actions it returns:
//!
//! - `ArmDebounce` spawns a timer task that reports `DebounceElapsed`;
//!   the previous timer is aborted
//! - `CancelDebounce` aborts the pending timer
//! - `StartGeneration` spawns a task that waits the compute delay, runs the
//!   path engine on the blocking pool and reports `GenerationFinished`
//!
//! An in-flight generation is never interrupted. Its result is checked
//! against the accepted request id inside the machine lock and discarded
//! if it is stale.
//!
//! All methods that dispatch events must be called from within a Tokio
//! runtime.

use chrono::{DateTime, Utc};
use sim_core::{
    ExportError, GenerationError, GenerationOutput, GenerationResult, SimulationParameters,
};
use sim_paths::PathEngine;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};
use tracing::{debug, error};

use crate::config::SimulatorConfig;
use crate::export::{ExportArtifact, Exporter};
use crate::machine::SessionMachine;
use crate::state::{SchedulerAction, SchedulerEvent, SessionSnapshot};

struct Inner {
    machine: Mutex<SessionMachine>,
    engine: Arc<Mutex<PathEngine>>,
    debounce: Mutex<Option<JoinHandle<()>>>,
    exporter: Exporter,
    snapshots: watch::Sender<SessionSnapshot>,
}

/// Debounced, cancellable generation scheduler.
///
/// Cloning is cheap and every clone drives the same session.
///
/// # Example
///
/// ```rust,no_run
/// use sim_paths::PathEngine;
/// use sim_session::config::SimulatorConfig;
/// use sim_session::scheduler::GenerationScheduler;
///
/// # async fn run() {
/// let scheduler = GenerationScheduler::new(&SimulatorConfig::default(), PathEngine::from_seed(42));
/// scheduler.set_hurst(0.7);
/// let snapshot = scheduler.wait_until_settled().await;
/// assert_eq!(snapshot.committed_parameters.map(|p| p.hurst), Some(0.7));
/// # }
/// ```
#[derive(Clone)]
pub struct GenerationScheduler {
    inner: Arc<Inner>,
}

impl GenerationScheduler {
    /// Create a scheduler from the configuration and a path engine.
    pub fn new(config: &SimulatorConfig, engine: PathEngine) -> Self {
        Self::with_machine(SessionMachine::from_config(config), engine)
    }

    /// Create a scheduler with an engine seeded and configured as the
    /// configuration says.
    pub fn from_config(config: &SimulatorConfig) -> Self {
        let engine = match config.seed {
            Some(seed) => PathEngine::from_seed(seed),
            None => PathEngine::from_entropy(),
        };
        Self::new(config, engine.with_estimation(config.estimate_hurst))
    }

    /// Create a scheduler around an existing machine.
    pub fn with_machine(machine: SessionMachine, engine: PathEngine) -> Self {
        let (snapshots, _) = watch::channel(machine.snapshot());
        Self {
            inner: Arc::new(Inner {
                machine: Mutex::new(machine),
                engine: Arc::new(Mutex::new(engine)),
                debounce: Mutex::new(None),
                exporter: Exporter::new(),
                snapshots,
            }),
        }
    }

    // =====================================================================
    // Events
    // =====================================================================

    /// Signal that the session became active.
    pub fn mount(&self) {
        self.dispatch(SchedulerEvent::Mounted);
    }

    /// Replace the parameter set.
    pub fn set_parameters(&self, parameters: SimulationParameters) {
        self.dispatch(SchedulerEvent::ParameterChanged(parameters));
    }

    /// Change the Hurst exponent only.
    pub fn set_hurst(&self, hurst: f64) {
        self.set_parameters(self.parameters().with_hurst(hurst));
    }

    /// Change the number of points only.
    pub fn set_num_points(&self, num_points: usize) {
        self.set_parameters(self.parameters().with_num_points(num_points));
    }

    /// Change the time horizon only.
    pub fn set_time_length(&self, time_length: f64) {
        self.set_parameters(self.parameters().with_time_length(time_length));
    }

    /// Generate now, skipping the debounce delay.
    pub fn generate(&self) {
        self.dispatch(SchedulerEvent::ManualGenerateRequested);
    }

    /// Clear committed data and invalidate in-flight work.
    pub fn reset(&self) {
        self.dispatch(SchedulerEvent::Reset);
    }

    /// Clear the visible error.
    pub fn dismiss_error(&self) {
        self.dispatch(SchedulerEvent::ErrorDismissed);
    }

    /// Export the committed result, stamped with the current time.
    pub fn export(&self) -> Result<ExportArtifact, ExportError> {
        self.export_at(Utc::now())
    }

    /// Export the committed result, stamped with `timestamp`.
    pub fn export_at(&self, timestamp: DateTime<Utc>) -> Result<ExportArtifact, ExportError> {
        let mut machine = self.machine();
        let outcome = machine.export(&self.inner.exporter, timestamp);
        self.inner.snapshots.send_replace(machine.snapshot());
        outcome
    }

    // =====================================================================
    // Observation
    // =====================================================================

    /// Current parameters.
    pub fn parameters(&self) -> SimulationParameters {
        *self.machine().parameters()
    }

    /// Committed result.
    pub fn committed(&self) -> Option<Arc<GenerationResult>> {
        self.machine().committed().cloned()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Receiver notified after every event.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Run `f` against the machine under its lock.
    pub fn inspect<T>(&self, f: impl FnOnce(&SessionMachine) -> T) -> T {
        f(&self.machine())
    }

    /// Wait until a published snapshot satisfies `predicate`.
    pub async fn wait_for<F>(&self, mut predicate: F) -> SessionSnapshot
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        let mut receiver = self.subscribe();
        loop {
            let snapshot = receiver.borrow_and_update().clone();
            if predicate(&snapshot) || receiver.changed().await.is_err() {
                return snapshot;
            }
        }
    }

    /// Wait until no debounce timer is pending and no current generation is running.
    pub async fn wait_until_settled(&self) -> SessionSnapshot {
        self.wait_for(|snapshot| snapshot.state.is_settled()).await
    }

    // =====================================================================
    // Driver
    // =====================================================================

    fn machine(&self) -> MutexGuard<'_, SessionMachine> {
        self.inner
            .machine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn debounce_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.inner
            .debounce
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn dispatch(&self, event: SchedulerEvent) {
        let mut machine = self.machine();
        let actions = machine.handle(event, Instant::now());
        self.inner.snapshots.send_replace(machine.snapshot());

        // Performed under the machine lock so timers are armed in issue order
        let compute_delay = machine.timing().compute_delay;
        for action in actions {
            self.perform(action, compute_delay);
        }
    }

    fn perform(&self, action: SchedulerAction, compute_delay: std::time::Duration) {
        match action {
            SchedulerAction::ArmDebounce { request, delay } => {
                let this = self.clone();
                let handle = tokio::spawn(async move {
                    sleep(delay).await;
                    this.dispatch(SchedulerEvent::DebounceElapsed {
                        request_id: request.id,
                    });
                });
                if let Some(previous) = self.debounce_slot().replace(handle) {
                    previous.abort();
                }
            }

            SchedulerAction::CancelDebounce => {
                if let Some(pending) = self.debounce_slot().take() {
                    pending.abort();
                }
            }

            SchedulerAction::StartGeneration(request) => {
                let this = self.clone();
                let engine = Arc::clone(&self.inner.engine);
                tokio::spawn(async move {
                    sleep(compute_delay).await;

                    let parameters = request.parameters;
                    let outcome = run_blocking(request.id, move || {
                        let mut engine = engine.lock().unwrap_or_else(PoisonError::into_inner);
                        engine.generate(&parameters)
                    })
                    .await;

                    debug!(
                        request_id = request.id,
                        ok = outcome.is_ok(),
                        "Generation finished"
                    );
                    this.dispatch(SchedulerEvent::GenerationFinished {
                        request_id: request.id,
                        outcome,
                    });
                });
            }
        }
    }
}

/// Run `job` on the blocking pool; a panic becomes [`GenerationError::TaskFailed`].
async fn run_blocking<F>(request_id: u64, job: F) -> Result<GenerationOutput, GenerationError>
where
    F: FnOnce() -> Result<GenerationOutput, GenerationError> + Send + 'static,
{
    tokio::task::spawn_blocking(job).await.unwrap_or_else(|e| {
        error!(request_id, error = %e, "Generation task failed");
        Err(GenerationError::TaskFailed(e.to_string()))
    })
}
