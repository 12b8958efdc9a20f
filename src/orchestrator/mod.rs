//! Benchmark suite orchestration.
//!
//! Drives the fixed kernel list through single-core and multi-core phases,
//! emits progress events, and assembles the final summary. One failing
//! kernel degrades its result; only executor setup failure aborts the run.
//! Re-entrant starts are rejected; mutual exclusion over the run
//! lifecycle is part of the orchestrator contract, not a UI concern.

pub mod state;

pub use state::SuiteState;

use crate::error::OrchestrationError;
use crate::kernels::registry;
use crate::models::{BenchmarkSummary, ProgressEvent, ProgressPhase, ThreadMode};
use crate::params::{DeviceTier, WorkloadParams};
use crate::rng::{derive_seed, XorShift128Plus};
use crate::{parallel, scoring, timing, topology};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Cooperative cancellation flag, checked between phases. A kernel that is
/// already executing runs to completion; phases are bounded-duration by
/// construction, so cancellation latency is at most one phase.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Caller-facing run configuration.
#[derive(Clone, Debug)]
pub struct SuiteConfig {
    /// Workload sizing profile.
    pub tier: DeviceTier,
    /// Multi-core worker count; defaults to the detected topology.
    pub worker_count: Option<usize>,
    /// Wall-clock limit for the whole run; when exceeded the run stops
    /// between phases and returns a partial summary.
    pub deadline: Option<Duration>,
    /// Base RNG seed; pin it for reproducible input data across runs.
    pub seed: Option<u64>,
}

impl SuiteConfig {
    pub fn new(tier: DeviceTier) -> Self {
        SuiteConfig {
            tier,
            worker_count: None,
            deadline: None,
            seed: None,
        }
    }
}

/// Handle to a run executing on its own worker thread.
pub struct RunHandle {
    events: Receiver<ProgressEvent>,
    join: JoinHandle<Result<BenchmarkSummary, OrchestrationError>>,
}

impl RunHandle {
    /// Progress event stream for this run.
    pub fn events(&self) -> &Receiver<ProgressEvent> {
        &self.events
    }

    /// Block until the run finishes.
    pub fn join(self) -> Result<BenchmarkSummary, OrchestrationError> {
        self.join.join().unwrap_or_else(|_| {
            Err(OrchestrationError::ExecutorSetup(
                "orchestrator thread panicked".to_string(),
            ))
        })
    }
}

/// The benchmark suite driver. Owned by the caller; reusable across runs,
/// but at most one run may be active at a time.
pub struct Orchestrator {
    config: SuiteConfig,
    state: Mutex<SuiteState>,
    running: AtomicBool,
    cancel: CancelToken,
    events_tx: Sender<ProgressEvent>,
    events_rx: Receiver<ProgressEvent>,
}

impl Orchestrator {
    pub fn new(config: SuiteConfig) -> Self {
        let (events_tx, events_rx) = unbounded();
        Orchestrator {
            config,
            state: Mutex::new(SuiteState::Idle),
            running: AtomicBool::new(false),
            cancel: CancelToken::new(),
            events_tx,
            events_rx,
        }
    }

    /// The progress event stream. Events from every run on this instance
    /// arrive on the same channel, in phase order.
    pub fn events(&self) -> Receiver<ProgressEvent> {
        self.events_rx.clone()
    }

    /// Token for cooperative cancellation of the active run. Cancellation
    /// is sticky for this instance; start a fresh orchestrator for the
    /// next run after cancelling.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SuiteState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// Total number of phases a full run executes.
    pub fn total_phases() -> usize {
        registry().len() * 2
    }

    /// Execute the full suite synchronously on the calling thread. Callers
    /// that must not block should use [`Orchestrator::spawn`].
    ///
    /// Returns `AlreadyRunning` if a run is in progress on this instance.
    pub fn run(&self) -> Result<BenchmarkSummary, OrchestrationError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(OrchestrationError::AlreadyRunning);
        }
        let outcome = self.run_locked();
        self.running.store(false, Ordering::SeqCst);
        outcome
    }

    /// Execute the suite on a dedicated worker thread.
    pub fn spawn(orchestrator: Arc<Orchestrator>) -> Result<RunHandle, OrchestrationError> {
        let events = orchestrator.events();
        let join = thread::Builder::new()
            .name("bench-orchestrator".to_string())
            .spawn(move || orchestrator.run())
            .map_err(|err| {
                OrchestrationError::ExecutorSetup(format!(
                    "could not spawn orchestrator thread: {}",
                    err
                ))
            })?;
        Ok(RunHandle { events, join })
    }

    fn transition(&self, next: SuiteState) -> Result<(), OrchestrationError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        if !state.can_transition_to(next) {
            return Err(OrchestrationError::InvalidTransition {
                from: state.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        log::debug!("[ORCHESTRATOR] {} -> {}", state.as_str(), next.as_str());
        *state = next;
        Ok(())
    }

    fn emit(&self, test_name: &str, phase: ProgressPhase) {
        // A consumer that dropped its receiver only loses display updates.
        let _ = self.events_tx.send(ProgressEvent {
            test_name: test_name.to_string(),
            phase,
        });
    }

    /// Reason to stop before the next phase, if any.
    fn stop_reason(&self, started: Instant) -> Option<String> {
        if self.cancel.is_cancelled() {
            return Some("cancelled".to_string());
        }
        if let Some(deadline) = self.config.deadline {
            if started.elapsed() >= deadline {
                return Some(format!("deadline of {:?} exceeded", deadline));
            }
        }
        None
    }

    fn run_locked(&self) -> Result<BenchmarkSummary, OrchestrationError> {
        self.transition(SuiteState::Running)?;

        topology::log_topology();
        let workers = self.config.worker_count.unwrap_or_else(topology::worker_count);
        let params = WorkloadParams::for_tier(self.config.tier);
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| XorShift128Plus::new().next_u64());

        log::info!(
            "[ORCHESTRATOR] starting suite: tier={}, workers={}, seed={:#x}",
            self.config.tier,
            workers,
            base_seed
        );

        let started = Instant::now();
        let mut results = Vec::with_capacity(Self::total_phases());
        let mut interrupted = None;

        'suite: for (index, kernel) in registry().iter().enumerate() {
            let kernel_seed = derive_seed(base_seed, index as u64);

            for mode in [ThreadMode::SingleCore, ThreadMode::MultiCore] {
                if let Some(reason) = self.stop_reason(started) {
                    log::warn!("[ORCHESTRATOR] stopping early: {}", reason);
                    interrupted = Some(reason);
                    break 'suite;
                }

                let label = format!("{} ({})", kernel.name(), mode);
                self.emit(&label, ProgressPhase::Started);

                let result = match mode {
                    ThreadMode::SingleCore => {
                        timing::measure(*kernel, &params, kernel_seed, mode)
                    }
                    ThreadMode::MultiCore => {
                        match parallel::run_multi_core(*kernel, &params, kernel_seed, workers) {
                            Ok(result) => result,
                            Err(err) => {
                                // Executor failure is unrecoverable: no
                                // partial summary, state goes to Failed.
                                log::error!("[ORCHESTRATOR] fatal: {}", err);
                                self.transition(SuiteState::Failed)?;
                                return Err(err);
                            }
                        }
                    }
                };

                if result.is_valid {
                    log::info!(
                        "[ORCHESTRATOR] {}: {:.0} ops/s in {:.1} ms",
                        label,
                        result.ops_per_second,
                        result.execution_time_ms
                    );
                } else {
                    log::warn!(
                        "[ORCHESTRATOR] {}: invalid ({})",
                        label,
                        result.error_message.as_deref().unwrap_or("unknown")
                    );
                }

                self.emit(&label, ProgressPhase::Completed);
                results.push(result);
            }
        }

        let mut summary = scoring::score(&results);
        summary.interrupted = interrupted;

        log::info!(
            "[ORCHESTRATOR] suite finished: single={:.1}, multi={:.1}, final={:.1}, rating={}",
            summary.single_core_score,
            summary.multi_core_score,
            summary.final_weighted_score,
            summary.rating
        );

        self.transition(SuiteState::Completed)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SuiteConfig {
        let mut config = SuiteConfig::new(DeviceTier::Test);
        config.worker_count = Some(2);
        config.seed = Some(0xBEEF);
        config
    }

    #[test]
    fn test_full_run_produces_all_phases() {
        let orchestrator = Orchestrator::new(test_config());
        let summary = orchestrator.run().unwrap();
        assert_eq!(summary.detailed_results.len(), Orchestrator::total_phases());
        assert!(summary.interrupted.is_none());
        assert_eq!(orchestrator.state(), SuiteState::Completed);
    }

    #[test]
    fn test_events_bracket_every_phase() {
        let orchestrator = Orchestrator::new(test_config());
        let events = orchestrator.events();
        orchestrator.run().unwrap();

        let collected: Vec<ProgressEvent> = events.try_iter().collect();
        assert_eq!(collected.len(), Orchestrator::total_phases() * 2);
        for pair in collected.chunks(2) {
            assert_eq!(pair[0].phase, ProgressPhase::Started);
            assert_eq!(pair[1].phase, ProgressPhase::Completed);
            assert_eq!(pair[0].test_name, pair[1].test_name);
        }
    }

    #[test]
    fn test_cancel_before_start_yields_empty_partial_summary() {
        let orchestrator = Orchestrator::new(test_config());
        orchestrator.cancel_token().cancel();
        let summary = orchestrator.run().unwrap();
        assert_eq!(summary.detailed_results.len(), 0);
        assert_eq!(summary.interrupted.as_deref(), Some("cancelled"));
        assert_eq!(summary.single_core_score, 0.0);
        assert_eq!(orchestrator.state(), SuiteState::Completed);
    }

    #[test]
    fn test_zero_deadline_yields_partial_summary() {
        let mut config = test_config();
        config.deadline = Some(Duration::ZERO);
        let orchestrator = Orchestrator::new(config);
        let summary = orchestrator.run().unwrap();
        assert_eq!(summary.detailed_results.len(), 0);
        assert!(summary.interrupted.as_deref().unwrap().contains("deadline"));
    }

    #[test]
    fn test_reentrant_run_is_rejected() {
        let orchestrator = Arc::new(Orchestrator::new(test_config()));
        let handle = Orchestrator::spawn(Arc::clone(&orchestrator)).unwrap();

        // The first Started event proves the background run holds the
        // guard; a second run must now be rejected.
        let first = handle.events().recv().unwrap();
        assert_eq!(first.phase, ProgressPhase::Started);
        match orchestrator.run() {
            Err(OrchestrationError::AlreadyRunning) => {}
            other => panic!("expected AlreadyRunning, got {:?}", other.map(|_| ())),
        }

        handle.join().unwrap();
    }

    #[test]
    fn test_orchestrator_is_reusable_after_completion() {
        let orchestrator = Orchestrator::new(test_config());
        orchestrator.run().unwrap();
        let second = orchestrator.run().unwrap();
        assert_eq!(second.detailed_results.len(), Orchestrator::total_phases());
    }
}
