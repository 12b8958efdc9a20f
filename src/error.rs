//! Unified error type hierarchy for the benchmark suite.
//!
//! Kernel and timing failures are deliberately NOT represented here: they
//! are recovered locally into `BenchmarkResult { is_valid: false, .. }` so a
//! single bad kernel never aborts the suite. Only orchestration-level
//! failures surface as errors.

use std::io;
use thiserror::Error;

/// CPU topology detection errors. Always recoverable: callers fall back to
/// a conservative worker count and log the degradation.
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("cpuinfo unavailable: {0}")]
    CpuInfoUnavailable(String),

    #[error("cpufreq sysfs entry unreadable for cpu{0}")]
    FreqUnreadable(usize),

    #[error("IO error during topology detection: {0}")]
    IoError(#[from] io::Error),
}

/// Suite-level orchestration errors. These are the only errors that cross
/// the API boundary; everything below them degrades into invalid results.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    /// A run is already in progress on this orchestrator instance.
    #[error("a benchmark run is already in progress")]
    AlreadyRunning,

    /// The worker pool could not be brought up; no partial summary exists.
    #[error("executor setup failed: {0}")]
    ExecutorSetup(String),

    /// An illegal state-machine transition was attempted.
    #[error("invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl OrchestrationError {
    /// User-facing message suitable for display; never a stack trace.
    pub fn user_message(&self) -> String {
        match self {
            OrchestrationError::AlreadyRunning => {
                "A benchmark is already running; wait for it to finish.".to_string()
            }
            OrchestrationError::ExecutorSetup(msg) => {
                format!("Could not start benchmark workers: {}", msg)
            }
            OrchestrationError::InvalidTransition { from, to } => {
                format!("Benchmark state error ({} -> {})", from, to)
            }
        }
    }
}
