//! Core data structures shared across the benchmark suite.
//!
//! These are the in-memory representations; JSON is only the wire format at
//! the hand-off boundary. Detail records serialize with camelCase keys and
//! the summary with snake_case keys, the two halves of the storage contract
//! consumed by history/UI collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution mode of a benchmark phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadMode {
    /// One invocation on a single thread.
    SingleCore,
    /// One full workload copy per worker thread, measured wall-clock.
    MultiCore,
}

impl fmt::Display for ThreadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadMode::SingleCore => write!(f, "Single-Core"),
            ThreadMode::MultiCore => write!(f, "Multi-Core"),
        }
    }
}

/// Result of one (kernel, mode) benchmark phase. Immutable once produced;
/// the orchestrator appends it to the run's result list and nothing mutates
/// it afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    /// Kernel name (e.g. "Matrix Multiplication").
    pub name: String,
    /// Single-core or multi-core phase.
    pub mode: ThreadMode,
    /// Total wall-clock time of the timed region in milliseconds.
    pub execution_time_ms: f64,
    /// Work units per wall-clock second.
    pub ops_per_second: f64,
    /// False when the kernel failed or timing was degenerate.
    pub is_valid: bool,
    /// Failure description when `is_valid` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Acceleration backend tag for collaborators that also record
    /// accelerator results; always "cpu" for this suite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_mode: Option<String>,
}

impl BenchmarkResult {
    /// Build an invalid result for a failed or degenerate phase.
    pub fn failed(name: &str, mode: ThreadMode, message: impl Into<String>) -> Self {
        BenchmarkResult {
            name: name.to_string(),
            mode,
            execution_time_ms: 0.0,
            ops_per_second: 0.0,
            is_valid: false,
            error_message: Some(message.into()),
            acceleration_mode: None,
        }
    }

    /// Display label combining kernel name and mode, used in progress
    /// events and reports: "Prime Generation (Multi-Core)".
    pub fn test_label(&self) -> String {
        format!("{} ({})", self.name, self.mode)
    }
}

/// Phase marker for progress events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressPhase {
    #[serde(rename = "STARTED")]
    Started,
    #[serde(rename = "COMPLETED")]
    Completed,
}

/// Emitted before and after every benchmark phase for external progress
/// reporting. Consumers that miss events lose nothing but display updates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProgressEvent {
    pub test_name: String,
    pub phase: ProgressPhase,
}

/// Final summary of a full suite run. Computed once from the complete
/// result list; immutable; serializes to the flat storage contract.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BenchmarkSummary {
    pub single_core_score: f64,
    pub multi_core_score: f64,
    /// multi/single, 0 when single-core score is 0.
    pub core_ratio: f64,
    #[serde(rename = "final_score")]
    pub final_weighted_score: f64,
    pub normalized_score: f64,
    /// Star rating derived from the normalized score.
    pub rating: String,
    /// Present when the run was cut short by cancellation or deadline;
    /// the scores then cover only the completed phases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted: Option<String>,
    pub detailed_results: Vec<BenchmarkResult>,
}
