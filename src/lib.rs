//! Corebench: CPU benchmark execution and scoring engine.
//!
//! A suite of deterministic, cache-residency-aware computational kernels
//! run single-threaded and multi-threaded under a benchmark orchestrator,
//! with wall-clock throughput measurement and a weighted-linear scoring
//! model that stays comparable across device tiers.
//!
//! The system is organized into functional modules:
//! - **error**: unified error type hierarchy
//! - **models**: result/summary data structures and wire formats
//! - **rng**: seedable xorshift128+ workload input generator
//! - **params**: device tiers and per-kernel workload sizing
//! - **kernels**: the benchmark workloads (prime, fibonacci, matrix, hash,
//!   string sort, ray tracing, compression, monte carlo, json, n-queens)
//! - **timing**: warmup/timed measurement harness
//! - **parallel**: fixed-work-per-core multi-thread executor
//! - **topology**: best-effort CPU core detection
//! - **scoring**: scaling factors and composite score computation
//! - **orchestrator**: suite sequencing, progress events, run lifecycle

// Core foundational modules
pub mod error;
pub mod models;

// Workload input generation
pub mod rng;

// Tier configuration
pub mod params;

// Benchmark workloads
pub mod kernels;

// Measurement and execution
pub mod parallel;
pub mod timing;

// Hardware detection
pub mod topology;

// Score aggregation
pub mod scoring;

// Suite orchestration and run lifecycle
pub mod orchestrator;

// Stderr backend for the log facade
pub mod logging;

// Re-export the log crate for macro usage
pub use log;

pub use error::{OrchestrationError, TopologyError};
pub use kernels::{Checksum, Kernel, KernelOutput};
pub use logging::initialize_logging;
pub use models::{
    BenchmarkResult, BenchmarkSummary, ProgressEvent, ProgressPhase, ThreadMode,
};
pub use orchestrator::{CancelToken, Orchestrator, RunHandle, SuiteConfig, SuiteState};
pub use params::{DeviceTier, WorkloadParams};
pub use rng::XorShift128Plus;
pub use topology::CpuCore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
