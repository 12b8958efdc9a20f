//! Measurement harness: warmup isolation, timed windows, failure capture.
//!
//! The harness never lets a kernel abort the suite: panics are caught and
//! recorded as invalid results, and degenerate timing (zero iterations,
//! zero elapsed) yields `ops_per_second = 0` with `is_valid = false` rather
//! than NaN or infinity.

use crate::kernels::Kernel;
use crate::models::{BenchmarkResult, ThreadMode};
use crate::params::WorkloadParams;
use std::hint::black_box;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Extract a printable message from a panic payload.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "kernel panicked".to_string()
    }
}

/// Run untimed warmup invocations. Warmup populates caches, faults in
/// allocations and lets the branch predictors settle before the clock
/// starts; its results are discarded through `black_box`.
pub(crate) fn run_warmup(
    kernel: &dyn Kernel,
    params: &WorkloadParams,
    seed: u64,
    iters: u32,
) -> Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        for _ in 0..iters {
            black_box(kernel.run(params, seed).checksum.as_bits());
        }
    }))
    .map_err(panic_message)
}

/// Run the timed invocations and return the total work units performed.
/// Checksums are folded through `black_box` so the optimizer cannot drop
/// the computation.
pub(crate) fn run_timed(
    kernel: &dyn Kernel,
    params: &WorkloadParams,
    seed: u64,
    iters: u32,
) -> Result<u64, String> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let mut total_work = 0u64;
        let mut sink = 0u64;
        for _ in 0..iters {
            let output = kernel.run(params, seed);
            sink ^= output.checksum.as_bits();
            total_work += output.work_units;
        }
        black_box(sink);
        total_work
    }))
    .map_err(panic_message)
}

/// Measure one kernel in one mode: warmup, then a single monotonic-clock
/// window over all timed iterations.
pub fn measure(
    kernel: &dyn Kernel,
    params: &WorkloadParams,
    seed: u64,
    mode: ThreadMode,
) -> BenchmarkResult {
    let name = kernel.name();

    if params.timed_iters == 0 {
        log::warn!("[TIMING] {}: no timed iterations configured", name);
        return BenchmarkResult::failed(name, mode, "no timed iterations configured");
    }

    if let Err(message) = run_warmup(kernel, params, seed, params.warmup_iters) {
        log::warn!("[TIMING] {}: warmup failed: {}", name, message);
        return BenchmarkResult::failed(name, mode, message);
    }

    let start = Instant::now();
    let total_work = match run_timed(kernel, params, seed, params.timed_iters) {
        Ok(work) => work,
        Err(message) => {
            log::warn!("[TIMING] {}: kernel failed: {}", name, message);
            return BenchmarkResult::failed(name, mode, message);
        }
    };
    let elapsed = start.elapsed();

    let elapsed_secs = elapsed.as_secs_f64();
    if elapsed_secs <= 0.0 {
        return BenchmarkResult::failed(name, mode, "zero elapsed time");
    }

    BenchmarkResult {
        name: name.to_string(),
        mode,
        execution_time_ms: elapsed_secs * 1000.0,
        ops_per_second: total_work as f64 / elapsed_secs,
        is_valid: true,
        error_message: None,
        acceleration_mode: Some("cpu".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{Checksum, KernelOutput, PrimeGenerationKernel};
    use crate::params::DeviceTier;

    struct PanickingKernel;

    impl Kernel for PanickingKernel {
        fn name(&self) -> &'static str {
            "Panicking"
        }

        fn run(&self, _params: &WorkloadParams, _seed: u64) -> KernelOutput {
            panic!("intentional test failure");
        }
    }

    struct TrivialKernel;

    impl Kernel for TrivialKernel {
        fn name(&self) -> &'static str {
            "Trivial"
        }

        fn run(&self, _params: &WorkloadParams, _seed: u64) -> KernelOutput {
            KernelOutput {
                checksum: Checksum::Word(1),
                work_units: 100,
            }
        }
    }

    #[test]
    fn test_zero_timed_iters_is_invalid_not_a_panic() {
        let mut params = WorkloadParams::for_tier(DeviceTier::Test);
        params.timed_iters = 0;
        let result = measure(&TrivialKernel, &params, 0, ThreadMode::SingleCore);
        assert!(!result.is_valid);
        assert_eq!(result.ops_per_second, 0.0);
        assert!(result.ops_per_second.is_finite());
    }

    #[test]
    fn test_kernel_panic_is_captured() {
        let params = WorkloadParams::for_tier(DeviceTier::Test);
        let result = measure(&PanickingKernel, &params, 0, ThreadMode::SingleCore);
        assert!(!result.is_valid);
        assert_eq!(result.ops_per_second, 0.0);
        assert!(result
            .error_message
            .as_deref()
            .unwrap()
            .contains("intentional test failure"));
    }

    #[test]
    fn test_valid_measurement_reports_throughput() {
        let params = WorkloadParams::for_tier(DeviceTier::Test);
        let result = measure(&PrimeGenerationKernel, &params, 0, ThreadMode::SingleCore);
        assert!(result.is_valid);
        assert!(result.ops_per_second > 0.0);
        assert!(result.execution_time_ms > 0.0);
        assert_eq!(result.acceleration_mode.as_deref(), Some("cpu"));
    }

    #[test]
    fn test_throughput_matches_work_over_elapsed() {
        let mut params = WorkloadParams::for_tier(DeviceTier::Test);
        params.timed_iters = 3;
        let result = measure(&TrivialKernel, &params, 0, ThreadMode::SingleCore);
        assert!(result.is_valid);
        let expected = 300.0 / (result.execution_time_ms / 1000.0);
        let relative = (result.ops_per_second - expected).abs() / expected;
        assert!(relative < 1e-9);
    }
}
