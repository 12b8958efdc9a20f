//! Device tiers and per-kernel workload sizing.
//!
//! Sizes are chosen so that a single kernel invocation lands in the
//! hundreds-of-milliseconds-to-seconds window on a device of that tier:
//! long enough to swamp timer noise, short enough to stay clear of OS
//! watchdog limits. Working sets (128-wide matrices, 4 KB hash buffer,
//! 4096-string pool) stay cache-resident so the kernels measure compute
//! throughput rather than memory bandwidth.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workload sizing profile. Tiers scale iteration counts and problem
/// sizes; they never change the algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceTier {
    /// Minimal sizes for unit and integration tests.
    Test,
    /// Entry-level devices.
    Slow,
    /// Mainstream devices.
    Mid,
    /// High-end devices.
    Flagship,
}

impl fmt::Display for DeviceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceTier::Test => write!(f, "test"),
            DeviceTier::Slow => write!(f, "slow"),
            DeviceTier::Mid => write!(f, "mid"),
            DeviceTier::Flagship => write!(f, "flagship"),
        }
    }
}

impl FromStr for DeviceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "test" => Ok(DeviceTier::Test),
            "slow" => Ok(DeviceTier::Slow),
            "mid" => Ok(DeviceTier::Mid),
            "flagship" => Ok(DeviceTier::Flagship),
            other => Err(format!(
                "unknown tier '{}' (expected test|slow|mid|flagship)",
                other
            )),
        }
    }
}

/// Per-kernel sizing for one benchmark run. Built once from a tier and
/// read-only thereafter; workers share it by reference.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkloadParams {
    /// Untimed invocations before the timed region.
    pub warmup_iters: u32,
    /// Timed invocations per phase.
    pub timed_iters: u32,

    /// Prime Generation: scan range upper bound (exclusive).
    pub prime_limit: u64,

    /// Fibonacci: index computed per round, and number of rounds.
    pub fib_n: u32,
    pub fib_rounds: u32,

    /// Matrix Multiplication: square dimension and cache-resident
    /// repetition count (A/B reused, C zeroed per repetition).
    pub matrix_size: usize,
    pub matrix_reps: u32,

    /// Hash Computing: buffer size in bytes and iteration count.
    pub hash_buffer_bytes: usize,
    pub hash_iters: u32,

    /// String Sorting: pool size, string length, sort repetitions.
    pub string_count: usize,
    pub string_len: usize,
    pub sort_iters: u32,

    /// Ray Tracing: image dimensions and bounce depth.
    pub ray_width: u32,
    pub ray_height: u32,
    pub ray_depth: u32,

    /// Compression: input buffer size in bytes and repetitions.
    pub compress_bytes: usize,
    pub compress_reps: u32,

    /// Monte Carlo: sample count for the pi estimate.
    pub monte_carlo_samples: u64,

    /// JSON Parsing: record count of the synthetic document and parse
    /// repetitions.
    pub json_records: usize,
    pub json_reps: u32,

    /// N-Queens: board size.
    pub nqueens_n: u32,
}

impl WorkloadParams {
    /// Workload sizing table, one entry per tier. Pure data: adding a tier
    /// or retuning a size never touches orchestration logic.
    pub fn for_tier(tier: DeviceTier) -> WorkloadParams {
        match tier {
            DeviceTier::Test => WorkloadParams {
                warmup_iters: 1,
                timed_iters: 1,
                prime_limit: 10_000,
                fib_n: 30,
                fib_rounds: 1_000,
                matrix_size: 32,
                matrix_reps: 2,
                hash_buffer_bytes: 4_096,
                hash_iters: 100,
                string_count: 256,
                string_len: 16,
                sort_iters: 2,
                ray_width: 32,
                ray_height: 32,
                ray_depth: 2,
                compress_bytes: 16 * 1024,
                compress_reps: 1,
                monte_carlo_samples: 100_000,
                json_records: 64,
                json_reps: 2,
                nqueens_n: 6,
            },
            DeviceTier::Slow => WorkloadParams {
                warmup_iters: 1,
                timed_iters: 2,
                prime_limit: 200_000,
                fib_n: 35,
                fib_rounds: 500_000,
                matrix_size: 128,
                matrix_reps: 6,
                hash_buffer_bytes: 4_096,
                hash_iters: 150_000,
                string_count: 4_096,
                string_len: 16,
                sort_iters: 30,
                ray_width: 160,
                ray_height: 160,
                ray_depth: 3,
                compress_bytes: 256 * 1024,
                compress_reps: 4,
                monte_carlo_samples: 8_000_000,
                json_records: 2_048,
                json_reps: 6,
                nqueens_n: 10,
            },
            DeviceTier::Mid => WorkloadParams {
                warmup_iters: 2,
                timed_iters: 3,
                prime_limit: 400_000,
                fib_n: 35,
                fib_rounds: 1_000_000,
                matrix_size: 128,
                matrix_reps: 12,
                hash_buffer_bytes: 4_096,
                hash_iters: 300_000,
                string_count: 4_096,
                string_len: 16,
                sort_iters: 60,
                ray_width: 224,
                ray_height: 224,
                ray_depth: 3,
                compress_bytes: 512 * 1024,
                compress_reps: 6,
                monte_carlo_samples: 16_000_000,
                json_records: 4_096,
                json_reps: 8,
                nqueens_n: 11,
            },
            DeviceTier::Flagship => WorkloadParams {
                warmup_iters: 2,
                timed_iters: 3,
                prime_limit: 800_000,
                fib_n: 35,
                fib_rounds: 2_000_000,
                matrix_size: 128,
                matrix_reps: 24,
                hash_buffer_bytes: 4_096,
                hash_iters: 600_000,
                string_count: 4_096,
                string_len: 16,
                sort_iters: 120,
                ray_width: 288,
                ray_height: 288,
                ray_depth: 4,
                compress_bytes: 1024 * 1024,
                compress_reps: 8,
                monte_carlo_samples: 32_000_000,
                json_records: 8_192,
                json_reps: 10,
                nqueens_n: 12,
            },
        }
    }
}
