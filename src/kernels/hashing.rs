//! Hash Computing kernel: FNV-1a-style mixing over a cache-hot buffer.
//!
//! The buffer is 4 KB-class so it lives in L1 for the whole run; the
//! stride-4 read pattern tunes the per-iteration cost so the workload
//! stresses the ALU rather than the load units.

use super::{Checksum, Kernel, KernelOutput};
use crate::params::WorkloadParams;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 16_777_619;

/// Run `iterations` FNV-1a passes over `buffer`, reading every 4th byte.
/// Returns the final hash state.
pub fn hash_buffer(buffer: &[u8], iterations: u32) -> u32 {
    let mut state = FNV_OFFSET_BASIS;
    for _ in 0..iterations {
        let mut i = 0;
        while i < buffer.len() {
            state = (state ^ buffer[i] as u32).wrapping_mul(FNV_PRIME);
            i += 4;
        }
    }
    state
}

pub struct HashComputingKernel;

impl Kernel for HashComputingKernel {
    fn name(&self) -> &'static str {
        "Hash Computing"
    }

    fn run(&self, params: &WorkloadParams, _seed: u64) -> KernelOutput {
        let buffer: Vec<u8> = (0..params.hash_buffer_bytes)
            .map(|i| (i % 255) as u8)
            .collect();
        let state = hash_buffer(&buffer, params.hash_iters);

        KernelOutput {
            checksum: Checksum::Word(state as u64),
            // Bytes "processed": the stride is a tuning detail, the unit
            // stays the full buffer per iteration for cross-run stability.
            work_units: params.hash_buffer_bytes as u64 * params.hash_iters as u64,
        }
    }
}
