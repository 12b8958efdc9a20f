//! String Sorting kernel: copy-and-sort of a cache-resident pool.
//!
//! The pool is generated once from the seeded RNG; every iteration clones
//! it (O(N) copy) and comparison-sorts the clone (O(N log N)), so each
//! iteration does the full sort from scratch on in-cache data.

use super::{Checksum, Kernel, KernelOutput};
use crate::params::WorkloadParams;
use crate::rng::XorShift128Plus;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate one random fixed-length string from the benchmark charset.
pub fn random_string(length: usize, rng: &mut XorShift128Plus) -> String {
    (0..length)
        .map(|_| CHARSET[rng.next_u32_bounded(CHARSET.len() as u32) as usize] as char)
        .collect()
}

/// Generate the sort pool.
pub fn random_string_pool(count: usize, length: usize, rng: &mut XorShift128Plus) -> Vec<String> {
    (0..count).map(|_| random_string(length, rng)).collect()
}

/// FNV-1a over a string's bytes; deterministic across runs, unlike the
/// std hasher's randomized state.
fn string_fingerprint(s: &str) -> u64 {
    let mut state: u64 = 0xCBF2_9CE4_8422_2325;
    for byte in s.as_bytes() {
        state = (state ^ *byte as u64).wrapping_mul(0x0000_0100_0000_01B3);
    }
    state
}

/// Sort a copy of the pool `iterations` times; fold the last sorted
/// element's fingerprint into the checksum each round.
pub fn run_sort_workload(pool: &[String], iterations: u32) -> u64 {
    let mut checksum = 0u64;
    for round in 0..iterations {
        let mut working = pool.to_vec();
        working.sort_unstable();
        if let Some(last) = working.last() {
            checksum ^= string_fingerprint(last).rotate_left(round % 64);
        }
    }
    checksum
}

pub struct StringSortingKernel;

impl Kernel for StringSortingKernel {
    fn name(&self) -> &'static str {
        "String Sorting"
    }

    fn run(&self, params: &WorkloadParams, seed: u64) -> KernelOutput {
        let mut rng = XorShift128Plus::from_seed(seed);
        let pool = random_string_pool(params.string_count, params.string_len, &mut rng);
        let checksum = run_sort_workload(&pool, params.sort_iters);

        KernelOutput {
            checksum: Checksum::Word(checksum),
            work_units: params.string_count as u64 * params.sort_iters as u64,
        }
    }
}
