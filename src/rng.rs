//! XorShift128+ pseudo-random number generator.
//!
//! Workload input data must be cheap to generate (the generator runs inside
//! timed regions) and reproducible across runs when a seed is pinned, so the
//! suite carries its own small PRNG instead of pulling in an external one.
//! xorshift128+ passes BigCrush and costs a handful of ALU ops per draw.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fallback state used when seeding would produce the all-zero fixed point.
const FALLBACK_S0: u64 = 0x1234_5678_9ABC_DEF0;
const FALLBACK_S1: u64 = 0xEDCB_A987_6654_3210;

/// Process-wide counter mixed into default seeds so that two generators
/// created in the same nanosecond still diverge.
static SEED_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// SplitMix64 avalanche step. Spreads seed entropy across all 64 bits;
/// consecutive inputs produce statistically independent outputs.
fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive an independent sub-seed from a base seed and a salt (kernel
/// index, worker index). Salting through the avalanche step keeps worker
/// streams uncorrelated even for adjacent salts.
pub fn derive_seed(base: u64, salt: u64) -> u64 {
    splitmix64(base ^ splitmix64(salt))
}

/// xorshift128+ generator. Two 64-bit state words, period 2^128 - 1.
///
/// Each worker thread owns its own instance; the type is deliberately not
/// shared behind a lock so that the hot path stays contention-free.
#[derive(Clone, Debug)]
pub struct XorShift128Plus {
    s0: u64,
    s1: u64,
}

impl XorShift128Plus {
    /// Create a generator seeded from mixed entropy: wall-clock nanos, the
    /// current thread id, and a process-wide sequence counter, each run
    /// through SplitMix64.
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let thread_bits = {
            use std::hash::{Hash, Hasher};
            let mut hasher = std::collections::hash_map::DefaultHasher::new();
            std::thread::current().id().hash(&mut hasher);
            hasher.finish()
        };
        let sequence = SEED_SEQUENCE.fetch_add(1, Ordering::Relaxed);

        Self::from_seed(nanos ^ thread_bits.rotate_left(32) ^ splitmix64(sequence))
    }

    /// Create a deterministic generator: the same seed always yields the
    /// same output sequence.
    pub fn from_seed(seed: u64) -> Self {
        let s0 = splitmix64(seed);
        let s1 = splitmix64(s0);
        let mut rng = XorShift128Plus { s0, s1 };
        rng.guard_zero_state();
        rng
    }

    /// Create a generator from explicit state words.
    pub fn from_state(s0: u64, s1: u64) -> Self {
        let mut rng = XorShift128Plus { s0, s1 };
        rng.guard_zero_state();
        rng
    }

    /// The all-zero state is a fixed point of the transition function.
    fn guard_zero_state(&mut self) {
        if self.s0 == 0 && self.s1 == 0 {
            self.s0 = FALLBACK_S0;
            self.s1 = FALLBACK_S1;
        }
    }

    /// Next raw 64-bit draw.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.s0;
        let y = self.s1;
        self.s0 = y;
        x ^= x << 23;
        self.s1 = x ^ y ^ (x >> 17) ^ (y >> 26);
        self.s1.wrapping_add(y)
    }

    /// Next draw in `[0.0, 1.0)`, using the top 53 bits for full
    /// double-precision mantissa coverage.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next_u64() >> 11;
        value as f64 / (1u64 << 53) as f64
    }

    /// Next draw in `[0, bound)` via rejection sampling on a power-of-two
    /// mask. Rejection (rather than modulo) keeps the distribution uniform
    /// for bounds that do not divide 2^32.
    #[inline]
    pub fn next_u32_bounded(&mut self, bound: u32) -> u32 {
        assert!(bound > 0, "bound must be positive");
        let mask = if bound == 1 {
            0
        } else {
            u32::MAX >> (bound - 1).leading_zeros()
        };
        loop {
            let candidate = (self.next_u64() >> 32) as u32 & mask;
            if candidate < bound {
                return candidate;
            }
        }
    }
}

impl Default for XorShift128Plus {
    fn default() -> Self {
        Self::new()
    }
}
