//! Prime Generation kernel: 6k±1 wheel trial division.

use super::{Checksum, Kernel, KernelOutput};
use crate::params::WorkloadParams;

/// Trial-division primality test on the 6k±1 wheel. The 2/3 shortcuts
/// reject two thirds of all candidates before the sqrt-bounded loop, which
/// keeps the scan from degenerating into O(N·√N) on even composites.
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }

    true
}

/// Count primes strictly below `limit`.
pub fn count_primes_below(limit: u64) -> u64 {
    (2..limit).filter(|&n| is_prime(n)).count() as u64
}

pub struct PrimeGenerationKernel;

impl Kernel for PrimeGenerationKernel {
    fn name(&self) -> &'static str {
        "Prime Generation"
    }

    fn run(&self, params: &WorkloadParams, _seed: u64) -> KernelOutput {
        let count = count_primes_below(params.prime_limit);
        KernelOutput {
            checksum: Checksum::Word(count),
            // Throughput is the range scanned, not the primes found: the
            // work is dominated by rejecting composites.
            work_units: params.prime_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DeviceTier;

    #[test]
    fn test_is_prime_small_values() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(is_prime(5));
        assert!(!is_prime(9));
        assert!(is_prime(7919));
        assert!(!is_prime(7921)); // 89 * 89
    }

    #[test]
    fn test_prime_count_below_100() {
        assert_eq!(count_primes_below(100), 25);
    }

    #[test]
    fn test_prime_count_below_10000() {
        assert_eq!(count_primes_below(10_000), 1229);
    }

    #[test]
    fn test_kernel_work_units_equal_range() {
        let params = WorkloadParams::for_tier(DeviceTier::Test);
        let output = PrimeGenerationKernel.run(&params, 0);
        assert_eq!(output.work_units, params.prime_limit);
        assert_eq!(output.checksum, Checksum::Word(1229));
    }
}
