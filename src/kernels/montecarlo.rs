//! Monte Carlo kernel: pi estimation by unit-circle rejection.

use super::{Checksum, Kernel, KernelOutput};
use crate::params::WorkloadParams;
use crate::rng::XorShift128Plus;

/// Count samples landing inside the unit quarter-circle.
pub fn sample_quarter_circle(samples: u64, rng: &mut XorShift128Plus) -> u64 {
    let mut inside = 0u64;
    for _ in 0..samples {
        let x = rng.next_f64();
        let y = rng.next_f64();
        if x * x + y * y <= 1.0 {
            inside += 1;
        }
    }
    inside
}

/// Pi estimate from an inside-count.
pub fn estimate_pi(inside: u64, samples: u64) -> f64 {
    if samples == 0 {
        return 0.0;
    }
    4.0 * inside as f64 / samples as f64
}

pub struct MonteCarloKernel;

impl Kernel for MonteCarloKernel {
    fn name(&self) -> &'static str {
        "Monte Carlo"
    }

    fn run(&self, params: &WorkloadParams, seed: u64) -> KernelOutput {
        let mut rng = XorShift128Plus::from_seed(seed);
        let inside = sample_quarter_circle(params.monte_carlo_samples, &mut rng);

        KernelOutput {
            checksum: Checksum::Word(inside),
            work_units: params.monte_carlo_samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DeviceTier;

    #[test]
    fn test_pi_estimate_converges() {
        let mut rng = XorShift128Plus::from_seed(77);
        let samples = 1_000_000;
        let inside = sample_quarter_circle(samples, &mut rng);
        let pi = estimate_pi(inside, samples);
        assert!((pi - std::f64::consts::PI).abs() < 0.01, "estimate {} too far", pi);
    }

    #[test]
    fn test_estimate_with_zero_samples() {
        assert_eq!(estimate_pi(0, 0), 0.0);
    }

    #[test]
    fn test_inside_count_bounded_by_samples() {
        let mut rng = XorShift128Plus::from_seed(1);
        let inside = sample_quarter_circle(10_000, &mut rng);
        assert!(inside <= 10_000);
    }

    #[test]
    fn test_kernel_work_units() {
        let params = WorkloadParams::for_tier(DeviceTier::Test);
        let output = MonteCarloKernel.run(&params, 3);
        assert_eq!(output.work_units, params.monte_carlo_samples);
    }
}
