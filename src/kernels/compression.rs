//! Compression kernel: repeated deflate over a seeded buffer.

use super::{Checksum, Kernel, KernelOutput};
use crate::params::WorkloadParams;
use crate::rng::XorShift128Plus;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// Generate a compressible input buffer: a 16-symbol alphabet gives deflate
/// real entropy-coding work, where uniformly random bytes would collapse
/// into stored blocks and measure memcpy instead.
pub fn compressible_buffer(size: usize, rng: &mut XorShift128Plus) -> Vec<u8> {
    (0..size)
        .map(|_| b'a' + rng.next_u32_bounded(16) as u8)
        .collect()
}

/// Deflate `input` once, returning the compressed bytes.
pub fn deflate(input: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(input)?;
    encoder.finish()
}

pub struct CompressionKernel;

impl Kernel for CompressionKernel {
    fn name(&self) -> &'static str {
        "Compression"
    }

    fn run(&self, params: &WorkloadParams, seed: u64) -> KernelOutput {
        let mut rng = XorShift128Plus::from_seed(seed);
        let input = compressible_buffer(params.compress_bytes, &mut rng);

        let mut checksum = 0u64;
        for round in 0..params.compress_reps {
            // An in-memory encode cannot fail; treat a failure as a zero
            // contribution rather than a panic inside the timed region.
            let compressed = deflate(&input).unwrap_or_default();
            let tail = compressed.last().copied().unwrap_or(0) as u64;
            checksum ^= ((compressed.len() as u64) << 8 | tail).rotate_left(round % 64);
        }

        KernelOutput {
            checksum: Checksum::Word(checksum),
            work_units: params.compress_bytes as u64 * params.compress_reps as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DeviceTier;

    #[test]
    fn test_buffer_actually_compresses() {
        let mut rng = XorShift128Plus::from_seed(21);
        let input = compressible_buffer(64 * 1024, &mut rng);
        let compressed = deflate(&input).unwrap();
        assert!(compressed.len() < input.len());
    }

    #[test]
    fn test_deflate_is_deterministic() {
        let mut rng = XorShift128Plus::from_seed(21);
        let input = compressible_buffer(16 * 1024, &mut rng);
        assert_eq!(deflate(&input).unwrap(), deflate(&input).unwrap());
    }

    #[test]
    fn test_kernel_work_units() {
        let params = WorkloadParams::for_tier(DeviceTier::Test);
        let output = CompressionKernel.run(&params, 5);
        assert_eq!(
            output.work_units,
            params.compress_bytes as u64 * params.compress_reps as u64
        );
    }
}
