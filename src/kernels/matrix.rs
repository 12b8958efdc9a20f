//! Matrix Multiplication kernel: cache-resident dense multiply.
//!
//! A and B are allocated once from the seeded RNG and reused across
//! repetitions; only C is zeroed per repetition. The i-k-j loop order walks
//! both C and B rows sequentially, so the inner loop streams through cache
//! lines instead of striding columns.

use super::{Checksum, Kernel, KernelOutput};
use crate::params::WorkloadParams;
use crate::rng::XorShift128Plus;

/// XOR of the bit patterns of every entry. Bitwise (rather than a float
/// sum) so that any reordering or dropped write changes the value.
pub fn matrix_checksum(matrix: &[Vec<f64>]) -> u64 {
    let mut checksum = 0u64;
    for row in matrix {
        for value in row {
            checksum ^= value.to_bits();
        }
    }
    checksum
}

/// Generate a `size` × `size` matrix of uniform draws in [0, 1).
pub fn random_matrix(size: usize, rng: &mut XorShift128Plus) -> Vec<Vec<f64>> {
    (0..size)
        .map(|_| (0..size).map(|_| rng.next_f64()).collect())
        .collect()
}

/// C += A × B in i-k-j order. C must be zeroed by the caller.
pub fn multiply_into(a: &[Vec<f64>], b: &[Vec<f64>], c: &mut [Vec<f64>]) {
    let size = a.len();
    for i in 0..size {
        let a_row = &a[i];
        let c_row = &mut c[i];
        for k in 0..size {
            let aik = a_row[k];
            let b_row = &b[k];
            for j in 0..size {
                c_row[j] += aik * b_row[j];
            }
        }
    }
}

pub struct MatrixMultiplicationKernel;

impl Kernel for MatrixMultiplicationKernel {
    fn name(&self) -> &'static str {
        "Matrix Multiplication"
    }

    fn run(&self, params: &WorkloadParams, seed: u64) -> KernelOutput {
        let size = params.matrix_size;
        let mut rng = XorShift128Plus::from_seed(seed);

        let a = random_matrix(size, &mut rng);
        let b = random_matrix(size, &mut rng);
        let mut c = vec![vec![0.0f64; size]; size];

        let mut checksum = 0u64;
        for _ in 0..params.matrix_reps {
            for row in c.iter_mut() {
                row.fill(0.0);
            }
            multiply_into(&a, &b, &mut c);
            checksum = matrix_checksum(&c);
        }

        KernelOutput {
            checksum: Checksum::Word(checksum),
            work_units: (size as u64).pow(3) * params.matrix_reps as u64,
        }
    }
}
