//! N-Queens kernel: bitmask backtracking solution counter.

use super::{Checksum, Kernel, KernelOutput};
use crate::params::WorkloadParams;

/// Backtracking search state. Columns and both diagonal directions are
/// tracked as bitmasks; a set bit means attacked.
struct Search {
    full_mask: u32,
    solutions: u64,
    nodes: u64,
}

impl Search {
    fn place(&mut self, cols: u32, diag_l: u32, diag_r: u32) {
        if cols == self.full_mask {
            self.solutions += 1;
            return;
        }
        let mut free = self.full_mask & !(cols | diag_l | diag_r);
        while free != 0 {
            let bit = free & free.wrapping_neg();
            free ^= bit;
            self.nodes += 1;
            self.place(cols | bit, (diag_l | bit) << 1, (diag_r | bit) >> 1);
        }
    }
}

/// Count all solutions for an `n` × `n` board, also returning the number
/// of placements attempted (the search effort).
pub fn count_solutions(n: u32) -> (u64, u64) {
    if n == 0 || n > 31 {
        return (0, 0);
    }
    let mut search = Search {
        full_mask: (1u32 << n) - 1,
        solutions: 0,
        nodes: 0,
    };
    search.place(0, 0, 0);
    (search.solutions, search.nodes)
}

pub struct NQueensKernel;

impl Kernel for NQueensKernel {
    fn name(&self) -> &'static str {
        "N-Queens"
    }

    fn run(&self, params: &WorkloadParams, _seed: u64) -> KernelOutput {
        let (solutions, nodes) = count_solutions(params.nqueens_n);
        KernelOutput {
            checksum: Checksum::Word(solutions),
            // Work is placements attempted, not solutions found: the
            // search effort is what the CPU actually spends time on.
            work_units: nodes.max(1),
        }
    }
}
