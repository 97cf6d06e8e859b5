//! N-Queens solution counting by bitmask backtracking.

use super::WorkloadOutcome;
use crate::error::{BenchError, BenchResult};
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;

const NAME: &str = "nqueens";

/// Solution counts for n = 1..=16 (OEIS A000170).
const KNOWN_SOLUTIONS: [u64; 16] = [
    1, 0, 0, 2, 10, 4, 40, 92, 352, 724, 2_680, 14_200, 73_712, 365_596, 2_279_184, 14_772_512,
];

pub fn known_solutions(n: u32) -> Option<u64> {
    let index = usize::try_from(n).ok()?.checked_sub(1)?;
    KNOWN_SOLUTIONS.get(index).copied()
}

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let n = params.nqueens_size;
    if n == 0 || n > 32 {
        return Err(BenchError::fault(NAME, format!("unsupported board size {}", n)));
    }

    let full = if n == 32 { u32::MAX } else { (1u32 << n) - 1 };
    let mut search = Search {
        full,
        solutions: 0,
        nodes: 0,
    };
    search.place(0, 0, 0);

    let is_valid = known_solutions(n).is_some_and(|expected| expected == search.solutions);

    let metrics = MetricsBuilder::new()
        .with("board_size", n)
        .with("solutions", search.solutions)
        .with("nodes", search.nodes)
        .build();

    Ok(WorkloadOutcome {
        operations: search.nodes,
        is_valid,
        metrics,
    })
}

struct Search {
    full: u32,
    solutions: u64,
    nodes: u64,
}

impl Search {
    /// `cols`, `left` and `right` mark squares attacked on the current row.
    fn place(&mut self, cols: u32, left: u32, right: u32) {
        self.nodes += 1;
        if cols == self.full {
            self.solutions += 1;
            return;
        }
        let mut free = !(cols | left | right) & self.full;
        while free != 0 {
            let bit = free & free.wrapping_neg();
            free ^= bit;
            self.place(cols | bit, (left | bit) << 1, (right | bit) >> 1);
        }
    }
}
