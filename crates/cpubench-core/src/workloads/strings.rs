//! Sorting of seeded random alphanumeric strings.

use super::{WorkloadOutcome, seeded_rng, try_with_capacity};
use crate::error::BenchResult;
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;
use rand::Rng;
use rand::distr::Alphanumeric;

const NAME: &str = "string_sorting";
const SEED: u64 = 0x5354_5253;
pub const STRING_LEN: usize = 16;

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let count = params.string_count;
    let mut strings = generate(count)?;
    let before = fingerprint(&strings);

    strings.sort_unstable();

    let is_valid = strings.len() == count
        && strings.windows(2).all(|w| w[0] <= w[1])
        && fingerprint(&strings) == before;

    let metrics = MetricsBuilder::new()
        .with("strings_sorted", count)
        .with("first", strings.first().cloned().unwrap_or_default())
        .with("last", strings.last().cloned().unwrap_or_default())
        .build();

    Ok(WorkloadOutcome {
        operations: count as u64,
        is_valid,
        metrics,
    })
}

fn generate(count: usize) -> BenchResult<Vec<String>> {
    let mut rng = seeded_rng(SEED);
    let mut strings = try_with_capacity(NAME, count)?;
    for _ in 0..count {
        let s: String = (&mut rng)
            .sample_iter(Alphanumeric)
            .take(STRING_LEN)
            .map(char::from)
            .collect();
        strings.push(s);
    }
    Ok(strings)
}

/// Order-independent multiset fingerprint (sum of per-string FNV-1a).
fn fingerprint(strings: &[String]) -> u64 {
    strings
        .iter()
        .map(|s| fnv1a(s.as_bytes()))
        .fold(0u64, u64::wrapping_add)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf2_9ce4_8422_2325, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}
