//! SHA-256 throughput over a seeded buffer.

use super::{WorkloadOutcome, seeded_rng, try_filled};
use crate::error::BenchResult;
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;
use rand::RngCore;
use sha2::{Digest, Sha256};

const NAME: &str = "hash_computing";
const SEED: u64 = 0x4841_5348;

/// Update granularity for the streaming hash.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Prefix hashed a second time in one shot to check chunking equivalence.
const EQUIVALENCE_PREFIX: usize = 1024 * 1024;

/// FIPS 180-2 test vector: SHA-256("abc").
const ABC_DIGEST: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let len = params.hash_data_bytes();
    let mut data = try_filled(NAME, len, 0u8)?;
    seeded_rng(SEED).fill_bytes(&mut data);

    let digest = hash_chunked(&data, CHUNK_SIZE);

    let prefix = &data[..len.min(EQUIVALENCE_PREFIX)];
    let is_valid = known_answer_holds()
        && hash_chunked(prefix, CHUNK_SIZE) == hash_one_shot(prefix);

    let metrics = MetricsBuilder::new()
        .with("bytes_processed", len)
        .with("digest", digest)
        .build();

    Ok(WorkloadOutcome {
        operations: len as u64,
        is_valid,
        metrics,
    })
}

fn hash_chunked(data: &[u8], chunk_size: usize) -> String {
    let mut hasher = Sha256::new();
    for chunk in data.chunks(chunk_size) {
        hasher.update(chunk);
    }
    format!("{:x}", hasher.finalize())
}

fn hash_one_shot(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn known_answer_holds() -> bool {
    hash_one_shot(b"abc") == ABC_DIGEST
}
