//! LZ77-style compression of seeded pseudo-text.
//!
//! Stream format, a sequence of tokens:
//!
//! - control byte `0x00..=0x7F`: literal run of `control + 1` bytes follows
//! - control byte `0x80..=0xFF`: back-reference of `(control & 0x7F) + 4`
//!   bytes, followed by a little-endian `u16` distance (1..=65535)

use super::{WorkloadOutcome, seeded_rng, try_with_capacity};
use crate::error::BenchResult;
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;
use rand::Rng;

const NAME: &str = "compression";
const SEED: u64 = 0x4c5a_3737;

const MIN_MATCH: usize = 4;
const MAX_MATCH: usize = MIN_MATCH + 0x7F;
const MAX_LITERAL_RUN: usize = 0x80;
const MAX_DISTANCE: usize = u16::MAX as usize;
const HASH_BITS: u32 = 16;
/// Below this size pseudo-text is not required to shrink.
const MIN_SHRINK_INPUT: usize = 4 * 1024;

const VOCABULARY: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "benchmark", "processor",
    "memory", "cache", "thread", "kernel", "signal", "buffer", "stream", "packet", "vector",
    "matrix", "compile", "execute", "result", "measure", "single", "core", "device", "mobile",
];
const PUNCTUATION: &[&str] = &[" ", " ", " ", " ", ", ", ". ", "\n"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("stream truncated at byte {position}")]
    Truncated { position: usize },

    #[error("invalid distance {distance} at byte {position} with {available} bytes decoded")]
    InvalidDistance {
        position: usize,
        distance: usize,
        available: usize,
    },
}

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let len = params.compression_data_bytes();
    let input = pseudo_text(len)?;

    let compressed = compress(&input)?;
    let round_trip = decompress(&compressed, input.len());

    let ratio = input.len() as f64 / compressed.len().max(1) as f64;
    let is_valid = matches!(&round_trip, Ok(out) if *out == input)
        && (input.len() < MIN_SHRINK_INPUT || ratio > 1.0);
    if let Err(e) = &round_trip {
        tracing::warn!(benchmark = NAME, error = %e, "Decompression failed");
    }

    let metrics = MetricsBuilder::new()
        .with("original_bytes", input.len())
        .with("compressed_bytes", compressed.len())
        .with("compression_ratio", ratio)
        .build();

    Ok(WorkloadOutcome {
        operations: len as u64,
        is_valid,
        metrics,
    })
}

/// Seeded text of exactly `len` bytes drawn from a small vocabulary.
fn pseudo_text(len: usize) -> BenchResult<Vec<u8>> {
    let mut rng = seeded_rng(SEED);
    let mut text = try_with_capacity(NAME, len + 32)?;
    while text.len() < len {
        let word = VOCABULARY[rng.random_range(0..VOCABULARY.len())];
        let sep = PUNCTUATION[rng.random_range(0..PUNCTUATION.len())];
        text.extend_from_slice(word.as_bytes());
        text.extend_from_slice(sep.as_bytes());
    }
    text.truncate(len);
    Ok(text)
}

fn hash4(bytes: &[u8]) -> usize {
    let v = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    (v.wrapping_mul(2_654_435_761) >> (32 - HASH_BITS)) as usize
}

pub fn compress(input: &[u8]) -> BenchResult<Vec<u8>> {
    let mut out = try_with_capacity(NAME, input.len() / 2 + 16)?;
    // Last position + 1 for each hash bucket; 0 means empty.
    let mut table = vec![0usize; 1 << HASH_BITS];
    let mut literal_start = 0;
    let mut pos = 0;

    while pos + MIN_MATCH <= input.len() {
        let h = hash4(&input[pos..]);
        let candidate = table[h];
        table[h] = pos + 1;

        if candidate > 0 {
            let start = candidate - 1;
            let distance = pos - start;
            if distance <= MAX_DISTANCE && input[start..start + MIN_MATCH] == input[pos..pos + MIN_MATCH] {
                let limit = (input.len() - pos).min(MAX_MATCH);
                let mut len = MIN_MATCH;
                while len < limit && input[start + len] == input[pos + len] {
                    len += 1;
                }

                emit_literals(&mut out, &input[literal_start..pos]);
                out.push(0x80 | (len - MIN_MATCH) as u8);
                out.extend_from_slice(&(distance as u16).to_le_bytes());

                pos += len;
                literal_start = pos;
                continue;
            }
        }
        pos += 1;
    }

    emit_literals(&mut out, &input[literal_start..]);
    Ok(out)
}

fn emit_literals(out: &mut Vec<u8>, literals: &[u8]) {
    for run in literals.chunks(MAX_LITERAL_RUN) {
        out.push((run.len() - 1) as u8);
        out.extend_from_slice(run);
    }
}

/// Decode a token stream. `size_hint` only pre-sizes the output.
pub fn decompress(input: &[u8], size_hint: usize) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(size_hint);
    let mut pos = 0;

    while pos < input.len() {
        let control = input[pos];
        pos += 1;

        if control < 0x80 {
            let len = usize::from(control) + 1;
            let literals = input
                .get(pos..pos + len)
                .ok_or(CodecError::Truncated { position: pos })?;
            out.extend_from_slice(literals);
            pos += len;
        } else {
            let len = usize::from(control & 0x7F) + MIN_MATCH;
            let bytes = input
                .get(pos..pos + 2)
                .ok_or(CodecError::Truncated { position: pos })?;
            let distance = usize::from(u16::from_le_bytes([bytes[0], bytes[1]]));
            if distance == 0 || distance > out.len() {
                return Err(CodecError::InvalidDistance {
                    position: pos,
                    distance,
                    available: out.len(),
                });
            }
            pos += 2;

            // Byte-wise copy: the source may overlap the bytes being written.
            let start = out.len() - distance;
            for i in 0..len {
                let b = out[start + i];
                out.push(b);
            }
        }
    }
    Ok(out)
}
