//! JSON processing: generate a record array, parse it, walk it,
//! re-serialize it and parse it back into typed records.

use super::{WorkloadOutcome, seeded_rng, try_with_capacity};
use crate::error::{BenchError, BenchResult};
use crate::metrics::MetricsBuilder;
use crate::params::BenchmarkParams;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NAME: &str = "json_parsing";
const SEED: u64 = 0x4a53_4f4e;

const TAGS: &[&str] = &["alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Record {
    id: u64,
    name: String,
    /// Always a whole number of hundredths, so it survives text round-trips.
    score: f64,
    tags: Vec<String>,
    active: bool,
}

#[derive(Debug, Default, PartialEq)]
struct Walk {
    records: u64,
    id_sum: u64,
    active: u64,
}

pub fn run(params: &BenchmarkParams) -> BenchResult<WorkloadOutcome> {
    let target = params.json_data_bytes();
    let (document, records) = generate(target)?;

    let walked = serde_json::from_slice::<Value>(&document)
        .ok()
        .and_then(|value| {
            let walk = walk(&value)?;
            let reserialized = serde_json::to_vec(&value).ok()?;
            let reparsed: Vec<Record> = serde_json::from_slice(&reserialized).ok()?;
            Some((walk, reparsed))
        });

    let expected_sum = id_sum(records.len() as u64);
    let (is_valid, walk) = match walked {
        Some((walk, reparsed)) => (
            walk.records == records.len() as u64 && walk.id_sum == expected_sum && reparsed == records,
            walk,
        ),
        None => {
            tracing::warn!(benchmark = NAME, "Generated document failed to round-trip");
            (false, Walk::default())
        }
    };

    let metrics = MetricsBuilder::new()
        .with("bytes", document.len())
        .with("records", walk.records)
        .with("id_sum", walk.id_sum)
        .with("active_records", walk.active)
        .build();

    Ok(WorkloadOutcome {
        operations: document.len() as u64,
        is_valid,
        metrics,
    })
}

/// Sum of ids `0..count`.
fn id_sum(count: u64) -> u64 {
    if count == 0 {
        0
    } else {
        count * (count - 1) / 2
    }
}

/// Serialize records into a JSON array until it reaches `target` bytes.
/// Always contains at least one record.
fn generate(target: usize) -> BenchResult<(Vec<u8>, Vec<Record>)> {
    let mut rng = seeded_rng(SEED);
    let mut document = try_with_capacity(NAME, target + 256)?;
    let mut records = Vec::new();

    document.push(b'[');
    while records.is_empty() || document.len() + 1 < target {
        let id = records.len() as u64;
        let record = Record {
            id,
            name: format!("record-{:08}", id),
            score: f64::from(rng.random_range(0..100_000u32)) / 100.0,
            tags: (0..rng.random_range(1..=3))
                .map(|_| TAGS[rng.random_range(0..TAGS.len())].to_string())
                .collect(),
            active: rng.random_bool(0.5),
        };
        if !records.is_empty() {
            document.push(b',');
        }
        serde_json::to_writer(&mut document, &record)
            .map_err(|e| BenchError::Encoding(e.to_string()))?;
        records.push(record);
    }
    document.push(b']');

    Ok((document, records))
}

fn walk(value: &Value) -> Option<Walk> {
    let mut walk = Walk::default();
    for record in value.as_array()? {
        let object = record.as_object()?;
        walk.records += 1;
        walk.id_sum += object.get("id")?.as_u64()?;
        if object.get("active")?.as_bool()? {
            walk.active += 1;
        }
    }
    Some(walk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DeviceTier;

    fn params(mb: f64) -> BenchmarkParams {
        BenchmarkParams {
            json_data_size_mb: mb,
            ..BenchmarkParams::for_tier(DeviceTier::Slow)
        }
    }

    #[test]
    fn test_generated_document_reaches_target() {
        let (document, records) = generate(10_000).unwrap();
        assert!(document.len() >= 10_000);
        assert!(document.len() < 10_000 + 256);
        let parsed: Vec<Record> = serde_json::from_slice(&document).unwrap();
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_tiny_target_still_has_a_record() {
        let (document, records) = generate(1).unwrap();
        assert_eq!(records.len(), 1);
        assert!(serde_json::from_slice::<Value>(&document).is_ok());
    }

    #[test]
    fn test_small_run_is_valid() {
        let outcome = run(&params(0.1)).unwrap();
        assert!(outcome.is_valid);
        let records = outcome.metrics["records"].as_i64().unwrap() as u64;
        assert_eq!(outcome.metrics["id_sum"].as_i64(), Some(id_sum(records) as i64));
    }

    #[test]
    fn test_walk_rejects_wrong_shape() {
        assert_eq!(walk(&serde_json::json!({"id": 1})), None);
        assert_eq!(walk(&serde_json::json!([{"id": "x", "active": true}])), None);
        let ok = walk(&serde_json::json!([{"id": 4, "active": true}, {"id": 5, "active": false}])).unwrap();
        assert_eq!(ok, Walk { records: 2, id_sum: 9, active: 1 });
    }
}
