//! Human-readable output.

use cpubench_core::{BenchmarkResult, SuiteResult, Workload};
use std::time::Duration;

/// Render milliseconds with humantime, rounded to whole milliseconds.
fn human_ms(ms: f64) -> String {
    if !ms.is_finite() || ms < 1.0 {
        return format!("{:.3}ms", ms.max(0.0));
    }
    humantime::format_duration(Duration::from_millis(ms.round() as u64)).to_string()
}

/// Compact ops/second with a metric suffix.
fn human_rate(ops: f64) -> String {
    const UNITS: [(f64, &str); 3] = [(1e9, "G"), (1e6, "M"), (1e3, "k")];
    for (scale, suffix) in UNITS {
        if ops >= scale {
            return format!("{:.2}{}", ops / scale, suffix);
        }
    }
    format!("{:.2}", ops)
}

fn status(result: &BenchmarkResult) -> &'static str {
    if result.fault().is_some() {
        "FAULT"
    } else if result.is_valid {
        "ok"
    } else {
        "INVALID"
    }
}

fn unit_for(name: &str) -> &'static str {
    Workload::from_name(name).map_or("ops", |w| w.unit())
}

pub fn print_suite(suite: &SuiteResult) {
    println!(
        "cpubench suite  tier={}  iterations={}  warmup={}  started={}",
        suite.config.device_tier,
        suite.config.iterations,
        suite.config.effective_warmup_rounds(),
        suite.started_at.to_rfc3339(),
    );
    println!();
    println!(
        "{:<24} {:>12} {:>14}  {:<16} {}",
        "benchmark", "time", "ops/s", "unit", "status"
    );
    for result in &suite.results {
        println!(
            "{:<24} {:>12} {:>14}  {:<16} {}",
            result.name,
            human_ms(result.execution_time_ms),
            human_rate(result.ops_per_second),
            unit_for(&result.name),
            status(result),
        );
        if let Some(reason) = result.fault() {
            println!("    {}", reason);
        }
    }
    println!();
    println!(
        "valid {}/{}  total {}  cpu score {:.2}",
        suite.valid_count(),
        suite.results.len(),
        human_ms(suite.total_time_ms),
        suite.cpu_score,
    );
}

pub fn print_result(workload: Workload, result: &BenchmarkResult) {
    println!("{} ({})", workload.display_name(), workload.name());
    println!("  time     {}", human_ms(result.execution_time_ms));
    println!(
        "  rate     {} {}/s",
        human_rate(result.ops_per_second),
        workload.unit()
    );
    println!("  status   {}", status(result));
    for (key, value) in &result.metrics {
        println!("  {:<16} {}", key, value);
    }
}

pub fn print_catalog() {
    for workload in Workload::all() {
        println!(
            "{:<24} {:<24} {}",
            workload.name(),
            workload.display_name(),
            workload.unit()
        );
    }
}
