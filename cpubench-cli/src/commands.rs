//! Subcommand implementations. Each returns `Ok(all_valid)`.

use crate::SuiteArgs;
use crate::report;
use cpubench_core::{
    BenchError, BenchmarkParams, DeviceTier, ParamOverrides, SuiteConfig, Workload,
    encode_result, encode_suite_report_pretty, run_benchmark, run_suite,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Bench(#[from] BenchError),
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_overrides(path: &Path) -> Result<ParamOverrides, CliError> {
    Ok(ParamOverrides::from_json(&read_file(path)?)?)
}

/// Build the suite configuration: file first, then flags on top.
pub fn load_config(args: &SuiteArgs) -> Result<SuiteConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => SuiteConfig::from_json(&read_file(path)?)?,
        None => SuiteConfig::default(),
    };

    if let Some(path) = &args.params {
        config.params = config.params.merged_with(load_overrides(path)?);
    }
    if let Some(tier) = &args.tier {
        config.device_tier = tier.parse()?;
    }
    if let Some(iterations) = args.iterations {
        config.iterations = iterations;
    }
    if let Some(warmup_count) = args.warmup_count {
        config.warmup_count = warmup_count;
    }
    if args.no_warmup {
        config.warmup = false;
    }

    // Re-validate after the flags were applied.
    let config = SuiteConfig::new(
        config.iterations,
        config.warmup,
        config.warmup_count,
        config.device_tier,
    )?
    .with_params(config.params);
    config.resolve_params()?;
    Ok(config)
}

pub fn run_suite_command(args: &SuiteArgs) -> Result<bool, CliError> {
    let config = load_config(args)?;
    let suite = run_suite(&config)?;

    if args.json {
        println!("{}", encode_suite_report_pretty(&suite)?);
    } else {
        report::print_suite(&suite);
    }

    if let Some(path) = &args.output {
        fs::write(path, encode_suite_report_pretty(&suite)?).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Suite result written");
    }

    Ok(suite.all_valid())
}

pub fn run_benchmark_command(
    name: &str,
    params: Option<&Path>,
    tier: &str,
    json: bool,
) -> Result<bool, CliError> {
    let workload: Workload = name.parse()?;
    let tier: DeviceTier = tier.parse()?;
    let overrides = match params {
        Some(path) => load_overrides(path)?,
        None => ParamOverrides::default(),
    };

    let result = run_benchmark(workload, &overrides, tier)?;
    if json {
        println!("{}", encode_result(&result)?);
    } else {
        report::print_result(workload, &result);
    }
    Ok(result.is_valid)
}

pub fn run_list_command() -> Result<bool, CliError> {
    report::print_catalog();
    Ok(true)
}

pub fn run_defaults_command(tier: &str) -> Result<bool, CliError> {
    let tier: DeviceTier = tier.parse()?;
    let params = BenchmarkParams::for_tier(tier);
    let json = serde_json::to_string_pretty(&params)
        .map_err(|e| BenchError::Encoding(e.to_string()))?;
    println!("{}", json);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_files() {
        let config = load_config(&SuiteArgs::default()).unwrap();
        assert_eq!(config, SuiteConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let file = json_file(r#"{"iterations": 2, "warmup": true, "warmup_count": 1, "device_tier": "Slow"}"#);
        let args = SuiteArgs {
            config: Some(file.path().to_path_buf()),
            tier: Some("flagship".to_string()),
            no_warmup: true,
            ..Default::default()
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.iterations, 2);
        assert_eq!(config.device_tier, DeviceTier::Flagship);
        assert!(!config.warmup);
    }

    #[test]
    fn test_params_file_is_loaded() {
        let file = json_file(r#"{"fibonacci_n_range": [10, 15]}"#);
        let args = SuiteArgs {
            params: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.resolve_params().unwrap().fibonacci_n_range, (10, 15));
    }

    #[test]
    fn test_params_file_merges_with_config_params() {
        let config_file = json_file(r#"{"params": {"matrix_size": 32, "nqueens_size": 6}}"#);
        let params_file = json_file(r#"{"nqueens_size": 7}"#);
        let args = SuiteArgs {
            config: Some(config_file.path().to_path_buf()),
            params: Some(params_file.path().to_path_buf()),
            ..Default::default()
        };
        let params = load_config(&args).unwrap().resolve_params().unwrap();
        assert_eq!(params.matrix_size, 32);
        assert_eq!(params.nqueens_size, 7);
    }

    #[test]
    fn test_zero_iterations_flag_rejected() {
        let args = SuiteArgs {
            iterations: Some(0),
            ..Default::default()
        };
        assert!(matches!(load_config(&args), Err(CliError::Bench(_))));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let args = SuiteArgs {
            config: Some(PathBuf::from("/definitely/not/here.json")),
            ..Default::default()
        };
        assert!(matches!(load_config(&args), Err(CliError::Read { .. })));
    }

    #[test]
    fn test_bad_params_file_rejected() {
        let file = json_file(r#"{"nqueens_size": 99}"#);
        let args = SuiteArgs {
            params: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        assert!(load_config(&args).is_err());
    }

    #[test]
    fn test_run_small_benchmark() {
        let file = json_file(r#"{"nqueens_size": 6}"#);
        let valid = run_benchmark_command("nqueens", Some(file.path()), "slow", true).unwrap();
        assert!(valid);
        assert!(run_benchmark_command("bogosort", None, "mid", false).is_err());
    }
}
