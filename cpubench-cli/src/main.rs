use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod report;

use commands::{
    CliError, run_benchmark_command, run_defaults_command, run_list_command, run_suite_command,
};

#[derive(Parser, Debug)]
#[command(name = "cpubench", version)]
#[command(about = "cpubench - single-core CPU benchmark suite")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every catalog benchmark
    Suite(SuiteArgs),
    /// Run one benchmark once
    Run {
        /// Catalog name (see `cpubench list`)
        benchmark: String,
        /// JSON file with parameter overrides
        #[arg(long)]
        params: Option<PathBuf>,
        /// Device tier for defaults (slow, mid, flagship)
        #[arg(long, default_value = "mid")]
        tier: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List catalog benchmarks
    List,
    /// Show default parameters for a device tier
    Defaults {
        /// Device tier (slow, mid, flagship)
        #[arg(long, default_value = "mid")]
        tier: String,
    },
}

/// Options for `cpubench suite`. Flags override values from `--config`.
#[derive(clap::Args, Debug, Default)]
pub struct SuiteArgs {
    /// JSON suite configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// JSON file with parameter overrides, merged over the config file's `params`
    #[arg(long)]
    pub params: Option<PathBuf>,
    /// Device tier (slow, mid, flagship)
    #[arg(long)]
    pub tier: Option<String>,
    /// Measured rounds
    #[arg(long)]
    pub iterations: Option<u32>,
    /// Warmup rounds per benchmark
    #[arg(long)]
    pub warmup_count: Option<u32>,
    /// Skip warmup
    #[arg(long)]
    pub no_warmup: bool,
    /// Print the suite result as JSON
    #[arg(long)]
    pub json: bool,
    /// Also write the JSON result to this file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Install the JSON subscriber on stderr. Fails if one is already installed.
fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .json()
        .try_init()
}

fn main() {
    if let Err(e) = init_tracing() {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Suite(args) => run_suite_command(&args),
        Commands::Run {
            benchmark,
            params,
            tier,
            json,
        } => run_benchmark_command(&benchmark, params.as_deref(), &tier, json),
        Commands::List => run_list_command(),
        Commands::Defaults { tier } => run_defaults_command(&tier),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!("One or more benchmarks failed their self-check");
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            std::process::exit(exit_code(&e));
        }
    }
}

fn exit_code(error: &CliError) -> i32 {
    match error {
        CliError::Bench(e) if e.is_malformed_input() => 64,
        _ => 1,
    }
}
