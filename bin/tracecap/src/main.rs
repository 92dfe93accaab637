//! Trace Capture CLI
//!
//! Parses captured debug trace output into numeric records and locates
//! degenerate values.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use trace_capture::commands::{
    display_schema, display_version, execute_parse, execute_probe, validate_parse_args,
    validate_probe_args, validate_report_file, ParseArgs, ProbeArgs,
};
use trace_capture::utils::config::{
    DEFAULT_LABEL, DEFAULT_PROBE_ITERATIONS, DEFAULT_PROBE_POLE, DEFAULT_PROBE_SEED,
    DEFAULT_PROBE_STEP,
};

/// Trace Capture - parse debug trace output into numeric records
#[derive(Parser, Debug)]
#[command(name = "tracecap")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse captured trace text into a report
    Parse {
        /// Captured text file ("-" reads stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Label at the start of each trace line
        #[arg(short, long)]
        label: Option<String>,

        /// Text between label and value
        #[arg(long)]
        separator: Option<String>,

        /// Malformed-line policy: abort or skip
        #[arg(long)]
        policy: Option<String>,

        /// Parser configuration TOML
        #[arg(short, long, env = "TRACECAP_CONFIG")]
        config: Option<PathBuf>,

        /// Output path for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Run the proposal probe under capture and report degenerate values
    Probe {
        /// Number of proposals
        #[arg(long, default_value_t = DEFAULT_PROBE_ITERATIONS)]
        iterations: usize,

        /// RNG seed
        #[arg(long, default_value_t = DEFAULT_PROBE_SEED)]
        seed: u64,

        /// Point where the instrumented division blows up
        #[arg(long, default_value_t = DEFAULT_PROBE_POLE, allow_hyphen_values = true)]
        pole: f64,

        /// Proposal grid step
        #[arg(long, default_value_t = DEFAULT_PROBE_STEP)]
        step: f64,

        /// Label of the emitted trace lines
        #[arg(short, long, default_value = DEFAULT_LABEL)]
        label: String,

        /// Output path for the JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for the raw captured text
        #[arg(long)]
        raw: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Parse {
            input,
            label,
            separator,
            policy,
            config,
            output,
            summary,
        } => {
            let args = ParseArgs {
                input,
                label,
                separator,
                policy,
                config,
                output_json: output,
                print_summary: summary,
            };

            validate_parse_args(&args)?;
            execute_parse(args)?;
        }

        Commands::Probe {
            iterations,
            seed,
            pole,
            step,
            label,
            output,
            raw,
            summary,
        } => {
            let args = ProbeArgs {
                iterations,
                seed,
                pole,
                step,
                label,
                output_json: output,
                raw_output: raw,
                print_summary: summary,
            };

            validate_probe_args(&args)?;
            let outcome = execute_probe(args)?;
            log::debug!("Probe emitted {} trace lines", outcome.result.evaluations);
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
