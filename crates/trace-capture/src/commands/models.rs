use crate::diagnostics::{DegenerateValue, ProbeResult};
use crate::parser::schema::TraceReport;
use crate::utils::config::{
    DEFAULT_PROBE_ITERATIONS, DEFAULT_PROBE_POLE, DEFAULT_PROBE_SEED, DEFAULT_PROBE_STEP,
};
use std::path::PathBuf;

/// Input path meaning "read from stdin"
pub const STDIN_PATH: &str = "-";

/// Arguments for the parse command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// Captured text to parse ("-" for stdin)
    pub input: PathBuf,

    /// Label override (config file or default otherwise)
    pub label: Option<String>,

    /// Separator override
    pub separator: Option<String>,

    /// Malformed-line policy override ("abort" or "skip")
    pub policy: Option<String>,

    /// Parser configuration TOML
    pub config: Option<PathBuf>,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ParseArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from(STDIN_PATH),
            label: None,
            separator: None,
            policy: None,
            config: None,
            output_json: None,
            print_summary: false,
        }
    }
}

/// Arguments for the probe command
#[derive(Debug, Clone)]
pub struct ProbeArgs {
    pub iterations: usize,
    pub seed: u64,
    pub pole: f64,
    pub step: f64,
    pub label: String,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for the raw captured text (optional)
    pub raw_output: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ProbeArgs {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_PROBE_ITERATIONS,
            seed: DEFAULT_PROBE_SEED,
            pole: DEFAULT_PROBE_POLE,
            step: DEFAULT_PROBE_STEP,
            label: crate::utils::config::DEFAULT_LABEL.to_string(),
            output_json: None,
            raw_output: None,
            print_summary: false,
        }
    }
}

/// Everything the probe command found
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub result: ProbeResult,
    pub report: TraceReport,
    pub degenerate: Vec<DegenerateValue>,
}
