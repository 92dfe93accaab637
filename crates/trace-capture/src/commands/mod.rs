//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod parse;
pub mod probe;
pub mod utils;

// Re-export main command functions
pub use models::{ParseArgs, ProbeArgs, ProbeOutcome};
pub use parse::{execute_parse, validate_parse_args};
pub use probe::{execute_probe, validate_probe_args};
pub use utils::{display_schema, display_version, print_summary, validate_report_file};
