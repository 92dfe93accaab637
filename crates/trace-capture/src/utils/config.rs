//! Configuration and constants for trace capture and parsing.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Label used when the caller does not configure one
pub const DEFAULT_LABEL: &str = "Delta";

/// Text between the label and the value, e.g. `Delta = -85.7`
pub const DEFAULT_SEPARATOR: &str = " = ";

/// Captured text is split on this terminator; a trailing `\r` is dropped
pub const LINE_TERMINATOR: char = '\n';

// Probe defaults. The step is a multiple of the grid so proposals can
// land exactly on the pole.
pub const DEFAULT_PROBE_ITERATIONS: usize = 200;
pub const DEFAULT_PROBE_SEED: u64 = 42;
pub const DEFAULT_PROBE_POLE: f64 = 0.5;
pub const DEFAULT_PROBE_STEP: f64 = 0.25;
pub const MAX_PROBE_ITERATIONS: usize = 1_000_000;

/// Records shown in terminal summaries
pub const SUMMARY_PREVIEW_LEN: usize = 10;
