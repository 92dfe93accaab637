//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Segmenting captured text into trace lines
//! - Extracting numeric values with an explicit literal grammar
//! - Parser configuration (label, separator, malformed-line policy)
//! - Defining the output schema

pub mod config;
pub mod literal;
pub mod schema;
pub mod trace_parser;

// Re-export main types
pub use config::{load_parser_config, MalformedPolicy, ParserConfig, TraceFormat};
pub use literal::{format_number, normalize_value_text, parse_number, parse_value_text, TraceValue};
pub use schema::{RecordEntry, SkippedEntry, TraceReport, ValueKind};
pub use trace_parser::{
    format_trace_line, render_records, ParseOutcome, ParsedRecord, SkippedLine, TraceParser,
};
