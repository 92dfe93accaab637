//! Output writers for trace reports.
//!
//! This module handles writing data to disk:
//! - JSON reports
//! - Raw captured text

pub mod json;

// Re-export main functions
pub use json::{read_report, report_to_string, write_captured_text, write_report};
