use crate::diagnostics::{find_degenerate, summarize_values};
use crate::output::read_report;
use crate::parser::{ParsedRecord, TraceReport};
use crate::utils::config::{SCHEMA_VERSION, SUMMARY_PREVIEW_LEN};
use anyhow::Result;
use colored::*;
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<TraceReport> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    if report.record_count != report.records.len() {
        anyhow::bail!(
            "record_count is {} but the report holds {} records",
            report.record_count,
            report.records.len()
        );
    }

    println!("{} Valid report JSON", "✓".green());
    println!("  Version: {}", report.version);
    println!("  Label: {}", report.label);
    println!("  Source: {}", report.source);
    println!("  Records: {}", report.record_count);
    println!("  Skipped: {}", report.skipped.len());

    Ok(report)
}

/// Print a text summary of parsed records
pub fn print_summary(report: &TraceReport, records: &[ParsedRecord]) {
    let summary = summarize_values(records);
    let degenerate = find_degenerate(records);

    println!("\n{}", "=".repeat(80));
    println!("TRACE SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Source:  {}", report.source);
    println!("Label:   {}", report.label);
    println!("Records: {}", summary.record_count);
    println!("Skipped: {}", report.skipped.len());
    println!("Values:  {}", summary.summary());

    if degenerate.is_empty() {
        println!("\n{}", "No degenerate values".green());
    } else {
        println!(
            "\n{}",
            format!("{} degenerate values:", degenerate.len()).red().bold()
        );
        for found in degenerate.iter().take(SUMMARY_PREVIEW_LEN) {
            println!(
                "  record {:>6} (line {:>6}, element {}): {}",
                found.record_index,
                found.line_number,
                found.element_index,
                found.kind.to_string().red()
            );
        }
        if degenerate.len() > SUMMARY_PREVIEW_LEN {
            println!("  ... {} more", degenerate.len() - SUMMARY_PREVIEW_LEN);
        }
    }

    println!("{}", "=".repeat(80));
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Trace Capture Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string        - Schema version (e.g., '1.0.0')");
        println!("  label: string          - Label trace lines were matched on");
        println!("  separator: string      - Text between label and value");
        println!("  source: string         - Input file, 'stdin' or 'probe'");
        println!("  record_count: number   - Number of records");
        println!("  records: array         - Parsed records in emission order");
        println!("    line_number: number  - Line where the trace line starts");
        println!("    kind: string         - 'scalar' or 'array'");
        println!("    values: array        - Numbers; 'inf', '-inf', 'nan' as strings");
        println!("  skipped: array?        - Lines left out under the skip policy");
        println!("  generated_at: string   - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Trace Capture v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Capture debug trace output and parse it into numeric records.");
}
