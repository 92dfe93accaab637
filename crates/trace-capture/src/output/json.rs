//! JSON report output writer.
//!
//! Writes TraceReport structs to JSON files with proper formatting.

use crate::parser::schema::TraceReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report data to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &TraceReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Write raw captured text, for debugging the parser itself
pub fn write_captured_text(text: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    prepare_output_path(output_path)?;
    fs::write(output_path, text).map_err(OutputError::WriteFailed)?;

    debug!(
        "Captured text written to {} ({} bytes)",
        output_path.display(),
        text.len()
    );

    Ok(())
}

/// Serialize a report to a pretty JSON string
pub fn report_to_string(report: &TraceReport) -> Result<String, OutputError> {
    serde_json::to_string_pretty(report).map_err(OutputError::SerializationFailed)
}

/// Read a report from a JSON file
///
/// **Public** - useful for validation and testing
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<TraceReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let report: TraceReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} records",
        report.version, report.record_count
    );

    Ok(report)
}

/// Validate the path and create missing parent directories
///
/// **Private** - internal validation
fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_output_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{RecordEntry, ValueKind};

    fn create_test_report() -> TraceReport {
        TraceReport {
            version: "1.0.0".to_string(),
            label: "Delta".to_string(),
            separator: " = ".to_string(),
            source: "test".to_string(),
            record_count: 2,
            records: vec![
                RecordEntry {
                    line_number: 1,
                    kind: ValueKind::Scalar,
                    values: vec![-85.7],
                },
                RecordEntry {
                    line_number: 2,
                    kind: ValueKind::Scalar,
                    values: vec![f64::INFINITY],
                },
            ],
            skipped: vec![],
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = tempfile::NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded.version, report.version);
        assert_eq!(loaded.record_count, 2);
        assert_eq!(loaded.records, report.records);
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(validate_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_report_to_string_marks_infinity() {
        let json = report_to_string(&create_test_report()).unwrap();
        assert!(json.contains("\"inf\""));
    }
}
