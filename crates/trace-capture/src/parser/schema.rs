//! Output JSON schema definitions for parsed trace data.
//!
//! This module defines the structure of the report files we write to disk.
//! Schema is versioned to allow future evolution.

use super::config::TraceFormat;
use super::literal::TraceValue;
use super::trace_parser::{ParseOutcome, ParsedRecord, SkippedLine};
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Label the trace lines were matched on
    pub label: String,

    /// Separator between label and value
    pub separator: String,

    /// Where the captured text came from (file path, "stdin", "probe")
    pub source: String,

    /// Number of records
    pub record_count: usize,

    /// Parsed records in emission order
    pub records: Vec<RecordEntry>,

    /// Lines left out under the skip policy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedEntry>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Serialized form of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub line_number: usize,

    pub kind: ValueKind,

    /// Non-finite values are written as "inf", "-inf" and "nan"
    #[serde(with = "float_values")]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Scalar,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

impl From<&ParsedRecord> for RecordEntry {
    fn from(record: &ParsedRecord) -> Self {
        let kind = if record.value.is_scalar() {
            ValueKind::Scalar
        } else {
            ValueKind::Array
        };

        Self {
            line_number: record.line_number,
            kind,
            values: record.value.values().to_vec(),
        }
    }
}

impl From<&SkippedLine> for SkippedEntry {
    fn from(skipped: &SkippedLine) -> Self {
        Self {
            line_number: skipped.line_number,
            line: skipped.line.clone(),
            reason: skipped.reason.clone(),
        }
    }
}

impl RecordEntry {
    /// Rebuild the record; a scalar entry with other than one value is
    /// read as an array
    pub fn to_record(&self) -> ParsedRecord {
        let value = match (self.kind, self.values.as_slice()) {
            (ValueKind::Scalar, [single]) => TraceValue::Scalar(*single),
            _ => TraceValue::Array(self.values.clone()),
        };

        ParsedRecord {
            line_number: self.line_number,
            value,
        }
    }
}

impl TraceReport {
    /// Build a report from a parse outcome
    pub fn from_outcome(
        format: &TraceFormat,
        source: impl Into<String>,
        outcome: &ParseOutcome,
    ) -> Self {
        use chrono::Utc;

        Self {
            version: SCHEMA_VERSION.to_string(),
            label: format.label.clone(),
            separator: format.separator.clone(),
            source: source.into(),
            record_count: outcome.records.len(),
            records: outcome.records.iter().map(RecordEntry::from).collect(),
            skipped: outcome.skipped.iter().map(SkippedEntry::from).collect(),
            generated_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn format(&self) -> TraceFormat {
        TraceFormat {
            label: self.label.clone(),
            separator: self.separator.clone(),
        }
    }

    pub fn to_records(&self) -> Vec<ParsedRecord> {
        self.records.iter().map(RecordEntry::to_record).collect()
    }
}

/// Serde adapter for float sequences that may hold `inf`/`nan`
///
/// JSON has no literal for non-finite numbers, so they travel as strings.
pub mod float_values {
    use crate::parser::literal::{format_number, parse_number};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum FloatRepr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        values
            .iter()
            .map(|&value| {
                if value.is_finite() {
                    FloatRepr::Number(value)
                } else {
                    FloatRepr::Text(format_number(value))
                }
            })
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Vec::<FloatRepr>::deserialize(deserializer)?
            .into_iter()
            .map(|repr| match repr {
                FloatRepr::Number(value) => Ok(value),
                FloatRepr::Text(text) => parse_number(&text).map_err(serde::de::Error::custom),
            })
            .collect()
    }
}
