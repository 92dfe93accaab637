//! Degenerate-value detection and value statistics over parsed records.
//!
//! Degenerate values (`inf`, `-inf`, `nan`) are what the capture exists to
//! find: they point at the candidate input that broke a computation.

use crate::parser::ParsedRecord;
use log::debug;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegenerateKind {
    PositiveInfinity,
    NegativeInfinity,
    NaN,
}

impl DegenerateKind {
    /// `None` for finite values
    pub fn classify(value: f64) -> Option<Self> {
        if value.is_nan() {
            Some(DegenerateKind::NaN)
        } else if value == f64::INFINITY {
            Some(DegenerateKind::PositiveInfinity)
        } else if value == f64::NEG_INFINITY {
            Some(DegenerateKind::NegativeInfinity)
        } else {
            None
        }
    }
}

impl fmt::Display for DegenerateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegenerateKind::PositiveInfinity => f.write_str("inf"),
            DegenerateKind::NegativeInfinity => f.write_str("-inf"),
            DegenerateKind::NaN => f.write_str("nan"),
        }
    }
}

/// Location of one non-finite element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegenerateValue {
    /// Index into the record slice (emission order)
    pub record_index: usize,
    pub line_number: usize,
    /// Element within the record (0 for scalars)
    pub element_index: usize,
    pub kind: DegenerateKind,
}

/// Find every non-finite element, in emission order
///
/// **Public** - main entry point for degenerate-value diagnosis
pub fn find_degenerate(records: &[ParsedRecord]) -> Vec<DegenerateValue> {
    let found: Vec<DegenerateValue> = records
        .iter()
        .enumerate()
        .flat_map(|(record_index, record)| {
            record
                .value
                .values()
                .iter()
                .enumerate()
                .filter_map(move |(element_index, &value)| {
                    DegenerateKind::classify(value).map(|kind| DegenerateValue {
                        record_index,
                        line_number: record.line_number,
                        element_index,
                        kind,
                    })
                })
        })
        .collect();

    debug!(
        "Found {} degenerate values in {} records",
        found.len(),
        records.len()
    );

    found
}

/// Value statistics
///
/// **Public** - returned from summarize_values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSummary {
    pub record_count: usize,
    /// Elements across all records
    pub value_count: usize,
    pub finite_count: usize,
    pub finite_min: Option<f64>,
    pub finite_max: Option<f64>,
    pub finite_mean: Option<f64>,
    pub degenerate_count: usize,
    /// Index of the first record holding a non-finite element
    pub first_degenerate: Option<usize>,
}

impl ValueSummary {
    /// Human-readable one-line summary
    pub fn summary(&self) -> String {
        let range = match (self.finite_min, self.finite_max, self.finite_mean) {
            (Some(min), Some(max), Some(mean)) => {
                format!("min={:.4}, max={:.4}, mean={:.4}", min, max, mean)
            }
            _ => "no finite values".to_string(),
        };

        let first = self
            .first_degenerate
            .map(|i| format!(", first degenerate at record {}", i))
            .unwrap_or_default();

        format!(
            "{} records, {} values ({}), {} degenerate{}",
            self.record_count, self.value_count, range, self.degenerate_count, first
        )
    }
}

/// Calculate value statistics
///
/// # Arguments
/// * `records` - Parsed records in emission order
pub fn summarize_values(records: &[ParsedRecord]) -> ValueSummary {
    let mut summary = ValueSummary {
        record_count: records.len(),
        ..Default::default()
    };
    let mut finite_sum = 0.0;

    for (index, record) in records.iter().enumerate() {
        for &value in record.value.values() {
            summary.value_count += 1;

            if value.is_finite() {
                summary.finite_count += 1;
                finite_sum += value;
                summary.finite_min = Some(summary.finite_min.map_or(value, |m| m.min(value)));
                summary.finite_max = Some(summary.finite_max.map_or(value, |m| m.max(value)));
            } else {
                summary.degenerate_count += 1;
                summary.first_degenerate.get_or_insert(index);
            }
        }
    }

    if summary.finite_count > 0 {
        summary.finite_mean = Some(finite_sum / summary.finite_count as f64);
    }

    summary
}
