//! Line segmenter and value extractor for captured trace text.
//!
//! Splits captured text into trace lines, strips the configured prefix and
//! hands the value-text to the literal grammar. One record is produced per
//! trace line, in emission order; repeated values are kept as they are.

use super::config::{MalformedPolicy, ParserConfig, TraceFormat};
use super::literal::{parse_value_text, TraceValue};
use crate::utils::config::LINE_TERMINATOR;
use crate::utils::error::ParseError;
use log::{debug, warn};

/// Value parsed from one trace line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    /// 1-based line where the trace line starts in the captured text
    pub line_number: usize,
    pub value: TraceValue,
}

/// Line left out under [`MalformedPolicy::Skip`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub line: String,
    pub reason: String,
}

/// Result of parsing one capture
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub records: Vec<ParsedRecord>,
    pub skipped: Vec<SkippedLine>,
}

impl ParseOutcome {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One value per record when every record is a scalar
    pub fn scalars(&self) -> Option<Vec<f64>> {
        self.records.iter().map(|r| r.value.as_scalar()).collect()
    }

    /// All elements of all records, concatenated in order
    pub fn flatten(&self) -> Vec<f64> {
        self.records
            .iter()
            .flat_map(|r| r.value.values().iter().copied())
            .collect()
    }

    pub fn into_records(self) -> Vec<ParsedRecord> {
        self.records
    }
}

/// Trace line (possibly wrapped over several physical lines)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    line_number: usize,
    raw: String,
}

impl Segment {
    fn has_open_bracket(&self) -> bool {
        let opened = self.raw.matches('[').count();
        let closed = self.raw.matches(']').count();
        opened > closed
    }
}

/// Parser for one trace format
///
/// **Public** - main entry point for turning captured text into records
#[derive(Debug, Clone)]
pub struct TraceParser {
    format: TraceFormat,
    prefix: String,
    policy: MalformedPolicy,
}

impl TraceParser {
    /// # Errors
    /// * `ParseError::InvalidConfig` - the format has no usable prefix
    pub fn new(format: TraceFormat) -> Result<Self, ParseError> {
        format.validate()?;
        let prefix = format.prefix();

        Ok(Self {
            format,
            prefix,
            policy: MalformedPolicy::default(),
        })
    }

    pub fn from_config(config: &ParserConfig) -> Result<Self, ParseError> {
        Ok(Self::new(config.format())?.with_policy(config.policy))
    }

    pub fn with_policy(mut self, policy: MalformedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn format(&self) -> &TraceFormat {
        &self.format
    }

    pub fn policy(&self) -> MalformedPolicy {
        self.policy
    }

    /// Parse captured text into records
    ///
    /// # Arguments
    /// * `text` - Raw captured text
    ///
    /// # Returns
    /// Records in emission order plus any lines skipped by policy
    ///
    /// # Errors
    /// * `ParseError::MalformedTraceLine` - under the abort policy, the first
    ///   trace line that does not match `prefix + numeric literal`
    pub fn parse(&self, text: &str) -> Result<ParseOutcome, ParseError> {
        let segments = self.segment(text);
        debug!(
            "Parsing {} trace lines with prefix '{}'",
            segments.len(),
            self.prefix
        );

        let mut outcome = ParseOutcome {
            records: Vec::with_capacity(segments.len()),
            skipped: Vec::new(),
        };

        for segment in segments {
            match self.extract(&segment.raw) {
                Ok(value) => outcome.records.push(ParsedRecord {
                    line_number: segment.line_number,
                    value,
                }),
                Err(reason) => match self.policy {
                    MalformedPolicy::Abort => {
                        return Err(ParseError::MalformedTraceLine {
                            line_number: segment.line_number,
                            line: segment.raw,
                            reason,
                        });
                    }
                    MalformedPolicy::Skip => {
                        warn!(
                            "Skipping malformed trace line {}: {}",
                            segment.line_number, reason
                        );
                        outcome.skipped.push(SkippedLine {
                            line_number: segment.line_number,
                            line: segment.raw,
                            reason,
                        });
                    }
                },
            }
        }

        debug!(
            "Parsed {} records ({} skipped)",
            outcome.records.len(),
            outcome.skipped.len()
        );

        Ok(outcome)
    }

    /// Parse a single trace line
    pub fn parse_line(&self, line: &str) -> Result<TraceValue, ParseError> {
        self.extract(line)
            .map_err(|reason| ParseError::MalformedTraceLine {
                line_number: 1,
                line: line.to_string(),
                reason,
            })
    }

    /// Group physical lines into trace lines
    ///
    /// A line that does not start with the prefix continues the previous
    /// trace line while that line still has an open bracket; otherwise it
    /// stands alone (and will fail extraction).
    fn segment(&self, text: &str) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();

        for (index, line) in text.split(LINE_TERMINATOR).enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.trim().is_empty() {
                continue;
            }

            if let Some(current) = segments.last_mut() {
                if current.has_open_bracket() && !line.starts_with(&self.prefix) {
                    current.raw.push(LINE_TERMINATOR);
                    current.raw.push_str(line);
                    continue;
                }
            }

            segments.push(Segment {
                line_number: index + 1,
                raw: line.to_string(),
            });
        }

        segments
    }

    fn extract(&self, raw: &str) -> Result<TraceValue, String> {
        let value_text = raw
            .strip_prefix(&self.prefix)
            .ok_or_else(|| format!("expected prefix '{}'", self.prefix))?;

        parse_value_text(value_text).map_err(|e| e.to_string())
    }
}

/// Render one value as a trace line in the given format
pub fn format_trace_line(format: &TraceFormat, value: &TraceValue) -> String {
    format!("{}{}{}", format.label, format.separator, value)
}

/// Render records back into captured-text form, one line each
pub fn render_records(format: &TraceFormat, records: &[ParsedRecord]) -> String {
    records
        .iter()
        .map(|record| {
            let mut line = format_trace_line(format, &record.value);
            line.push(LINE_TERMINATOR);
            line
        })
        .collect()
}
