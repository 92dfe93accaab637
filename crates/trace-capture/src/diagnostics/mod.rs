//! Diagnostics over captured traces.
//!
//! Composes capture and parsing so a caller can run an iterative
//! computation, then inspect every intermediate value it emitted, including
//! those from rejected or retried candidates.

pub mod probe;
pub mod report;

pub use probe::{run_probe, ProbeConfig, ProbeResult};
pub use report::{
    find_degenerate, summarize_values, DegenerateKind, DegenerateValue, ValueSummary,
};

use crate::capture::{with_capture, CapturedText};
use crate::parser::{ParseOutcome, TraceParser};
use crate::utils::error::TraceError;
use log::info;

/// Everything produced by one captured computation
#[derive(Debug, Clone)]
pub struct Diagnosis<R> {
    /// The computation's own return value
    pub output: R,
    pub captured: CapturedText,
    pub outcome: ParseOutcome,
}

impl<R> Diagnosis<R> {
    pub fn degenerate(&self) -> Vec<DegenerateValue> {
        find_degenerate(&self.outcome.records)
    }

    pub fn summary(&self) -> ValueSummary {
        summarize_values(&self.outcome.records)
    }
}

/// Run `computation` under capture and parse what it emitted
///
/// **Public** - main entry point for diagnosing a computation
///
/// # Errors
/// * `TraceError::Capture` - the sink is already captured, or could not be
///   restored (the error carries the captured text)
/// * `TraceError::Parse` - a malformed trace line under the abort policy
///
/// # Example
/// ```ignore
/// let parser = TraceParser::new(TraceFormat::new("Delta"))?;
/// let diagnosis = capture_and_parse(&parser, || run_probe(&config))?;
/// for found in diagnosis.degenerate() { ... }
/// ```
pub fn capture_and_parse<R>(
    parser: &TraceParser,
    computation: impl FnOnce() -> R,
) -> Result<Diagnosis<R>, TraceError> {
    let (output, captured) = with_capture(computation)?;

    info!(
        "Captured {} bytes in {:.3}s",
        captured.len(),
        captured.duration().as_secs_f64()
    );

    let outcome = parser.parse(captured.text())?;

    Ok(Diagnosis {
        output,
        captured,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::TEST_SINK_LOCK;
    use crate::parser::{MalformedPolicy, TraceFormat};

    fn lock() -> std::sync::MutexGuard<'static, ()> {
        TEST_SINK_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn test_probe_emits_one_line_per_evaluation() {
        let _guard = lock();
        let parser = TraceParser::new(TraceFormat::default()).unwrap();
        let config = ProbeConfig {
            iterations: 50,
            ..Default::default()
        };

        let diagnosis = capture_and_parse(&parser, || run_probe(&config)).unwrap();
        let result = diagnosis.output.unwrap();

        assert_eq!(result.evaluations, 51);
        assert_eq!(result.samples.len(), 50);
        assert_eq!(diagnosis.outcome.len(), result.evaluations);
    }

    #[test]
    fn test_probe_started_on_pole_reports_inf_first() {
        let _guard = lock();
        let parser = TraceParser::new(TraceFormat::default()).unwrap();
        let config = ProbeConfig {
            iterations: 5,
            start: 0.5,
            pole: 0.5,
            ..Default::default()
        };

        let diagnosis = capture_and_parse(&parser, || run_probe(&config)).unwrap();
        let degenerate = diagnosis.degenerate();

        assert_eq!(degenerate[0].record_index, 0);
        assert_eq!(degenerate[0].kind, DegenerateKind::PositiveInfinity);
        // Any finite proposal beats a -inf state.
        let result = diagnosis.output.unwrap();
        assert!(result.accepted >= 1);
        assert_ne!(result.samples[0], config.start);
    }

    #[test]
    fn test_foreign_lines_follow_policy() {
        let _guard = lock();
        let abort = TraceParser::new(TraceFormat::new("X")).unwrap();
        let skip = abort.clone().with_policy(MalformedPolicy::Skip);

        let emit = || {
            crate::trace_println!("X = 1.0").unwrap();
            crate::trace_println!("progress: 50%").unwrap();
            crate::trace_println!("X = 2.0").unwrap();
        };

        assert!(matches!(
            capture_and_parse(&abort, emit),
            Err(TraceError::Parse(_))
        ));

        let diagnosis = capture_and_parse(&skip, emit).unwrap();
        assert_eq!(diagnosis.outcome.scalars(), Some(vec![1.0, 2.0]));
        assert_eq!(diagnosis.outcome.skipped[0].line, "progress: 50%");
    }
}
