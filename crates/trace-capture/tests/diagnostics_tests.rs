//! Capture + parse over iterative computations that retry candidates.

use std::sync::{Mutex, MutexGuard, PoisonError};
use trace_capture::diagnostics::{
    capture_and_parse, run_probe, DegenerateKind, ProbeConfig,
};
use trace_capture::parser::{TraceFormat, TraceParser};
use trace_capture::trace_println;

static SINK_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    SINK_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Newton-style iteration that retries with a halved step whenever the
/// candidate produces a non-finite ratio, tracing every candidate.
fn damped_iteration(candidates: &[f64]) -> std::io::Result<Vec<f64>> {
    let mut accepted = Vec::new();

    for &x in candidates {
        let mut step = 1.0;
        loop {
            let candidate = x * step;
            let ratio = 1.0 / candidate;
            trace_println!("ratio = {}", ratio)?;

            if ratio.is_finite() || step < 0.25 {
                accepted.push(ratio);
                break;
            }
            step /= 2.0;
        }
    }

    Ok(accepted)
}

#[test]
fn test_rejected_candidates_are_kept_in_order() {
    let _guard = lock();
    let parser = TraceParser::new(TraceFormat::new("ratio")).unwrap();

    let diagnosis = capture_and_parse(&parser, || damped_iteration(&[2.0, 0.0, 4.0])).unwrap();
    let accepted = diagnosis.output.as_ref().unwrap();

    // 0.0 is retried at steps 1, 0.5, 0.25, 0.125 before giving up.
    assert_eq!(accepted.len(), 3);
    assert_eq!(
        diagnosis.outcome.scalars().unwrap(),
        vec![0.5, f64::INFINITY, f64::INFINITY, f64::INFINITY, f64::INFINITY, 0.25]
    );

    let degenerate = diagnosis.degenerate();
    assert_eq!(degenerate.len(), 4);
    assert_eq!(degenerate[0].record_index, 1);
    assert!(degenerate
        .iter()
        .all(|d| d.kind == DegenerateKind::PositiveInfinity));
}

#[test]
fn test_probe_trace_count_matches_evaluations() {
    let _guard = lock();
    let parser = TraceParser::new(TraceFormat::default()).unwrap();
    let config = ProbeConfig {
        iterations: 500,
        ..Default::default()
    };

    let diagnosis = capture_and_parse(&parser, || run_probe(&config)).unwrap();
    let summary = diagnosis.summary();
    let result = diagnosis.output.unwrap();

    assert_eq!(diagnosis.outcome.len(), result.evaluations);
    assert_eq!(summary.record_count, 501);
    // The walk stays near zero, so it proposes the pole at 0.5.
    assert!(summary.degenerate_count > 0);
    // A proposal on the pole is always rejected.
    assert!(result.samples.iter().all(|&x| x != config.pole));
}

#[test]
fn test_probe_is_deterministic_for_a_seed() {
    let _guard = lock();
    let parser = TraceParser::new(TraceFormat::default()).unwrap();
    let config = ProbeConfig {
        iterations: 100,
        seed: 7,
        ..Default::default()
    };

    let first = capture_and_parse(&parser, || run_probe(&config)).unwrap();
    let second = capture_and_parse(&parser, || run_probe(&config)).unwrap();

    assert_eq!(first.captured.text(), second.captured.text());
    assert_eq!(first.output.unwrap(), second.output.unwrap());
}
