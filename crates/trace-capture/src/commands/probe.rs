//! Probe command implementation.
//!
//! Runs the proposal probe under capture, parses every emitted value and
//! reports where degenerate values appeared.

use super::models::{ProbeArgs, ProbeOutcome};
use super::utils::print_summary;
use crate::diagnostics::{capture_and_parse, run_probe, ProbeConfig};
use crate::output::{write_captured_text, write_report};
use crate::parser::{TraceFormat, TraceParser, TraceReport};
use crate::utils::config::MAX_PROBE_ITERATIONS;
use crate::utils::error::TraceError;
use anyhow::{Context, Result};
use log::{info, warn};
use std::time::Instant;

/// Execute the probe command
///
/// **Public** - main entry point called from main.rs
pub fn execute_probe(args: ProbeArgs) -> Result<ProbeOutcome> {
    let start_time = Instant::now();
    let format = TraceFormat::new(args.label.clone());
    let parser = TraceParser::new(format.clone()).context("Invalid trace label")?;

    let config = ProbeConfig {
        iterations: args.iterations,
        seed: args.seed,
        step: args.step,
        pole: args.pole,
        format,
        ..Default::default()
    };

    info!(
        "Step 1/3: Running probe under capture ({} iterations)...",
        config.iterations
    );
    let diagnosis = match capture_and_parse(&parser, || run_probe(&config)) {
        Ok(diagnosis) => diagnosis,
        Err(err) => {
            // Keep whatever was captured before a teardown fault.
            if let (TraceError::Capture(capture_err), Some(path)) = (&err, &args.raw_output) {
                if let Some(text) = capture_err.captured_text() {
                    warn!("Saving captured text after capture failure");
                    write_captured_text(text, path)?;
                }
            }
            return Err(err).context("Failed to capture probe output");
        }
    };

    if let Some(path) = &args.raw_output {
        write_captured_text(diagnosis.captured.text(), path)
            .context("Failed to write captured text")?;
        info!("✓ Captured text written to: {}", path.display());
    }

    info!("Step 2/3: Locating degenerate values...");
    let degenerate = diagnosis.degenerate();
    match degenerate.first() {
        Some(first) => info!(
            "First degenerate value ({}) at record {} of {}",
            first.kind,
            first.record_index,
            diagnosis.outcome.len()
        ),
        None => info!("No degenerate values in {} records", diagnosis.outcome.len()),
    }

    info!("Step 3/3: Writing output...");
    let report = TraceReport::from_outcome(parser.format(), "probe", &diagnosis.outcome);
    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    if args.print_summary {
        print_summary(&report, &diagnosis.outcome.records);
    }

    let result = diagnosis.output.context("Probe failed while emitting")?;

    info!(
        "Probe completed in {:.2}s (acceptance rate {:.1}%)",
        start_time.elapsed().as_secs_f64(),
        result.acceptance_rate() * 100.0
    );

    Ok(ProbeOutcome {
        result,
        report,
        degenerate,
    })
}

/// Validate probe arguments
pub fn validate_probe_args(args: &ProbeArgs) -> Result<()> {
    if args.iterations == 0 {
        anyhow::bail!("iterations must be greater than 0");
    }

    if args.iterations > MAX_PROBE_ITERATIONS {
        anyhow::bail!("iterations is too large (max {})", MAX_PROBE_ITERATIONS);
    }

    if !args.step.is_finite() || args.step <= 0.0 {
        anyhow::bail!("step must be a positive finite number");
    }

    if !args.pole.is_finite() {
        anyhow::bail!("pole must be finite");
    }

    if args.label.is_empty() {
        anyhow::bail!("Label cannot be empty");
    }

    Ok(())
}
