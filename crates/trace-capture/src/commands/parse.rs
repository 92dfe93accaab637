//! Parse command implementation.
//!
//! The parse command:
//! 1. Reads captured text from a file or stdin
//! 2. Resolves the parser configuration
//! 3. Parses trace lines into records
//! 4. Writes the JSON report

use super::models::{ParseArgs, STDIN_PATH};
use super::utils::print_summary;
use crate::output::write_report;
use crate::parser::{load_parser_config, MalformedPolicy, ParserConfig, TraceParser, TraceReport};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Execute the parse command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report built from the input
///
/// # Errors
/// * Input or config read failures
/// * Malformed trace lines under the abort policy
/// * File write errors
pub fn execute_parse(args: ParseArgs) -> Result<TraceReport> {
    let start_time = Instant::now();

    info!("Step 1/3: Reading captured text...");
    let text = read_input(&args.input)?;
    debug!("Read {} bytes from {}", text.len(), args.input.display());

    let config = resolve_config(&args)?;
    info!(
        "Step 2/3: Parsing with prefix '{}{}' (policy: {})",
        config.label, config.separator, config.policy
    );

    let parser = TraceParser::from_config(&config).context("Invalid parser configuration")?;
    let outcome = parser
        .parse(&text)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let report = TraceReport::from_outcome(
        parser.format(),
        args.input.display().to_string(),
        &outcome,
    );

    info!("Step 3/3: Writing output...");
    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    if args.print_summary {
        print_summary(&report, &outcome.records);
    }

    info!(
        "Parse completed in {:.2}s ({} records)",
        start_time.elapsed().as_secs_f64(),
        report.record_count
    );

    Ok(report)
}

/// Validate parse arguments
///
/// **Public** - can be called before execute_parse for early validation
pub fn validate_parse_args(args: &ParseArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.input != Path::new(STDIN_PATH) && !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    if let Some(policy) = &args.policy {
        policy.parse::<MalformedPolicy>()?;
    }

    if let Some(config) = &args.config {
        if !config.is_file() {
            anyhow::bail!("Config file not found: {}", config.display());
        }
    }

    if let Some(label) = &args.label {
        let separator = args.separator.as_deref().unwrap_or("");
        if label.is_empty() && separator.is_empty() {
            anyhow::bail!("Label and separator cannot both be empty");
        }
    }

    Ok(())
}

/// Config file (or defaults) with CLI overrides applied
///
/// **Private** - internal helper for execute_parse
fn resolve_config(args: &ParseArgs) -> Result<ParserConfig> {
    let mut config = match &args.config {
        Some(path) => load_parser_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ParserConfig::default(),
    };

    if let Some(label) = &args.label {
        config.label = label.clone();
    }

    if let Some(separator) = &args.separator {
        config.separator = separator.clone();
    }

    if let Some(policy) = &args.policy {
        config.policy = policy.parse()?;
    }

    Ok(config)
}

/// Read the input file, or stdin for "-"
///
/// **Private** - internal helper for execute_parse
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new(STDIN_PATH) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
