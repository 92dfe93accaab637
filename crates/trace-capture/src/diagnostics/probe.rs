//! Random-walk Metropolis probe with an instrumented intermediate value.
//!
//! The log-density of the walk contains `delta = scale / (x - pole)`, and
//! every evaluation emits a `Delta = ...` trace line through the sink,
//! whether the proposal is accepted or rejected. Proposals move on a grid of
//! `step`, so a proposal can land exactly on the pole and emit `inf`.

use crate::parser::{format_trace_line, TraceFormat, TraceValue};
use crate::utils::config::{
    DEFAULT_PROBE_ITERATIONS, DEFAULT_PROBE_POLE, DEFAULT_PROBE_SEED, DEFAULT_PROBE_STEP,
};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// Proposal offsets, in grid steps
const MOVES: [f64; 4] = [-2.0, -1.0, 1.0, 2.0];

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    pub iterations: usize,
    pub seed: u64,
    pub start: f64,
    pub step: f64,
    pub pole: f64,
    pub scale: f64,
    /// Format of the emitted trace lines
    pub format: TraceFormat,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_PROBE_ITERATIONS,
            seed: DEFAULT_PROBE_SEED,
            start: 0.0,
            step: DEFAULT_PROBE_STEP,
            pole: DEFAULT_PROBE_POLE,
            scale: 1.0,
            format: TraceFormat::default(),
        }
    }
}

/// What the walk did (the emitted values are in the captured text)
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// Chain state after each iteration
    pub samples: Vec<f64>,
    pub accepted: usize,
    /// Number of log-density evaluations, i.e. trace lines emitted
    pub evaluations: usize,
}

impl ProbeResult {
    pub fn acceptance_rate(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.accepted as f64 / self.samples.len() as f64
        }
    }
}

struct Evaluator<'a> {
    config: &'a ProbeConfig,
    evaluations: usize,
}

impl Evaluator<'_> {
    /// Log-density at `x`, emitting the intermediate `delta`
    fn log_density(&mut self, x: f64) -> io::Result<f64> {
        let delta = self.config.scale / (x - self.config.pole);
        self.evaluations += 1;

        let line = format_trace_line(&self.config.format, &TraceValue::Scalar(delta));
        crate::capture::emit_line(&line)?;

        Ok(-0.5 * x * x - 0.01 * delta * delta)
    }
}

/// Run the walk, emitting one trace line per evaluation
///
/// # Errors
/// Propagates write failures from the sink.
pub fn run_probe(config: &ProbeConfig) -> io::Result<ProbeResult> {
    debug!(
        "Running probe: {} iterations, seed {}, pole {}",
        config.iterations, config.seed, config.pole
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut evaluator = Evaluator {
        config,
        evaluations: 0,
    };

    let mut current = config.start;
    let mut current_lp = evaluator.log_density(current)?;
    let mut samples = Vec::with_capacity(config.iterations);
    let mut accepted = 0;

    for _ in 0..config.iterations {
        let offset = MOVES[rng.random_range(0..MOVES.len())];
        let proposal = current + offset * config.step;
        let proposal_lp = evaluator.log_density(proposal)?;

        // A -inf proposal never passes; a -inf current state always yields.
        let u: f64 = rng.random();
        if u.ln() < proposal_lp - current_lp {
            current = proposal;
            current_lp = proposal_lp;
            accepted += 1;
        }

        samples.push(current);
    }

    debug!(
        "Probe finished: {} accepted of {} proposals",
        accepted, config.iterations
    );

    Ok(ProbeResult {
        samples,
        accepted,
        evaluations: evaluator.evaluations,
    })
}
