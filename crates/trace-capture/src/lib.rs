//! Trace Capture library
//!
//! Captures the textual trace lines a computation emits through the
//! process-wide sink, then parses them into numeric records so degenerate
//! intermediate values (`inf`, `nan`) can be located after the fact.
//!
//! ```ignore
//! use trace_capture::diagnostics::capture_and_parse;
//! use trace_capture::parser::{TraceFormat, TraceParser};
//!
//! let parser = TraceParser::new(TraceFormat::new("Delta"))?;
//! let diagnosis = capture_and_parse(&parser, || {
//!     for x in [1.0, 0.5, 0.0] {
//!         trace_capture::trace_println!("Delta = {}", 1.0 / x)?;
//!     }
//!     Ok::<_, std::io::Error>(())
//! })?;
//! assert_eq!(diagnosis.outcome.scalars(), Some(vec![1.0, 2.0, f64::INFINITY]));
//! ```

pub mod capture;
pub mod commands;
pub mod diagnostics;
pub mod output;
pub mod parser;
pub mod utils;
