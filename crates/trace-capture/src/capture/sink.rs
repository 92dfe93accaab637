//! Process-wide swappable text sink.
//!
//! Trace emissions go through [`emit`]. Outside a capture session they reach
//! the base target (stdout unless replaced with [`set_target`]); while a
//! session is active they are appended to the session buffer instead.

use crate::utils::error::CaptureError;
use log::debug;
use once_cell::sync::Lazy;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Writer that receives trace lines when no capture is active
pub type SinkTarget = Box<dyn Write + Send>;

pub(crate) struct SinkState {
    pub(crate) target: SinkTarget,
    /// `Some` exactly while a capture session is active
    pub(crate) buffer: Option<Vec<u8>>,
}

static SINK: Lazy<Mutex<SinkState>> = Lazy::new(|| {
    Mutex::new(SinkState {
        target: Box::new(io::stdout()),
        buffer: None,
    })
});

/// Lock the sink, recovering from poisoning
///
/// Every update to the state is a single assignment, so a panic while the
/// lock is held cannot leave it half-written.
pub(crate) fn lock_sink() -> MutexGuard<'static, SinkState> {
    SINK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Write one trace line (a newline is appended) to the current sink
///
/// **Public** - main emission entry point, usually reached through
/// [`trace_println!`](crate::trace_println)
pub fn emit(args: fmt::Arguments<'_>) -> io::Result<()> {
    let mut guard = lock_sink();
    let state = &mut *guard;

    match &mut state.buffer {
        Some(buffer) => {
            buffer.write_fmt(args)?;
            buffer.push(b'\n');
            Ok(())
        }
        None => {
            state.target.write_fmt(args)?;
            state.target.write_all(b"\n")
        }
    }
}

/// Write an already formatted line to the current sink
pub fn emit_line(line: &str) -> io::Result<()> {
    emit(format_args!("{}", line))
}

/// Replace the base target, returning the previous one
///
/// # Errors
/// * `CaptureError::AlreadyCapturing` - the target cannot change under an
///   active session, since the session restores to it on exit
pub fn set_target(target: SinkTarget) -> Result<SinkTarget, CaptureError> {
    let mut sink = lock_sink();

    if sink.buffer.is_some() {
        return Err(CaptureError::AlreadyCapturing);
    }

    if let Err(e) = sink.target.flush() {
        debug!("Flushing previous sink target failed: {}", e);
    }

    Ok(std::mem::replace(&mut sink.target, target))
}

/// Point the base target back at stdout
pub fn reset_target() -> Result<SinkTarget, CaptureError> {
    set_target(Box::new(io::stdout()))
}

/// Whether a capture session currently owns the sink
pub fn is_capturing() -> bool {
    lock_sink().buffer.is_some()
}

/// Flush the base target (no-op for the capture buffer)
pub fn flush() -> io::Result<()> {
    let mut sink = lock_sink();
    if sink.buffer.is_some() {
        return Ok(());
    }
    sink.target.flush()
}

/// Emit a formatted trace line through the process-wide sink.
///
/// Works like `println!` but returns the `io::Result` of the write.
///
/// ```ignore
/// trace_println!("Delta = {}", delta)?;
/// ```
#[macro_export]
macro_rules! trace_println {
    ($($arg:tt)*) => {
        $crate::capture::emit(::std::format_args!($($arg)*))
    };
}
