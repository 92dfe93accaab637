//! Scoped capture sessions over the process-wide sink.
//!
//! A [`CaptureSession`] is a guard: the sink is restored when the session
//! is ended explicitly or when it is dropped on any other exit path
//! (early return, `?`, panic unwind).

use super::sink::lock_sink;
use crate::utils::config::LINE_TERMINATOR;
use crate::utils::error::CaptureError;
use log::{debug, warn};
use std::io::Write;
use std::time::{Duration, Instant};

/// Text accumulated by one finished capture session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedText {
    text: String,
    duration: Duration,
}

impl CapturedText {
    pub fn new(text: String, duration: Duration) -> Self {
        Self { text, duration }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Emitted lines in order, without terminators
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text
            .split_terminator(LINE_TERMINATOR)
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Wall-clock time the session was open
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Guard for an active capture session
///
/// **Public** - returned by [`begin_capture`]
#[derive(Debug)]
#[must_use = "dropping the session immediately ends the capture"]
pub struct CaptureSession {
    started: Instant,
    finished: bool,
}

/// Redirect the sink into a fresh in-memory buffer
///
/// **Public** - opens a session; prefer [`with_capture`] when the captured
/// computation is a single closure
///
/// # Errors
/// * `CaptureError::AlreadyCapturing` - another session is active
pub fn begin_capture() -> Result<CaptureSession, CaptureError> {
    let mut sink = lock_sink();

    if sink.buffer.is_some() {
        return Err(CaptureError::AlreadyCapturing);
    }

    // Pending base output must land before anything captured.
    if let Err(e) = sink.target.flush() {
        warn!("Failed to flush sink before capture: {}", e);
    }

    sink.buffer = Some(Vec::new());
    debug!("Capture session started");

    Ok(CaptureSession {
        started: Instant::now(),
        finished: false,
    })
}

/// Restore the sink and return the captured text
///
/// **Public** - equivalent to [`CaptureSession::end`]
pub fn end_capture(session: CaptureSession) -> Result<CapturedText, CaptureError> {
    session.end()
}

impl CaptureSession {
    /// Restore the sink and return everything emitted during the session
    ///
    /// The base target is reactivated unconditionally and then flushed.
    ///
    /// # Errors
    /// * `CaptureError::SinkRestoreFailure` - the restored target could not
    ///   be flushed; the error still carries the captured text
    pub fn end(mut self) -> Result<CapturedText, CaptureError> {
        self.finished = true;

        let (bytes, flushed) = {
            let mut sink = lock_sink();
            let bytes = sink.buffer.take();
            let flushed = sink.target.flush();
            (bytes, flushed)
        };

        let bytes = bytes.unwrap_or_else(|| {
            warn!("Capture buffer missing at session end");
            Vec::new()
        });
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let duration = self.started.elapsed();

        debug!(
            "Capture session ended: {} bytes in {:.3}s",
            text.len(),
            duration.as_secs_f64()
        );

        match flushed {
            Ok(()) => Ok(CapturedText::new(text, duration)),
            Err(source) => Err(CaptureError::SinkRestoreFailure {
                captured: text,
                source,
            }),
        }
    }

    /// Time since the session began
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        let discarded = lock_sink().buffer.take().map(|b| b.len()).unwrap_or(0);
        debug!(
            "Capture session dropped without end; discarded {} bytes",
            discarded
        );
    }
}

/// Run `computation` with the sink captured
///
/// **Public** - scoped form of [`begin_capture`] / [`end_capture`]
///
/// The computation's own result is returned untouched next to the text, so
/// a computation that fails still yields what it emitted. A panic inside the
/// computation restores the sink while unwinding.
///
/// # Example
/// ```ignore
/// let (result, captured) = with_capture(|| run_sampler(&config))?;
/// ```
pub fn with_capture<R>(
    computation: impl FnOnce() -> R,
) -> Result<(R, CapturedText), CaptureError> {
    let session = begin_capture()?;
    let output = computation();
    let captured = session.end()?;
    Ok((output, captured))
}
