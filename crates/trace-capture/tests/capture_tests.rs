//! Tests share the process-wide sink, so each one holds SINK_LOCK.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use trace_capture::capture::{
    begin_capture, emit_line, end_capture, is_capturing, reset_target, set_target, with_capture,
};
use trace_capture::trace_println;
use trace_capture::utils::error::CaptureError;

static SINK_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    SINK_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Accepts writes but refuses to flush
struct UnflushableWriter;

impl Write for UnflushableWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
    }
}

#[test]
fn test_sink_restored_after_end_capture() {
    let _guard = lock();
    let base = SharedBuffer::default();
    set_target(Box::new(base.clone())).unwrap();

    trace_println!("Delta = 1.0").unwrap();
    let session = begin_capture().unwrap();
    trace_println!("Delta = {}", 2.0).unwrap();
    trace_println!("Delta = inf").unwrap();
    let captured = end_capture(session).unwrap();
    trace_println!("Delta = 3.0").unwrap();

    assert_eq!(captured.text(), "Delta = 2\nDelta = inf\n");
    assert_eq!(captured.lines().collect::<Vec<_>>(), vec!["Delta = 2", "Delta = inf"]);
    assert_eq!(base.contents(), "Delta = 1.0\nDelta = 3.0\n");

    reset_target().unwrap();
}

#[test]
fn test_capture_is_not_reentrant() {
    let _guard = lock();
    let outer = begin_capture().unwrap();

    let inner = with_capture(|| ());
    assert!(matches!(inner, Err(CaptureError::AlreadyCapturing)));
    assert!(is_capturing());

    outer.end().unwrap();
    assert!(!is_capturing());
}

#[test]
fn test_failed_computation_still_returns_text() {
    let _guard = lock();

    let (result, captured) = with_capture(|| -> Result<(), String> {
        emit_line("Delta = 0.5").map_err(|e| e.to_string())?;
        Err("division by zero".to_string())
    })
    .unwrap();

    assert_eq!(result, Err("division by zero".to_string()));
    assert_eq!(captured.text(), "Delta = 0.5\n");
    assert!(!is_capturing());
}

#[test]
fn test_panic_inside_capture_restores_sink() {
    let _guard = lock();
    let base = SharedBuffer::default();
    set_target(Box::new(base.clone())).unwrap();

    let outcome = std::panic::catch_unwind(|| {
        with_capture(|| {
            emit_line("Delta = 1.0").unwrap();
            panic!("computation blew up");
        })
    });

    assert!(outcome.is_err());
    assert!(!is_capturing());

    emit_line("after panic").unwrap();
    assert_eq!(base.contents(), "after panic\n");

    reset_target().unwrap();
}

#[test]
fn test_restore_failure_keeps_captured_text() {
    let _guard = lock();
    set_target(Box::new(UnflushableWriter)).unwrap();

    let session = begin_capture().unwrap();
    emit_line("Delta = -inf").unwrap();
    let err = session.end().unwrap_err();

    match &err {
        CaptureError::SinkRestoreFailure { captured, source } => {
            assert_eq!(captured, "Delta = -inf\n");
            assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
        }
        other => panic!("expected SinkRestoreFailure, got {:?}", other),
    }
    assert_eq!(err.captured_text(), Some("Delta = -inf\n"));
    assert!(!is_capturing());

    reset_target().unwrap();
}
