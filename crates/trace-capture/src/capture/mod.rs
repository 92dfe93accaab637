//! Capture of trace output.
//!
//! This module handles:
//! - The process-wide sink trace lines are emitted to
//! - Scoped sessions that redirect the sink into memory
//!
//! Only one session can be active per process.

pub mod session;
pub mod sink;

// Re-export main types
pub use session::{begin_capture, end_capture, with_capture, CaptureSession, CapturedText};
pub use sink::{emit, emit_line, flush, is_capturing, reset_target, set_target, SinkTarget};

/// Serializes unit tests that touch the process-wide sink
#[cfg(test)]
pub(crate) static TEST_SINK_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CaptureError;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

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

    fn lock() -> std::sync::MutexGuard<'static, ()> {
        TEST_SINK_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn test_capture_redirects_and_restores() {
        let _guard = lock();
        let base = SharedBuffer::default();
        set_target(Box::new(base.clone())).unwrap();

        crate::trace_println!("before").unwrap();
        let session = begin_capture().unwrap();
        assert!(is_capturing());
        crate::trace_println!("Delta = {}", 1.5).unwrap();
        let captured = end_capture(session).unwrap();
        crate::trace_println!("after").unwrap();

        assert_eq!(captured.text(), "Delta = 1.5\n");
        assert_eq!(base.contents(), "before\nafter\n");
        assert!(!is_capturing());

        reset_target().unwrap();
    }

    #[test]
    fn test_second_session_is_rejected() {
        let _guard = lock();
        let session = begin_capture().unwrap();

        assert!(matches!(begin_capture(), Err(CaptureError::AlreadyCapturing)));
        assert!(matches!(
            set_target(Box::new(io::sink())),
            Err(CaptureError::AlreadyCapturing)
        ));

        session.end().unwrap();
        assert!(!is_capturing());
    }

    #[test]
    fn test_dropped_session_restores_sink() {
        let _guard = lock();
        {
            let _session = begin_capture().unwrap();
            emit_line("lost").unwrap();
        }

        assert!(!is_capturing());
        let session = begin_capture().unwrap();
        assert!(session.end().unwrap().is_empty());
    }
}
