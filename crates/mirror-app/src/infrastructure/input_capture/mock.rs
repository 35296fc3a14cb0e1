//! Mock input source for unit testing.
//!
//! Allows tests to inject synthetic [`RawInputEvent`]s without requiring
//! a running Windows message loop or OS hooks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use mirror_core::RawInputEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{CaptureError, CapturedEvent, InputSource};

/// A mock implementation of [`InputSource`].
///
/// Events can be queued before [`start`](InputSource::start) with
/// [`scripted`](Self::scripted); they are delivered as soon as capture starts,
/// after which the stream closes as if the hooks were torn down.
#[derive(Debug, Default)]
pub struct MockInputSource {
    sender: Mutex<Option<UnboundedSender<CapturedEvent>>>,
    script: Mutex<Option<Vec<RawInputEvent>>>,
    refuse_start: AtomicBool,
    start_count: AtomicUsize,
    stop_count: AtomicUsize,
}

impl MockInputSource {
    /// Creates a source that stays open until stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source that replays `events` on start and then ends the stream.
    pub fn scripted(events: Vec<RawInputEvent>) -> Self {
        Self {
            script: Mutex::new(Some(events)),
            ..Self::default()
        }
    }

    /// Creates a source whose `start()` fails like a hook that cannot be installed.
    pub fn failing() -> Self {
        Self {
            refuse_start: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// Injects a synthetic event, as if captured from hardware.
    ///
    /// Returns `false` when capture is not running or the consumer is gone.
    pub fn inject_event(&self, event: RawInputEvent) -> bool {
        match self.sender.lock().expect("lock poisoned").as_ref() {
            Some(sender) => sender.send(CapturedEvent::now(event)).is_ok(),
            None => false,
        }
    }

    /// Returns `true` between a successful `start()` and `stop()`.
    pub fn is_running(&self) -> bool {
        self.sender.lock().expect("lock poisoned").is_some()
    }

    /// Number of successful `start()` calls.
    pub fn start_count(&self) -> usize {
        self.start_count.load(Ordering::SeqCst)
    }

    /// Number of `stop()` calls.
    pub fn stop_count(&self) -> usize {
        self.stop_count.load(Ordering::SeqCst)
    }
}

impl InputSource for MockInputSource {
    fn start(&self) -> Result<UnboundedReceiver<CapturedEvent>, CaptureError> {
        if self.refuse_start.load(Ordering::SeqCst) {
            return Err(CaptureError::KeyboardHookInstallFailed(
                "access is denied".to_string(),
            ));
        }
        let mut guard = self.sender.lock().expect("lock poisoned");
        if guard.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.start_count.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().expect("lock poisoned").take() {
            Some(events) => {
                for event in events {
                    let _ = tx.send(CapturedEvent::now(event));
                }
                // Dropping `tx` ends the stream once the script is consumed.
            }
            None => *guard = Some(tx),
        }
        Ok(rx)
    }

    fn stop(&self) {
        self.stop_count.fetch_add(1, Ordering::SeqCst);
        // Drop the sender to close the channel
        *self.sender.lock().expect("lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use mirror_core::MouseButton;

    use super::*;

    #[test]
    fn test_mock_input_source_starts_and_receives_events() {
        // Arrange
        let source = MockInputSource::new();
        let mut rx = source.start().expect("start should succeed");

        // Act
        let sent = source.inject_event(RawInputEvent::MouseMove { x: 100, y: 200 });

        // Assert
        assert!(sent);
        assert_eq!(
            rx.try_recv().expect("should receive event").event,
            RawInputEvent::MouseMove { x: 100, y: 200 }
        );
    }

    #[test]
    fn test_mock_input_source_stop_closes_channel() {
        // Arrange
        let source = MockInputSource::new();
        let mut rx = source.start().expect("start should succeed");

        // Act
        source.stop();

        // Assert – channel should be disconnected
        assert!(rx.try_recv().is_err(), "channel should be closed after stop()");
        assert!(!source.inject_event(RawInputEvent::Char { character: 'a' }));
        assert_eq!(source.stop_count(), 1);
    }

    #[test]
    fn test_inject_before_start_is_rejected() {
        let source = MockInputSource::new();
        assert!(!source.inject_event(RawInputEvent::Char { character: 'a' }));
    }

    #[test]
    fn test_second_start_while_running_fails() {
        // Arrange
        let source = MockInputSource::new();
        let _rx = source.start().expect("first start should succeed");

        // Act
        let second = source.start();

        // Assert
        assert!(matches!(second, Err(CaptureError::AlreadyRunning)));
    }

    #[test]
    fn test_scripted_source_replays_then_closes() {
        // Arrange
        let source = MockInputSource::scripted(vec![
            RawInputEvent::MouseMove { x: 1, y: 2 },
            RawInputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
                x: 1,
                y: 2,
            },
        ]);

        // Act
        let mut rx = source.start().expect("start should succeed");

        // Assert
        let first = rx.try_recv().expect("first scripted event");
        let second = rx.try_recv().expect("second scripted event");
        assert!(matches!(first.event, RawInputEvent::MouseMove { .. }));
        assert!(matches!(second.event, RawInputEvent::MouseButton { .. }));
        assert!(first.captured_at <= second.captured_at);
        assert!(matches!(
            rx.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_failing_source_reports_hook_error() {
        let source = MockInputSource::failing();
        assert!(matches!(
            source.start(),
            Err(CaptureError::KeyboardHookInstallFailed(_))
        ));
        assert_eq!(source.start_count(), 0);
    }
}
