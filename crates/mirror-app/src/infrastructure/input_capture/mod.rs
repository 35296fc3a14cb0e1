//! Global input capture.
//!
//! On Windows, this installs low-level keyboard and mouse hooks (WH_KEYBOARD_LL,
//! WH_MOUSE_LL) on a dedicated Win32 message loop thread.  Captured events are
//! converted to [`RawInputEvent`]s inside the hook callback, stamped with the
//! capture time, and pushed into an unbounded Tokio channel consumed by the
//! mirroring session.
//!
//! Capture is passive: every event is forwarded to the next hook in the chain,
//! so the source window keeps receiving its own input.
//!
//! # Testability
//!
//! The [`InputSource`] trait lets tests feed synthetic events through
//! [`mock::MockInputSource`] without any OS hooks.

use std::time::Instant;

use mirror_core::RawInputEvent;
use tokio::sync::mpsc::UnboundedReceiver;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::HookInputSource as NativeInputSource;

/// Error type for input capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to install keyboard hook: {0}")]
    KeyboardHookInstallFailed(String),
    #[error("failed to install mouse hook: {0}")]
    MouseHookInstallFailed(String),
    #[error("input capture is already running")]
    AlreadyRunning,
    #[error("capture thread did not report back: {0}")]
    ThreadFailed(String),
    #[error("platform not supported: {0}")]
    UnsupportedPlatform(String),
}

/// A captured event and the moment the hook saw it.
///
/// The session compares `captured_at` with its foreground samples, so an
/// event still queued from before the source was last seen idle is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedEvent {
    pub event: RawInputEvent,
    pub captured_at: Instant,
}

impl CapturedEvent {
    /// Stamps `event` with the current time.
    pub fn now(event: RawInputEvent) -> Self {
        Self {
            event,
            captured_at: Instant::now(),
        }
    }
}

/// Trait abstracting the global input stream.
///
/// The production implementation uses Windows hooks; tests use [`mock::MockInputSource`].
pub trait InputSource: Send + Sync {
    /// Installs the capture and returns the stream of captured events.
    ///
    /// Returns only after the capture is actually armed, or with the reason it
    /// could not be.
    fn start(&self) -> Result<UnboundedReceiver<CapturedEvent>, CaptureError>;

    /// Removes the capture and closes the event stream.  Idempotent.
    fn stop(&self);
}
