//! Native windowing adapter.
//!
//! The [`WindowSystem`] trait is everything MirrorBox needs from the host
//! windowing system.  Every call must complete in bounded time: enumeration
//! and title retrieval read window-manager state without sending messages to
//! the window, and posting never waits for the target to process the message.
//!
//! # Platform implementations
//!
//! | Module    | OS      | API used                                              |
//! |-----------|---------|-------------------------------------------------------|
//! | `windows` | Windows | `EnumWindows`, `GetWindowTextW`, `PostMessageW`, ...  |
//! | `mock`    | any     | in-memory window list, records posted messages        |

use mirror_core::{PackedMessage, Rect, WindowHandle, WindowInfo};
use serde::Serialize;
use thiserror::Error;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::Win32WindowSystem as NativeWindowSystem;

/// Error type for windowing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WindowError {
    /// The handle no longer names a window (it was closed).
    #[error("window {0} no longer exists")]
    Gone(WindowHandle),

    /// An OS call failed for another reason (access denied, queue full, ...).
    #[error("{call} failed: {message}")]
    Api {
        call: &'static str,
        message: String,
    },

    /// The current platform has no windowing adapter.
    #[error("window management is not supported on this platform")]
    Unsupported,
}

/// Thread and process that own a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowOwner {
    pub thread_id: u32,
    pub process_id: u32,
}

/// Abstraction over the host windowing system.
///
/// The production implementation calls Win32; tests use [`mock::MockWindowSystem`].
pub trait WindowSystem: Send + Sync {
    /// Lists visible top-level windows with a non-blank title, in z-order.
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>, WindowError>;

    /// Returns the current title of `handle`.
    fn window_title(&self, handle: WindowHandle) -> Result<String, WindowError>;

    /// Returns the client area of `handle` in screen coordinates.
    fn client_bounds(&self, handle: WindowHandle) -> Result<Rect, WindowError>;

    /// Returns the outer frame of `handle` in screen coordinates.
    fn window_bounds(&self, handle: WindowHandle) -> Result<Rect, WindowError>;

    /// Returns the thread and process that created `handle`.
    fn window_owner(&self, handle: WindowHandle) -> Result<WindowOwner, WindowError>;

    /// Returns the primary screen in screen coordinates.
    fn screen_bounds(&self) -> Rect;

    /// Returns `true` while `handle` names an existing window.
    fn is_window(&self, handle: WindowHandle) -> bool;

    /// Returns the window that currently has keyboard focus at the desktop level.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Places `message` in the message queue of `handle` and returns without
    /// waiting for it to be processed.
    fn post_message(&self, handle: WindowHandle, message: PackedMessage)
        -> Result<(), WindowError>;
}
