//! Mock window system for unit testing.
//!
//! Holds an in-memory list of top-level windows and records every message
//! posted to them, so resolution and dispatch can be tested without a desktop.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use mirror_core::{PackedMessage, Rect, WindowHandle, WindowInfo};

use super::{WindowError, WindowOwner, WindowSystem};

#[derive(Debug, Clone)]
struct MockWindow {
    handle: WindowHandle,
    title: String,
    bounds: Rect,
    frame: Rect,
    owner: WindowOwner,
    visible: bool,
}

/// In-memory [`WindowSystem`].
///
/// Windows are enumerated in insertion order.  A window's frame starts equal
/// to its client area and the screen is 1920x1080 until changed.  Posting to a closed window
/// fails with [`WindowError::Gone`]; posting to a handle registered with
/// [`reject_posts_to`](Self::reject_posts_to) fails with an API error.
#[derive(Debug, Default)]
pub struct MockWindowSystem {
    windows: Mutex<Vec<MockWindow>>,
    foreground: Mutex<Option<WindowHandle>>,
    posted: Mutex<Vec<(WindowHandle, PackedMessage)>>,
    rejecting: Mutex<HashSet<WindowHandle>>,
    enumeration_fails: AtomicBool,
    screen: Mutex<Option<Rect>>,
}

impl MockWindowSystem {
    /// Creates an empty desktop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a visible window with the given title and client bounds.
    pub fn add_window(&self, handle: WindowHandle, title: &str, bounds: Rect) {
        self.insert(handle, title, bounds, true);
    }

    /// Adds a window that exists but is hidden from enumeration.
    pub fn add_hidden_window(&self, handle: WindowHandle, title: &str, bounds: Rect) {
        self.insert(handle, title, bounds, false);
    }

    /// Destroys a window; its handle becomes stale.
    pub fn close_window(&self, handle: WindowHandle) {
        self.windows
            .lock()
            .expect("lock poisoned")
            .retain(|w| w.handle != handle);
        let mut fg = self.foreground.lock().expect("lock poisoned");
        if *fg == Some(handle) {
            *fg = None;
        }
    }

    /// Changes the title of an existing window.
    pub fn set_title(&self, handle: WindowHandle, title: &str) {
        self.update(handle, |w| w.title = title.to_string());
    }

    /// Moves or resizes an existing window's client area.
    pub fn set_bounds(&self, handle: WindowHandle, bounds: Rect) {
        self.update(handle, |w| w.bounds = bounds);
    }

    /// Sets the outer frame of an existing window.
    pub fn set_frame(&self, handle: WindowHandle, frame: Rect) {
        self.update(handle, |w| w.frame = frame);
    }

    /// Sets the thread and process that own an existing window.
    pub fn set_owner(&self, handle: WindowHandle, owner: WindowOwner) {
        self.update(handle, |w| w.owner = owner);
    }

    /// Changes the primary screen rectangle.
    pub fn set_screen(&self, screen: Rect) {
        *self.screen.lock().expect("lock poisoned") = Some(screen);
    }

    /// Makes `handle` the foreground window (`None` clears it).
    pub fn set_foreground(&self, handle: Option<WindowHandle>) {
        *self.foreground.lock().expect("lock poisoned") = handle;
    }

    /// Makes every subsequent post to `handle` fail with an API error.
    pub fn reject_posts_to(&self, handle: WindowHandle) {
        self.rejecting.lock().expect("lock poisoned").insert(handle);
    }

    /// Makes enumeration fail (or succeed again).
    pub fn fail_enumeration(&self, fail: bool) {
        self.enumeration_fails.store(fail, Ordering::SeqCst);
    }

    /// Returns every posted message in posting order.
    pub fn posted(&self) -> Vec<(WindowHandle, PackedMessage)> {
        self.posted.lock().expect("lock poisoned").clone()
    }

    /// Returns the messages posted to one window, in posting order.
    pub fn posted_to(&self, handle: WindowHandle) -> Vec<PackedMessage> {
        self.posted
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, m)| *m)
            .collect()
    }

    /// Forgets all recorded posts.
    pub fn clear_posted(&self) {
        self.posted.lock().expect("lock poisoned").clear();
    }

    fn insert(&self, handle: WindowHandle, title: &str, bounds: Rect, visible: bool) {
        self.windows.lock().expect("lock poisoned").push(MockWindow {
            handle,
            title: title.to_string(),
            bounds,
            frame: bounds,
            owner: WindowOwner::default(),
            visible,
        });
    }

    fn update(&self, handle: WindowHandle, f: impl FnOnce(&mut MockWindow)) {
        let mut windows = self.windows.lock().expect("lock poisoned");
        if let Some(w) = windows.iter_mut().find(|w| w.handle == handle) {
            f(w);
        }
    }

    fn window(&self, handle: WindowHandle) -> Result<MockWindow, WindowError> {
        self.windows
            .lock()
            .expect("lock poisoned")
            .iter()
            .find(|w| w.handle == handle)
            .cloned()
            .ok_or(WindowError::Gone(handle))
    }
}

impl WindowSystem for MockWindowSystem {
    fn enumerate_windows(&self) -> Result<Vec<WindowInfo>, WindowError> {
        if self.enumeration_fails.load(Ordering::SeqCst) {
            return Err(WindowError::Api {
                call: "EnumWindows",
                message: "desktop is not accessible".to_string(),
            });
        }
        Ok(self
            .windows
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|w| w.visible && !w.title.trim().is_empty())
            .map(|w| WindowInfo {
                handle: w.handle,
                title: w.title.clone(),
            })
            .collect())
    }

    fn window_title(&self, handle: WindowHandle) -> Result<String, WindowError> {
        self.window(handle).map(|w| w.title)
    }

    fn client_bounds(&self, handle: WindowHandle) -> Result<Rect, WindowError> {
        self.window(handle).map(|w| w.bounds)
    }

    fn window_bounds(&self, handle: WindowHandle) -> Result<Rect, WindowError> {
        self.window(handle).map(|w| w.frame)
    }

    fn window_owner(&self, handle: WindowHandle) -> Result<WindowOwner, WindowError> {
        self.window(handle).map(|w| w.owner)
    }

    fn screen_bounds(&self) -> Rect {
        self.screen
            .lock()
            .expect("lock poisoned")
            .unwrap_or(Rect::new(0, 0, 1920, 1080))
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        self.window(handle).is_ok()
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        *self.foreground.lock().expect("lock poisoned")
    }

    fn post_message(
        &self,
        handle: WindowHandle,
        message: PackedMessage,
    ) -> Result<(), WindowError> {
        self.window(handle)?;
        if self.rejecting.lock().expect("lock poisoned").contains(&handle) {
            return Err(WindowError::Api {
                call: "PostMessageW",
                message: "access is denied".to_string(),
            });
        }
        self.posted
            .lock()
            .expect("lock poisoned")
            .push((handle, message));
        Ok(())
    }
}
