//! Window model shared by the resolver, translator and dispatcher.
//!
//! A [`WindowHandle`] is an opaque identifier owned by the host windowing
//! system.  It stays valid only while the window exists, so any handle held
//! across dispatch cycles must be revalidated before a message is posted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a live top-level window (an `HWND` on Windows).
///
/// The value `0` is the null handle and never names a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
    /// The null handle.
    pub const NULL: WindowHandle = WindowHandle(0);

    /// Returns `true` for the null handle.
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// An axis-aligned rectangle in pixels; `right` and `bottom` are exclusive.
///
/// Used for window client areas expressed in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Creates a rectangle from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from an origin and a size.
    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    /// Width in pixels; negative when the edges are inverted.
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels; negative when the edges are inverted.
    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns `true` when the rectangle encloses no pixels.
    ///
    /// Minimised windows report a zero-sized client area.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})-({}, {}) [{}x{}]",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

/// A visible top-level window and its title, as returned by enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
}

/// A window that currently satisfies a title query.
///
/// Transient: recomputed every time resolution runs and never kept for a
/// whole session, since target windows open, close and get renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedTarget {
    pub handle: WindowHandle,
    pub title: String,
    /// The query pattern that matched, as written in the configuration.
    pub matched_by: String,
}
