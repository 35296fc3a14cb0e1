//! Raw input events as produced by the global capture layer.
//!
//! Events are immutable once created.  Mouse coordinates are absolute virtual
//! screen coordinates at the moment of capture (multi-monitor aware, may be
//! negative to the left of or above the primary monitor).

use crate::keymap::KeySymbol;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    X1,
    X2,
}

/// A captured input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    /// The cursor moved to an absolute screen position.
    MouseMove { x: i32, y: i32 },
    /// A mouse button was pressed or released at a screen position.
    MouseButton {
        button: MouseButton,
        pressed: bool,
        x: i32,
        y: i32,
    },
    /// A wheel was scrolled while the cursor was at a screen position.
    MouseWheel {
        /// Multiples of 120 per notch; positive = away from the user (or right).
        delta: i16,
        /// `true` for the horizontal (tilt) wheel.
        horizontal: bool,
        x: i32,
        y: i32,
    },
    /// A key was pressed or released.
    Key {
        key: KeySymbol,
        /// Hardware scan code as reported by the capture layer (0 if unknown).
        scan_code: u16,
        pressed: bool,
        /// The printable character the key produces on its own, if any.
        text: Option<char>,
    },
    /// Character input not tied to a single key (IME commit, injected text).
    Char { character: char },
}

impl RawInputEvent {
    /// Returns the absolute screen position carried by mouse events.
    pub fn screen_point(&self) -> Option<(i32, i32)> {
        match *self {
            RawInputEvent::MouseMove { x, y }
            | RawInputEvent::MouseButton { x, y, .. }
            | RawInputEvent::MouseWheel { x, y, .. } => Some((x, y)),
            RawInputEvent::Key { .. } | RawInputEvent::Char { .. } => None,
        }
    }

    /// Returns `true` for events that need window geometry to translate.
    pub fn is_pointer(&self) -> bool {
        self.screen_point().is_some()
    }
}
