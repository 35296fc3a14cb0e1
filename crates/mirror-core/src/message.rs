//! Target messages and their native `(msg, wParam, lParam)` packing.
//!
//! A [`TargetMessage`] is built by the translator for one target window and
//! consumed exactly once by the dispatcher.  [`TargetMessage::packed`] expands
//! it into the ordered list of native messages that must be posted for it;
//! the dispatcher posts that list in order for each target.

use crate::domain::input::MouseButton;

/// Window message identifiers (winuser.h).
pub mod wm {
    pub const KEYDOWN: u32 = 0x0100;
    pub const KEYUP: u32 = 0x0101;
    pub const CHAR: u32 = 0x0102;
    pub const MOUSEMOVE: u32 = 0x0200;
    pub const LBUTTONDOWN: u32 = 0x0201;
    pub const LBUTTONUP: u32 = 0x0202;
    pub const RBUTTONDOWN: u32 = 0x0204;
    pub const RBUTTONUP: u32 = 0x0205;
    pub const MBUTTONDOWN: u32 = 0x0207;
    pub const MBUTTONUP: u32 = 0x0208;
    pub const MOUSEWHEEL: u32 = 0x020A;
    pub const XBUTTONDOWN: u32 = 0x020B;
    pub const XBUTTONUP: u32 = 0x020C;
    pub const MOUSEHWHEEL: u32 = 0x020E;
}

/// `MK_*` button-state flags carried in the wParam of mouse messages.
mod mk {
    pub const LBUTTON: usize = 0x0001;
    pub const RBUTTON: usize = 0x0002;
    pub const MBUTTON: usize = 0x0010;
    pub const XBUTTON1: usize = 0x0020;
    pub const XBUTTON2: usize = 0x0040;
}

const XBUTTON1: usize = 0x0001;
const XBUTTON2: usize = 0x0002;

/// VK codes that Windows flags as extended keys (bit 24 of lParam).
const EXTENDED_VKS: &[u8] = &[
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, // navigation cluster
    0x2D, 0x2E, // Insert, Delete
    0x5B, 0x5C, 0x5D, // Win keys, Apps
    0x6F, // numpad divide
    0x90, // NumLock
    0xA3, 0xA5, // right Ctrl, right Alt
];

/// A message addressed to one target window.
///
/// Mouse positions are in the target's client coordinates, except for wheel
/// messages which the native contract defines in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMessage {
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseButton {
        button: MouseButton,
        pressed: bool,
        x: i32,
        y: i32,
    },
    MouseWheel {
        delta: i16,
        horizontal: bool,
        /// Screen coordinates.
        x: i32,
        y: i32,
    },
    Key {
        vk: u8,
        scan_code: u16,
        pressed: bool,
    },
    Char {
        character: char,
    },
}

/// One native window message ready to be posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedMessage {
    pub msg: u32,
    pub w_param: usize,
    pub l_param: isize,
}

impl PackedMessage {
    const fn new(msg: u32, w_param: usize, l_param: isize) -> Self {
        Self {
            msg,
            w_param,
            l_param,
        }
    }
}

impl TargetMessage {
    /// Expands the message into the native messages to post, in posting order.
    ///
    /// - A button press/release is preceded by a `WM_MOUSEMOVE` to the same
    ///   point so the target sees the cursor where the click happens.
    /// - A character outside the Basic Multilingual Plane becomes two
    ///   `WM_CHAR` messages, high surrogate first.
    pub fn packed(&self) -> Vec<PackedMessage> {
        match *self {
            TargetMessage::MouseMove { x, y } => {
                vec![PackedMessage::new(wm::MOUSEMOVE, 0, make_lparam(x, y))]
            }
            TargetMessage::MouseButton {
                button,
                pressed,
                x,
                y,
            } => {
                let (msg, w_param) = button_message(button, pressed);
                let l_param = make_lparam(x, y);
                vec![
                    PackedMessage::new(wm::MOUSEMOVE, 0, l_param),
                    PackedMessage::new(msg, w_param, l_param),
                ]
            }
            TargetMessage::MouseWheel {
                delta,
                horizontal,
                x,
                y,
            } => {
                let msg = if horizontal {
                    wm::MOUSEHWHEEL
                } else {
                    wm::MOUSEWHEEL
                };
                let w_param = ((delta as u16) as usize) << 16;
                vec![PackedMessage::new(msg, w_param, make_lparam(x, y))]
            }
            TargetMessage::Key {
                vk,
                scan_code,
                pressed,
            } => {
                let msg = if pressed { wm::KEYDOWN } else { wm::KEYUP };
                vec![PackedMessage::new(
                    msg,
                    vk as usize,
                    key_lparam(vk, scan_code, pressed),
                )]
            }
            TargetMessage::Char { character } => {
                let mut units = [0u16; 2];
                character
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|&unit| PackedMessage::new(wm::CHAR, unit as usize, 1))
                    .collect()
            }
        }
    }
}

/// `MAKELPARAM(x, y)`: two signed 16-bit coordinates in the low 32 bits.
fn make_lparam(x: i32, y: i32) -> isize {
    let lo = (x as u16) as u32;
    let hi = (y as u16) as u32;
    ((hi << 16) | lo) as isize
}

fn button_message(button: MouseButton, pressed: bool) -> (u32, usize) {
    let held = |flag: usize| if pressed { flag } else { 0 };
    match (button, pressed) {
        (MouseButton::Left, true) => (wm::LBUTTONDOWN, held(mk::LBUTTON)),
        (MouseButton::Left, false) => (wm::LBUTTONUP, 0),
        (MouseButton::Right, true) => (wm::RBUTTONDOWN, held(mk::RBUTTON)),
        (MouseButton::Right, false) => (wm::RBUTTONUP, 0),
        (MouseButton::Middle, true) => (wm::MBUTTONDOWN, held(mk::MBUTTON)),
        (MouseButton::Middle, false) => (wm::MBUTTONUP, 0),
        (MouseButton::X1, p) => (
            if p { wm::XBUTTONDOWN } else { wm::XBUTTONUP },
            (XBUTTON1 << 16) | held(mk::XBUTTON1),
        ),
        (MouseButton::X2, p) => (
            if p { wm::XBUTTONDOWN } else { wm::XBUTTONUP },
            (XBUTTON2 << 16) | held(mk::XBUTTON2),
        ),
    }
}

/// Keystroke lParam: repeat count 1, scan code, extended flag, and for
/// key-up the previous-state and transition bits.
fn key_lparam(vk: u8, scan_code: u16, pressed: bool) -> isize {
    let mut bits: u32 = 1 | (((scan_code & 0xFF) as u32) << 16);
    if EXTENDED_VKS.contains(&vk) {
        bits |= 1 << 24;
    }
    if !pressed {
        bits |= (1 << 30) | (1 << 31);
    }
    bits as isize
}
