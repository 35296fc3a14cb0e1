//! Key identity and the fixed key → virtual-key table.
//!
//! Captured keys are described by a [`KeySymbol`].  Translation to the target
//! windowing system goes through a single compile-time table (see
//! [`windows_vk`]).  A key with no entry is a normal outcome (`None`): the
//! translator then falls back to character input when the event carries a
//! printable character.
//!
//! Modifier state is not tracked.  Shift/Ctrl/Alt are forwarded as ordinary
//! key-down/key-up messages and no compound codes are synthesised; target
//! applications that query the async key state will not see the modifiers.
//! This is a known gap.

pub mod windows_vk;

pub use windows_vk::{key_to_vk, vk_to_key};

/// Identity of a captured key, independent of any keyboard layout table.
///
/// Letter and digit keys are reported as [`KeySymbol::Char`]; keys that the
/// capture layer cannot name are [`KeySymbol::Unidentified`] with the
/// platform's raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySymbol {
    // Editing / control
    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    CapsLock,
    ScrollLock,
    Pause,
    PrintScreen,
    ContextMenu,

    // Navigation
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Numpad
    NumLock,
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadMultiply,
    NumpadAdd,
    NumpadSubtract,
    NumpadDecimal,
    NumpadDivide,

    // Modifiers.  The side-less variants are what generic listeners report.
    Shift,
    ShiftLeft,
    ShiftRight,
    Control,
    ControlLeft,
    ControlRight,
    Alt,
    AltLeft,
    AltRight,
    MetaLeft,
    MetaRight,

    /// A key identified by the character it types (letters, digits, symbols).
    Char(char),
    /// A key the capture layer could not name; carries the raw platform code.
    Unidentified(u32),
}

impl KeySymbol {
    /// Canonical form used for table lookups.
    ///
    /// ASCII letters fold to lower case and `Char(' ')` becomes [`KeySymbol::Space`].
    pub fn normalized(self) -> KeySymbol {
        match self {
            KeySymbol::Char(' ') => KeySymbol::Space,
            KeySymbol::Char(c) if c.is_ascii_uppercase() => {
                KeySymbol::Char(c.to_ascii_lowercase())
            }
            other => other,
        }
    }
}
