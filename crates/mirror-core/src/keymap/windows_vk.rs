//! Windows Virtual Key (VK) code table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//!
//! `VK_TO_KEY_TABLE` is a compile-time array of 256 [`KeySymbol`] values
//! indexed by VK code.  Position 0x41 holds `Char('a')` because `VK_A` is
//! 0x41.  VK codes with no entry hold `Unidentified(0)`.
//!
//! The `VK_OEM_*` punctuation keys are absent: their meaning depends on the
//! active keyboard layout, so they reach the target as character input.

use super::KeySymbol;

/// Translates a key symbol to a Windows Virtual Key code.
///
/// Returns `None` when the table has no entry for the key; callers treat that
/// as "no mapping", not as a fault.
pub fn key_to_vk(key: KeySymbol) -> Option<u8> {
    let key = key.normalized();
    if matches!(key, KeySymbol::Unidentified(_)) {
        return None;
    }
    // Linear scan over 256 entries.
    VK_TO_KEY_TABLE
        .iter()
        .position(|&mapped| mapped == key)
        .map(|vk| vk as u8)
}

/// Translates a Windows Virtual Key code to a key symbol.
///
/// VK codes without an entry yield `Unidentified(vk)`.
pub fn vk_to_key(vk: u8) -> KeySymbol {
    match VK_TO_KEY_TABLE[vk as usize] {
        KeySymbol::Unidentified(_) => KeySymbol::Unidentified(vk as u32),
        key => key,
    }
}

const VK_TO_KEY_TABLE: [KeySymbol; 256] = {
    use KeySymbol::*;
    let mut t = [Unidentified(0); 256];

    // ── Letters (VK_A=0x41 … VK_Z=0x5A) ───────────────────────────────────────
    let mut i = 0u8;
    while i < 26 {
        t[0x41 + i as usize] = Char((b'a' + i) as char);
        i += 1;
    }

    // ── Digit row (VK_0=0x30 … VK_9=0x39) ─────────────────────────────────────
    let mut d = 0u8;
    while d < 10 {
        t[0x30 + d as usize] = Char((b'0' + d) as char);
        d += 1;
    }

    // ── Control keys ──────────────────────────────────────────────────────────
    t[0x0D] = Enter;        // VK_RETURN
    t[0x1B] = Escape;       // VK_ESCAPE
    t[0x08] = Backspace;    // VK_BACK
    t[0x09] = Tab;          // VK_TAB
    t[0x20] = Space;        // VK_SPACE
    t[0x14] = CapsLock;     // VK_CAPITAL
    t[0x91] = ScrollLock;   // VK_SCROLL
    t[0x13] = Pause;        // VK_PAUSE
    t[0x2C] = PrintScreen;  // VK_SNAPSHOT
    t[0x5D] = ContextMenu;  // VK_APPS

    // ── Navigation ────────────────────────────────────────────────────────────
    t[0x2D] = Insert;       // VK_INSERT
    t[0x2E] = Delete;       // VK_DELETE
    t[0x24] = Home;         // VK_HOME
    t[0x23] = End;          // VK_END
    t[0x21] = PageUp;       // VK_PRIOR
    t[0x22] = PageDown;     // VK_NEXT
    t[0x25] = ArrowLeft;
    t[0x26] = ArrowUp;
    t[0x27] = ArrowRight;
    t[0x28] = ArrowDown;

    // ── Function keys (VK_F1=0x70 … VK_F12=0x7B) ──────────────────────────────
    t[0x70] = F1;
    t[0x71] = F2;
    t[0x72] = F3;
    t[0x73] = F4;
    t[0x74] = F5;
    t[0x75] = F6;
    t[0x76] = F7;
    t[0x77] = F8;
    t[0x78] = F9;
    t[0x79] = F10;
    t[0x7A] = F11;
    t[0x7B] = F12;

    // ── Numpad (VK_NUMPAD0=0x60 … VK_NUMPAD9=0x69) ────────────────────────────
    t[0x60] = Numpad0;
    t[0x61] = Numpad1;
    t[0x62] = Numpad2;
    t[0x63] = Numpad3;
    t[0x64] = Numpad4;
    t[0x65] = Numpad5;
    t[0x66] = Numpad6;
    t[0x67] = Numpad7;
    t[0x68] = Numpad8;
    t[0x69] = Numpad9;
    t[0x6A] = NumpadMultiply;   // VK_MULTIPLY
    t[0x6B] = NumpadAdd;        // VK_ADD
    t[0x6D] = NumpadSubtract;   // VK_SUBTRACT
    t[0x6E] = NumpadDecimal;    // VK_DECIMAL
    t[0x6F] = NumpadDivide;     // VK_DIVIDE
    t[0x90] = NumLock;          // VK_NUMLOCK

    // ── Modifiers ─────────────────────────────────────────────────────────────
    t[0x10] = Shift;        // VK_SHIFT
    t[0x11] = Control;      // VK_CONTROL
    t[0x12] = Alt;          // VK_MENU
    t[0xA0] = ShiftLeft;    // VK_LSHIFT
    t[0xA1] = ShiftRight;   // VK_RSHIFT
    t[0xA2] = ControlLeft;  // VK_LCONTROL
    t[0xA3] = ControlRight; // VK_RCONTROL
    t[0xA4] = AltLeft;      // VK_LMENU
    t[0xA5] = AltRight;     // VK_RMENU
    t[0x5B] = MetaLeft;     // VK_LWIN
    t[0x5C] = MetaRight;    // VK_RWIN

    t
};
