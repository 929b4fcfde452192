//! Linux evdev key and button codes (`KEY_*` / `BTN_*`).
//!
//! These are the numeric codes the kernel expects in the `code` field of an
//! `EV_KEY` input event.  Values come from `linux/input-event-codes.h`.
//!
//! # Key codes vs. characters (for beginners)
//!
//! An evdev key code names a **physical key position**, not a character.
//! `KEY_A` (30) is the key in the "A" position of a US keyboard; what character
//! it produces is decided later by the keyboard layout of whatever desktop
//! session consumes the event.  That is why the virtual device only ever deals
//! in key codes: it behaves like a plain keyboard, and the host OS does the
//! rest.
//!
//! Mouse buttons live in the same code space (`BTN_LEFT` = 0x110 and up) and
//! are sent with the same `EV_KEY` event type.

use serde::{Deserialize, Serialize};

/// An evdev `KEY_*` / `BTN_*` code the virtual device can emit.
///
/// The numeric value of each variant is its kernel code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum KeyCode {
    // Top row
    Esc = 1,
    Digit1 = 2,
    Digit2 = 3,
    Digit3 = 4,
    Digit4 = 5,
    Digit5 = 6,
    Digit6 = 7,
    Digit7 = 8,
    Digit8 = 9,
    Digit9 = 10,
    Digit0 = 11,
    Minus = 12,
    Equal = 13,
    Backspace = 14,
    Tab = 15,

    // Letters, in keyboard-row order as the kernel numbers them
    Q = 16,
    W = 17,
    E = 18,
    R = 19,
    T = 20,
    Y = 21,
    U = 22,
    I = 23,
    O = 24,
    P = 25,
    LeftBrace = 26,
    RightBrace = 27,
    Enter = 28,
    LeftCtrl = 29,
    A = 30,
    S = 31,
    D = 32,
    F = 33,
    G = 34,
    H = 35,
    J = 36,
    K = 37,
    L = 38,
    Semicolon = 39,
    Apostrophe = 40,
    Grave = 41,
    LeftShift = 42,
    Backslash = 43,
    Z = 44,
    X = 45,
    C = 46,
    V = 47,
    B = 48,
    N = 49,
    M = 50,
    Comma = 51,
    Dot = 52,
    Slash = 53,
    RightShift = 54,
    KpAsterisk = 55,
    LeftAlt = 56,
    Space = 57,
    CapsLock = 58,

    // Function keys
    F1 = 59,
    F2 = 60,
    F3 = 61,
    F4 = 62,
    F5 = 63,
    F6 = 64,
    F7 = 65,
    F8 = 66,
    F9 = 67,
    F10 = 68,
    F11 = 87,
    F12 = 88,

    // Right-hand modifiers and navigation cluster
    RightCtrl = 97,
    RightAlt = 100,
    Home = 102,
    Up = 103,
    PageUp = 104,
    Left = 105,
    Right = 106,
    End = 107,
    Down = 108,
    PageDown = 109,
    Insert = 110,
    Delete = 111,
    LeftMeta = 125,
    RightMeta = 126,

    // Mouse buttons
    BtnLeft = 0x110,
    BtnRight = 0x111,
    BtnMiddle = 0x112,
}

impl KeyCode {
    /// Every code in declaration order.
    ///
    /// This is the complete set of `EV_KEY` codes the device knows about; the
    /// capability set declared at registration is built from it.
    pub const ALL: &'static [KeyCode] = &[
        KeyCode::Esc,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
        KeyCode::Digit0,
        KeyCode::Minus,
        KeyCode::Equal,
        KeyCode::Backspace,
        KeyCode::Tab,
        KeyCode::Q,
        KeyCode::W,
        KeyCode::E,
        KeyCode::R,
        KeyCode::T,
        KeyCode::Y,
        KeyCode::U,
        KeyCode::I,
        KeyCode::O,
        KeyCode::P,
        KeyCode::LeftBrace,
        KeyCode::RightBrace,
        KeyCode::Enter,
        KeyCode::LeftCtrl,
        KeyCode::A,
        KeyCode::S,
        KeyCode::D,
        KeyCode::F,
        KeyCode::G,
        KeyCode::H,
        KeyCode::J,
        KeyCode::K,
        KeyCode::L,
        KeyCode::Semicolon,
        KeyCode::Apostrophe,
        KeyCode::Grave,
        KeyCode::LeftShift,
        KeyCode::Backslash,
        KeyCode::Z,
        KeyCode::X,
        KeyCode::C,
        KeyCode::V,
        KeyCode::B,
        KeyCode::N,
        KeyCode::M,
        KeyCode::Comma,
        KeyCode::Dot,
        KeyCode::Slash,
        KeyCode::RightShift,
        KeyCode::KpAsterisk,
        KeyCode::LeftAlt,
        KeyCode::Space,
        KeyCode::CapsLock,
        KeyCode::F1,
        KeyCode::F2,
        KeyCode::F3,
        KeyCode::F4,
        KeyCode::F5,
        KeyCode::F6,
        KeyCode::F7,
        KeyCode::F8,
        KeyCode::F9,
        KeyCode::F10,
        KeyCode::F11,
        KeyCode::F12,
        KeyCode::RightCtrl,
        KeyCode::RightAlt,
        KeyCode::Home,
        KeyCode::Up,
        KeyCode::PageUp,
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::End,
        KeyCode::Down,
        KeyCode::PageDown,
        KeyCode::Insert,
        KeyCode::Delete,
        KeyCode::LeftMeta,
        KeyCode::RightMeta,
        KeyCode::BtnLeft,
        KeyCode::BtnRight,
        KeyCode::BtnMiddle,
    ];

    /// Returns the raw kernel code.
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_well_known_codes_match_kernel_header() {
        assert_eq!(KeyCode::Esc.as_u16(), 1);
        assert_eq!(KeyCode::A.as_u16(), 30);
        assert_eq!(KeyCode::Enter.as_u16(), 28);
        assert_eq!(KeyCode::LeftCtrl.as_u16(), 29);
        assert_eq!(KeyCode::F11.as_u16(), 87);
        assert_eq!(KeyCode::LeftMeta.as_u16(), 125);
        assert_eq!(KeyCode::BtnLeft.as_u16(), 0x110);
        assert_eq!(KeyCode::BtnMiddle.as_u16(), 0x112);
    }

    #[test]
    fn test_all_contains_each_code_exactly_once() {
        let unique: HashSet<u16> = KeyCode::ALL.iter().map(|k| k.as_u16()).collect();
        assert_eq!(unique.len(), KeyCode::ALL.len());
    }

    #[test]
    fn test_all_lists_codes_in_ascending_order() {
        // Declaration order doubles as kernel order, which keeps the
        // UI_SET_KEYBIT sequence easy to compare against a trace.
        let codes: Vec<u16> = KeyCode::ALL.iter().map(|k| k.as_u16()).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }
}
