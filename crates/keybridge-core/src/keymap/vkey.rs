//! Engine virtual key identifiers.
//!
//! The transliteration engine does not see hardware codes.  It receives an
//! abstract *virtual key* numbered after the Windows `VK_*` constants, which
//! is the numbering keyboard rule files are compiled against.
//!
//! # What is a virtual key? (for beginners)
//!
//! A virtual key names a *logical* key position on a US base layout:
//! `VirtualKey::KeyA` is "the key where A sits on a US keyboard", whatever
//! letter the user's keycaps show.  Keyboard rules say things like
//! "`+ [K_A] > 'α'`", so the bridge's job is to turn the host's hardware
//! code into that position before the engine sees it.
//!
//! # The `Unused` sentinel
//!
//! [`VirtualKey::Unused`] (value `0x00`) marks hardware codes the engine
//! never receives: modifier keys themselves, lock keys, and anything past
//! F12.  The bridge must not submit these to the engine.

use serde::{Deserialize, Serialize};

/// Engine virtual key (Windows VK numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum VirtualKey {
    // Control keys
    Backspace = 0x08,
    Tab = 0x09,
    Enter = 0x0D,
    Escape = 0x1B,
    Space = 0x20,

    // Digits (VK 0x30–0x39)
    Digit0 = 0x30,
    Digit1 = 0x31,
    Digit2 = 0x32,
    Digit3 = 0x33,
    Digit4 = 0x34,
    Digit5 = 0x35,
    Digit6 = 0x36,
    Digit7 = 0x37,
    Digit8 = 0x38,
    Digit9 = 0x39,

    // Letters (VK 0x41–0x5A)
    KeyA = 0x41,
    KeyB = 0x42,
    KeyC = 0x43,
    KeyD = 0x44,
    KeyE = 0x45,
    KeyF = 0x46,
    KeyG = 0x47,
    KeyH = 0x48,
    KeyI = 0x49,
    KeyJ = 0x4A,
    KeyK = 0x4B,
    KeyL = 0x4C,
    KeyM = 0x4D,
    KeyN = 0x4E,
    KeyO = 0x4F,
    KeyP = 0x50,
    KeyQ = 0x51,
    KeyR = 0x52,
    KeyS = 0x53,
    KeyT = 0x54,
    KeyU = 0x55,
    KeyV = 0x56,
    KeyW = 0x57,
    KeyX = 0x58,
    KeyY = 0x59,
    KeyZ = 0x5A,

    // Numpad
    Numpad0 = 0x60,
    Numpad1 = 0x61,
    Numpad2 = 0x62,
    Numpad3 = 0x63,
    Numpad4 = 0x64,
    Numpad5 = 0x65,
    Numpad6 = 0x66,
    Numpad7 = 0x67,
    Numpad8 = 0x68,
    Numpad9 = 0x69,
    NumpadMultiply = 0x6A,
    NumpadAdd = 0x6B,
    NumpadSubtract = 0x6D,
    NumpadDecimal = 0x6E,

    // Function keys (VK 0x70–0x7B)
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,

    // Punctuation (OEM keys)
    Semicolon = 0xBA,
    Equal = 0xBB,
    Comma = 0xBC,
    Hyphen = 0xBD,
    Period = 0xBE,
    Slash = 0xBF,
    Backquote = 0xC0,
    BracketLeft = 0xDB,
    Backslash = 0xDC,
    BracketRight = 0xDD,
    Quote = 0xDE,
    /// The extra key between left Shift and Z on ISO keyboards.
    Oem102 = 0xE2,

    /// Sentinel for hardware codes the engine never receives.
    Unused = 0x00,
}

impl VirtualKey {
    /// Returns the numeric VK value passed to the engine.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns `true` for the [`VirtualKey::Unused`] sentinel.
    pub fn is_unused(self) -> bool {
        self == VirtualKey::Unused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_values_follow_ascii_uppercase() {
        assert_eq!(VirtualKey::KeyA.as_u16(), u16::from(b'A'));
        assert_eq!(VirtualKey::KeyZ.as_u16(), u16::from(b'Z'));
    }

    #[test]
    fn test_digit_values_follow_ascii_digits() {
        assert_eq!(VirtualKey::Digit0.as_u16(), u16::from(b'0'));
        assert_eq!(VirtualKey::Digit9.as_u16(), u16::from(b'9'));
    }

    #[test]
    fn test_unused_is_zero() {
        assert_eq!(VirtualKey::Unused.as_u16(), 0);
        assert!(VirtualKey::Unused.is_unused());
        assert!(!VirtualKey::Space.is_unused());
    }
}
