//! Linux scan code to engine virtual key translation table.
//!
//! # Where do scan codes come from? (for beginners)
//!
//! X11 reports a *hardware keycode* with every key event.  On Linux that
//! keycode is the kernel's evdev code plus 8, so subtracting 8 yields the
//! evdev scan code (`KEY_A = 0x1E`, `KEY_ESC = 0x01`, ...).  Scan codes name
//! physical positions, which is exactly what the engine's virtual keys name
//! too, so a fixed table is enough to translate between them.
//!
//! Only the main block, the keypad and F1–F12 are mapped.  Modifiers, lock
//! keys and everything past `KEY_F12` (0x58) are [`VirtualKey::Unused`].

use super::vkey::VirtualKey;

/// Offset between an X11 hardware keycode and the evdev scan code.
pub const X11_KEYCODE_OFFSET: i64 = 8;

/// Evdev scan code of the left Ctrl key.
pub const SCAN_LEFT_CTRL: i64 = 29;
/// Evdev scan code of the left Alt key.
pub const SCAN_LEFT_ALT: i64 = 56;
/// Evdev scan code of the right Ctrl key.
pub const SCAN_RIGHT_CTRL: i64 = 97;
/// Evdev scan code of the right Alt (AltGr) key.
pub const SCAN_RIGHT_ALT: i64 = 100;
/// Evdev scan code of the Backspace key.
pub const SCAN_BACKSPACE: i64 = 14;

/// Converts an X11 hardware keycode to an evdev scan code.
///
/// The result may be negative or above 255 for codes the table does not
/// cover; [`scan_to_vkey`] treats those as out of range.
pub fn x11_keycode_to_scan(keycode: u32) -> i64 {
    i64::from(keycode) - X11_KEYCODE_OFFSET
}

/// Translates a scan code to the engine's virtual key.
///
/// Returns `None` when the scan code lies outside `0..=255`.  In-range codes
/// without a mapping return `Some(VirtualKey::Unused)`.
pub fn scan_to_vkey(scan: i64) -> Option<VirtualKey> {
    let index = usize::try_from(scan).ok()?;
    SCAN_TO_VKEY_TABLE.get(index).copied()
}

/// Scan code → virtual key table indexed by evdev code (0x00–0xFF).
const SCAN_TO_VKEY_TABLE: [VirtualKey; 256] = {
    use VirtualKey::*;
    let mut t = [Unused; 256];

    // ── Top row ───────────────────────────────────────────────────────────────
    t[0x01] = Escape;
    t[0x02] = Digit1;
    t[0x03] = Digit2;
    t[0x04] = Digit3;
    t[0x05] = Digit4;
    t[0x06] = Digit5;
    t[0x07] = Digit6;
    t[0x08] = Digit7;
    t[0x09] = Digit8;
    t[0x0A] = Digit9;
    t[0x0B] = Digit0;
    t[0x0C] = Hyphen; // KEY_MINUS
    t[0x0D] = Equal; // KEY_EQUAL
    t[0x0E] = Backspace;
    t[0x0F] = Tab;

    // ── QWERTY row ────────────────────────────────────────────────────────────
    t[0x10] = KeyQ;
    t[0x11] = KeyW;
    t[0x12] = KeyE;
    t[0x13] = KeyR;
    t[0x14] = KeyT;
    t[0x15] = KeyY;
    t[0x16] = KeyU;
    t[0x17] = KeyI;
    t[0x18] = KeyO;
    t[0x19] = KeyP;
    t[0x1A] = BracketLeft; // KEY_LEFTBRACE
    t[0x1B] = BracketRight; // KEY_RIGHTBRACE
    t[0x1C] = Enter;
    // 0x1D KEY_LEFTCTRL stays Unused

    // ── Home row ──────────────────────────────────────────────────────────────
    t[0x1E] = KeyA;
    t[0x1F] = KeyS;
    t[0x20] = KeyD;
    t[0x21] = KeyF;
    t[0x22] = KeyG;
    t[0x23] = KeyH;
    t[0x24] = KeyJ;
    t[0x25] = KeyK;
    t[0x26] = KeyL;
    t[0x27] = Semicolon;
    t[0x28] = Quote; // KEY_APOSTROPHE
    t[0x29] = Backquote; // KEY_GRAVE
    // 0x2A KEY_LEFTSHIFT stays Unused
    t[0x2B] = Backslash;

    // ── Bottom row ────────────────────────────────────────────────────────────
    t[0x2C] = KeyZ;
    t[0x2D] = KeyX;
    t[0x2E] = KeyC;
    t[0x2F] = KeyV;
    t[0x30] = KeyB;
    t[0x31] = KeyN;
    t[0x32] = KeyM;
    t[0x33] = Comma;
    t[0x34] = Period; // KEY_DOT
    t[0x35] = Slash;
    // 0x36 KEY_RIGHTSHIFT stays Unused
    t[0x37] = NumpadMultiply; // KEY_KPASTERISK
    // 0x38 KEY_LEFTALT stays Unused
    t[0x39] = Space;
    // 0x3A KEY_CAPSLOCK stays Unused

    // ── F1–F10 ────────────────────────────────────────────────────────────────
    t[0x3B] = F1;
    t[0x3C] = F2;
    t[0x3D] = F3;
    t[0x3E] = F4;
    t[0x3F] = F5;
    t[0x40] = F6;
    t[0x41] = F7;
    t[0x42] = F8;
    t[0x43] = F9;
    t[0x44] = F10;
    // 0x45 KEY_NUMLOCK, 0x46 KEY_SCROLLLOCK stay Unused

    // ── Keypad ────────────────────────────────────────────────────────────────
    t[0x47] = Numpad7;
    t[0x48] = Numpad8;
    t[0x49] = Numpad9;
    t[0x4A] = NumpadSubtract;
    t[0x4B] = Numpad4;
    t[0x4C] = Numpad5;
    t[0x4D] = Numpad6;
    t[0x4E] = NumpadAdd;
    t[0x4F] = Numpad1;
    t[0x50] = Numpad2;
    t[0x51] = Numpad3;
    t[0x52] = Numpad0;
    t[0x53] = NumpadDecimal; // KEY_KPDOT
    // 0x54 padding, 0x55 KEY_ZENKAKUHANKAKU stay Unused
    t[0x56] = Oem102; // KEY_102ND

    // ── F11–F12 ───────────────────────────────────────────────────────────────
    t[0x57] = F11;
    t[0x58] = F12;

    t
};

#[cfg(test)]
mod tests {
    use super::*;
    use VirtualKey::*;

    const STANDARD_MAPPINGS: &[(i64, VirtualKey)] = &[
        (0x01, Escape), (0x02, Digit1), (0x0B, Digit0), (0x0C, Hyphen), (0x0D, Equal),
        (0x0E, Backspace), (0x0F, Tab), (0x10, KeyQ), (0x19, KeyP), (0x1A, BracketLeft),
        (0x1B, BracketRight), (0x1C, Enter), (0x1E, KeyA), (0x26, KeyL), (0x27, Semicolon),
        (0x28, Quote), (0x29, Backquote), (0x2B, Backslash), (0x2C, KeyZ), (0x32, KeyM),
        (0x33, Comma), (0x34, Period), (0x35, Slash), (0x37, NumpadMultiply), (0x39, Space),
        (0x3B, F1), (0x44, F10), (0x47, Numpad7), (0x4A, NumpadSubtract), (0x4E, NumpadAdd),
        (0x52, Numpad0), (0x53, NumpadDecimal), (0x56, Oem102), (0x57, F11), (0x58, F12),
    ];

    #[test]
    fn test_standard_scan_codes_map_to_expected_vkeys() {
        for &(scan, expected) in STANDARD_MAPPINGS {
            assert_eq!(
                scan_to_vkey(scan),
                Some(expected),
                "scan_to_vkey(0x{scan:02X}) should return {expected:?}"
            );
        }
    }

    #[test]
    fn test_modifier_scan_codes_are_unused() {
        for scan in [SCAN_LEFT_CTRL, SCAN_LEFT_ALT, SCAN_RIGHT_CTRL, SCAN_RIGHT_ALT, 0x2A, 0x36, 0x3A] {
            assert_eq!(scan_to_vkey(scan), Some(Unused), "scan 0x{scan:02X} must be unused");
        }
    }

    #[test]
    fn test_codes_past_f12_are_unused() {
        for scan in 0x59..=0xFF {
            assert_eq!(scan_to_vkey(scan), Some(Unused));
        }
    }

    #[test]
    fn test_out_of_range_scan_codes_return_none() {
        assert_eq!(scan_to_vkey(-8), None);
        assert_eq!(scan_to_vkey(-1), None);
        assert_eq!(scan_to_vkey(256), None);
    }

    #[test]
    fn test_x11_keycode_offset_is_applied() {
        // X11 keycode 38 is the A key
        assert_eq!(x11_keycode_to_scan(38), 0x1E);
        assert_eq!(scan_to_vkey(x11_keycode_to_scan(38)), Some(KeyA));
        assert_eq!(x11_keycode_to_scan(0), -8);
    }

    #[test]
    fn test_backspace_scan_code_maps_to_backspace() {
        assert_eq!(scan_to_vkey(SCAN_BACKSPACE), Some(Backspace));
    }

    #[test]
    fn test_all_26_letters_are_mapped_once() {
        let mapped: Vec<VirtualKey> = (0..=255)
            .filter_map(scan_to_vkey)
            .filter(|vk| (0x41..=0x5A).contains(&vk.as_u16()))
            .collect();
        assert_eq!(mapped.len(), 26);
    }
}
