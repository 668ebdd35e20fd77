//! Key code translation from host events to engine input.
//!
//! The host delivers X11 hardware keycodes, KeySyms and a state mask; the
//! engine consumes virtual keys and its own modifier bitmask.

pub mod keysym;
pub mod modifiers;
pub mod scancode;
pub mod vkey;

pub use modifiers::{EngineModifiers, HostKeyStates};
pub use vkey::VirtualKey;

/// Unified key mapper for the host → engine direction.
pub struct KeyMapper;

impl KeyMapper {
    /// Translates an X11 hardware keycode straight to a virtual key.
    ///
    /// Returns `None` when the derived scan code is outside `0..=255`, and
    /// `Some(VirtualKey::Unused)` for in-range codes the engine never sees.
    pub fn x11_keycode_to_vkey(keycode: u32) -> Option<VirtualKey> {
        scancode::scan_to_vkey(scancode::x11_keycode_to_scan(keycode))
    }

    /// Returns `true` if `keysym` only moves the caret.
    pub fn is_cursor_move(keysym: u32) -> bool {
        keysym::is_cursor_move(keysym)
    }
}
