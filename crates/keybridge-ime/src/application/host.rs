//! The host editor surface as seen by the bridge.
//!
//! The bridge never talks to a concrete editor.  It drives a [`HostEditor`]
//! trait object that is handed in with every call, so the same session logic
//! serves any input-method framework (and the recording double in tests).

use keybridge_core::keymap::{
    keysym::{is_cursor_move, XK_BACKSPACE},
    scancode::{x11_keycode_to_scan, SCAN_BACKSPACE, X11_KEYCODE_OFFSET},
    HostKeyStates,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one host editing context (a text field, a terminal tab, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputContextId(pub Uuid);

impl InputContextId {
    /// Allocates a fresh, random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InputContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InputContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Text around the caret, as reported by the host.
///
/// `anchor` and `cursor` are character offsets into `text`; they differ
/// when a selection is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurroundingText {
    pub text: String,
    pub anchor: usize,
    pub cursor: usize,
}

/// One key event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostKeyEvent {
    /// X11 hardware keycode (evdev scan code + 8).
    pub keycode: u32,
    /// X11 KeySym after the host applied its layout.
    pub keysym: u32,
    /// Raw state mask at the time of the event.
    pub states: HostKeyStates,
    pub is_release: bool,
}

impl HostKeyEvent {
    /// Key-down event.
    pub fn press(keycode: u32, keysym: u32, states: HostKeyStates) -> Self {
        Self {
            keycode,
            keysym,
            states,
            is_release: false,
        }
    }

    /// Key-up event.
    pub fn release(keycode: u32, keysym: u32, states: HostKeyStates) -> Self {
        Self {
            is_release: true,
            ..Self::press(keycode, keysym, states)
        }
    }

    /// A synthetic, unmodified Backspace press.
    pub fn backspace() -> Self {
        Self::press(
            (SCAN_BACKSPACE + X11_KEYCODE_OFFSET) as u32,
            XK_BACKSPACE,
            HostKeyStates::default(),
        )
    }

    /// Evdev scan code of the physical key.
    pub fn scan_code(&self) -> i64 {
        x11_keycode_to_scan(self.keycode)
    }

    /// Returns `true` for Backspace with no Shift/Ctrl/Alt/Super held.
    pub fn is_bare_backspace(&self) -> bool {
        self.keysym == XK_BACKSPACE && self.states.is_unmodified()
    }

    /// Returns `true` for caret-movement keys.
    pub fn is_cursor_move(&self) -> bool {
        is_cursor_move(self.keysym)
    }
}

/// What the host should do with the event after the bridge has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The bridge handled the key; the host must not process it further.
    Consumed,
    /// The host should process the key as if the bridge were not there.
    Forwarded,
}

/// Editing operations the bridge needs from the host.
pub trait HostEditor {
    /// Whether the host can report and delete text around the caret at all.
    fn supports_surrounding_text(&self) -> bool;

    /// Current surrounding text, or `None` while it is not trustworthy
    /// (for example during an uncommitted composition).
    fn surrounding_text(&self) -> Option<SurroundingText>;

    /// Inserts `text` at the caret.
    fn commit_text(&mut self, text: &str);

    /// Deletes `len` characters starting `offset` characters from the caret.
    fn delete_surrounding_text(&mut self, offset: isize, len: usize);

    /// Sends a synthetic key event to the application.
    ///
    /// Implementations must finish processing the event before returning;
    /// the bridge restores engine context right after forwarding.
    fn forward_key(&mut self, event: &HostKeyEvent);
}

/// Surrounding text, but only when the host both supports it and reports it
/// as currently valid.
pub fn valid_surrounding_text(host: &dyn HostEditor) -> Option<SurroundingText> {
    if host.supports_surrounding_text() {
        host.surrounding_text()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backspace_event_round_trips_to_backspace_scan_code() {
        let event = HostKeyEvent::backspace();
        assert_eq!(event.keycode, 22);
        assert_eq!(event.scan_code(), SCAN_BACKSPACE);
        assert!(event.is_bare_backspace());
        assert!(!event.is_release);
    }

    #[test]
    fn test_ctrl_backspace_is_not_bare() {
        let event = HostKeyEvent::press(22, XK_BACKSPACE, HostKeyStates(HostKeyStates::CTRL));
        assert!(!event.is_bare_backspace());
    }

    #[test]
    fn test_backspace_with_num_lock_is_still_bare() {
        let event = HostKeyEvent::press(22, XK_BACKSPACE, HostKeyStates(HostKeyStates::MOD2));
        assert!(event.is_bare_backspace());
    }

    #[test]
    fn test_release_keeps_key_fields() {
        let event = HostKeyEvent::release(38, 0x61, HostKeyStates::default());
        assert!(event.is_release);
        assert_eq!(event.keycode, 38);
        assert_eq!(event.keysym, 0x61);
    }

    #[test]
    fn test_input_context_ids_are_unique() {
        assert_ne!(InputContextId::new(), InputContextId::new());
    }
}
