//! Host key event → engine key event translation.
//!
//! The translation has three possible outcomes, see [`KeyTranslation`].
//! Latches must already reflect the event (see
//! [`ModifierLatches::observe`]) before [`translate_key`] runs, so that
//! pressing AltGr itself is reported with the AltGr bit set.

use keybridge_core::{EngineModifiers, HostKeyStates, KeyMapper, ModifierLatches, VirtualKey};
use tracing::debug;

use super::host::HostKeyEvent;

/// Result of translating one host key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTranslation {
    /// The scan code is outside `0..=255`; the host handles the key.
    OutOfRange,
    /// The engine has no virtual key for this scan code.
    Unmapped {
        /// The key moves the caret, so the engine context is now stale.
        cursor_move: bool,
    },
    /// The event should be handed to the engine.
    Mapped {
        vkey: VirtualKey,
        modifiers: EngineModifiers,
        is_press: bool,
    },
}

/// Builds the engine modifier mask from the host state mask and the latches.
///
/// - Shift → `SHIFT`
/// - Mod5 (AltGr) → `RIGHT_ALT`
/// - Mod1 (Alt) → `RIGHT_ALT` and/or `LEFT_ALT`, per latch
/// - Ctrl → `RIGHT_CTRL` and/or `LEFT_CTRL`, per latch
///
/// Alt or Ctrl held while no latch is set (the press happened before the
/// session existed) produces no Alt/Ctrl bit at all.
pub fn engine_modifiers(states: HostKeyStates, latches: &ModifierLatches) -> EngineModifiers {
    let mut modifiers = EngineModifiers::default();

    if states.test(HostKeyStates::SHIFT) {
        modifiers.insert(EngineModifiers::SHIFT);
    }
    if states.test(HostKeyStates::MOD5) {
        modifiers.insert(EngineModifiers::RIGHT_ALT);
        debug!("right alt from Mod5");
    }
    if states.test(HostKeyStates::MOD1) {
        if latches.right_alt {
            modifiers.insert(EngineModifiers::RIGHT_ALT);
            debug!("right alt from latch");
        }
        if latches.left_alt {
            modifiers.insert(EngineModifiers::LEFT_ALT);
            debug!("left alt from latch");
        }
    }
    if states.test(HostKeyStates::CTRL) {
        if latches.right_ctrl {
            modifiers.insert(EngineModifiers::RIGHT_CTRL);
            debug!("right ctrl from latch");
        }
        if latches.left_ctrl {
            modifiers.insert(EngineModifiers::LEFT_CTRL);
            debug!("left ctrl from latch");
        }
    }

    modifiers
}

/// Translates `event` using the current `latches`.
pub fn translate_key(event: &HostKeyEvent, latches: &ModifierLatches) -> KeyTranslation {
    let Some(vkey) = KeyMapper::x11_keycode_to_vkey(event.keycode) else {
        return KeyTranslation::OutOfRange;
    };

    if vkey.is_unused() {
        return KeyTranslation::Unmapped {
            cursor_move: event.is_cursor_move(),
        };
    }

    KeyTranslation::Mapped {
        vkey,
        modifiers: engine_modifiers(event.states, latches),
        is_press: !event.is_release,
    }
}
