//! What the engine hands back after processing one key event.
//!
//! The engine does not edit text itself.  It returns a description of the
//! edit ([`ActionResult`]): how many characters before the caret to remove,
//! which characters to insert, whether the original keystroke should pass
//! through untouched, and which keyboard options changed.  The bridge turns
//! that description into calls on the host editor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoding::{decode_code_points, decode_utf16z, encode_str_utf16z};

/// Error returned by any call across the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine returned a non-OK status code.
    #[error("engine returned status {0}")]
    Status(u32),
    /// The compiled keyboard file could not be loaded.
    #[error("failed to load keyboard from {path}: {reason}")]
    Load { path: String, reason: String },
    /// A session could not be created for the keyboard.
    #[error("failed to create session for keyboard {0}")]
    SessionCreate(String),
    /// The supplied context was rejected.
    #[error("invalid context")]
    InvalidContext,
}

/// Scope an option belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OptionScope {
    /// Option defined by the keyboard's rules (persisted per keyboard).
    Keyboard = 0x01,
    /// Option describing the environment (platform, base layout).
    Environment = 0x02,
}

/// One option key/value pair in engine (UTF-16) representation.
///
/// `key` and `value` may be absent; the engine uses that to mark
/// placeholder entries.  When present, they may carry a trailing `0` unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub scope: OptionScope,
    pub key: Option<Vec<u16>>,
    pub value: Option<Vec<u16>>,
}

impl OptionItem {
    /// Builds an item from UTF-8 text, encoding both sides to UTF-16.
    pub fn new(scope: OptionScope, key: &str, value: &str) -> Self {
        Self {
            scope,
            key: Some(encode_str_utf16z(key)),
            value: Some(encode_str_utf16z(value)),
        }
    }

    /// Decodes key and value to UTF-8.
    ///
    /// Returns `None` when either side is absent.  A key or value that fails
    /// to decode comes back as an empty string.
    pub fn decode(&self) -> Option<(String, String)> {
        let key = self.key.as_deref()?;
        let value = self.value.as_deref()?;
        Some((decode_utf16z(key), decode_utf16z(value)))
    }
}

/// Flat action record produced by the engine for one processed event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Number of characters before the caret to delete.
    pub code_points_to_delete: usize,
    /// Output code points, terminated by the first `0`.
    pub output: Vec<u32>,
    /// The engine wants the host to beep or flash.
    pub do_alert: bool,
    /// The original keystroke should reach the host unmodified.
    pub emit_keystroke: bool,
    /// Options the keyboard asked to persist.
    pub persist_options: Vec<OptionItem>,
}

impl ActionResult {
    /// Output decoded to UTF-8 (empty if absent or invalid).
    pub fn output_text(&self) -> String {
        decode_code_points(&self.output)
    }

    /// Convenience constructor: emit `text` without deleting anything.
    pub fn emit(text: &str) -> Self {
        Self {
            output: text.chars().map(u32::from).chain(std::iter::once(0)).collect(),
            ..Self::default()
        }
    }
}

/// Itemised view of the same actions, in the order the engine produced them.
///
/// The bridge reads this list only to look for
/// [`ActionItem::InvalidateContext`], which has no counterpart in
/// [`ActionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionItem {
    Character(u32),
    Backspace,
    Alert,
    EmitKeystroke,
    PersistOption(OptionItem),
    /// The engine's cached context no longer matches the document.
    InvalidateContext,
    End,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_text_stops_at_terminator() {
        let actions = ActionResult {
            output: vec![0x03B1, 0, 0x62],
            ..ActionResult::default()
        };
        assert_eq!(actions.output_text(), "α");
    }

    #[test]
    fn test_emit_constructor_terminates_output() {
        let actions = ActionResult::emit("αβ");
        assert_eq!(actions.output, vec![0x03B1, 0x03B2, 0]);
        assert_eq!(actions.code_points_to_delete, 0);
        assert!(!actions.emit_keystroke);
    }

    #[test]
    fn test_option_item_decode_strips_terminators() {
        let item = OptionItem::new(OptionScope::Keyboard, "option_ligature", "1");
        assert_eq!(
            item.decode(),
            Some(("option_ligature".to_string(), "1".to_string()))
        );
    }

    #[test]
    fn test_option_item_with_missing_key_decodes_to_none() {
        let item = OptionItem {
            scope: OptionScope::Keyboard,
            key: None,
            value: Some(vec![0x31, 0]),
        };
        assert_eq!(item.decode(), None);
    }
}
