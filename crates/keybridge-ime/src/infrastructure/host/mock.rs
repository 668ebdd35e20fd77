//! Recording host editor for tests.
//!
//! `RecordingHost` behaves like a tiny text field: it keeps a string and a
//! caret, applies commits and deletions to them, and records every call so
//! tests can check exactly what the bridge asked for and in what order.
//!
//! Two flavours matter:
//!
//! - [`RecordingHost::with_text`] supports surrounding text, like most GUI
//!   toolkits.
//! - [`RecordingHost::without_surrounding_text`] does not, like many
//!   terminals.  Forwarded Backspace keys are recorded but there is no text
//!   model to apply them to.

use crate::application::host::{HostEditor, HostKeyEvent, SurroundingText};

/// Host editor double that records all calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingHost {
    /// Whether the host advertises surrounding-text support.
    pub surrounding_supported: bool,
    /// Whether the surrounding text is currently valid.
    pub valid: bool,
    pub text: String,
    /// Character offset of the selection anchor.
    pub anchor: usize,
    /// Character offset of the caret.
    pub cursor: usize,
    /// Text passed to each `commit_text` call.
    pub committed: Vec<String>,
    /// `(offset, len)` of each `delete_surrounding_text` call.
    pub deletions: Vec<(isize, usize)>,
    /// Every forwarded key event.
    pub forwarded: Vec<HostKeyEvent>,
}

impl RecordingHost {
    /// A host that reports `text` with the caret at its end.
    pub fn with_text(text: &str) -> Self {
        let end = text.chars().count();
        Self {
            surrounding_supported: true,
            valid: true,
            text: text.to_string(),
            anchor: end,
            cursor: end,
            ..Self::default()
        }
    }

    /// A host that cannot report or delete surrounding text.
    pub fn without_surrounding_text() -> Self {
        Self::default()
    }

    /// Moves the caret and collapses the selection.
    pub fn set_cursor(&mut self, position: usize) {
        let position = position.min(self.text.chars().count());
        self.anchor = position;
        self.cursor = position;
    }

    /// Selects `[anchor, cursor)` (or the reverse).
    pub fn select(&mut self, anchor: usize, cursor: usize) {
        self.anchor = anchor;
        self.cursor = cursor;
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map(|(index, _)| index)
            .unwrap_or(self.text.len())
    }

    fn remove_chars(&mut self, start: usize, len: usize) {
        let from = self.byte_offset(start);
        let to = self.byte_offset(start + len);
        self.text.replace_range(from..to, "");
        self.set_cursor(start);
    }
}

impl HostEditor for RecordingHost {
    fn supports_surrounding_text(&self) -> bool {
        self.surrounding_supported
    }

    fn surrounding_text(&self) -> Option<SurroundingText> {
        self.valid.then(|| SurroundingText {
            text: self.text.clone(),
            anchor: self.anchor,
            cursor: self.cursor,
        })
    }

    fn commit_text(&mut self, text: &str) {
        self.committed.push(text.to_string());
        if self.surrounding_supported {
            let at = self.byte_offset(self.cursor);
            self.text.insert_str(at, text);
            self.set_cursor(self.cursor + text.chars().count());
        }
    }

    fn delete_surrounding_text(&mut self, offset: isize, len: usize) {
        self.deletions.push((offset, len));
        if self.surrounding_supported {
            let start = self.cursor.saturating_add_signed(offset);
            self.remove_chars(start, len);
        }
    }

    fn forward_key(&mut self, event: &HostKeyEvent) {
        self.forwarded.push(*event);
        if self.surrounding_supported && event.is_bare_backspace() && self.cursor > 0 {
            self.remove_chars(self.cursor - 1, 1);
        }
    }
}
