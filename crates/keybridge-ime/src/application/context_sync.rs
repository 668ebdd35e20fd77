//! Keeps the engine's cached context in step with the host document.
//!
//! # Why the engine needs context (for beginners)
//!
//! Transliteration rules look backwards: "if the previous character is `k`
//! and the user types `h`, replace the `k` with `χ`".  The engine therefore
//! keeps its own copy of the text just before the caret.  Whenever the host
//! can tell us what that text really is, we overwrite the engine's copy with
//! the last [`CONTEXT_WINDOW`] characters before the selection start.
//!
//! When the host cannot report surrounding text, nobody can vouch for the
//! engine's copy, so a refresh clears it instead.  Missing context only makes
//! the engine skip rules that need lookback; wrong context corrupts output.

use keybridge_core::{encoding::encode_str_utf16z, EngineError};
use tracing::{debug, warn};

use super::{
    engine::EngineSession,
    host::{valid_surrounding_text, HostEditor},
};

/// Maximum number of characters handed to the engine as context.
pub const CONTEXT_WINDOW: usize = 128;

/// What [`refresh_context`] did to the engine's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextRefresh {
    /// The context was replaced with this text.
    Replaced(String),
    /// No trustworthy surrounding text was available; the context was cleared.
    Cleared,
}

/// Returns the at most [`CONTEXT_WINDOW`] characters ending at the selection
/// start.
///
/// `anchor` and `cursor` are character offsets.  Offsets beyond the end of
/// `text` are clamped, so a stale caret never panics.
pub fn context_window(text: &str, anchor: usize, cursor: usize) -> &str {
    let char_count = text.chars().count();
    let end = anchor.min(cursor).min(char_count);
    let start = end.saturating_sub(CONTEXT_WINDOW);
    &text[byte_offset(text, start)..byte_offset(text, end)]
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// Replaces the engine context with the text before the caret, or clears it
/// when the host cannot report that text.
///
/// If the engine rejects the new context, its old copy is cleared before the
/// error is returned, so it never keeps text that no longer matches the host.
///
/// # Errors
///
/// Returns [`EngineError`] if the engine rejects the new context.
pub fn refresh_context(
    session: &mut dyn EngineSession,
    host: &dyn HostEditor,
) -> Result<ContextRefresh, EngineError> {
    let Some(surrounding) = valid_surrounding_text(host) else {
        clear_context(session)?;
        return Ok(ContextRefresh::Cleared);
    };

    let window = context_window(&surrounding.text, surrounding.anchor, surrounding.cursor);
    let units = encode_str_utf16z(window);
    if units.is_empty() {
        clear_context(session)?;
        return Ok(ContextRefresh::Cleared);
    }

    if let Err(e) = session.set_context(&units) {
        if let Err(clear_err) = clear_context(session) {
            warn!("clearing context after rejected refresh failed: {clear_err}");
        }
        return Err(e);
    }
    debug!(context = window, "engine context replaced from surrounding text");
    Ok(ContextRefresh::Replaced(window.to_string()))
}

/// Discards the engine context.
///
/// # Errors
///
/// Returns [`EngineError`] if the engine call fails.
pub fn clear_context(session: &mut dyn EngineSession) -> Result<(), EngineError> {
    session.clear_context()?;
    debug!("engine context cleared");
    Ok(())
}
