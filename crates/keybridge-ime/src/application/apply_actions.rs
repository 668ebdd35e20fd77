//! Turns an engine [`ActionResult`] into edits on the host editor.
//!
//! # Order of work (for beginners)
//!
//! Every processed key runs the same fixed sequence:
//!
//! 1. **Deleting** – remove the characters the engine wants replaced
//!    ([`delete_preceding`]).
//! 2. **Emitting** – commit the output text and decide whether the original
//!    key reaches the application ([`apply_edits`]).
//! 3. **Persisting** – hand changed options to every session of the keyboard
//!    and write them to the option store ([`persist_options`]).  The
//!    broadcast half lives in the session manager because it needs every
//!    session of the keyboard.
//! 4. **Invalidate check** – drop the engine context if the engine flagged
//!    it as stale ([`invalidate_if_requested`]).
//!
//! No step is skipped because an earlier one failed; failures are logged.

use keybridge_core::{ActionItem, ActionResult, OptionItem};
use tracing::{debug, info, warn};

use super::{
    context_sync::clear_context,
    engine::EngineSession,
    host::{HostEditor, HostKeyEvent, KeyDisposition},
    options::OptionStore,
};

/// How the preceding characters were removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRoute {
    /// The engine asked for no deletion.
    Nothing,
    /// The triggering Backspace itself is let through to do the deletion.
    RawBackspace,
    /// One `delete_surrounding_text` call removed the characters.
    Surrounding(usize),
    /// Synthetic Backspace events were forwarded to the host.
    ForwardedBackspaces(usize),
}

/// Removes `count` characters before the caret.
///
/// Route selection, first match wins:
///
/// - one character, and the key being processed is a bare Backspace: let
///   that Backspace through;
/// - host supports surrounding text: delete the range directly;
/// - otherwise forward `count` synthetic Backspaces.  The host applies them
///   synchronously, and they would otherwise reach the engine's cache too, so
///   the engine context is snapshotted before and restored after.
pub fn delete_preceding(
    session: &mut dyn EngineSession,
    host: &mut dyn HostEditor,
    event: &HostKeyEvent,
    count: usize,
) -> DeleteRoute {
    if count == 0 {
        return DeleteRoute::Nothing;
    }

    if count == 1 && event.is_bare_backspace() {
        debug!("letting the Backspace key delete one character");
        return DeleteRoute::RawBackspace;
    }

    if host.supports_surrounding_text() {
        let offset = -isize::try_from(count).unwrap_or(isize::MAX);
        host.delete_surrounding_text(offset, count);
        debug!(count, "deleted surrounding text");
        return DeleteRoute::Surrounding(count);
    }

    let snapshot = match session.context() {
        Ok(units) => Some(units),
        Err(e) => {
            warn!("could not snapshot engine context before forwarding Backspace: {e}");
            None
        }
    };

    info!(count, "host lacks surrounding text; forwarding Backspace keys");
    for _ in 0..count {
        host.forward_key(&HostKeyEvent::backspace());
    }

    if let Some(mut units) = snapshot {
        units.push(0);
        if let Err(e) = session.set_context(&units) {
            warn!("could not restore engine context after forwarding Backspace: {e}");
        }
    }

    DeleteRoute::ForwardedBackspaces(count)
}

/// Runs the Deleting and Emitting steps and decides the key's fate.
///
/// The key is forwarded when the engine asked for it (`emit_keystroke`) or
/// when the deletion step chose to let a raw Backspace through.
pub fn apply_edits(
    session: &mut dyn EngineSession,
    host: &mut dyn HostEditor,
    event: &HostKeyEvent,
    actions: &ActionResult,
) -> KeyDisposition {
    let route = delete_preceding(session, host, event, actions.code_points_to_delete);
    let emit_keystroke = actions.emit_keystroke || route == DeleteRoute::RawBackspace;

    let output = actions.output_text();
    if actions.do_alert {
        debug!("engine requested an alert");
    }
    if !output.is_empty() {
        host.commit_text(&output);
        debug!(output = output.as_str(), "committed engine output");
    }

    if emit_keystroke {
        debug!("forwarding original keystroke");
        KeyDisposition::Forwarded
    } else {
        KeyDisposition::Consumed
    }
}

/// Writes every persistable option to `store`; returns how many were written.
///
/// Items without key or value, and items whose key decodes to an empty
/// string, are skipped.  A write failure is logged and the next item is
/// still attempted.
pub fn persist_options(
    store: Option<&mut dyn OptionStore>,
    keyboard_id: &str,
    options: &[OptionItem],
) -> usize {
    let mut pending = options
        .iter()
        .filter_map(OptionItem::decode)
        .filter(|(key, _)| !key.is_empty())
        .peekable();

    if pending.peek().is_none() {
        return 0;
    }

    let Some(store) = store else {
        warn!(keyboard = keyboard_id, "no option store; keyboard options not saved");
        return 0;
    };

    let mut written = 0;
    for (key, value) in pending {
        match store.set_value_by_path(&key, &value) {
            Ok(()) => {
                debug!(keyboard = keyboard_id, key = key.as_str(), "keyboard option saved");
                written += 1;
            }
            Err(e) => warn!(keyboard = keyboard_id, key = key.as_str(), "failed to save option: {e}"),
        }
    }
    written
}

/// Clears the engine context if the last event's action items flag it as
/// invalid.  Returns `true` when a clear was issued.
pub fn invalidate_if_requested(session: &mut dyn EngineSession) -> bool {
    let invalidated = session
        .action_items()
        .iter()
        .any(|item| matches!(item, ActionItem::InvalidateContext));
    if !invalidated {
        return false;
    }

    debug!("engine invalidated its context");
    if let Err(e) = clear_context(session) {
        warn!("failed to clear invalidated context: {e}");
    }
    true
}
