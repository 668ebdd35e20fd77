//! SessionManager: owns one engine session per (keyboard, editing context).
//!
//! # How a key press flows through the bridge (for beginners)
//!
//! ```text
//! host key event
//!   → session lookup (lazily created, inert if the engine failed)
//!   → modifier latches observe the physical key
//!   → key translation (scan code → virtual key + modifier mask)
//!   → context refresh from the host's surrounding text
//!   → engine processes the event
//!   → actions applied: delete, commit, persist options, invalidate check
//! ```
//!
//! Everything runs on the host's event thread.  The manager holds no locks
//! and never blocks; the host is passed in with every call rather than
//! stored, so each session only lives as long as the manager says it does.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use keybridge_core::{
    encoding::decode_utf16, KeyboardRecord, ModifierLatches, OptionItem, OptionScope,
};
use tracing::{debug, error, info, warn};

use super::{
    apply_actions::{apply_edits, invalidate_if_requested, persist_options},
    context_sync::{clear_context, refresh_context},
    engine::{CompiledKeyboard, EngineSession, KeyboardLoader},
    host::{valid_surrounding_text, HostEditor, HostKeyEvent, InputContextId, KeyDisposition},
    options::{OptionStore, OptionStoreProvider},
    translate_key::{translate_key, KeyTranslation},
};

/// Sub-mode label shown when the keyboard cannot be used in a context.
pub const UNAVAILABLE_SUB_MODE: &str = "Not available";

/// A registered keyboard and its lazily loaded engine data.
struct KeyboardData {
    record: KeyboardRecord,
    /// Set on the first load attempt, successful or not.
    load_attempted: bool,
    compiled: Option<Box<dyn CompiledKeyboard>>,
    ldml: Option<PathBuf>,
    store: Option<Box<dyn OptionStore>>,
}

impl KeyboardData {
    fn new(record: KeyboardRecord) -> Self {
        Self {
            record,
            load_attempted: false,
            compiled: None,
            ldml: None,
            store: None,
        }
    }
}

/// Live engine session plus the latches that belong to it.
struct SessionState {
    engine: Box<dyn EngineSession>,
    latches: ModifierLatches,
}

/// A (keyboard, context) pair either has a working session or is inert.
enum SessionSlot {
    Active(SessionState),
    /// Session creation failed; every event is forwarded until teardown.
    Unavailable,
}

type SessionKey = (String, InputContextId);

/// Registry of keyboards and their per-context engine sessions.
pub struct SessionManager {
    loader: Box<dyn KeyboardLoader>,
    stores: Box<dyn OptionStoreProvider>,
    environment: Vec<OptionItem>,
    keyboards: HashMap<String, KeyboardData>,
    sessions: HashMap<SessionKey, SessionSlot>,
}

impl SessionManager {
    /// Creates a manager that loads keyboards with `loader`, opens option
    /// stores with `stores` and creates sessions with `environment` options.
    pub fn new(
        loader: Box<dyn KeyboardLoader>,
        stores: Box<dyn OptionStoreProvider>,
        environment: Vec<OptionItem>,
    ) -> Self {
        Self {
            loader,
            stores,
            environment,
            keyboards: HashMap::new(),
            sessions: HashMap::new(),
        }
    }

    // ── Keyboard registry ─────────────────────────────────────────────────────

    /// Registers a catalog entry.
    ///
    /// Re-registering an identical record is a no-op.  A changed record
    /// replaces the old one, and every session of that keyboard is dropped so
    /// the next activation loads the new files.
    pub fn register_keyboard(&mut self, record: KeyboardRecord) {
        if let Some(existing) = self.keyboards.get(&record.id) {
            if existing.record == record {
                return;
            }
            info!(keyboard = record.id.as_str(), "keyboard changed on disk; dropping sessions");
            self.sessions.retain(|(keyboard_id, _), _| keyboard_id != &record.id);
        }
        self.keyboards
            .insert(record.id.clone(), KeyboardData::new(record));
    }

    /// Returns the registered record for `keyboard_id`.
    pub fn keyboard(&self, keyboard_id: &str) -> Option<&KeyboardRecord> {
        self.keyboards.get(keyboard_id).map(|data| &data.record)
    }

    /// Returns `true` once `keyboard_id` has a compiled rule table.
    pub fn is_loaded(&self, keyboard_id: &str) -> bool {
        self.keyboards
            .get(keyboard_id)
            .is_some_and(|data| data.compiled.is_some())
    }

    /// Path of the LDML source recorded at load time, if any.
    pub fn ldml_path(&self, keyboard_id: &str) -> Option<&Path> {
        self.keyboards.get(keyboard_id)?.ldml.as_deref()
    }

    /// Loads the keyboard's rule table on first use.
    ///
    /// Only the first call does any work; a failed load is not retried.
    /// Returns `true` if the keyboard is usable.
    pub fn load_keyboard(&mut self, keyboard_id: &str) -> bool {
        let Some(keyboard) = self.keyboards.get_mut(keyboard_id) else {
            warn!(keyboard = keyboard_id, "activation of unknown keyboard");
            return false;
        };
        if keyboard.load_attempted {
            return keyboard.compiled.is_some();
        }
        keyboard.load_attempted = true;

        let kmx = keyboard.record.kmx_path();
        if !kmx.is_file() {
            error!(path = %kmx.display(), "failed to find kmx file");
            return false;
        }
        let ldml = keyboard.record.ldml_path();
        keyboard.ldml = ldml.is_file().then_some(ldml);

        match self.loader.load(&kmx, keyboard.ldml.as_deref()) {
            Ok(compiled) => keyboard.compiled = Some(compiled),
            Err(e) => {
                error!(keyboard = keyboard_id, "failed to load keyboard: {e}");
                return false;
            }
        }

        keyboard.store = match self.stores.open(keyboard_id) {
            Ok(store) => {
                debug!(keyboard = keyboard_id, options = ?store.values(), "stored options loaded");
                Some(store)
            }
            Err(e) => {
                warn!(keyboard = keyboard_id, "option store unavailable: {e}");
                None
            }
        };

        info!(keyboard = keyboard_id, path = %kmx.display(), "keyboard loaded");
        true
    }

    // ── Session lifecycle ─────────────────────────────────────────────────────

    /// Makes `keyboard_id` the active keyboard of `ctx`.
    ///
    /// Loads the keyboard if needed, ensures a session exists and refreshes
    /// its context.  Returns `false` if the pair is inert.
    pub fn activate(
        &mut self,
        keyboard_id: &str,
        ctx: InputContextId,
        host: &dyn HostEditor,
    ) -> bool {
        self.load_keyboard(keyboard_id);
        let Some(state) = self.session_mut(keyboard_id, ctx, host) else {
            return false;
        };
        if let Err(e) = refresh_context(state.engine.as_mut(), host) {
            warn!(keyboard = keyboard_id, "context refresh on activation failed: {e}");
        }
        true
    }

    /// Handles an editor-level reset (focus change, explicit IM reset).
    ///
    /// Recomputes (or clears) the context and releases every modifier latch.
    /// The session itself is kept; a pair without a session is left alone.
    pub fn reset(&mut self, keyboard_id: &str, ctx: InputContextId, host: &dyn HostEditor) {
        let Some(SessionSlot::Active(state)) =
            self.sessions.get_mut(&(keyboard_id.to_string(), ctx))
        else {
            return;
        };
        if let Err(e) = refresh_context(state.engine.as_mut(), host) {
            warn!(keyboard = keyboard_id, "context refresh on reset failed: {e}");
        }
        state.latches.reset();
        debug!(keyboard = keyboard_id, %ctx, "session reset");
    }

    /// Destroys every session bound to `ctx`; returns how many were removed.
    pub fn teardown(&mut self, ctx: InputContextId) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|(_, bound), _| *bound != ctx);
        let removed = before - self.sessions.len();
        debug!(%ctx, removed, "editing context destroyed");
        removed
    }

    /// Status label for the keyboard in `ctx`.
    pub fn sub_mode(&self, keyboard_id: &str, ctx: InputContextId) -> &'static str {
        match self.sessions.get(&(keyboard_id.to_string(), ctx)) {
            Some(SessionSlot::Active(_)) => "",
            _ => UNAVAILABLE_SUB_MODE,
        }
    }

    /// Returns `true` if a working session exists for the pair.
    pub fn has_session(&self, keyboard_id: &str, ctx: InputContextId) -> bool {
        matches!(
            self.sessions.get(&(keyboard_id.to_string(), ctx)),
            Some(SessionSlot::Active(_))
        )
    }

    /// Number of (keyboard, context) slots, inert ones included.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Returns the session for the pair, creating it if the keyboard is
    /// loaded and no slot exists yet.
    fn session_mut(
        &mut self,
        keyboard_id: &str,
        ctx: InputContextId,
        host: &dyn HostEditor,
    ) -> Option<&mut SessionState> {
        let key = (keyboard_id.to_string(), ctx);
        if !self.sessions.contains_key(&key) {
            let keyboard = self.keyboards.get(keyboard_id)?;
            let compiled = keyboard.compiled.as_ref()?;
            let slot = match compiled.create_session(&self.environment) {
                Ok(mut engine) => {
                    let stored = stored_options(keyboard.store.as_deref());
                    if !stored.is_empty() {
                        if let Err(e) = engine.update_options(&stored) {
                            warn!(keyboard = keyboard_id, "failed to apply stored options: {e}");
                        }
                    }
                    if let Err(e) = refresh_context(engine.as_mut(), host) {
                        warn!(keyboard = keyboard_id, "initial context refresh failed: {e}");
                    }
                    debug!(keyboard = keyboard_id, %ctx, "engine session created");
                    SessionSlot::Active(SessionState {
                        engine,
                        latches: ModifierLatches::default(),
                    })
                }
                Err(e) => {
                    error!(keyboard = keyboard_id, %ctx, "failed to create engine session: {e}");
                    SessionSlot::Unavailable
                }
            };
            self.sessions.insert(key.clone(), slot);
        }

        match self.sessions.get_mut(&key) {
            Some(SessionSlot::Active(state)) => Some(state),
            _ => None,
        }
    }

    // ── Key processing ────────────────────────────────────────────────────────

    /// Runs one host key event through the engine and applies the result.
    ///
    /// Returns whether the host should still process the key itself.
    pub fn process_key(
        &mut self,
        keyboard_id: &str,
        ctx: InputContextId,
        host: &mut dyn HostEditor,
        event: &HostKeyEvent,
    ) -> KeyDisposition {
        let Some(state) = self.session_mut(keyboard_id, ctx, &*host) else {
            return KeyDisposition::Forwarded;
        };

        state.latches.observe(event.scan_code(), !event.is_release);

        let (vkey, modifiers, is_press) = match translate_key(event, &state.latches) {
            KeyTranslation::OutOfRange => return KeyDisposition::Forwarded,
            KeyTranslation::Unmapped { cursor_move } => {
                if cursor_move {
                    if let Err(e) = clear_context(state.engine.as_mut()) {
                        warn!("failed to clear context after caret move: {e}");
                    }
                    if let Err(e) = refresh_context(state.engine.as_mut(), &*host) {
                        warn!("failed to refresh context after caret move: {e}");
                    }
                }
                return KeyDisposition::Forwarded;
            }
            KeyTranslation::Mapped {
                vkey,
                modifiers,
                is_press,
            } => (vkey, modifiers, is_press),
        };

        if valid_surrounding_text(&*host).is_some() {
            if let Err(e) = refresh_context(state.engine.as_mut(), &*host) {
                warn!("failed to refresh context before key: {e}");
            }
        }

        debug!(context = %engine_context(state.engine.as_ref()), "context before key event");
        debug!(?vkey, modifiers = modifiers.0, is_press, "submitting key event");
        if let Err(e) = state.engine.process_event(vkey, modifiers, is_press, 0) {
            warn!(keyboard = keyboard_id, "engine failed to process key: {e}");
            return KeyDisposition::Forwarded;
        }
        debug!(context = %engine_context(state.engine.as_ref()), "context after key event");

        let actions = state.engine.actions();
        let disposition = apply_edits(state.engine.as_mut(), host, event, &actions);

        if !actions.persist_options.is_empty() {
            self.broadcast_options(keyboard_id, &actions.persist_options);
            if let Some(keyboard) = self.keyboards.get_mut(keyboard_id) {
                let store: Option<&mut dyn OptionStore> = match keyboard.store.as_mut() {
                    Some(store) => Some(&mut **store),
                    None => None,
                };
                persist_options(store, keyboard_id, &actions.persist_options);
            }
        }

        if let Some(SessionSlot::Active(state)) =
            self.sessions.get_mut(&(keyboard_id.to_string(), ctx))
        {
            invalidate_if_requested(state.engine.as_mut());
        }

        disposition
    }

    /// Sends `options` to every live session of `keyboard_id`, in every
    /// editing context.
    fn broadcast_options(&mut self, keyboard_id: &str, options: &[OptionItem]) {
        for ((id, ctx), slot) in &mut self.sessions {
            if id != keyboard_id {
                continue;
            }
            if let SessionSlot::Active(state) = slot {
                if let Err(e) = state.engine.update_options(options) {
                    warn!(keyboard = keyboard_id, %ctx, "failed to update session options: {e}");
                }
            }
        }
    }
}

fn stored_options(store: Option<&dyn OptionStore>) -> Vec<OptionItem> {
    store
        .map(|store| {
            store
                .values()
                .iter()
                .map(|(key, value)| OptionItem::new(OptionScope::Keyboard, key, value))
                .collect()
        })
        .unwrap_or_default()
}

fn engine_context(session: &dyn EngineSession) -> String {
    session
        .context()
        .map(|units| decode_utf16(&units))
        .unwrap_or_default()
}
