//! Scripted transliteration engine for tests.
//!
//! # Why a scripted engine?
//!
//! A real engine evaluates compiled keyboard rule tables that are binary,
//! version-specific and impossible to read in a test.  `ScriptedEngine`
//! replaces rule evaluation with a small lookup: "virtual key + modifiers →
//! this `ActionResult`".  Everything the bridge asks of the engine is written
//! to a shared [`EngineJournal`] so tests can assert on it.
//!
//! The session keeps a plausible context: scripted output is appended to it
//! and deletions are removed from its end, just as a real engine would do.
//!
//! # Usage in tests
//!
//! ```ignore
//! let engine = ScriptedEngine::new().with_keyboard(
//!     "greek",
//!     ScriptedKeyboard::new().rule(VirtualKey::KeyA, EngineModifiers::default(), ActionResult::emit("α")),
//! );
//! let journal = engine.journal();
//! let mut manager = SessionManager::new(Box::new(engine), stores, Vec::new());
//!
//! // ... drive the manager ...
//!
//! assert_eq!(journal.lock().unwrap().sessions_created, 1);
//! ```
//!
//! # Failure flags
//!
//! `failing_sessions`, `failing_events` and `rejecting_context` make the
//! matching calls return an [`EngineError`] so error paths can be tested.

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use keybridge_core::{
    encoding::decode_utf16z, ActionItem, ActionResult, EngineError, EngineModifiers, OptionItem,
    VirtualKey,
};

use crate::application::engine::{CompiledKeyboard, EngineSession, KeyboardLoader};

/// Record of every call the bridge made into the scripted engine.
#[derive(Debug, Default)]
pub struct EngineJournal {
    /// `.kmx` paths passed to `load`, successful or not.
    pub loaded: Vec<PathBuf>,
    /// Environment options passed to each `create_session` call.
    pub environments: Vec<Vec<OptionItem>>,
    pub sessions_created: usize,
    pub session_failures: usize,
    /// `(vkey, modifiers, is_press)` of each processed event.
    pub events: Vec<(VirtualKey, EngineModifiers, bool)>,
    /// Decoded text of each `set_context` call.
    pub contexts_set: Vec<String>,
    pub context_clears: usize,
    /// Option lists passed to `update_options`.
    pub option_updates: Vec<Vec<OptionItem>>,
}

/// Shared handle to a journal.
pub type SharedJournal = Arc<Mutex<EngineJournal>>;

#[derive(Debug, Clone)]
struct ScriptedRule {
    vkey: VirtualKey,
    modifiers: EngineModifiers,
    actions: ActionResult,
    invalidate_context: bool,
}

/// Rule table of one scripted keyboard.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeyboard {
    rules: Vec<ScriptedRule>,
    fail_sessions: bool,
    fail_events: bool,
    reject_context: bool,
}

impl ScriptedKeyboard {
    /// Creates a keyboard with no rules: every key passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule answering key presses of `vkey` with exactly `modifiers`.
    pub fn rule(self, vkey: VirtualKey, modifiers: EngineModifiers, actions: ActionResult) -> Self {
        self.push_rule(vkey, modifiers, actions, false)
    }

    /// Like [`rule`](Self::rule), but the action items also carry an
    /// `InvalidateContext` marker.
    pub fn invalidating_rule(
        self,
        vkey: VirtualKey,
        modifiers: EngineModifiers,
        actions: ActionResult,
    ) -> Self {
        self.push_rule(vkey, modifiers, actions, true)
    }

    /// Every `create_session` call fails.
    pub fn failing_sessions(mut self) -> Self {
        self.fail_sessions = true;
        self
    }

    /// Every `process_event` call fails.
    pub fn failing_events(mut self) -> Self {
        self.fail_events = true;
        self
    }

    /// Every `set_context` call fails.
    pub fn rejecting_context(mut self) -> Self {
        self.reject_context = true;
        self
    }

    fn push_rule(
        mut self,
        vkey: VirtualKey,
        modifiers: EngineModifiers,
        actions: ActionResult,
        invalidate_context: bool,
    ) -> Self {
        self.rules.push(ScriptedRule {
            vkey,
            modifiers,
            actions,
            invalidate_context,
        });
        self
    }

    fn find(&self, vkey: VirtualKey, modifiers: EngineModifiers) -> Option<&ScriptedRule> {
        self.rules
            .iter()
            .find(|rule| rule.vkey == vkey && rule.modifiers == modifiers)
    }
}

/// Keyboard loader that serves scripted keyboards by `.kmx` file stem.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    keyboards: HashMap<String, ScriptedKeyboard>,
    journal: SharedJournal,
}

impl ScriptedEngine {
    /// Creates an engine that knows no keyboards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `keyboard` for any `<id>.kmx` path.
    pub fn with_keyboard(mut self, id: &str, keyboard: ScriptedKeyboard) -> Self {
        self.keyboards.insert(id.to_string(), keyboard);
        self
    }

    /// Journal shared by the engine and every session it creates.
    pub fn journal(&self) -> SharedJournal {
        Arc::clone(&self.journal)
    }
}

impl KeyboardLoader for ScriptedEngine {
    fn load(
        &self,
        kmx_path: &Path,
        _ldml_path: Option<&Path>,
    ) -> Result<Box<dyn CompiledKeyboard>, EngineError> {
        self.journal.lock().unwrap().loaded.push(kmx_path.to_path_buf());

        let id = kmx_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let keyboard = self.keyboards.get(&id).cloned().ok_or_else(|| EngineError::Load {
            path: kmx_path.display().to_string(),
            reason: "no scripted keyboard with this id".to_string(),
        })?;

        Ok(Box::new(ScriptedCompiledKeyboard {
            id,
            keyboard,
            journal: Arc::clone(&self.journal),
        }))
    }
}

struct ScriptedCompiledKeyboard {
    id: String,
    keyboard: ScriptedKeyboard,
    journal: SharedJournal,
}

impl CompiledKeyboard for ScriptedCompiledKeyboard {
    fn create_session(
        &self,
        environment: &[OptionItem],
    ) -> Result<Box<dyn EngineSession>, EngineError> {
        let mut journal = self.journal.lock().unwrap();
        journal.environments.push(environment.to_vec());
        if self.keyboard.fail_sessions {
            journal.session_failures += 1;
            return Err(EngineError::SessionCreate(self.id.clone()));
        }
        journal.sessions_created += 1;
        drop(journal);

        Ok(Box::new(ScriptedSession::with_journal(
            self.keyboard.clone(),
            Arc::clone(&self.journal),
        )))
    }
}

/// One scripted engine session.
#[derive(Debug)]
pub struct ScriptedSession {
    keyboard: ScriptedKeyboard,
    journal: SharedJournal,
    context: String,
    current: ActionResult,
    invalidated: bool,
    options: BTreeMap<String, String>,
}

impl ScriptedSession {
    /// Creates a standalone session with its own journal.
    pub fn new(keyboard: ScriptedKeyboard) -> Self {
        Self::with_journal(keyboard, SharedJournal::default())
    }

    fn with_journal(keyboard: ScriptedKeyboard, journal: SharedJournal) -> Self {
        Self {
            keyboard,
            journal,
            context: String::new(),
            current: ActionResult::default(),
            invalidated: false,
            options: BTreeMap::new(),
        }
    }

    /// The session's cached context as text.
    pub fn context_text(&self) -> &str {
        &self.context
    }

    /// Options applied through `update_options`, decoded.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn journal(&self) -> SharedJournal {
        Arc::clone(&self.journal)
    }

    fn apply_to_context(&mut self, actions: &ActionResult) {
        for _ in 0..actions.code_points_to_delete {
            self.context.pop();
        }
        self.context.push_str(&actions.output_text());
    }
}

impl EngineSession for ScriptedSession {
    fn process_event(
        &mut self,
        vkey: VirtualKey,
        modifiers: EngineModifiers,
        is_press: bool,
        _flags: u16,
    ) -> Result<(), EngineError> {
        if self.keyboard.fail_events {
            return Err(EngineError::Status(1));
        }
        self.journal
            .lock()
            .unwrap()
            .events
            .push((vkey, modifiers, is_press));

        let rule = self.keyboard.find(vkey, modifiers).cloned();
        self.invalidated = false;
        self.current = match (rule, is_press) {
            // Releases of handled keys are swallowed.
            (Some(_), false) => ActionResult::default(),
            (Some(rule), true) => {
                self.invalidated = rule.invalidate_context;
                rule.actions
            }
            // Unhandled Backspace eats one context character.
            (None, true) if vkey == VirtualKey::Backspace && !self.context.is_empty() => {
                ActionResult {
                    code_points_to_delete: 1,
                    ..ActionResult::default()
                }
            }
            (None, _) => ActionResult {
                emit_keystroke: true,
                ..ActionResult::default()
            },
        };

        let actions = self.current.clone();
        self.apply_to_context(&actions);
        Ok(())
    }

    fn actions(&self) -> ActionResult {
        self.current.clone()
    }

    fn action_items(&self) -> Vec<ActionItem> {
        let current = &self.current;
        let mut items = vec![ActionItem::Backspace; current.code_points_to_delete];
        items.extend(
            current
                .output
                .iter()
                .take_while(|&&cp| cp != 0)
                .map(|&cp| ActionItem::Character(cp)),
        );
        if current.do_alert {
            items.push(ActionItem::Alert);
        }
        if current.emit_keystroke {
            items.push(ActionItem::EmitKeystroke);
        }
        items.extend(current.persist_options.iter().cloned().map(ActionItem::PersistOption));
        if self.invalidated {
            items.push(ActionItem::InvalidateContext);
        }
        items.push(ActionItem::End);
        items
    }

    fn context(&self) -> Result<Vec<u16>, EngineError> {
        Ok(self.context.encode_utf16().collect())
    }

    fn set_context(&mut self, units: &[u16]) -> Result<(), EngineError> {
        if self.keyboard.reject_context {
            return Err(EngineError::InvalidContext);
        }
        self.context = decode_utf16z(units);
        self.journal
            .lock()
            .unwrap()
            .contexts_set
            .push(self.context.clone());
        Ok(())
    }

    fn clear_context(&mut self) -> Result<(), EngineError> {
        self.context.clear();
        self.journal.lock().unwrap().context_clears += 1;
        Ok(())
    }

    fn update_options(&mut self, options: &[OptionItem]) -> Result<(), EngineError> {
        self.journal
            .lock()
            .unwrap()
            .option_updates
            .push(options.to_vec());
        self.options.extend(options.iter().filter_map(OptionItem::decode));
        Ok(())
    }
}
