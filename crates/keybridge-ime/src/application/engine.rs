//! Traits at the transliteration engine boundary.
//!
//! The engine is an opaque component: the bridge loads a compiled keyboard,
//! creates one session per editing context, feeds it key events and reads
//! back the resulting actions.  Nothing about rule evaluation lives here.
//!
//! Every call returns a `Result`; a failure disables only the code path that
//! depended on it.

use std::path::Path;

use keybridge_core::{
    ActionItem, ActionResult, EngineError, EngineModifiers, OptionItem, VirtualKey,
};

/// Loads compiled keyboard rule tables from disk.
pub trait KeyboardLoader {
    /// Loads the `.kmx` file at `kmx_path`; `ldml_path` is the optional
    /// LDML source shipped next to it.
    fn load(
        &self,
        kmx_path: &Path,
        ldml_path: Option<&Path>,
    ) -> Result<Box<dyn CompiledKeyboard>, EngineError>;
}

/// A loaded keyboard from which sessions are created.
pub trait CompiledKeyboard {
    /// Creates a session configured with the given environment options.
    fn create_session(
        &self,
        environment: &[OptionItem],
    ) -> Result<Box<dyn EngineSession>, EngineError>;
}

/// Engine state for one keyboard in one editing context.
pub trait EngineSession {
    /// Submits one key event.  `flags` is reserved and always `0`.
    fn process_event(
        &mut self,
        vkey: VirtualKey,
        modifiers: EngineModifiers,
        is_press: bool,
        flags: u16,
    ) -> Result<(), EngineError>;

    /// Actions produced by the last processed event.
    fn actions(&self) -> ActionResult;

    /// The same actions as an itemised list.
    fn action_items(&self) -> Vec<ActionItem>;

    /// Snapshot of the engine's cached context (UTF-16, no terminator).
    fn context(&self) -> Result<Vec<u16>, EngineError>;

    /// Replaces the cached context with zero-terminated UTF-16 `units`.
    fn set_context(&mut self, units: &[u16]) -> Result<(), EngineError>;

    /// Empties the cached context.
    fn clear_context(&mut self) -> Result<(), EngineError>;

    /// Applies option changes to the session.
    fn update_options(&mut self, options: &[OptionItem]) -> Result<(), EngineError>;
}
