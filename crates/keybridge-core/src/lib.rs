//! # keybridge-core
//!
//! Shared library for keybridge containing the UTF-8/UTF-16 transcoder,
//! domain entities, and the key translation tables that turn host key events
//! into transliteration-engine input.
//!
//! It has zero dependencies on the host editor, the engine implementation or
//! the file system.
//!
//! # Architecture overview (for beginners)
//!
//! keybridge sits between a text editor (the *host*) and a rule-based
//! transliteration engine.  Every keystroke goes to the engine, and the
//! engine answers with "delete N characters, insert this text".  The bridge
//! applies that answer to the editor.
//!
//! This crate is the shared foundation.  It defines:
//!
//! - **`encoding`** – Conversion between the host's UTF-8 and the engine's
//!   UTF-16, all-or-nothing.
//!
//! - **`keymap`** – The scan-code table that turns hardware keycodes into
//!   engine virtual keys, plus both modifier models.
//!
//! - **`domain`** – Keyboard records, modifier latches and the engine's
//!   action results.

pub mod domain;
pub mod encoding;
pub mod keymap;

pub use domain::actions::{ActionItem, ActionResult, EngineError, OptionItem, OptionScope};
pub use domain::keyboard::KeyboardRecord;
pub use domain::latches::ModifierLatches;
pub use keymap::{EngineModifiers, HostKeyStates, KeyMapper, VirtualKey};
