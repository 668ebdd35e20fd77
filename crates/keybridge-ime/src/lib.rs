//! keybridge-ime library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does keybridge-ime do? (for beginners)
//!
//! An *input method* sits between the keyboard and a text field.  Instead
//! of letting every key insert its printed letter, it asks a rule engine
//! what should happen: typing `a` on a Greek keyboard inserts `α`, typing
//! `'` after it may replace the `α` with `ά`.
//!
//! For every key event the bridge:
//!
//! 1. Finds (or lazily creates) the engine session for the active keyboard
//!    in the focused text field.
//! 2. Copies up to 128 characters before the caret into the engine so its
//!    rules can look back.
//! 3. Translates the host's hardware keycode and modifier flags into the
//!    engine's virtual key and modifier mask.
//! 4. Applies the engine's answer to the text field: delete, insert, save
//!    options, or let the original key through.
//!
//! Everything that touches the outside world (the engine, the editor, the
//! option store) is behind a trait in `application`, so the whole flow is
//! tested with the doubles in `infrastructure`.

/// Application layer: per-keystroke use cases and the session manager.
pub mod application;

/// Infrastructure layer: catalog, option files, config and test doubles.
pub mod infrastructure;
