//! Domain entities for keybridge.
//!
//! Pure data and rules with no infrastructure dependencies: nothing here
//! touches the file system, the host editor or a real engine.  The
//! application layer in `keybridge-ime` depends on these types; they never
//! depend on it.

/// Engine action results, option items and the engine error type.
pub mod actions;

/// Installed keyboard description.
pub mod keyboard;

/// Left/right modifier latches.
pub mod latches;
