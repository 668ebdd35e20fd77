//! Per-keyboard option persistence contract.
//!
//! Keyboards can flip their own options (for example "use ligatures") and
//! ask for the new value to survive restarts.  The bridge writes those values
//! through an [`OptionStore`]; the file format is the infrastructure layer's
//! business.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for option store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing option store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored data could not be parsed or written.
    #[error("option store format error: {0}")]
    Format(String),

    /// The key path has an empty segment.
    #[error("invalid option key path: {0:?}")]
    InvalidPath(String),
}

/// Path-keyed key/value store for one keyboard.
#[cfg_attr(test, mockall::automock)]
pub trait OptionStore {
    /// Writes `value` under `path`, replacing any previous value.
    fn set_value_by_path(&mut self, path: &str, value: &str) -> Result<(), StoreError>;

    /// Every stored `(path, value)` pair.
    fn values(&self) -> Vec<(String, String)>;
}

/// Opens the option store of a keyboard.
pub trait OptionStoreProvider {
    fn open(&self, keyboard_id: &str) -> Result<Box<dyn OptionStore>, StoreError>;
}
